mod logging;
mod output;
mod report;
mod scenario;

use std::io::{BufRead, Read};
use std::path::Path;
use std::process;

use blocks::Block;
use blocks::mock::{DB_BLOCKS, default_blocks};
use blocks::parser::Parser as PayloadParser;
use clap::{Parser, Subcommand};
use codespan_reporting::term::termcolor::Color;
use renderer::ids::{IdGenerator, SequentialIds, UuidGenerator};
use renderer::{Action, PageSession};
use tracing::{debug, error, info};

use crate::output::{OutputFormat, format_blocks, print_outline};
use crate::report::Reporter;

const SUBCOMMANDS: &[&str] = &["render", "session", "list", "test", "help"];

/// Flags whose value is passed as the following argument.
const VALUE_FLAGS: &[&str] = &["-f", "--format", "--payload", "-c", "--category"];

/// Index of the first argument that is neither a flag nor a flag's value.
fn first_positional(args: &[String]) -> Option<usize> {
    let mut pos = 1;
    while pos < args.len() {
        let arg = args[pos].as_str();
        if VALUE_FLAGS.contains(&arg) {
            pos += 2;
            continue;
        }
        if !arg.starts_with('-') || arg == "-" {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

#[derive(Parser)]
#[command(name = "blocks", version, about = "Page builder block renderer")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON block file (or the default page)
    Render(RenderArgs),

    /// Apply add/import actions to the default page and print the result
    Session(SessionArgs),

    /// Print the block outline of a JSON block file (or the default page)
    List(ListArgs),

    /// Run .scenario files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct FormatArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
    format: OutputFormat,

    /// Indent HTML and JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// JSON block file; `-` reads stdin. Defaults to the built-in page.
    file: Option<String>,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(clap::Args)]
struct SessionArgs {
    /// Actions to apply in order: `add` or `import`
    actions: Vec<String>,

    /// Read actions from stdin, one per line, re-rendering after each change
    #[arg(short, long)]
    interactive: bool,

    /// JSON file imported instead of the mock database
    #[arg(long)]
    payload: Option<String>,

    /// Number new blocks `block-0`, `block-1`, ... instead of random ids
    #[arg(long)]
    sequential_ids: bool,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(clap::Args)]
struct ListArgs {
    /// JSON block file; `-` reads stdin. Defaults to the built-in page.
    file: Option<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .scenario file or a directory containing them
    path: String,

    /// Run only scenarios in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // `blocks page.json` is shorthand for `blocks render page.json`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = first_positional(&args) {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "render".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    logging::init_logging(cli.verbose);

    let mut reporter = Reporter::new(cli.no_color);
    let exit_code = match cli.command {
        Command::Render(render_args) => do_render(render_args, &mut reporter),
        Command::Session(session_args) => do_session(session_args, &mut reporter),
        Command::List(list_args) => do_list(list_args, &mut reporter),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                scenario::list_categories(path);
                0
            } else {
                scenario::run_scenarios(path, cli.no_color, &test_args.category)
            }
        }
    };
    process::exit(exit_code);
}

fn read_source(path: &str) -> Result<String, String> {
    if path == "-" {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        return Ok(source);
    }
    std::fs::read_to_string(path).map_err(|e| format!("cannot read '{}': {}", path, e))
}

/// Load blocks from `file`, or the default page when no file is given.
/// Errors are reported before returning `None`.
fn load_blocks(file: Option<&str>, reporter: &mut Reporter) -> Option<Vec<Block>> {
    let Some(path) = file else {
        return Some(default_blocks());
    };

    let source = match read_source(path) {
        Ok(source) => source,
        Err(message) => {
            reporter.message(Color::Red, "error", &message);
            return None;
        }
    };

    let file_id = reporter.add_file(path, source.clone());
    match PayloadParser::new(source, file_id).parse() {
        Ok(payload) => {
            info!(
                path,
                file_id = payload.source_id,
                roots = payload.blocks.len(),
                "loaded blocks"
            );
            Some(payload.blocks)
        }
        Err(errors) => {
            reporter.parse_errors(&errors);
            None
        }
    }
}

fn print_blocks(blocks: &[Block], format: &FormatArgs, reporter: &Reporter) -> bool {
    match format_blocks(blocks, format.format, format.pretty) {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            true
        }
        Err(e) => {
            reporter.message(Color::Red, "error", &e.to_string());
            false
        }
    }
}

fn do_render(args: RenderArgs, reporter: &mut Reporter) -> i32 {
    let Some(blocks) = load_blocks(args.file.as_deref(), reporter) else {
        return 1;
    };
    if print_blocks(&blocks, &args.format, reporter) {
        0
    } else {
        1
    }
}

fn do_list(args: ListArgs, reporter: &mut Reporter) -> i32 {
    let Some(blocks) = load_blocks(args.file.as_deref(), reporter) else {
        return 1;
    };
    print_outline(&blocks);
    0
}

fn do_session(args: SessionArgs, reporter: &mut Reporter) -> i32 {
    let mut actions = Vec::with_capacity(args.actions.len());
    for name in &args.actions {
        match name.parse::<Action>() {
            Ok(action) => actions.push(action),
            Err(e) => {
                reporter.action_error(&e);
                return 1;
            }
        }
    }

    let ids: Box<dyn IdGenerator> = if args.sequential_ids {
        Box::new(SequentialIds::new("block-"))
    } else {
        Box::new(UuidGenerator)
    };

    let (payload, payload_name) = match &args.payload {
        Some(path) => match read_source(path) {
            Ok(source) => (source, path.clone()),
            Err(message) => {
                reporter.message(Color::Red, "error", &message);
                return 1;
            }
        },
        None => (DB_BLOCKS.to_string(), "<mock database>".to_string()),
    };
    let payload_id = reporter.add_file(payload_name, payload.clone());
    let mut session = PageSession::with_defaults(ids).with_import_payload(payload, payload_id);

    let mut failed = false;
    for action in actions {
        debug!(%action, "applying action");
        if let Err(e) = session.apply(action) {
            reporter.action_error(&e);
            failed = true;
        }
    }

    if args.interactive {
        run_interactive(&mut session, &args.format, reporter);
    } else if !print_blocks(session.blocks(), &args.format, reporter) {
        failed = true;
    }

    if failed { 1 } else { 0 }
}

/// Read actions from stdin until EOF or `quit`. Every state change re-renders
/// through the store subscription.
fn run_interactive(session: &mut PageSession, format: &FormatArgs, reporter: &Reporter) {
    print_blocks(session.blocks(), format, reporter);

    let (output_format, pretty) = (format.format, format.pretty);
    session.store_mut().subscribe(move |blocks| {
        match format_blocks(blocks, output_format, pretty) {
            Ok(text) => println!("{}", text.trim_end()),
            Err(e) => error!("cannot render page: {}", e),
        }
    });

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("cannot read stdin: {}", e);
                break;
            }
        };
        let command = line.trim();
        match command {
            "" => continue,
            "quit" | "exit" => break,
            "render" => {
                print_blocks(session.blocks(), format, reporter);
            }
            "list" => print_outline(session.blocks()),
            _ => {
                let result = command
                    .parse::<Action>()
                    .and_then(|action| session.apply(action));
                if let Err(e) = result {
                    reporter.action_error(&e);
                }
            }
        }
    }
}
