use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use blocks::mock::default_blocks;
use blocks::parser::Parser;
use codespan_reporting::term::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use renderer::ids::SequentialIds;
use renderer::{Action, BlockStore, HtmlOptions, PageSession, to_html};
use serde::Deserialize;
use tracing::debug;

const SCENARIO_EXTENSION: &str = ".scenario";

#[derive(Debug, Deserialize)]
pub struct ScenarioConfig {
    /// Human-readable scenario description.
    #[serde(default)]
    pub description: Option<String>,

    /// Actions applied in order: "add" or "import".
    #[serde(default)]
    pub actions: Vec<String>,

    /// Import payload used instead of the mock database.
    #[serde(default)]
    pub payload: Option<String>,

    /// Expected HTML after all actions (trimmed comparison).
    #[serde(default)]
    pub expect_html: Option<String>,

    /// Render `expect_html` comparisons with indentation.
    #[serde(default)]
    pub pretty: bool,

    /// Expected number of root blocks after all actions.
    #[serde(default)]
    pub expect_count: Option<usize>,

    /// Expected action error: its Display string must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If true, the initial state is expected to be rejected.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// The initial state must be rejected with at least one error whose
    /// message contains this substring. Implies `expect_parse_error`.
    #[serde(default)]
    pub expect_parse_error_contains: Option<String>,
}

/// Split a scenario into its TOML frontmatter and the initial state JSON.
/// An empty body means the page starts from the default blocks.
fn parse_scenario_file(content: &str) -> Result<(ScenarioConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let body = &after_open[close_pos + 4..];

    let config: ScenarioConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, body.trim()))
}

pub enum Outcome {
    Pass,
    Fail(String),
}

pub struct ScenarioResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: Outcome,
}

impl ScenarioResult {
    fn label(&self) -> String {
        self.description.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("?")
                .trim_end_matches(SCENARIO_EXTENSION)
                .to_string()
        })
    }
}

fn run_scenario(path: &Path) -> ScenarioResult {
    let fail = |description: Option<String>, reason: String| ScenarioResult {
        path: path.to_path_buf(),
        description,
        outcome: Outcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, body) = match parse_scenario_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();
    debug!(path = %path.display(), actions = config.actions.len(), "running scenario");

    let initial = if body.is_empty() {
        Ok(default_blocks())
    } else {
        Parser::new(body.to_string(), 0)
            .parse()
            .map(|payload| payload.blocks)
    };

    if config.expect_parse_error || config.expect_parse_error_contains.is_some() {
        let outcome = match (initial, &config.expect_parse_error_contains) {
            (Ok(_), _) => {
                Outcome::Fail("expected the initial state to be rejected, but it parsed".into())
            }
            (Err(_), None) => Outcome::Pass,
            (Err(errors), Some(expected)) => {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                if messages.iter().any(|m| m.contains(expected.as_str())) {
                    Outcome::Pass
                } else {
                    Outcome::Fail(format!(
                        "expected a parse error containing \"{}\", got: {}",
                        expected,
                        messages.join("; ")
                    ))
                }
            }
        };
        return ScenarioResult {
            path: path.to_path_buf(),
            description,
            outcome,
        };
    }

    let initial = match initial {
        Ok(blocks) => blocks,
        Err(errors) => {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return fail(
                description,
                format!("unexpected parse error: {}", messages.join("; ")),
            );
        }
    };

    let mut session = PageSession::new(
        BlockStore::new(initial),
        Box::new(SequentialIds::new("block-")),
    );
    if let Some(payload) = &config.payload {
        session = session.with_import_payload(payload.clone(), 0);
    }

    let mut action_error = None;
    for name in &config.actions {
        let result = name
            .parse::<Action>()
            .and_then(|action| session.apply(action));
        if let Err(e) = result {
            // Later actions still run; a failed import leaves the page as it was.
            if action_error.is_none() {
                action_error = Some(e.to_string());
            }
        }
    }

    if let Some(reason) = check_expectations(&config, &session, action_error) {
        return fail(description, reason);
    }

    ScenarioResult {
        path: path.to_path_buf(),
        description,
        outcome: Outcome::Pass,
    }
}

/// Returns `Some(reason)` on the first unmet expectation.
fn check_expectations(
    config: &ScenarioConfig,
    session: &PageSession,
    action_error: Option<String>,
) -> Option<String> {
    match (&config.expect_error, action_error) {
        (Some(expected), Some(actual)) if !actual.contains(expected.as_str()) => {
            return Some(format!(
                "expected error containing \"{}\", got: {}",
                expected, actual
            ));
        }
        (Some(expected), None) => {
            return Some(format!(
                "expected error containing \"{}\", but every action succeeded",
                expected
            ));
        }
        (None, Some(actual)) => return Some(format!("unexpected action error: {}", actual)),
        _ => {}
    }

    if let Some(expected) = config.expect_count {
        let actual = session.blocks().len();
        if actual != expected {
            return Some(format!(
                "expected {} root block(s), got {}",
                expected, actual
            ));
        }
    }

    if let Some(expected) = &config.expect_html {
        let html = to_html(
            &session.view(),
            HtmlOptions {
                pretty: config.pretty,
            },
        );
        if html.trim() != expected.trim() {
            return Some(format!(
                "html mismatch\n  expected: {}\n  actual:   {}",
                expected.trim(),
                html.trim()
            ));
        }
    }

    None
}

/// A `.scenario` file and the folder it was found in, relative to the
/// suite root. Files directly under the root have an empty category.
struct ScenarioFile {
    category: String,
    path: PathBuf,
}

/// Every scenario below a path, ordered by category then file name.
struct ScenarioSuite {
    root: PathBuf,
    files: Vec<ScenarioFile>,
}

impl ScenarioSuite {
    fn discover(root: &Path) -> Self {
        if root.is_file() {
            return ScenarioSuite {
                root: root.to_path_buf(),
                files: vec![ScenarioFile {
                    category: String::new(),
                    path: root.to_path_buf(),
                }],
            };
        }

        let mut files = Vec::new();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                debug!(dir = %dir.display(), "skipping unreadable directory");
                continue;
            };
            for path in entries.flatten().map(|entry| entry.path()) {
                if path.is_dir() {
                    pending.push(path);
                } else if path.to_string_lossy().ends_with(SCENARIO_EXTENSION) {
                    files.push(ScenarioFile {
                        category: category_of(&dir, root),
                        path,
                    });
                }
            }
        }
        files.sort_by(|a, b| (&a.category, &a.path).cmp(&(&b.category, &b.path)));

        ScenarioSuite {
            root: root.to_path_buf(),
            files,
        }
    }

    fn is_single_file(&self) -> bool {
        self.root.is_file()
    }

    /// Category name to scenario count.
    fn categories(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for file in &self.files {
            *counts.entry(file.category.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Keep only the files whose category matches one of `requested`.
    /// Unknown requests are warned about; an empty request keeps everything.
    fn retain_categories(&mut self, requested: &[String]) {
        if requested.is_empty() {
            return;
        }
        {
            let available = self.categories();
            for request in requested {
                if !available.keys().any(|category| matches_category(category, request)) {
                    let names: Vec<&str> = available.keys().map(|c| category_label(c)).collect();
                    eprintln!(
                        "warning: category '{}' not found (available: {})",
                        request,
                        names.join(", ")
                    );
                }
            }
        }
        self.files.retain(|file| {
            requested
                .iter()
                .any(|request| matches_category(&file.category, request))
        });
    }
}

fn category_of(dir: &Path, root: &Path) -> String {
    dir.strip_prefix(root)
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}

/// `render` matches `render` and any nested folder such as `render/html`.
fn matches_category(category: &str, request: &str) -> bool {
    let request = request.trim_matches('/');
    category
        .strip_prefix(request)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given scenario path.
pub fn list_categories(path: &Path) {
    let suite = ScenarioSuite::discover(path);
    if suite.is_single_file() {
        eprintln!("(single file, no categories)");
        return;
    }
    if suite.files.is_empty() {
        eprintln!("no {} files found in {}", SCENARIO_EXTENSION, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, count) in suite.categories() {
        eprintln!("  {} ({} scenarios)", category_label(category), count);
    }
}

/// Colored status output for the runner.
struct Console {
    out: StandardStream,
}

impl Console {
    fn new(no_color: bool) -> Self {
        let choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Console {
            out: StandardStream::stderr(choice),
        }
    }

    fn styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(color).set_bold(bold));
        let _ = write!(self.out, "{}", text);
        let _ = self.out.reset();
    }

    fn status(&mut self, passed: bool, label: &str) {
        let _ = write!(self.out, "  ");
        if passed {
            self.styled("PASS", Some(Color::Green), false);
        } else {
            self.styled("FAIL", Some(Color::Red), false);
        }
        let _ = writeln!(self.out, "  {}", label);
    }

    fn header(&mut self, text: &str) {
        let _ = writeln!(self.out);
        self.styled(text, None, true);
        let _ = writeln!(self.out);
    }

    fn failures(&mut self, failures: &[ScenarioResult]) {
        if failures.is_empty() {
            return;
        }
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "failures:");
        for failure in failures {
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "  --- {} ---", failure.path.display());
            if let Outcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    let _ = writeln!(self.out, "  {}", line);
                }
            }
        }
    }

    fn summary(&mut self, passed: usize, failed: usize) {
        let _ = writeln!(self.out);
        let _ = write!(self.out, "test result: ");
        if failed == 0 {
            self.styled("ok", Some(Color::Green), false);
            let _ = writeln!(self.out, ". {} passed, 0 failed", passed);
        } else {
            self.styled("FAILED", Some(Color::Red), false);
            let _ = writeln!(
                self.out,
                ". {} passed, {} failed (of {})",
                passed,
                failed,
                passed + failed
            );
        }
    }
}

/// Run every scenario under `path` (or a single file).
/// If `categories` is non-empty, only run scenarios in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_scenarios(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let mut console = Console::new(no_color);

    let mut suite = ScenarioSuite::discover(path);
    if suite.files.is_empty() {
        eprintln!("no {} files found in {}", SCENARIO_EXTENSION, path.display());
        return 1;
    }
    suite.retain_categories(categories);
    if suite.files.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures = Vec::new();
    let mut current_category = None;

    for file in &suite.files {
        if !suite.is_single_file() && current_category != Some(file.category.as_str()) {
            console.header(category_label(&file.category));
            current_category = Some(file.category.as_str());
        }
        let result = run_scenario(&file.path);
        match result.outcome {
            Outcome::Pass => {
                passed += 1;
                console.status(true, &result.label());
            }
            Outcome::Fail(_) => {
                console.status(false, &result.label());
                failures.push(result);
            }
        }
    }

    console.failures(&failures);
    console.summary(passed, failures.len());

    if failures.is_empty() { 0 } else { 1 }
}
