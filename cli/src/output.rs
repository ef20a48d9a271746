use blocks::Block;
use blocks::block::count;
use renderer::{HtmlOptions, render, to_html};

/// How a page is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// HTML markup
    Html,
    /// Indented element outline
    Tree,
    /// Block wire format
    Json,
    /// Debug dump of the parsed blocks
    Ast,
}

pub fn format_blocks(
    blocks: &[Block],
    format: OutputFormat,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    let text = match format {
        OutputFormat::Html => to_html(&render(blocks), HtmlOptions { pretty }),
        OutputFormat::Tree => render(blocks).iter().map(ToString::to_string).collect(),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(blocks)?,
        OutputFormat::Json => serde_json::to_string(blocks)?,
        OutputFormat::Ast => format!("{:#?}", blocks),
    };
    Ok(text)
}

/// Block outline for `blocks list`: tag, id and classes, children indented.
pub fn print_outline(blocks: &[Block]) {
    for root in blocks {
        root.walk(&mut |block, depth| {
            let pad = "  ".repeat(depth);
            let classes = if block.class_list.is_empty() {
                String::new()
            } else {
                format!(" [{}]", block.class_name())
            };
            let kind = if block.is_container() {
                format!("({} children)", block.children().len())
            } else {
                "(content)".to_string()
            };
            println!("{}{} {}{} {}", pad, block.tag_name(), block.id, classes, kind);
        });
    }
    let depth = blocks.iter().map(Block::depth).max().unwrap_or(0);
    println!(
        "{} root(s), {} block(s), depth {}",
        blocks.len(),
        count(blocks),
        depth
    );
}
