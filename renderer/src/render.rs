use blocks::parser::{ParseError, Parser};
use blocks::{Block, BlockKind};
use tracing::trace;

use crate::element::{BLOCK_ID, CLASS_NAME, ElementBody, KEY, Props, UiElement};

/// Render root-level blocks into UI elements.
///
/// One element per block, in input order. Containers recurse into their
/// children; content blocks carry their `data` unchanged. The function is
/// pure, so equal input always yields equal output.
pub fn render(blocks: &[Block]) -> Vec<UiElement> {
    blocks.iter().map(render_block).collect()
}

pub fn render_block(block: &Block) -> UiElement {
    trace!(id = %block.id, tag = block.tag_name(), "render block");
    let body = match &block.kind {
        BlockKind::Container { children, .. } => ElementBody::Children(render(children)),
        BlockKind::Content { data, .. } => ElementBody::Text(data.clone()),
    };
    UiElement {
        tag: block.tag_name(),
        props: block_props(block),
        body,
    }
}

fn block_props(block: &Block) -> Props {
    let mut props = Props::new();
    props.insert(CLASS_NAME, block.class_name());
    props.insert(KEY, block.id.to_string());
    props.insert(BLOCK_ID, block.id.to_string());
    props
}

/// Parse a JSON payload and render it.
///
/// Tags outside both tag sets surface here as `UnknownBlockType` parse
/// errors; a typed [`Block`] can never carry one.
pub fn render_source(source: String, file_id: usize) -> Result<Vec<UiElement>, Vec<ParseError>> {
    let payload = Parser::new(source, file_id).parse()?;
    Ok(render(&payload.blocks))
}
