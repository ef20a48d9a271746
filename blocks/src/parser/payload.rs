use std::collections::BTreeMap;
use std::ops::Range;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use tracing::debug;

use crate::block::{Block, BlockTag, ContainerTag, ContentTag};
use crate::error::BlockError;
use crate::parser::error::ParseError;

/// Deepest block nesting accepted, counting root blocks as level 1.
pub const MAX_NESTING: usize = 128;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse JSON text into a list of root-level blocks.
pub fn parse_blocks(source: &str, file_id: usize) -> Result<Vec<Block>, Vec<ParseError>> {
    let root: &RawValue = serde_json::from_str(source).map_err(|e| {
        let start = line_column_to_offset(source, e.line(), e.column());
        let end = (start + 1).min(source.len());
        vec![ParseError::syntax(e.to_string(), Some(start..end), file_id)]
    })?;

    let mut reader = PayloadReader {
        source,
        file_id,
        errors: Vec::new(),
    };
    let blocks = reader.read_list(root, "$", 1);

    if reader.errors.is_empty() {
        debug!(count = blocks.len(), "parsed block payload");
        Ok(blocks)
    } else {
        debug!(errors = reader.errors.len(), "block payload rejected");
        Err(reader.errors)
    }
}

// ---------------------------------------------------------------------------
// Reader state
// ---------------------------------------------------------------------------

/// Walks the raw JSON tree. Every `RawValue` borrows from `source`, which is
/// how spans are recovered for shape errors.
struct PayloadReader<'a> {
    source: &'a str,
    file_id: usize,
    errors: Vec<ParseError>,
}

impl<'a> PayloadReader<'a> {
    /// `depth` is the nesting level of the blocks in this list.
    fn read_list(&mut self, raw: &'a RawValue, path: &str, depth: usize) -> Vec<Block> {
        let items: Vec<&'a RawValue> = match serde_json::from_str(raw.get()) {
            Ok(items) => items,
            Err(_) => {
                self.malformed(raw, path, "expected an array of blocks");
                return Vec::new();
            }
        };
        if depth > MAX_NESTING && !items.is_empty() {
            self.malformed(
                raw,
                path,
                format!("nesting too deep (limit is {} levels)", MAX_NESTING),
            );
            return Vec::new();
        }

        let mut blocks = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            if let Some(block) = self.read_block(item, &format!("{}[{}]", path, index), depth) {
                blocks.push(block);
            }
        }
        blocks
    }

    fn read_block(&mut self, raw: &'a RawValue, path: &str, depth: usize) -> Option<Block> {
        let fields: BTreeMap<String, &'a RawValue> = match serde_json::from_str(raw.get()) {
            Ok(fields) => fields,
            Err(_) => {
                self.malformed(raw, path, "expected a block object");
                return None;
            }
        };

        let id: Option<String> = self.required(&fields, raw, path, "id", "a string");
        let class_list: Option<Vec<String>> =
            self.required(&fields, raw, path, "classList", "an array of strings");
        let type_name: Option<String> = self.required(&fields, raw, path, "type", "a string");

        let tag = match BlockTag::classify(&type_name?) {
            Ok(tag) => tag,
            Err(error) => {
                let span = fields.get("type").and_then(|value| self.span_of(value));
                self.errors.push(
                    ParseError::block(error, span, self.file_id)
                        .with_note(format!("at {}.type", path))
                        .with_note(format!(
                            "container types: {}; content types: {}",
                            tag_list(&ContainerTag::ALL.map(|t| t.as_str())),
                            tag_list(&ContentTag::ALL.map(|t| t.as_str())),
                        )),
                );
                return None;
            }
        };

        match tag {
            BlockTag::Container(tag) => {
                // Children are read before bailing out so nested errors are reported too.
                let children_path = format!("{}.children", path);
                let children = match fields.get("children") {
                    Some(children) => self.read_list(children, &children_path, depth + 1),
                    None => {
                        self.malformed(raw, path, "container block is missing `children`");
                        return None;
                    }
                };
                Some(Block::container(id?, tag, class_list?, children))
            }
            BlockTag::Content(tag) => {
                let data: Option<String> = self.required(&fields, raw, path, "data", "a string");
                Some(Block::content(id?, tag, class_list?, data?))
            }
        }
    }

    fn required<T: DeserializeOwned>(
        &mut self,
        fields: &BTreeMap<String, &'a RawValue>,
        object: &'a RawValue,
        path: &str,
        name: &str,
        expected: &str,
    ) -> Option<T> {
        match fields.get(name) {
            None => {
                self.malformed(object, path, format!("missing `{}`", name));
                None
            }
            Some(value) => match serde_json::from_str(value.get()) {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    self.malformed(
                        value,
                        &format!("{}.{}", path, name),
                        format!("`{}` must be {}", name, expected),
                    );
                    None
                }
            },
        }
    }

    fn malformed(&mut self, raw: &RawValue, path: &str, message: impl Into<String>) {
        let error = ParseError::block(
            BlockError::MalformedShape(message.into()),
            self.span_of(raw),
            self.file_id,
        )
        .with_note(format!("at {}", path));
        self.errors.push(error);
    }

    /// Byte range of `raw` within the source text.
    fn span_of(&self, raw: &RawValue) -> Option<Range<usize>> {
        let text = raw.get();
        let start = (text.as_ptr() as usize).checked_sub(self.source.as_ptr() as usize)?;
        let end = start + text.len();
        (end <= self.source.len()).then_some(start..end)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn tag_list(tags: &[&str]) -> String {
    tags.join(", ")
}

/// serde_json reports 1-based line and column numbers.
fn line_column_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}
