pub mod error;
mod payload;

pub use error::{ParseError, ParseErrorKind};
pub use payload::MAX_NESTING;

use crate::Payload;

/// Payload parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser { source, file_id }
    }

    /// Parse JSON payload text into a sequence of blocks.
    /// Every malformed node is reported, not only the first one.
    pub fn parse(&self) -> Result<Payload, Vec<ParseError>> {
        let blocks = payload::parse_blocks(&self.source, self.file_id)?;
        Ok(Payload {
            blocks,
            source_id: self.file_id,
        })
    }
}
