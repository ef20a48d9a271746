pub mod block;
pub mod error;
pub mod mock;
pub mod parser;

pub use crate::block::{Block, BlockId, BlockKind};
pub use crate::error::BlockError;

/// A parsed block payload.
#[derive(Debug, Clone)]
pub struct Payload {
    /// Root-level blocks, in source order.
    pub blocks: Vec<Block>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}
