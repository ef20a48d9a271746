use thiserror::Error;

/// Errors raised while turning untyped block data into a [`Block`](crate::Block).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    /// The `type` belongs to neither the container nor the content tag set.
    #[error("unknown block type `{tag}`")]
    UnknownBlockType { tag: String },

    /// The node is missing a field its variant requires, or a field has the wrong JSON type.
    #[error("malformed block: {0}")]
    MalformedShape(String),
}
