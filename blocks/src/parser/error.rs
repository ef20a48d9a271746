use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

use crate::error::BlockError;

/// What went wrong while reading a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The text is not valid JSON.
    Syntax,
    /// The JSON is valid but a node does not describe a block.
    Block(BlockError),
}

/// Payload errors with source location information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    /// Byte span in the payload. `None` when the location could not be recovered.
    pub span: Option<Range<usize>>,
    pub file_id: usize,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn syntax(message: impl Into<String>, span: Option<Range<usize>>, file_id: usize) -> Self {
        ParseError {
            kind: ParseErrorKind::Syntax,
            message: message.into(),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn block(error: BlockError, span: Option<Range<usize>>, file_id: usize) -> Self {
        ParseError {
            message: error.to_string(),
            kind: ParseErrorKind::Block(error),
            span,
            file_id,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_unknown_block_type(&self) -> bool {
        matches!(
            self.kind,
            ParseErrorKind::Block(BlockError::UnknownBlockType { .. })
        )
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(self.file_id, span.clone())],
            None => Vec::new(),
        };
        Diagnostic::error()
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for note in &self.notes {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}
