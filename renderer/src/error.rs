use blocks::parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    /// The import payload could not be read as blocks. State is left untouched.
    #[error("malformed import payload: {}", summarize(.0))]
    MalformedImportPayload(Vec<ParseError>),

    #[error("unknown action `{0}` (expected `add` or `import`)")]
    UnknownAction(String),
}

fn summarize(errors: &[ParseError]) -> String {
    match errors {
        [] => "no details".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}
