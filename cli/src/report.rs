use std::io::Write;

use blocks::parser::ParseError;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use renderer::ActionError;

/// Source database plus stderr writer for diagnostics.
pub struct Reporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl Reporter {
    pub fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Reporter {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color_choice),
            config: term::Config::default(),
        }
    }

    /// Register a source so diagnostics can point into it. Returns its file ID.
    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn parse_errors(&self, errors: &[ParseError]) {
        for error in errors {
            let diagnostic = error.to_diagnostic();
            let _ = term::emit_to_write_style(
                &mut self.writer.lock(),
                &self.config,
                &self.files,
                &diagnostic,
            );
        }
    }

    pub fn action_error(&self, error: &ActionError) {
        match error {
            ActionError::MalformedImportPayload(errors) => {
                self.message(Color::Red, "error", "import aborted, page left unchanged");
                self.parse_errors(errors);
            }
            other => self.message(Color::Red, "error", &other.to_string()),
        }
    }

    /// Print `label: text` with a colored label.
    pub fn message(&self, color: Color, label: &str, text: &str) {
        let mut out = self.writer.lock();
        let _ = out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(out, "{}", label);
        let _ = out.reset();
        let _ = writeln!(out, ": {}", text);
    }
}
