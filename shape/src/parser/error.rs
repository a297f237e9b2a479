use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use thiserror::Error;

use crate::pattern::UnsupportedPattern;

/// A located problem in notation source. Most are fatal; lints such as a
/// reused capture index carry `Severity::Warning` and never stop parsing.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ParseError {
    fn at(severity: Severity, message: String, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message,
            span,
            file_id,
            severity,
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        Self::at(Severity::Error, message.into(), span, file_id)
    }

    /// A map or set written where a pattern was expected.
    pub fn unsupported(kind: UnsupportedPattern, span: Range<usize>, file_id: usize) -> Self {
        Self::error(kind.to_string(), span, file_id)
            .with_note("only literals, captures, lists and tuples can appear in a pattern")
    }

    /// An alternative binds `index` more than once; `span` covers the alternative.
    pub fn reused_capture(index: usize, span: Range<usize>, file_id: usize) -> Self {
        Self::at(
            Severity::Warning,
            format!("capture #{} is used more than once in this alternative", index),
            span,
            file_id,
        )
        .with_note("the order of bindings that share an index is unspecified")
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let label = Label::primary(self.file_id, self.span.clone());
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![label])
            .with_notes(self.notes.clone())
    }
}
