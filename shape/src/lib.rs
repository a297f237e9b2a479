pub mod parser;
pub mod pattern;
pub mod value;

use std::fmt;
use std::ops::Range;

pub use parser::{ParseError, Parser, parse_chain, parse_pattern, parse_value};
pub use pattern::{Capture, Literal, Pattern, UnsupportedPattern};
pub use value::{SeqKind, Value};

/// A parsed match expression: its alternatives in declaration order.
#[derive(Debug, Clone)]
pub struct Chain {
    pub alternatives: Vec<Arm>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

/// One `~pattern => default` alternative as written.
#[derive(Debug, Clone)]
pub struct Arm {
    pub pattern: Pattern,
    /// `~` prefix: report true/false instead of destructuring.
    pub test: bool,
    pub default: Option<Value>,
    pub span: Range<usize>,
}

impl Chain {
    /// Non-fatal diagnostics: one warning per capture index an alternative
    /// binds more than once, labelled with that alternative's span.
    pub fn warnings(&self) -> Vec<ParseError> {
        self.alternatives
            .iter()
            .flat_map(|arm| {
                let span = arm.span.clone();
                arm.pattern
                    .duplicate_indices()
                    .into_iter()
                    .map(move |index| ParseError::reused_capture(index, span.clone(), self.source_id))
            })
            .collect()
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.test {
            write!(f, "~")?;
        }
        write!(f, "{}", self.pattern)?;
        if let Some(default) = &self.default {
            write!(f, " => {}", default)?;
        }
        Ok(())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arm) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", arm)?;
        }
        Ok(())
    }
}
