use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::value::{SeqKind, Value, write_items};

/// A pattern kind the engine deliberately does not match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnsupportedPattern {
    #[error("map patterns are not supported")]
    Map,
    #[error("set patterns are not supported")]
    Set,
}

/// Wildcard leaf. Matches anything; a tagged capture also decides where the
/// matched value lands in the extracted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capture {
    index: Option<usize>,
}

impl Capture {
    /// The untagged wildcard. Its matches are discarded on extraction.
    pub const ANY: Capture = Capture { index: None };

    pub const fn at(index: usize) -> Self {
        Capture { index: Some(index) }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// A value matched by structural equality. Maps and sets are rejected at
/// construction, at any depth.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Result<Self, UnsupportedPattern> {
        check_supported(&value)?;
        Ok(Literal { value })
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

fn check_supported(value: &Value) -> Result<(), UnsupportedPattern> {
    match value {
        Value::Map(_) => Err(UnsupportedPattern::Map),
        Value::Set(_) => Err(UnsupportedPattern::Set),
        Value::List(items) | Value::Tuple(items) => items.iter().try_for_each(check_supported),
        _ => Ok(()),
    }
}

/// The declared shape of a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Capture(Capture),
    Literal(Literal),
    /// Same kind, same length, element-wise match.
    Sequence { kind: SeqKind, elements: Vec<Pattern> },
}

impl Pattern {
    pub const ANY: Pattern = Pattern::Capture(Capture::ANY);

    pub fn capture() -> Self {
        Pattern::ANY
    }

    pub fn capture_at(index: usize) -> Self {
        Pattern::Capture(Capture::at(index))
    }

    pub fn literal(value: Value) -> Result<Self, UnsupportedPattern> {
        Literal::new(value).map(Pattern::Literal)
    }

    pub fn sequence(kind: SeqKind, elements: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::Sequence {
            kind,
            elements: elements.into_iter().collect(),
        }
    }

    pub fn list(elements: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::sequence(SeqKind::List, elements)
    }

    pub fn tuple(elements: impl IntoIterator<Item = Pattern>) -> Self {
        Pattern::sequence(SeqKind::Tuple, elements)
    }

    /// Every tagged capture index, in textual (depth-first) order.
    pub fn capture_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_indices(&mut out);
        out
    }

    fn collect_indices(&self, out: &mut Vec<usize>) {
        match self {
            Pattern::Capture(capture) => out.extend(capture.index()),
            Pattern::Literal(_) => {}
            Pattern::Sequence { elements, .. } => {
                for element in elements {
                    element.collect_indices(out);
                }
            }
        }
    }

    /// Capture indices used more than once, ascending.
    pub fn duplicate_indices(&self) -> Vec<usize> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for index in self.capture_indices() {
            *counts.entry(index).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|&(_, n)| n > 1)
            .map(|(index, _)| index)
            .collect()
    }
}

impl From<Capture> for Pattern {
    fn from(capture: Capture) -> Self {
        Pattern::Capture(capture)
    }
}

// Scalars can never be unsupported, so these conversions are infallible.

impl From<i64> for Pattern {
    fn from(n: i64) -> Self {
        Pattern::Literal(Literal { value: Value::Int(n) })
    }
}

impl From<f64> for Pattern {
    fn from(x: f64) -> Self {
        Pattern::Literal(Literal { value: Value::Float(x) })
    }
}

impl From<bool> for Pattern {
    fn from(b: bool) -> Self {
        Pattern::Literal(Literal { value: Value::Bool(b) })
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Literal(Literal { value: Value::Str(s.to_string()) })
    }
}

impl TryFrom<Value> for Pattern {
    type Error = UnsupportedPattern;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Pattern::literal(value)
    }
}

impl fmt::Display for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "#{}", index),
            None => write!(f, "_"),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Capture(capture) => write!(f, "{}", capture),
            Pattern::Literal(literal) => write!(f, "{}", literal.value),
            Pattern::Sequence { kind, elements } => write_items(f, *kind, elements),
        }
    }
}
