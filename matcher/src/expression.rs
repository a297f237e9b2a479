use std::fmt;
use std::iter;

use shape::{Chain, Pattern, Value};

use crate::bindings::extract;
use crate::error::MatchError;
use crate::pattern::{MatchOutcome, match_pattern};

/// One candidate shape of a match expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternative {
    pattern: Pattern,
    /// False once inverted to a boolean test.
    destructuring: bool,
    default: Option<Value>,
}

impl Alternative {
    pub fn new(pattern: Pattern) -> Self {
        Alternative {
            pattern,
            destructuring: true,
            default: None,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn is_destructuring(&self) -> bool {
        self.destructuring
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// What a successful evaluation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Captured values ordered by capture index. May be empty.
    Bindings(Vec<Value>),
    /// The winning alternative's default value.
    Default(Value),
    /// Boolean-test result.
    Test(bool),
}

impl Evaluation {
    /// Flatten into a single value: bindings become a tuple.
    pub fn into_value(self) -> Value {
        match self {
            Evaluation::Bindings(values) => Value::Tuple(values),
            Evaluation::Default(value) => value,
            Evaluation::Test(b) => Value::Bool(b),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Bindings(values) => write!(f, "{}", Value::Tuple(values.clone())),
            Evaluation::Default(value) => write!(f, "{}", value),
            Evaluation::Test(b) => write!(f, "{}", b),
        }
    }
}

/// A primary alternative plus every alternative chained in before it.
///
/// Chaining consumes the expression, evaluation only borrows it: once an
/// expression is shared for evaluation it can no longer be extended.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpression {
    primary: Alternative,
    /// Tried before `primary`, in declaration order.
    fallbacks: Vec<Alternative>,
}

impl MatchExpression {
    pub fn new(pattern: Pattern) -> Self {
        let duplicates = pattern.duplicate_indices();
        if !duplicates.is_empty() {
            tracing::warn!(
                pattern = %pattern,
                ?duplicates,
                "capture index reused; the order of its bindings is unspecified"
            );
        }
        MatchExpression {
            primary: Alternative::new(pattern),
            fallbacks: Vec::new(),
        }
    }

    /// An expression whose whole pattern is the literal `value`.
    pub fn equals(value: Value) -> Result<Self, MatchError> {
        Ok(MatchExpression::new(Pattern::literal(value)?))
    }

    /// Return `value` instead of the bindings when the primary alternative wins.
    pub fn with_default(mut self, value: Value) -> Self {
        self.primary.default = Some(value);
        self
    }

    /// Report `true`/`false` instead of bindings, and `false` instead of
    /// `NoMatch` when nothing matches.
    pub fn as_boolean_test(mut self) -> Self {
        self.primary.destructuring = false;
        self
    }

    /// Chain `other` after `self`: every alternative of `self` is tried
    /// first, then those of `other`, each side in its own declaration order.
    pub fn or_else(self, other: MatchExpression) -> MatchExpression {
        let MatchExpression {
            primary,
            mut fallbacks,
        } = self;
        fallbacks.push(primary);
        fallbacks.extend(other.fallbacks);
        MatchExpression {
            primary: other.primary,
            fallbacks,
        }
    }

    /// Build from parsed notation. `None` for a chain with no alternatives.
    pub fn from_chain(chain: Chain) -> Option<Self> {
        chain
            .alternatives
            .into_iter()
            .map(|arm| {
                let mut expr = MatchExpression::new(arm.pattern);
                if let Some(default) = arm.default {
                    expr = expr.with_default(default);
                }
                if arm.test {
                    expr = expr.as_boolean_test();
                }
                expr
            })
            .reduce(MatchExpression::or_else)
    }

    /// All alternatives in the order they are tried.
    pub fn alternatives(&self) -> impl Iterator<Item = &Alternative> {
        self.fallbacks.iter().chain(iter::once(&self.primary))
    }

    pub fn alternative_count(&self) -> usize {
        self.fallbacks.len() + 1
    }

    /// Whether a total failure raises `NoMatch` (true) or reports `false`.
    pub fn is_destructuring(&self) -> bool {
        self.primary.destructuring
    }

    #[tracing::instrument(level = "debug", skip_all, fields(alternatives = self.alternative_count()))]
    pub fn evaluate(&self, value: &Value) -> Result<Evaluation, MatchError> {
        for (position, alternative) in self.alternatives().enumerate() {
            let MatchOutcome::Matched(bindings) = match_pattern(&alternative.pattern, value) else {
                tracing::trace!(position, pattern = %alternative.pattern, "alternative rejected");
                continue;
            };
            tracing::debug!(position, pattern = %alternative.pattern, "alternative matched");

            if !alternative.destructuring {
                return Ok(Evaluation::Test(true));
            }
            if let Some(default) = &alternative.default {
                return Ok(Evaluation::Default(default.clone()));
            }
            return Ok(Evaluation::Bindings(extract(bindings)));
        }

        if self.is_destructuring() {
            Err(MatchError::NoMatch {
                value: value.clone(),
            })
        } else {
            Ok(Evaluation::Test(false))
        }
    }
}

impl From<Pattern> for MatchExpression {
    fn from(pattern: Pattern) -> Self {
        MatchExpression::new(pattern)
    }
}

impl fmt::Display for MatchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, alternative) in self.alternatives().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            if !alternative.destructuring {
                write!(f, "~")?;
            }
            write!(f, "{}", alternative.pattern)?;
            if let Some(default) = &alternative.default {
                write!(f, " => {}", default)?;
            }
        }
        Ok(())
    }
}
