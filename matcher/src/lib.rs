pub mod bindings;
pub mod error;
pub mod expression;
pub mod pattern;

pub use bindings::{extract, match_and_bind};
pub use error::MatchError;
pub use expression::{Alternative, Evaluation, MatchExpression};
pub use pattern::{Binding, MatchOutcome, match_pattern};
