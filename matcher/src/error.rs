use shape::{UnsupportedPattern, Value};
use thiserror::Error;

/// The two failures a caller can observe. Shape mismatches during matching
/// are ordinary negative outcomes and never surface here.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A destructuring expression where every alternative rejected the value.
    #[error("no match for {value}")]
    NoMatch { value: Value },

    #[error(transparent)]
    Unsupported(#[from] UnsupportedPattern),
}
