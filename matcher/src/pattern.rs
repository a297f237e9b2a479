use shape::{Pattern, Value};

/// A value captured at a `Capture` leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding<'v> {
    pub index: Option<usize>,
    pub value: &'v Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'v> {
    /// Bindings in the order the captures were visited.
    Matched(Vec<Binding<'v>>),
    NotMatched,
}

impl MatchOutcome<'_> {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// Attempt to match a Value against a Pattern.
/// Returns every binding produced along the way if the match succeeds.
pub fn match_pattern<'v>(pattern: &Pattern, value: &'v Value) -> MatchOutcome<'v> {
    let mut bindings = Vec::new();
    if match_inner(pattern, value, &mut bindings) {
        MatchOutcome::Matched(bindings)
    } else {
        // Whatever earlier elements captured is dropped with the vector.
        MatchOutcome::NotMatched
    }
}

fn match_inner<'v>(pattern: &Pattern, value: &'v Value, bindings: &mut Vec<Binding<'v>>) -> bool {
    match pattern {
        Pattern::Capture(capture) => {
            bindings.push(Binding {
                index: capture.index(),
                value,
            });
            true
        }

        // Value equality already fails across variants, so Int(1) never
        // equals Float(1.0) and a list never equals a tuple.
        Pattern::Literal(literal) => literal.value() == value,

        Pattern::Sequence { kind, elements } => match value.as_sequence() {
            Some((value_kind, items)) if value_kind == *kind => {
                if items.len() != elements.len() {
                    return false;
                }
                // Stops at the first element that fails.
                elements
                    .iter()
                    .zip(items)
                    .all(|(element, item)| match_inner(element, item, bindings))
            }
            _ => false,
        },
    }
}
