use shape::{Pattern, Value};

use crate::pattern::{Binding, MatchOutcome, match_pattern};

/// Turn the raw bindings of a successful match into the output sequence:
/// untagged captures are dropped and the rest ordered by index.
///
/// The sort is stable, so captures sharing an index keep their visiting
/// order. That order is not a guarantee; patterns should not reuse indices.
pub fn extract(bindings: Vec<Binding<'_>>) -> Vec<Value> {
    let mut tagged: Vec<(usize, &Value)> = bindings
        .into_iter()
        .filter_map(|binding| binding.index.map(|index| (index, binding.value)))
        .collect();
    tagged.sort_by_key(|&(index, _)| index);
    tagged.into_iter().map(|(_, value)| value.clone()).collect()
}

/// Match and extract in one step. `None` means the pattern did not match;
/// `Some(vec![])` means it matched without tagged captures.
pub fn match_and_bind(pattern: &Pattern, value: &Value) -> Option<Vec<Value>> {
    match match_pattern(pattern, value) {
        MatchOutcome::Matched(bindings) => Some(extract(bindings)),
        MatchOutcome::NotMatched => None,
    }
}
