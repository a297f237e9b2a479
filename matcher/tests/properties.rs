//! Property-based tests for the structural matcher.
//!
//! The matcher stops at the first element that fails. These tests compare it
//! against an exhaustive fold that visits every element pair, and check the
//! algebraic properties of extraction and alternation on generated data.

use matcher::{Evaluation, MatchError, MatchExpression, match_and_bind};
use proptest::prelude::*;
use shape::{Pattern, Value};

// -- Strategies --

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        (-3i64..4).prop_map(Value::Int),
        prop::sample::select(vec![0.5, 1.0, -2.0]).prop_map(Value::Float),
        prop::sample::select(vec!["a", "b", ""]).prop_map(Value::str),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec(inner, 0..4).prop_map(Value::Tuple),
        ]
    })
}

/// A pattern shaped after `value`, with random subtrees replaced by captures.
fn pattern_for(value: &Value) -> BoxedStrategy<Pattern> {
    let literal = Pattern::literal(value.clone()).expect("generated values have no maps or sets");
    let leaves = prop_oneof![
        Just(Pattern::ANY),
        (0usize..4).prop_map(Pattern::capture_at),
        Just(literal),
    ];
    match value.as_sequence() {
        Some((kind, items)) => {
            let elements: Vec<BoxedStrategy<Pattern>> = items.iter().map(pattern_for).collect();
            prop_oneof![
                1 => leaves,
                3 => elements.prop_map(move |elements| Pattern::sequence(kind, elements)),
            ]
            .boxed()
        }
        None => leaves.boxed(),
    }
}

/// A pattern derived from some value, paired with a possibly different value.
fn pattern_and_value() -> impl Strategy<Value = (Pattern, Value)> {
    let related = value_strategy().prop_flat_map(|v| (pattern_for(&v), Just(v)));
    let unrelated = (value_strategy().prop_flat_map(|v| pattern_for(&v)), value_strategy());
    prop_oneof![related, unrelated]
}

// -- Reference matcher --

/// Visits every element pair even after a failure; bindings are only kept
/// while everything so far has matched.
fn fold_match(pattern: &Pattern, value: &Value) -> (bool, Vec<(Option<usize>, Value)>) {
    match pattern {
        Pattern::Capture(capture) => (true, vec![(capture.index(), value.clone())]),
        Pattern::Literal(literal) => (literal.value() == value, Vec::new()),
        Pattern::Sequence { kind, elements } => match value.as_sequence() {
            Some((value_kind, items)) if value_kind == *kind && items.len() == elements.len() => {
                elements.iter().zip(items).fold(
                    (true, Vec::new()),
                    |(ok, mut acc), (element, item)| {
                        let (matched, found) = fold_match(element, item);
                        if ok && matched {
                            acc.extend(found);
                            (true, acc)
                        } else {
                            (false, acc)
                        }
                    },
                )
            }
            _ => (false, Vec::new()),
        },
    }
}

fn fold_match_and_bind(pattern: &Pattern, value: &Value) -> Option<Vec<Value>> {
    let (matched, found) = fold_match(pattern, value);
    if !matched {
        return None;
    }
    let mut tagged: Vec<(usize, Value)> = found
        .into_iter()
        .filter_map(|(index, v)| index.map(|i| (i, v)))
        .collect();
    tagged.sort_by_key(|(i, _)| *i);
    Some(tagged.into_iter().map(|(_, v)| v).collect())
}

fn single_capture_count(pattern: &Pattern) -> usize {
    pattern.capture_indices().len()
}

proptest! {
    #[test]
    fn early_exit_agrees_with_exhaustive_fold((pattern, value) in pattern_and_value()) {
        prop_assert_eq!(match_and_bind(&pattern, &value), fold_match_and_bind(&pattern, &value));
    }

    #[test]
    fn derived_patterns_always_match(value in value_strategy().prop_flat_map(|v| (pattern_for(&v), Just(v)))) {
        let (pattern, value) = value;
        let bound = match_and_bind(&pattern, &value);
        prop_assert!(bound.is_some());
        prop_assert_eq!(bound.map(|b| b.len()), Some(single_capture_count(&pattern)));
    }

    #[test]
    fn literal_of_any_value_matches_itself(value in value_strategy()) {
        let pattern = Pattern::literal(value.clone()).expect("no maps or sets");
        prop_assert_eq!(match_and_bind(&pattern, &value), Some(Vec::new()));
    }

    #[test]
    fn wildcard_binds_nothing(value in value_strategy()) {
        let e = MatchExpression::new(Pattern::capture());
        prop_assert_eq!(e.evaluate(&value).ok(), Some(Evaluation::Bindings(Vec::new())));
    }

    #[test]
    fn length_mismatch_always_fails(
        items in prop::collection::vec(value_strategy(), 0..4),
        extra in 1usize..3,
    ) {
        let pattern = Pattern::list((0..items.len() + extra).map(|_| Pattern::ANY));
        prop_assert_eq!(match_and_bind(&pattern, &Value::List(items)), None);
    }

    #[test]
    fn bindings_follow_capture_index(items in prop::collection::vec(value_strategy(), 1..6)) {
        // Capture element i at index (n - 1 - i): output is the reversed input.
        let n = items.len();
        let pattern = Pattern::list((0..n).map(|i| Pattern::capture_at(n - 1 - i)));
        let mut reversed = items.clone();
        reversed.reverse();
        prop_assert_eq!(match_and_bind(&pattern, &Value::List(items)), Some(reversed));
    }

    #[test]
    fn boolean_mode_never_raises((pattern, value) in pattern_and_value()) {
        let e = MatchExpression::new(pattern.clone()).as_boolean_test();
        let expected = match_and_bind(&pattern, &value).is_some();
        prop_assert_eq!(e.evaluate(&value).ok(), Some(Evaluation::Test(expected)));
    }

    #[test]
    fn destructuring_failure_reports_the_value((pattern, value) in pattern_and_value()) {
        let e = MatchExpression::new(pattern.clone());
        match e.evaluate(&value) {
            Ok(Evaluation::Bindings(_)) => prop_assert!(match_and_bind(&pattern, &value).is_some()),
            Err(MatchError::NoMatch { value: rejected }) => prop_assert_eq!(rejected, value),
            other => prop_assert!(false, "unexpected evaluation {:?}", other),
        }
    }

    #[test]
    fn first_declared_match_wins(
        (first, value) in pattern_and_value(),
        second in value_strategy().prop_flat_map(|v| pattern_for(&v)),
    ) {
        let e = MatchExpression::new(first.clone())
            .with_default(Value::Int(1))
            .or_else(MatchExpression::new(second.clone()).with_default(Value::Int(2)));
        let expected = if match_and_bind(&first, &value).is_some() {
            Some(Value::Int(1))
        } else if match_and_bind(&second, &value).is_some() {
            Some(Value::Int(2))
        } else {
            None
        };
        prop_assert_eq!(e.evaluate(&value).ok().map(Evaluation::into_value), expected);
    }
}
