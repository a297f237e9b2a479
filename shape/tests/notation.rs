use pretty_assertions::assert_eq;
use shape::{Capture, Parser, Pattern, SeqKind, UnsupportedPattern, Value, parse_chain, parse_pattern, parse_value};

fn value(source: &str) -> Value {
    parse_value(source).expect("parse failed")
}

fn pattern(source: &str) -> Pattern {
    parse_pattern(source).expect("parse failed")
}

#[test]
fn scalars() {
    assert_eq!(value("none"), Value::None);
    assert_eq!(value("true"), Value::Bool(true));
    assert_eq!(value("false"), Value::Bool(false));
    assert_eq!(value("42"), Value::Int(42));
    assert_eq!(value("-10"), Value::Int(-10));
    assert_eq!(value("1.5"), Value::Float(1.5));
    assert_eq!(value("2e3"), Value::Float(2000.0));
    assert_eq!(value("-inf"), Value::Float(f64::NEG_INFINITY));
    assert_eq!(value(r#""a \"b\"\n""#), Value::str("a \"b\"\n"));
    assert!(matches!(value("nan"), Value::Float(x) if x.is_nan()));
}

#[test]
fn sequences() {
    assert_eq!(value("[]"), Value::List(vec![]));
    assert_eq!(value("[1, 2,]"), Value::list([Value::Int(1), Value::Int(2)]));
    assert_eq!(value("()"), Value::Tuple(vec![]));
    assert_eq!(value("(1,)"), Value::tuple([Value::Int(1)]));
    assert_eq!(value("((1))"), Value::Int(1));
    assert_eq!(
        value("[1, (2, [3])]"),
        Value::list([
            Value::Int(1),
            Value::tuple([Value::Int(2), Value::list([Value::Int(3)])]),
        ])
    );
}

#[test]
fn maps_and_sets() {
    assert_eq!(value("{}"), Value::Map(vec![]));
    assert_eq!(value("set()"), Value::Set(vec![]));
    assert_eq!(
        value("{\"a\": 1, \"b\": [2]}"),
        Value::Map(vec![
            (Value::str("a"), Value::Int(1)),
            (Value::str("b"), Value::list([Value::Int(2)])),
        ])
    );
    assert_eq!(value("{1, 2}"), Value::Set(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn unordered_equality() {
    assert_eq!(value("{1, 2}"), value("{2, 1}"));
    assert_eq!(value("{1: 2, 3: 4}"), value("{3: 4, 1: 2}"));
    assert_ne!(value("[1, 2]"), value("[2, 1]"));
    assert_ne!(value("[1, 2]"), value("(1, 2)"));
    assert_ne!(value("1"), value("1.0"));
    assert_ne!(value("nan"), value("nan"));
}

#[test]
fn display_reads_back() {
    for src in [
        "none",
        "[1, -2, 3.5, \"x\\ty\"]",
        "(1,)",
        "()",
        "{1: [true, false]}",
        "{(1, 2)}",
        "set()",
        "1e20",
        "-inf",
    ] {
        let v = value(src);
        assert_eq!(value(&v.to_string()), v, "round trip of {}", src);
    }
    assert_eq!(value("1.0").to_string(), "1.0");
    assert_eq!(value("( 1 , )").to_string(), "(1,)");
}

#[test]
fn patterns() {
    assert_eq!(pattern("_"), Pattern::ANY);
    assert_eq!(pattern("#3"), Pattern::Capture(Capture::at(3)));
    assert_eq!(
        pattern("[1, _, #0]"),
        Pattern::list([Pattern::from(1_i64), Pattern::ANY, Pattern::capture_at(0)])
    );
    assert_eq!(
        pattern("(#0,)"),
        Pattern::sequence(SeqKind::Tuple, [Pattern::capture_at(0)])
    );
    assert_eq!(pattern("[#2, _, #0]").to_string(), "[#2, _, #0]");
}

#[test]
fn capture_index_bookkeeping() {
    let p = pattern("[#1, [#0, #1], _, #2, #2]");
    assert_eq!(p.capture_indices(), vec![1, 0, 1, 2, 2]);
    assert_eq!(p.duplicate_indices(), vec![1, 2]);
    assert!(pattern("[#0, #1]").duplicate_indices().is_empty());
}

#[test]
fn maps_and_sets_are_rejected_in_patterns() {
    let err = parse_pattern("[1, {2: 3}]").expect_err("maps are unsupported");
    assert_eq!(err.message, UnsupportedPattern::Map.to_string());
    assert_eq!(err.span, 4..10);

    let err = parse_pattern("{1, 2}").expect_err("sets are unsupported");
    assert_eq!(err.message, "set patterns are not supported");
    assert_eq!(err.notes.len(), 1);

    assert_eq!(
        Pattern::literal(value("[{}]")),
        Err(UnsupportedPattern::Map)
    );
}

#[test]
fn captures_inside_braces_still_report_unsupported() {
    let err = parse_pattern("{\"k\": #0}").expect_err("map with capture");
    assert_eq!(err.message, "map patterns are not supported");
    assert_eq!(err.span, 0..9);

    let err = parse_pattern("{_}").expect_err("set with wildcard");
    assert_eq!(err.message, "set patterns are not supported");
    assert_eq!(err.span, 0..3);

    let err = parse_pattern("[1, {\"key\": #0}]").expect_err("nested map");
    assert_eq!(err.message, "map patterns are not supported");
    assert_eq!(err.span, 4..15);

    let err = parse_chain("#0 | ({#1, #2},)").expect_err("set in later arm");
    assert_eq!(err.message, "set patterns are not supported");
    assert_eq!(err.span, 6..14);

    // Malformed braces are still syntax errors, not unsupported patterns.
    let err = parse_pattern("{#0: }").expect_err("missing map value");
    assert_eq!(err.message, "expected a value, found `}`");
}

#[test]
fn reused_captures_produce_warnings() {
    let chain = Parser::new("[#0] | [#1, #1, #0, #0] | (#2, [#2])".to_string(), 3)
        .parse()
        .expect("parse failed");
    let warnings = chain.warnings();
    let summary: Vec<_> = warnings
        .iter()
        .map(|w| (w.message.as_str(), w.span.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("capture #0 is used more than once in this alternative", 7..23),
            ("capture #1 is used more than once in this alternative", 7..23),
            ("capture #2 is used more than once in this alternative", 26..36),
        ]
    );
    assert!(warnings.iter().all(|w| w.is_warning() && w.file_id == 3));
    assert!(parse_chain("[#0, #1] | _").expect("parse failed").warnings().is_empty());
}

#[test]
fn captures_are_rejected_in_values() {
    let err = parse_value("[1, _]").expect_err("not a value");
    assert_eq!(err.message, "captures are only allowed in patterns");
    assert_eq!(err.span, 4..5);
}

#[test]
fn chains() {
    let chain = parse_chain("[#0] | ~#0 | [] => false").expect("parse failed");
    assert_eq!(chain.alternatives.len(), 3);
    assert!(!chain.alternatives[0].test);
    assert!(chain.alternatives[1].test);
    assert_eq!(chain.alternatives[2].default, Some(Value::Bool(false)));
    assert_eq!(chain.to_string(), "[#0] | ~#0 | [] => false");
}

#[test]
fn error_spans() {
    let err = parse_value("[1, 2").expect_err("unclosed");
    assert_eq!(err.message, "expected `]`, found end of input");
    assert_eq!(err.span, 5..5);

    let err = parse_value("[1 2]").expect_err("missing comma");
    assert_eq!(err.message, "expected `]`, found integer `2`");
    assert_eq!(err.span, 3..4);

    let err = parse_pattern("#").expect_err("no index");
    assert_eq!(err.message, "expected a capture index after `#`");

    let err = parse_value("\"open").expect_err("unterminated");
    assert_eq!(err.message, "unterminated string literal");
    assert_eq!(err.span, 0..5);

    let err = parse_value("1 2").expect_err("trailing input");
    assert_eq!(err.message, "unexpected integer `2` after input");

    let err = parse_value("maybe").expect_err("unknown name");
    assert_eq!(err.message, "unknown name `maybe`");
    assert_eq!(err.notes, vec!["expected `none`, `true` or `false`".to_string()]);
    assert!(!err.is_warning());

    let err = parse_value("99999999999999999999").expect_err("overflow");
    assert!(err.message.contains("out of range"));

    let err = parse_chain("[1] |").expect_err("dangling pipe");
    assert_eq!(err.message, "expected a value, found end of input");
}

#[test]
fn file_id_flows_into_diagnostics() {
    let err = Parser::new("[1,, 2]".to_string(), 7)
        .parse_value()
        .expect_err("double comma");
    assert_eq!(err.file_id, 7);
    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.labels[0].file_id, 7);
    assert_eq!(diagnostic.labels[0].range, 3..4);
}
