use serde_json::json;
use triage::interop::StandardSchema;
use triage::{
    array, min_length, number, object, parse, parse_with, pipe, safe_parse, string, transform,
    Config, Parser, Schema,
};

#[test]
fn test_parse_returns_transformed_output() {
    let schema = pipe(
        string(),
        vec![min_length(5), transform(|v| json!(v.as_str().map_or(0, str::len)))],
    );
    assert_eq!(parse(&schema, &json!("foobar")).unwrap(), json!(6));
}

#[test]
fn test_parse_error_aggregates_all_issues() {
    let schema = object([("a", string()), ("b", number()), ("c", string())]);
    let err = parse(&schema, &json!({})).unwrap_err();
    assert_eq!(err.issues().len(), 3);
    let rendered = err.to_string();
    assert!(rendered.contains("3 issue(s)"));
    assert!(rendered.contains("a:"));
}

#[test]
fn test_parse_with_respects_config() {
    let schema = object([("a", string()), ("b", string())]);
    let config = Config::new().abort_early(true);
    let err = parse_with(&schema, &json!({}), &config).unwrap_err();
    assert_eq!(err.issues().len(), 1);
}

#[test]
fn test_safe_parse_never_panics_on_failure() {
    let schema = object([("user", object([("name", string())]))]);
    let result = safe_parse(&schema, &json!({"user": {"name": 1}}));
    assert!(!result.success());
    // Output is always populated, even on failure.
    assert_eq!(result.output, json!({"user": {"name": 1}}));
}

#[test]
fn test_issues_are_absent_or_non_empty() {
    let schema = array(number());

    let ok = safe_parse(&schema, &json!([1]));
    assert!(ok.issues.is_none());

    let bad = safe_parse(&schema, &json!(["x"]));
    let issues = bad.issues.unwrap();
    assert!(issues.len() >= 1);
    assert!(!issues.is_empty());
}

#[test]
fn test_idempotence_without_transformations() {
    let schema = object([
        ("name", string()),
        ("scores", array(number())),
        ("meta", object([("id", number())])),
    ]);
    let input = json!({"name": "n", "scores": [1, 2], "meta": {"id": 7}});

    let first = safe_parse(&schema, &input);
    assert!(first.success());
    let second = safe_parse(&schema, &first.output);
    assert!(second.success());
    assert_eq!(second.output, first.output);
}

#[test]
fn test_bound_parser_equivalent_to_repeated_safe_parse() {
    let schema = object([("n", number())]);
    let parser = Parser::new(schema.clone());

    for input in [json!({"n": 1}), json!({"n": "x"}), json!({})] {
        let direct = safe_parse(&schema, &input);
        let bound = parser.safe_parse(&input);
        assert_eq!(direct.typed, bound.typed);
        assert_eq!(direct.output, bound.output);
        assert_eq!(
            direct.issues.map(|i| i.len()),
            bound.issues.map(|i| i.len())
        );
    }
}

#[test]
fn test_standard_schema_adapter() {
    let schema = object([("n", number())]);
    assert_eq!(<Schema as StandardSchema>::VERSION, 1);
    assert_eq!(schema.vendor(), "triage");

    assert!(schema.validate(&json!({"n": 1})).is_success());
    let failure = schema.validate(&json!({"n": "x"})).into_result().unwrap_err();
    assert_eq!(failure.len(), 1);
}

#[test]
fn test_issue_serialized_shape_matches_contract() {
    let schema = object([("key", pipe(string(), vec![min_length(5)]))]);
    let result = safe_parse(&schema, &json!({"key": "foo"}));
    let issues = result.issues.unwrap();
    let encoded = serde_json::to_value(issues.first()).unwrap();

    assert_eq!(
        encoded,
        json!({
            "kind": "validation",
            "type": "min_length",
            "input": "foo",
            "expected": ">=5",
            "received": "3",
            "message": "Invalid length: Expected >=5 but received 3",
            "requirement": 5,
            "path": [
                {
                    "type": "object",
                    "origin": "value",
                    "input": {"key": "foo"},
                    "key": "key",
                    "value": "foo",
                }
            ],
        })
    );
}

#[test]
fn test_schema_nodes_are_reusable_across_parses() {
    let schema = pipe(string(), vec![min_length(2)]);
    // Same node, many runs, no cross-call state.
    assert!(!safe_parse(&schema, &json!("x")).success());
    assert!(safe_parse(&schema, &json!("xy")).success());
    assert!(!safe_parse(&schema, &json!("x")).success());
}

#[test]
fn test_schema_nodes_shared_across_threads() {
    use std::sync::Arc;

    let schema = Arc::new(object([("n", pipe(number(), vec![]))]));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                let result = safe_parse(&schema, &json!({"n": i}));
                assert!(result.success());
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
