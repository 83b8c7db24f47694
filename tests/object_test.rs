use serde_json::json;
use triage::{
    loose_object, min_length, min_value, number, object, object_with_rest, optional,
    optional_with_default, pipe, safe_parse, safe_parse_with, strict_object, string, Config,
    IssueKind, Origin,
};

// ====== required entries ======

#[test]
fn test_all_required_keys_missing_reports_one_issue_per_key_in_order() {
    let schema = object([("a", string()), ("b", string()), ("c", string())]);

    let result = safe_parse(&schema, &json!({}));
    assert!(!result.typed);
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 3);
    let paths: Vec<_> = issues.iter().map(|i| i.dot_path()).collect();
    assert_eq!(paths, vec!["a", "b", "c"]);
    for issue in issues.iter() {
        assert_eq!(issue.kind, IssueKind::Schema);
        assert_eq!(issue.received.as_deref(), Some("undefined"));
        assert_eq!(issue.path.as_ref().unwrap()[0].origin, Origin::Key);
    }
}

#[test]
fn test_abort_early_reports_exactly_one_missing_key() {
    let schema = object([("a", string()), ("b", string()), ("c", string())]);

    let config = Config::new().abort_early(true);
    let result = safe_parse_with(&schema, &json!({}), &config);
    assert!(!result.typed);
    assert_eq!(result.issues.unwrap().len(), 1);
}

// ====== the documented two-field scenario ======

#[test]
fn test_name_and_age_scenario() {
    let schema = object([
        ("name", pipe(string(), vec![min_length(2)])),
        ("age", pipe(number(), vec![min_value(0)])),
    ]);

    let result = safe_parse(&schema, &json!({"name": "x", "age": -1}));
    assert!(result.typed);
    assert!(!result.success());

    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 2);

    let first = issues.first();
    assert_eq!(first.type_tag, "min_length");
    assert_eq!(first.dot_path(), "name");
    assert_eq!(first.kind, IssueKind::Validation);

    let second = issues.iter().nth(1).unwrap();
    assert_eq!(second.type_tag, "min_value");
    assert_eq!(second.dot_path(), "age");
}

// ====== unknown-key policies ======

#[test]
fn test_plain_object_drops_unknown_keys() {
    let schema = object([("name", string())]);
    let result = safe_parse(&schema, &json!({"name": "a", "x": 1, "y": 2}));
    assert!(result.success());
    assert_eq!(result.output, json!({"name": "a"}));
}

#[test]
fn test_loose_object_copies_unknown_keys_through() {
    let schema = loose_object([("name", string())]);
    let result = safe_parse(&schema, &json!({"name": "a", "x": 1}));
    assert!(result.success());
    assert_eq!(result.output, json!({"name": "a", "x": 1}));
}

#[test]
fn test_strict_object_one_issue_regardless_of_extra_count() {
    let schema = strict_object([("name", string())]);

    for extras in [1, 5, 50] {
        let mut input = serde_json::Map::new();
        input.insert("name".to_string(), json!("a"));
        for i in 0..extras {
            input.insert(format!("extra{}", i), json!(i));
        }
        let result = safe_parse(&schema, &json!(input));
        assert!(!result.typed);
        let issues = result.issues.unwrap();
        assert_eq!(issues.len(), 1, "extras = {}", extras);
        assert_eq!(issues.first().expected.as_deref(), Some("never"));
    }
}

#[test]
fn test_object_with_rest_validates_every_extra() {
    let schema = object_with_rest([("name", string())], number());
    let result = safe_parse(&schema, &json!({"name": "a", "x": "bad", "y": "worse"}));
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 2);
    let paths: Vec<_> = issues.iter().map(|i| i.dot_path()).collect();
    assert_eq!(paths, vec!["x", "y"]);
}

// ====== optional entries and defaults ======

#[test]
fn test_optional_entry_tolerates_absence() {
    let schema = object([("name", string()), ("nick", optional(string()))]);
    let result = safe_parse(&schema, &json!({"name": "a"}));
    assert!(result.success());
    assert_eq!(result.output, json!({"name": "a"}));
}

#[test]
fn test_optional_default_is_validated_and_inserted() {
    let schema = object([("role", optional_with_default(string(), "user"))]);
    let result = safe_parse(&schema, &json!({}));
    assert!(result.success());
    assert_eq!(result.output, json!({"role": "user"}));

    // An invalid default is a schema bug and surfaces as issues.
    let broken = object([("n", optional_with_default(number(), "oops"))]);
    let result = safe_parse(&broken, &json!({}));
    assert!(!result.success());
    assert_eq!(result.issues.unwrap().first().dot_path(), "n");
}

// ====== output assembly ======

#[test]
fn test_output_preserves_declaration_then_input_order() {
    let schema = loose_object([("b", number()), ("a", number())]);
    let result = safe_parse(&schema, &json!({"z": 0, "a": 1, "b": 2}));
    assert!(result.success());
    let keys: Vec<_> = result.output.as_object().unwrap().keys().cloned().collect();
    // Declared entries first, in declaration order, then extras.
    assert_eq!(keys, vec!["b", "a", "z"]);
}

#[test]
fn test_typed_failure_keeps_failing_entry_value_in_output() {
    let schema = object([("name", pipe(string(), vec![min_length(5)]))]);
    let result = safe_parse(&schema, &json!({"name": "ab"}));
    assert!(result.typed);
    assert!(!result.success());
    assert_eq!(result.output, json!({"name": "ab"}));
}
