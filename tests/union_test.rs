use serde_json::json;
use triage::{min_length, number, object, pipe, safe_parse, string, union, IssueKind};

#[test]
fn test_first_typed_member_wins_even_with_issues() {
    // Member A types the value but carries one validation issue; member B
    // does not type it at all. The overall issues must equal exactly A's,
    // and B's are discarded.
    let schema = union([pipe(string(), vec![min_length(5)]), number()]);

    let result = safe_parse(&schema, &json!("abc"));
    assert!(result.typed);
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.first().type_tag, "min_length");
    assert_eq!(issues.first().kind, IssueKind::Validation);
}

#[test]
fn test_members_tried_in_declared_order() {
    // Both members type strings; the first one declared wins and its
    // (issue-carrying) result is used as-is.
    let schema = union([pipe(string(), vec![min_length(10)]), string()]);
    let result = safe_parse(&schema, &json!("short"));
    assert!(result.typed);
    // The second member would have been issue-free, but it is never reached.
    assert_eq!(result.issues.unwrap().len(), 1);
}

#[test]
fn test_clean_member_short_circuits() {
    let schema = union([number(), string()]);
    let result = safe_parse(&schema, &json!("ok"));
    assert!(result.success());
    assert_eq!(result.output, json!("ok"));
}

#[test]
fn test_no_member_types_yields_single_aggregate_issue() {
    let schema = union([string(), number()]);
    let result = safe_parse(&schema, &json!(true));
    assert!(!result.typed);

    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    let issue = issues.first();
    assert_eq!(issue.type_tag, "union");
    assert_eq!(issue.expected.as_deref(), Some("(string | number)"));

    // Per-member detail is preserved, in member order.
    let nested = issue.issues.as_ref().unwrap();
    assert_eq!(nested.len(), 2);
    assert_eq!(nested[0].type_tag, "string");
    assert_eq!(nested[1].type_tag, "number");
}

#[test]
fn test_union_failure_inside_container_gets_path() {
    let schema = object([("id", union([string(), number()]))]);
    let result = safe_parse(&schema, &json!({"id": null}));
    let issues = result.issues.unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.first().dot_path(), "id");
    assert_eq!(issues.first().type_tag, "union");
}

#[test]
fn test_union_of_objects() {
    let circle = object([("kind", triage::literal("circle")), ("radius", number())]);
    let square = object([("kind", triage::literal("square")), ("side", number())]);
    let schema = union([circle, square]);

    let result = safe_parse(&schema, &json!({"kind": "square", "side": 2}));
    assert!(result.success());
    assert_eq!(result.output, json!({"kind": "square", "side": 2}));
}
