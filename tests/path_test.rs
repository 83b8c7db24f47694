use serde_json::json;
use triage::{array, number, object, safe_parse, string, tuple};

#[test]
fn test_path_length_equals_nesting_depth() {
    let schema = object([(
        "users",
        array(object([("address", object([("zip", string())]))])),
    )]);
    let input = json!({"users": [{"address": {"zip": 12345}}]});

    let result = safe_parse(&schema, &input);
    let issues = result.issues.unwrap();
    let issue = issues.first();
    assert_eq!(issue.depth(), 4);
    assert_eq!(issue.dot_path(), "users[0].address.zip");
}

#[test]
fn test_each_path_input_is_the_enclosing_container_value() {
    let schema = object([("users", array(object([("name", string())])))]);
    let input = json!({"users": [{"name": 1}]});

    let result = safe_parse(&schema, &input);
    let issues = result.issues.unwrap();
    let path = issues.first().path.clone().unwrap();

    assert_eq!(path[0].input, input);
    assert_eq!(path[1].input, json!([{"name": 1}]));
    assert_eq!(path[2].input, json!({"name": 1}));
}

#[test]
fn test_path_order_is_outer_to_inner() {
    let schema = object([("a", tuple([object([("b", number())])]))]);
    let result = safe_parse(&schema, &json!({"a": [{"b": "x"}]}));
    let issues = result.issues.unwrap();
    let keys: Vec<_> = issues.first().path.clone().unwrap()
        .into_iter()
        .map(|item| item.key.unwrap())
        .collect();
    assert_eq!(keys, vec![json!("a"), json!(0), json!("b")]);
}

#[test]
fn test_root_issue_has_no_path() {
    let result = safe_parse(&string(), &json!(5));
    let issues = result.issues.unwrap();
    assert!(issues.first().path.is_none());
    assert_eq!(issues.first().dot_path(), "");
    assert_eq!(issues.first().depth(), 0);
}

#[test]
fn test_sibling_issues_each_get_their_own_path() {
    let schema = object([("a", number()), ("b", number())]);
    let result = safe_parse(&schema, &json!({"a": "x", "b": "y"}));
    let issues = result.issues.unwrap();
    let paths: Vec<_> = issues.iter().map(|i| i.dot_path()).collect();
    assert_eq!(paths, vec!["a", "b"]);
    // The issue's input is the failing leaf value, not the container.
    assert_eq!(issues.first().input, json!("x"));
}
