//! The dataset carrier threaded through every run.
//!
//! A [`Dataset`] holds the current value, the `typed` flag (whether the
//! value is known to conform to the current node's declared shape) and the
//! issues collected so far. Datasets are created fresh per parse call, owned
//! by the active call stack and never shared across concurrent parses.
//!
//! Expected validation failures never raise; they are appended through
//! [`Dataset::add_issue`] and callers check [`Dataset::typed`] or
//! [`Dataset::has_issues`] to decide whether to stop further work.

use serde_json::Value;

use crate::config::Config;
use crate::error::{Issue, IssueKind, Issues};
use crate::message::{get_global_message, ErrorMessage};
use crate::path::PathItem;

/// The value/typed/issues carrier for one validation run.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The current value. Transformations replace it in place.
    pub value: Value,
    /// Whether the value conforms to the current node's declared shape.
    pub typed: bool,
    issues: Vec<Issue>,
}

impl Dataset {
    /// Creates an untyped dataset for an input value.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            typed: false,
            issues: Vec::new(),
        }
    }

    /// Returns the issues collected so far. Empty means "absent".
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Returns true if any issue has been collected.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Appends a pre-built issue.
    ///
    /// This is the escape hatch for `raw_check`-style actions that add
    /// issues explicitly by contract. Most code goes through `add_issue`.
    pub fn push_issue(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Converts the collected issues into the public non-empty collection.
    pub fn into_issues(self) -> Option<Issues> {
        Issues::from_vec(self.issues)
    }

    /// Splits the dataset into its final value and public issue collection.
    pub(crate) fn into_output(self) -> (Value, Option<Issues>) {
        (self.value, Issues::from_vec(self.issues))
    }

    /// Takes the current value, leaving `Null` behind.
    ///
    /// Composites use this to consume the input container before rebuilding
    /// the output in place.
    pub(crate) fn take_value(&mut self) -> Value {
        std::mem::replace(&mut self.value, Value::Null)
    }

    /// Takes the collected issues, leaving the dataset issue-free.
    pub(crate) fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    /// Appends already-built issues in order.
    pub(crate) fn append_issues(&mut self, issues: Vec<Issue>) {
        self.issues.extend(issues);
    }

    /// Appends one issue computed from the emitting node's descriptors and
    /// any caller-supplied overrides.
    ///
    /// Side effects: if the issue is schema-kind, or the run is configured
    /// with `abort_early`, the `typed` flag is forced to `false` so callers
    /// can stop further work.
    pub(crate) fn add_issue(
        &mut self,
        info: IssueInfo<'_>,
        label: &str,
        config: &Config,
        overrides: IssueOverrides,
    ) {
        let input = overrides.input.unwrap_or_else(|| self.value.clone());
        let expected = overrides
            .expected
            .or_else(|| info.expects.map(str::to_string));
        let received = overrides.received.unwrap_or_else(|| stringify(&input));
        let message = default_message(label, expected.as_deref(), &received);

        let mut issue = Issue {
            kind: info.kind,
            type_tag: info.type_tag,
            input,
            expected,
            received: Some(received),
            message,
            requirement: info.requirement,
            path: overrides.path,
            issues: overrides.issues,
            lang: config.lang.clone(),
            abort_early: config.abort_early.then_some(true),
            abort_pipe_early: config.abort_pipe_early.then_some(true),
        };

        // Precedence: caller override, then the node's own message, then the
        // call-site config, then the global store, then the default format.
        let resolved = overrides
            .message
            .as_ref()
            .or(info.message)
            .or(config.message.as_ref())
            .map(|m| m.resolve(&issue))
            .or_else(|| get_global_message(issue.lang.as_deref()).map(|m| m.resolve(&issue)));
        if let Some(text) = resolved {
            issue.message = text;
        }

        if info.kind == IssueKind::Schema || config.abort_early {
            self.typed = false;
        }
        self.issues.push(issue);
    }

    /// Merges a finished child dataset into this one.
    ///
    /// Prepends `item` onto each child issue's path (creating the list when
    /// absent), appends the issues in emission order, clears `typed` if the
    /// child was untyped and returns the child's value for output assembly.
    pub(crate) fn merge_child(&mut self, child: Dataset, item: &PathItem) -> Value {
        for mut issue in child.issues {
            match &mut issue.path {
                Some(path) => path.insert(0, item.clone()),
                None => issue.path = Some(vec![item.clone()]),
            }
            self.issues.push(issue);
        }
        if !child.typed {
            self.typed = false;
        }
        child.value
    }
}

/// The emitting node's descriptors, captured as an immutable argument
/// instead of implicit state.
pub(crate) struct IssueInfo<'a> {
    pub kind: IssueKind,
    pub type_tag: &'static str,
    pub expects: Option<&'a str>,
    pub message: Option<&'a ErrorMessage>,
    pub requirement: Option<Value>,
}

/// Caller-supplied overrides for one `add_issue` call.
#[derive(Default)]
pub(crate) struct IssueOverrides {
    pub input: Option<Value>,
    pub expected: Option<String>,
    pub received: Option<String>,
    pub message: Option<ErrorMessage>,
    pub path: Option<Vec<PathItem>>,
    pub issues: Option<Vec<Issue>>,
}

/// Renders a value as a short `received` descriptor.
///
/// Strings are quoted, scalars render bare, containers render as their type
/// name so adversarially large inputs never inflate messages.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(_) => "Array".to_string(),
        Value::Object(_) => "Object".to_string(),
    }
}

fn default_message(label: &str, expected: Option<&str>, received: &str) -> String {
    match expected {
        Some(expected) => format!("Invalid {}: Expected {} but received {}", label, expected, received),
        None => format!("Invalid {}: Received {}", label, received),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Container;
    use serde_json::json;

    fn schema_info(tag: &'static str, expects: &'static str) -> IssueInfo<'static> {
        IssueInfo {
            kind: IssueKind::Schema,
            type_tag: tag,
            expects: Some(expects),
            message: None,
            requirement: None,
        }
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(&json!(null)), "null");
        assert_eq!(stringify(&json!(true)), "true");
        assert_eq!(stringify(&json!(123)), "123");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!("foo")), "\"foo\"");
        assert_eq!(stringify(&json!([1, 2])), "Array");
        assert_eq!(stringify(&json!({"a": 1})), "Object");
    }

    #[test]
    fn test_add_issue_default_message() {
        let mut dataset = Dataset::new(json!(123));
        dataset.typed = true;
        dataset.add_issue(
            schema_info("string", "string"),
            "type",
            &Config::default(),
            IssueOverrides::default(),
        );

        let issue = &dataset.issues()[0];
        assert_eq!(issue.message, "Invalid type: Expected string but received 123");
        assert_eq!(issue.expected.as_deref(), Some("string"));
        assert_eq!(issue.received.as_deref(), Some("123"));
        assert_eq!(issue.input, json!(123));
        // Schema-kind issues force the typed flag down.
        assert!(!dataset.typed);
    }

    #[test]
    fn test_add_issue_without_expected() {
        let mut dataset = Dataset::new(json!("x"));
        dataset.typed = true;
        let info = IssueInfo {
            kind: IssueKind::Validation,
            type_tag: "check",
            expects: None,
            message: None,
            requirement: None,
        };
        dataset.add_issue(info, "input", &Config::default(), IssueOverrides::default());

        assert_eq!(dataset.issues()[0].message, "Invalid input: Received \"x\"");
        // Validation issues leave the typed flag alone.
        assert!(dataset.typed);
    }

    #[test]
    fn test_add_issue_abort_early_untyped_and_tagged() {
        let mut dataset = Dataset::new(json!("x"));
        dataset.typed = true;
        let info = IssueInfo {
            kind: IssueKind::Validation,
            type_tag: "check",
            expects: None,
            message: None,
            requirement: None,
        };
        let config = Config::new().abort_early(true);
        dataset.add_issue(info, "input", &config, IssueOverrides::default());

        assert!(!dataset.typed);
        assert_eq!(dataset.issues()[0].abort_early, Some(true));
        assert_eq!(dataset.issues()[0].abort_pipe_early, None);
    }

    #[test]
    fn test_node_message_beats_config_message() {
        let mut dataset = Dataset::new(json!(1));
        let node_message = ErrorMessage::from("node text");
        let info = IssueInfo {
            kind: IssueKind::Schema,
            type_tag: "string",
            expects: Some("string"),
            message: Some(&node_message),
            requirement: None,
        };
        let config = Config::new().message("config text");
        dataset.add_issue(info, "type", &config, IssueOverrides::default());
        assert_eq!(dataset.issues()[0].message, "node text");
    }

    #[test]
    fn test_config_message_applies_without_node_message() {
        let mut dataset = Dataset::new(json!(1));
        let config = Config::new().message("config text");
        dataset.add_issue(
            schema_info("string", "string"),
            "type",
            &config,
            IssueOverrides::default(),
        );
        assert_eq!(dataset.issues()[0].message, "config text");
    }

    #[test]
    fn test_override_received() {
        let mut dataset = Dataset::new(json!("abc"));
        let info = IssueInfo {
            kind: IssueKind::Validation,
            type_tag: "min_length",
            expects: Some(">=5"),
            message: None,
            requirement: Some(json!(5)),
        };
        dataset.add_issue(
            info,
            "length",
            &Config::default(),
            IssueOverrides {
                received: Some("3".to_string()),
                ..Default::default()
            },
        );
        let issue = &dataset.issues()[0];
        assert_eq!(issue.message, "Invalid length: Expected >=5 but received 3");
        assert_eq!(issue.requirement, Some(json!(5)));
    }

    #[test]
    fn test_merge_child_prepends_path() {
        let mut child = Dataset::new(json!("x"));
        child.add_issue(
            schema_info("number", "number"),
            "type",
            &Config::default(),
            IssueOverrides::default(),
        );

        let mut parent = Dataset::new(json!({"a": "x"}));
        parent.typed = true;
        let item = PathItem::value(Container::Object, json!({"a": "x"}), "a", json!("x"));
        let value = parent.merge_child(child, &item);

        assert_eq!(value, json!("x"));
        assert!(!parent.typed);
        let path = parent.issues()[0].path.as_ref().unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].key, Some(json!("a")));
    }

    #[test]
    fn test_merge_child_extends_existing_path() {
        // Simulate an issue that already bubbled through one container.
        let mut inner = Dataset::new(json!("x"));
        inner.add_issue(
            schema_info("number", "number"),
            "type",
            &Config::default(),
            IssueOverrides::default(),
        );
        let mut middle = Dataset::new(json!({"b": "x"}));
        middle.typed = true;
        let inner_item = PathItem::value(Container::Object, json!({"b": "x"}), "b", json!("x"));
        middle.merge_child(inner, &inner_item);

        let mut outer = Dataset::new(json!({"a": {"b": "x"}}));
        outer.typed = true;
        let outer_item =
            PathItem::value(Container::Object, json!({"a": {"b": "x"}}), "a", json!({"b": "x"}));
        outer.merge_child(middle, &outer_item);

        let path = outer.issues()[0].path.as_ref().unwrap();
        let keys: Vec<_> = path.iter().map(|p| p.key.clone().unwrap()).collect();
        // Outer-to-inner after bubbling completes.
        assert_eq!(keys, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_into_issues_absent_when_empty() {
        let dataset = Dataset::new(json!(1));
        assert!(dataset.into_issues().is_none());
    }
}
