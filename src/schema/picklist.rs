//! Picklist schema.

use serde_json::Value;

use crate::config::Config;
use crate::dataset::{stringify, Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;

/// Joins expected-type descriptors the way union-like nodes report them.
pub(crate) fn join_expects(parts: Vec<String>, separator: &str) -> String {
    match parts.len() {
        0 => "never".to_string(),
        1 => parts.into_iter().next().unwrap_or_default(),
        _ => format!("({})", parts.join(&format!(" {} ", separator))),
    }
}

/// Validates membership in a fixed set of literal options.
#[derive(Clone)]
pub struct PicklistSchema {
    pub(crate) options: Vec<Value>,
    pub(crate) expects: String,
    pub(crate) message: Option<ErrorMessage>,
}

impl PicklistSchema {
    pub(crate) fn new(options: Vec<Value>) -> Self {
        let expects = join_expects(options.iter().map(stringify).collect(), "|");
        Self {
            options,
            expects,
            message: None,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.options.contains(&dataset.value) {
            dataset.typed = true;
        } else {
            dataset.add_issue(
                IssueInfo {
                    kind: IssueKind::Schema,
                    type_tag: "picklist",
                    expects: Some(&self.expects),
                    message: self.message.as_ref(),
                    requirement: None,
                },
                "type",
                config,
                IssueOverrides::default(),
            );
        }
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_passes() {
        let schema = PicklistSchema::new(vec![json!("a"), json!("b")]);
        assert!(schema.run(Dataset::new(json!("b")), &Config::default()).typed);
    }

    #[test]
    fn test_non_member_fails_with_joined_expects() {
        let schema = PicklistSchema::new(vec![json!("a"), json!("b")]);
        let dataset = schema.run(Dataset::new(json!("c")), &Config::default());
        assert!(!dataset.typed);
        assert_eq!(
            dataset.issues()[0].message,
            "Invalid type: Expected (\"a\" | \"b\") but received \"c\""
        );
    }

    #[test]
    fn test_single_option_expects_without_parens() {
        let schema = PicklistSchema::new(vec![json!(1)]);
        let dataset = schema.run(Dataset::new(json!(2)), &Config::default());
        assert_eq!(dataset.issues()[0].expected.as_deref(), Some("1"));
    }

    #[test]
    fn test_mixed_value_options() {
        let schema = PicklistSchema::new(vec![json!(1), json!("one")]);
        assert!(schema.run(Dataset::new(json!(1)), &Config::default()).typed);
        assert!(schema.run(Dataset::new(json!("one")), &Config::default()).typed);
        assert!(!schema.run(Dataset::new(json!(2)), &Config::default()).typed);
    }
}
