//! Literal schema.

use serde_json::Value;

use crate::config::Config;
use crate::dataset::{stringify, Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;

/// Validates exact equality with one literal value.
#[derive(Clone)]
pub struct LiteralSchema {
    pub(crate) literal: Value,
    pub(crate) expects: String,
    pub(crate) message: Option<ErrorMessage>,
}

impl LiteralSchema {
    pub(crate) fn new(literal: Value) -> Self {
        let expects = stringify(&literal);
        Self {
            literal,
            expects,
            message: None,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value == self.literal {
            dataset.typed = true;
        } else {
            dataset.add_issue(
                IssueInfo {
                    kind: IssueKind::Schema,
                    type_tag: "literal",
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
    fn test_literal_match() {
        let schema = LiteralSchema::new(json!("admin"));
        let dataset = schema.run(Dataset::new(json!("admin")), &Config::default());
        assert!(dataset.typed);
        assert!(!dataset.has_issues());
    }

    #[test]
    fn test_literal_mismatch() {
        let schema = LiteralSchema::new(json!("admin"));
        let dataset = schema.run(Dataset::new(json!("user")), &Config::default());
        assert!(!dataset.typed);
        assert_eq!(
            dataset.issues()[0].message,
            "Invalid type: Expected \"admin\" but received \"user\""
        );
    }

    #[test]
    fn test_numeric_literal() {
        let schema = LiteralSchema::new(json!(42));
        assert!(schema.run(Dataset::new(json!(42)), &Config::default()).typed);
        let dataset = schema.run(Dataset::new(json!(41)), &Config::default());
        assert_eq!(
            dataset.issues()[0].message,
            "Invalid type: Expected 42 but received 41"
        );
    }
}
