//! Set schema validation.

use serde_json::Value;

use super::Schema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;
use crate::path::PathItem;

/// A schema for collections of unique elements.
///
/// The input is an array; every element runs the item schema with a keyless
/// set path item. Equal elements are deduplicated in the output, first
/// occurrence wins, insertion order preserved.
#[derive(Clone)]
pub struct SetSchema {
    pub(crate) item: Box<Schema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl SetSchema {
    pub(crate) fn new(item: Schema) -> Self {
        Self {
            item: Box::new(item),
            message: None,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let input = dataset.take_value();
        let Value::Array(arr) = &input else {
            dataset.value = input;
            dataset.add_issue(
                IssueInfo {
                    kind: IssueKind::Schema,
                    type_tag: "set",
                    expects: Some("Array"),
                    message: self.message.as_ref(),
                    requirement: None,
                },
                "type",
                config,
                IssueOverrides::default(),
            );
            return dataset;
        };

        dataset.typed = true;
        let mut output: Vec<Value> = Vec::new();

        for value in arr {
            let child = self.item.run(Dataset::new(value.clone()), config);
            let child_value = if child.has_issues() {
                let item = PathItem::element(input.clone(), value.clone());
                let merged = dataset.merge_child(child, &item);
                if config.abort_early {
                    dataset.typed = false;
                    break;
                }
                merged
            } else {
                if !child.typed {
                    dataset.typed = false;
                }
                child.value
            };
            if !output.contains(&child_value) {
                output.push(child_value);
            }
        }

        dataset.value = Value::Array(output);
        dataset
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{number, set};
    use crate::{Config, Dataset};
    use serde_json::json;

    fn run(schema: &crate::Schema, value: serde_json::Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::default())
    }

    #[test]
    fn test_valid_set() {
        let schema = set(number());
        let dataset = run(&schema, json!([1, 2, 3]));
        assert!(dataset.typed);
        assert_eq!(dataset.value, json!([1, 2, 3]));
    }

    #[test]
    fn test_deduplicates_keeping_first_occurrence() {
        let schema = set(number());
        let dataset = run(&schema, json!([1, 2, 1, 3, 2]));
        assert!(dataset.typed);
        assert_eq!(dataset.value, json!([1, 2, 3]));
    }

    #[test]
    fn test_element_issue_has_keyless_path() {
        let schema = set(number());
        let dataset = run(&schema, json!([1, "x"]));
        assert!(!dataset.typed);
        let item = &dataset.issues()[0].path.as_ref().unwrap()[0];
        assert_eq!(item.container, crate::Container::Set);
        assert_eq!(item.key, None);
        assert_eq!(item.value, json!("x"));
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = set(number());
        let dataset = run(&schema, json!({}));
        assert_eq!(dataset.issues()[0].type_tag, "set");
    }

    #[test]
    fn test_abort_early_partial_set() {
        let schema = set(number());
        let config = Config::new().abort_early(true);
        let dataset = schema.run(Dataset::new(json!([1, "x", 3])), &config);
        assert!(!dataset.typed);
        assert_eq!(dataset.value, json!([1]));
    }
}
