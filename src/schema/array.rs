//! Array schema validation.

use serde_json::Value;

use super::Schema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;
use crate::path::{Container, PathItem};

/// A schema validating every element of an array against one item schema.
///
/// Child values are always collected into the output in order, even when a
/// child is untyped, so diagnostics can inspect the partially-typed result.
#[derive(Clone)]
pub struct ArraySchema {
    pub(crate) item: Box<Schema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl ArraySchema {
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
                    type_tag: "array",
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
        let mut output = Vec::with_capacity(arr.len());

        for (index, value) in arr.iter().enumerate() {
            let child = self.item.run(Dataset::new(value.clone()), config);
            if child.has_issues() {
                let item = PathItem::value(Container::Array, input.clone(), index, value.clone());
                let child_value = dataset.merge_child(child, &item);
                if config.abort_early {
                    dataset.typed = false;
                    break;
                }
                output.push(child_value);
            } else {
                if !child.typed {
                    dataset.typed = false;
                }
                output.push(child.value);
            }
        }

        dataset.value = Value::Array(output);
        dataset
    }
}
