//! Tuple schema validation.

use serde_json::Value;

use super::Schema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;
use crate::path::{Container, PathItem};

/// How a tuple schema treats elements beyond its declared items.
#[derive(Clone)]
pub enum RestItems {
    /// Silently drop extras from the output.
    Strip,
    /// Copy extras through untouched.
    Loose,
    /// Emit exactly one issue for the first extra element, regardless of how
    /// many extras exist.
    Strict,
    /// Validate every extra against a shared rest schema.
    Rest(Box<Schema>),
}

/// A schema for arrays validated positionally.
///
/// Items are iterated in index order with array-container path items. A
/// missing position with a non-optional item schema is reported by the tuple
/// itself with `received: "undefined"`.
#[derive(Clone)]
pub struct TupleSchema {
    pub(crate) items: Vec<Schema>,
    pub(crate) rest: RestItems,
    pub(crate) message: Option<ErrorMessage>,
}

impl TupleSchema {
    pub(crate) fn new(items: Vec<Schema>, rest: RestItems) -> Self {
        Self {
            items,
            rest,
            message: None,
        }
    }

    pub(crate) fn type_tag(&self) -> &'static str {
        match self.rest {
            RestItems::Strip => "tuple",
            RestItems::Loose => "loose_tuple",
            RestItems::Strict => "strict_tuple",
            RestItems::Rest(_) => "tuple_with_rest",
        }
    }

    fn issue_info(&self) -> IssueInfo<'_> {
        IssueInfo {
            kind: IssueKind::Schema,
            type_tag: self.type_tag(),
            expects: Some("Array"),
            message: self.message.as_ref(),
            requirement: None,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let input = dataset.take_value();
        let Value::Array(arr) = &input else {
            dataset.value = input;
            dataset.add_issue(self.issue_info(), "type", config, IssueOverrides::default());
            return dataset;
        };

        dataset.typed = true;
        let mut output = Vec::new();

        for (index, item_schema) in self.items.iter().enumerate() {
            match arr.get(index) {
                Some(value) => {
                    let child = item_schema.run(Dataset::new(value.clone()), config);
                    if child.has_issues() {
                        let item =
                            PathItem::value(Container::Array, input.clone(), index, value.clone());
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
                None => {
                    if let Schema::Optional(optional_item) = item_schema {
                        if let Some(default) = optional_item.default.clone() {
                            let child = item_schema.run(Dataset::new(default.clone()), config);
                            if child.has_issues() {
                                let item = PathItem::value(
                                    Container::Array,
                                    input.clone(),
                                    index,
                                    default,
                                );
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
                    } else {
                        let expected = item_schema.expects().to_string();
                        dataset.add_issue(
                            self.issue_info(),
                            "item",
                            config,
                            IssueOverrides {
                                input: Some(Value::Null),
                                expected: Some(expected),
                                received: Some("undefined".to_string()),
                                path: Some(vec![PathItem::value(
                                    Container::Array,
                                    input.clone(),
                                    index,
                                    Value::Null,
                                )]),
                                ..Default::default()
                            },
                        );
                        if config.abort_early {
                            break;
                        }
                    }
                }
            }
        }

        if !(dataset.has_issues() && config.abort_early) && arr.len() > self.items.len() {
            match &self.rest {
                RestItems::Strip => {}
                RestItems::Loose => {
                    output.extend(arr[self.items.len()..].iter().cloned());
                }
                RestItems::Strict => {
                    let index = self.items.len();
                    let value = &arr[index];
                    dataset.add_issue(
                        self.issue_info(),
                        "type",
                        config,
                        IssueOverrides {
                            input: Some(value.clone()),
                            expected: Some("never".to_string()),
                            path: Some(vec![PathItem::value(
                                Container::Array,
                                input.clone(),
                                index,
                                value.clone(),
                            )]),
                            ..Default::default()
                        },
                    );
                    // Intentionally a single issue for all extras: otherwise
                    // adversarially large arrays could generate unbounded
                    // issue counts.
                }
                RestItems::Rest(rest) => {
                    for (offset, value) in arr[self.items.len()..].iter().enumerate() {
                        let index = self.items.len() + offset;
                        let child = rest.run(Dataset::new(value.clone()), config);
                        if child.has_issues() {
                            let item = PathItem::value(
                                Container::Array,
                                input.clone(),
                                index,
                                value.clone(),
                            );
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
                }
            }
        }

        dataset.value = Value::Array(output);
        dataset
    }
}
