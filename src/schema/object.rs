//! Object schema validation.
//!
//! Four unknown-key policies share one entry-scanning algorithm: plain
//! objects drop extras, loose objects copy them through, strict objects
//! report the first unknown key and stop scanning, and objects with rest
//! validate every extra against a shared schema.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::Schema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;
use crate::path::{Container, PathItem};

/// How an object schema treats keys not declared in its entries.
#[derive(Clone)]
pub enum UnknownKeys {
    /// Silently drop extras from the output.
    Strip,
    /// Copy extras through untouched.
    Loose,
    /// Emit one issue for the first unknown key and stop scanning.
    Strict,
    /// Validate every extra against a shared rest schema.
    Rest(Box<Schema>),
}

/// A schema for objects with declared entries.
///
/// Entries are iterated in declaration order, and the output preserves that
/// order followed by any retained extras in input order. A missing required
/// key is reported by this schema itself with `received: "undefined"` and a
/// key-origin path item; entries wrapped in `optional` tolerate absence.
#[derive(Clone)]
pub struct ObjectSchema {
    pub(crate) entries: IndexMap<String, Schema>,
    pub(crate) policy: UnknownKeys,
    pub(crate) message: Option<ErrorMessage>,
}

/// Merges a finished child into the parent dataset.
///
/// Returns the child's output value, or `None` when `abort_early` stops the
/// scan (the failing entry is not added to the output).
fn absorb_child(
    dataset: &mut Dataset,
    child: Dataset,
    input: &Value,
    key: &str,
    value: &Value,
    config: &Config,
) -> Option<Value> {
    if child.has_issues() {
        let item = PathItem::value(Container::Object, input.clone(), key, value.clone());
        let child_value = dataset.merge_child(child, &item);
        if config.abort_early {
            dataset.typed = false;
            return None;
        }
        Some(child_value)
    } else {
        if !child.typed {
            dataset.typed = false;
        }
        Some(child.value)
    }
}

impl ObjectSchema {
    pub(crate) fn new(entries: IndexMap<String, Schema>, policy: UnknownKeys) -> Self {
        Self {
            entries,
            policy,
            message: None,
        }
    }

    pub(crate) fn type_tag(&self) -> &'static str {
        match self.policy {
            UnknownKeys::Strip => "object",
            UnknownKeys::Loose => "loose_object",
            UnknownKeys::Strict => "strict_object",
            UnknownKeys::Rest(_) => "object_with_rest",
        }
    }

    fn issue_info(&self) -> IssueInfo<'_> {
        IssueInfo {
            kind: IssueKind::Schema,
            type_tag: self.type_tag(),
            expects: Some("Object"),
            message: self.message.as_ref(),
            requirement: None,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let input = dataset.take_value();
        let Value::Object(obj) = &input else {
            dataset.value = input;
            dataset.add_issue(self.issue_info(), "type", config, IssueOverrides::default());
            return dataset;
        };

        dataset.typed = true;
        let mut output = Map::new();

        for (key, entry_schema) in &self.entries {
            match obj.get(key) {
                Some(value) => {
                    let child = entry_schema.run(Dataset::new(value.clone()), config);
                    match absorb_child(&mut dataset, child, &input, key, value, config) {
                        Some(child_value) => {
                            output.insert(key.clone(), child_value);
                        }
                        None => break,
                    }
                }
                None => {
                    if let Schema::Optional(optional) = entry_schema {
                        if let Some(default) = optional.default.clone() {
                            // A configured default is validated like a
                            // present value.
                            let child = entry_schema.run(Dataset::new(default.clone()), config);
                            match absorb_child(&mut dataset, child, &input, key, &default, config)
                            {
                                Some(child_value) => {
                                    output.insert(key.clone(), child_value);
                                }
                                None => break,
                            }
                        }
                    } else {
                        dataset.add_issue(
                            self.issue_info(),
                            "key",
                            config,
                            IssueOverrides {
                                input: Some(Value::Null),
                                expected: Some(format!("\"{}\"", key)),
                                received: Some("undefined".to_string()),
                                path: Some(vec![PathItem::key(
                                    Container::Object,
                                    input.clone(),
                                    key.as_str(),
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

        if !(dataset.has_issues() && config.abort_early) {
            match &self.policy {
                UnknownKeys::Strip => {}
                UnknownKeys::Loose => {
                    for (key, value) in obj {
                        if !self.entries.contains_key(key) {
                            output.insert(key.clone(), value.clone());
                        }
                    }
                }
                UnknownKeys::Strict => {
                    for (key, value) in obj {
                        if !self.entries.contains_key(key) {
                            dataset.add_issue(
                                self.issue_info(),
                                "key",
                                config,
                                IssueOverrides {
                                    input: Some(value.clone()),
                                    expected: Some("never".to_string()),
                                    path: Some(vec![PathItem::key(
                                        Container::Object,
                                        input.clone(),
                                        key.as_str(),
                                        value.clone(),
                                    )]),
                                    ..Default::default()
                                },
                            );
                            // One issue only: large inputs must not inflate
                            // the issue count.
                            break;
                        }
                    }
                }
                UnknownKeys::Rest(rest) => {
                    for (key, value) in obj {
                        if self.entries.contains_key(key) {
                            continue;
                        }
                        let child = rest.run(Dataset::new(value.clone()), config);
                        match absorb_child(&mut dataset, child, &input, key, value, config) {
                            Some(child_value) => {
                                output.insert(key.clone(), child_value);
                            }
                            None => break,
                        }
                    }
                }
            }
        }

        dataset.value = Value::Object(output);
        dataset
    }
}
