//! Validation actions.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;

/// A constraint checked against an already schema-typed value.
///
/// Each variant holds its captured configuration (requirement and optional
/// message) as plain immutable data. A variant emits at most one issue per
/// invocation and never mutates the value.
#[derive(Clone)]
pub enum ValidationAction {
    MinLength {
        requirement: usize,
        message: Option<ErrorMessage>,
    },
    MaxLength {
        requirement: usize,
        message: Option<ErrorMessage>,
    },
    MinBytes {
        requirement: usize,
        message: Option<ErrorMessage>,
    },
    MaxBytes {
        requirement: usize,
        message: Option<ErrorMessage>,
    },
    Integer {
        message: Option<ErrorMessage>,
    },
    MinValue {
        requirement: Value,
        message: Option<ErrorMessage>,
    },
    MaxValue {
        requirement: Value,
        message: Option<ErrorMessage>,
    },
    Pattern {
        regex: Regex,
        pattern: String,
        message: Option<ErrorMessage>,
    },
    Check {
        predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
        message: Option<ErrorMessage>,
    },
    RawCheck {
        check: Arc<dyn Fn(&mut RawCheckContext<'_>) + Send + Sync>,
    },
}

/// The length of a string in characters or an array in items.
///
/// Values of other types have no length; length constraints skip them, the
/// same way a mistyped pipe is a construction-time concern, not a runtime
/// one.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Partial order over JSON scalars: numbers by value, strings lexicographic.
fn compare(left: &Value, right: &Value) -> Option<std::cmp::Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

impl ValidationAction {
    pub(crate) fn set_message(&mut self, new: ErrorMessage) {
        match self {
            Self::MinLength { message, .. }
            | Self::MaxLength { message, .. }
            | Self::MinBytes { message, .. }
            | Self::MaxBytes { message, .. }
            | Self::Integer { message }
            | Self::MinValue { message, .. }
            | Self::MaxValue { message, .. }
            | Self::Pattern { message, .. }
            | Self::Check { message, .. } => *message = Some(new),
            Self::RawCheck { .. } => {}
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Self::MinLength {
                requirement,
                message,
            } => {
                if let Some(length) = length_of(&dataset.value) {
                    if length < *requirement {
                        let expects = format!(">={}", requirement);
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "min_length",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(Value::from(*requirement)),
                            },
                            "length",
                            config,
                            IssueOverrides {
                                received: Some(length.to_string()),
                                ..Default::default()
                            },
                        );
                    }
                }
            }
            Self::MaxLength {
                requirement,
                message,
            } => {
                if let Some(length) = length_of(&dataset.value) {
                    if length > *requirement {
                        let expects = format!("<={}", requirement);
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "max_length",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(Value::from(*requirement)),
                            },
                            "length",
                            config,
                            IssueOverrides {
                                received: Some(length.to_string()),
                                ..Default::default()
                            },
                        );
                    }
                }
            }
            Self::MinBytes {
                requirement,
                message,
            } => {
                if let Value::String(s) = &dataset.value {
                    let bytes = s.len();
                    if bytes < *requirement {
                        let expects = format!(">={}", requirement);
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "min_bytes",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(Value::from(*requirement)),
                            },
                            "bytes",
                            config,
                            IssueOverrides {
                                received: Some(bytes.to_string()),
                                ..Default::default()
                            },
                        );
                    }
                }
            }
            Self::MaxBytes {
                requirement,
                message,
            } => {
                if let Value::String(s) = &dataset.value {
                    let bytes = s.len();
                    if bytes > *requirement {
                        let expects = format!("<={}", requirement);
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "max_bytes",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(Value::from(*requirement)),
                            },
                            "bytes",
                            config,
                            IssueOverrides {
                                received: Some(bytes.to_string()),
                                ..Default::default()
                            },
                        );
                    }
                }
            }
            Self::Integer { message } => {
                let is_integer = match &dataset.value {
                    Value::Number(n) => {
                        n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
                    }
                    _ => true,
                };
                if !is_integer {
                    dataset.add_issue(
                        IssueInfo {
                            kind: IssueKind::Validation,
                            type_tag: "integer",
                            expects: None,
                            message: message.as_ref(),
                            requirement: None,
                        },
                        "integer",
                        config,
                        IssueOverrides::default(),
                    );
                }
            }
            Self::MinValue {
                requirement,
                message,
            } => {
                if let Some(ordering) = compare(&dataset.value, requirement) {
                    if ordering == std::cmp::Ordering::Less {
                        let expects = format!(">={}", crate::dataset::stringify(requirement));
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "min_value",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(requirement.clone()),
                            },
                            "value",
                            config,
                            IssueOverrides::default(),
                        );
                    }
                }
            }
            Self::MaxValue {
                requirement,
                message,
            } => {
                if let Some(ordering) = compare(&dataset.value, requirement) {
                    if ordering == std::cmp::Ordering::Greater {
                        let expects = format!("<={}", crate::dataset::stringify(requirement));
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "max_value",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(requirement.clone()),
                            },
                            "value",
                            config,
                            IssueOverrides::default(),
                        );
                    }
                }
            }
            Self::Pattern {
                regex,
                pattern,
                message,
            } => {
                if let Value::String(s) = &dataset.value {
                    if !regex.is_match(s) {
                        let expects = format!("/{}/", pattern);
                        dataset.add_issue(
                            IssueInfo {
                                kind: IssueKind::Validation,
                                type_tag: "pattern",
                                expects: Some(&expects),
                                message: message.as_ref(),
                                requirement: Some(Value::String(pattern.clone())),
                            },
                            "format",
                            config,
                            IssueOverrides::default(),
                        );
                    }
                }
            }
            Self::Check { predicate, message } => {
                if !predicate(&dataset.value) {
                    dataset.add_issue(
                        IssueInfo {
                            kind: IssueKind::Validation,
                            type_tag: "check",
                            expects: None,
                            message: message.as_ref(),
                            requirement: None,
                        },
                        "input",
                        config,
                        IssueOverrides::default(),
                    );
                }
            }
            Self::RawCheck { check } => {
                let mut context = RawCheckContext {
                    dataset: &mut dataset,
                    config,
                };
                check(&mut context);
            }
        }
        dataset
    }
}

/// The context handed to `raw_check` closures.
pub struct RawCheckContext<'a> {
    dataset: &'a mut Dataset,
    config: &'a Config,
}

impl RawCheckContext<'_> {
    /// The current value under validation.
    pub fn value(&self) -> &Value {
        &self.dataset.value
    }

    /// Adds one validation issue with the given message.
    pub fn add_issue(&mut self, message: impl Into<String>) {
        self.dataset.add_issue(
            IssueInfo {
                kind: IssueKind::Validation,
                type_tag: "raw_check",
                expects: None,
                message: None,
                requirement: None,
            },
            "input",
            self.config,
            IssueOverrides {
                message: Some(ErrorMessage::Text(message.into())),
                ..Default::default()
            },
        );
    }
}
