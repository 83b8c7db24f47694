//! Transformation actions.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;

/// A deterministic replacement of the dataset value.
///
/// Transformations only ever run on a typed, issue-free dataset (the pipe
/// composer guarantees this) and must not emit issues under normal
/// operation. `RawTransform` is the documented exception: its closure may
/// push transformation-kind issues explicitly, which by contract signal a
/// bug in the action rather than a user-input condition.
#[derive(Clone)]
pub enum TransformationAction {
    Transform {
        f: Arc<dyn Fn(Value) -> Value + Send + Sync>,
    },
    ToLowerCase,
    ToUpperCase,
    Trim,
    RawTransform {
        f: Arc<dyn Fn(&mut RawTransformContext<'_>) + Send + Sync>,
    },
}

impl TransformationAction {
    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Self::Transform { f } => {
                let value = std::mem::replace(&mut dataset.value, Value::Null);
                dataset.value = f(value);
            }
            Self::ToLowerCase => {
                if let Value::String(s) = &dataset.value {
                    dataset.value = Value::String(s.to_lowercase());
                }
            }
            Self::ToUpperCase => {
                if let Value::String(s) = &dataset.value {
                    dataset.value = Value::String(s.to_uppercase());
                }
            }
            Self::Trim => {
                if let Value::String(s) = &dataset.value {
                    dataset.value = Value::String(s.trim().to_string());
                }
            }
            Self::RawTransform { f } => {
                let mut context = RawTransformContext {
                    dataset: &mut dataset,
                    config,
                };
                f(&mut context);
            }
        }
        dataset
    }
}

/// The context handed to `raw_transform` closures.
pub struct RawTransformContext<'a> {
    dataset: &'a mut Dataset,
    config: &'a Config,
}

impl RawTransformContext<'_> {
    /// The current value under transformation.
    pub fn value(&self) -> &Value {
        &self.dataset.value
    }

    /// Replaces the current value.
    pub fn set_value(&mut self, value: Value) {
        self.dataset.value = value;
    }

    /// Adds one transformation-kind issue with the given message.
    pub fn add_issue(&mut self, message: impl Into<String>) {
        self.dataset.add_issue(
            IssueInfo {
                kind: IssueKind::Transformation,
                type_tag: "raw_transform",
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
