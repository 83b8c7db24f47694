//! Actions: validation, transformation and metadata nodes.
//!
//! An action operates on an already schema-typed value inside a pipe.
//! The three contracts are disjoint:
//!
//! - *Validation* inspects the value and emits at most one issue per
//!   invocation; it never mutates the value.
//! - *Transformation* deterministically replaces the value and must not emit
//!   issues under normal operation (`raw_transform` is the documented
//!   exception).
//! - *Metadata* is a pure annotation consumed only by introspection; its run
//!   is a no-op passthrough.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use triage::{min_length, parse, pipe, string, to_upper_case};
//!
//! let schema = pipe(string(), vec![min_length(2), to_upper_case()]);
//! assert_eq!(parse(&schema, &json!("ok")).unwrap(), json!("OK"));
//! ```

mod metadata;
mod transformation;
mod validation;

pub use metadata::MetadataAction;
pub use transformation::{RawTransformContext, TransformationAction};
pub use validation::{RawCheckContext, ValidationAction};

use serde_json::Value;
use std::sync::Arc;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::ErrorMessage;

/// A node adding a constraint, transformation or annotation atop an
/// already-typed value.
///
/// Actions are immutable value objects created once by a constructor call
/// and reused across many parses.
#[derive(Clone)]
pub enum Action {
    /// Inspects the value; emits at most one issue per invocation.
    Validation(ValidationAction),
    /// Replaces the value; silent under normal operation.
    Transformation(TransformationAction),
    /// Pure annotation; no runtime effect.
    Metadata(MetadataAction),
}

impl Action {
    /// Runs this action against the dataset.
    ///
    /// Metadata actions pass the dataset through untouched.
    pub(crate) fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Self::Validation(action) => action.run(dataset, config),
            Self::Transformation(action) => action.run(dataset, config),
            Self::Metadata(_) => dataset,
        }
    }

    /// Returns true for metadata actions.
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Metadata(_))
    }

    /// Returns true for transformation actions.
    pub fn is_transformation(&self) -> bool {
        matches!(self, Self::Transformation(_))
    }

    /// Sets the construction-time message on a validation action.
    ///
    /// Non-validation actions have no message and are returned unchanged.
    pub fn with_message(mut self, message: impl Into<ErrorMessage>) -> Self {
        if let Self::Validation(action) = &mut self {
            action.set_message(message.into());
        }
        self
    }
}

/// Requires a minimum length for strings (characters) and arrays (items).
pub fn min_length(requirement: usize) -> Action {
    Action::Validation(ValidationAction::MinLength {
        requirement,
        message: None,
    })
}

/// Requires a maximum length for strings (characters) and arrays (items).
pub fn max_length(requirement: usize) -> Action {
    Action::Validation(ValidationAction::MaxLength {
        requirement,
        message: None,
    })
}

/// Requires a minimum UTF-8 byte count for strings.
pub fn min_bytes(requirement: usize) -> Action {
    Action::Validation(ValidationAction::MinBytes {
        requirement,
        message: None,
    })
}

/// Requires a maximum UTF-8 byte count for strings.
pub fn max_bytes(requirement: usize) -> Action {
    Action::Validation(ValidationAction::MaxBytes {
        requirement,
        message: None,
    })
}

/// Requires a number to be a whole number.
pub fn integer() -> Action {
    Action::Validation(ValidationAction::Integer { message: None })
}

/// Requires a value of at least `requirement` (numbers and strings).
pub fn min_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(ValidationAction::MinValue {
        requirement: requirement.into(),
        message: None,
    })
}

/// Requires a value of at most `requirement` (numbers and strings).
pub fn max_value(requirement: impl Into<Value>) -> Action {
    Action::Validation(ValidationAction::MaxValue {
        requirement: requirement.into(),
        message: None,
    })
}

/// Requires a string to match a regex pattern.
///
/// Returns an error for a malformed pattern; this is a programmer error
/// surfaced at construction time, never at run time.
pub fn pattern(pattern: &str) -> Result<Action, regex::Error> {
    let regex = regex::Regex::new(pattern)?;
    Ok(Action::Validation(ValidationAction::Pattern {
        regex,
        pattern: pattern.to_string(),
        message: None,
    }))
}

/// Requires a custom predicate to hold.
pub fn check(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Action {
    Action::Validation(ValidationAction::Check {
        predicate: Arc::new(predicate),
        message: None,
    })
}

/// A validation escape hatch that may add issues explicitly.
///
/// The closure receives a [`RawCheckContext`] to inspect the value and push
/// any number of issues. Use [`check`] unless you need multiple issues or
/// custom issue text per failure.
pub fn raw_check(check: impl Fn(&mut RawCheckContext<'_>) + Send + Sync + 'static) -> Action {
    Action::Validation(ValidationAction::RawCheck {
        check: Arc::new(check),
    })
}

/// Deterministically replaces the value.
pub fn transform(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Action {
    Action::Transformation(TransformationAction::Transform { f: Arc::new(f) })
}

/// Lowercases a string value.
pub fn to_lower_case() -> Action {
    Action::Transformation(TransformationAction::ToLowerCase)
}

/// Uppercases a string value.
pub fn to_upper_case() -> Action {
    Action::Transformation(TransformationAction::ToUpperCase)
}

/// Trims surrounding whitespace from a string value.
pub fn trim() -> Action {
    Action::Transformation(TransformationAction::Trim)
}

/// A transformation escape hatch that may add issues explicitly.
///
/// Issues pushed here carry the transformation kind; by contract they
/// signal a bug in the action, not a user-input condition.
pub fn raw_transform(f: impl Fn(&mut RawTransformContext<'_>) + Send + Sync + 'static) -> Action {
    Action::Transformation(TransformationAction::RawTransform { f: Arc::new(f) })
}

/// Annotates the pipe with a description. No runtime effect.
pub fn description(text: impl Into<String>) -> Action {
    Action::Metadata(MetadataAction::Description(text.into()))
}

/// Annotates the pipe with a title. No runtime effect.
pub fn title(text: impl Into<String>) -> Action {
    Action::Metadata(MetadataAction::Title(text.into()))
}
