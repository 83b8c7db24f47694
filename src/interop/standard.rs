//! The standard-schema adapter contract.

use serde_json::Value;
use stillwater::Validation;

use crate::error::Issues;
use crate::parse::{safe_parse, Parser};
use crate::schema::Schema;

/// A generic validate contract derivable from any schema's run.
///
/// Consumers that do not want to depend on the native node shape can accept
/// any `StandardSchema` and get `{version, vendor, validate}`: validation
/// either succeeds with the output value or fails with the collected
/// issues.
///
/// # Example
///
/// ```rust
/// use serde_json::{json, Value};
/// use triage::interop::StandardSchema;
/// use triage::string;
///
/// fn accepts_any_engine(schema: &impl StandardSchema, input: &Value) -> bool {
///     schema.validate(input).is_success()
/// }
///
/// assert!(accepts_any_engine(&string(), &json!("ok")));
/// assert!(!accepts_any_engine(&string(), &json!(1)));
/// ```
pub trait StandardSchema {
    /// The adapter contract version.
    const VERSION: u8 = 1;

    /// The engine identifier.
    fn vendor(&self) -> &'static str {
        "triage"
    }

    /// Validates an input, producing the output value or the issue list.
    fn validate(&self, input: &Value) -> Validation<Value, Issues>;
}

impl StandardSchema for Schema {
    fn validate(&self, input: &Value) -> Validation<Value, Issues> {
        safe_parse(self, input).into_validation()
    }
}

impl StandardSchema for Parser {
    fn validate(&self, input: &Value) -> Validation<Value, Issues> {
        self.safe_parse(input).into_validation()
    }
}
