//! Parse entrypoints and reusable bound parsers.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::error::{Issues, ParseError};
use crate::schema::Schema;

/// The outcome of a `safe_parse` run.
///
/// `output` is always the final dataset value, even on failure, to aid
/// diagnostics; `success` is true exactly when `issues` is absent.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Whether the output conforms to the schema's declared shape.
    pub typed: bool,
    /// The final value, possibly partial or untransformed on failure.
    pub output: Value,
    /// The collected issues; absent on success, never empty when present.
    pub issues: Option<Issues>,
}

impl ParseResult {
    /// Returns true when no issues were collected.
    pub fn success(&self) -> bool {
        self.issues.is_none()
    }

    /// Converts into an accumulating validation result.
    pub fn into_validation(self) -> Validation<Value, Issues> {
        match self.issues {
            None => Validation::Success(self.output),
            Some(issues) => Validation::Failure(issues),
        }
    }

    pub(crate) fn from_dataset(dataset: Dataset) -> Self {
        let typed = dataset.typed;
        let (output, issues) = dataset.into_output();
        Self {
            typed,
            output,
            issues,
        }
    }
}

/// Runs a schema against an input and returns the result without raising.
pub fn safe_parse(schema: &Schema, input: &Value) -> ParseResult {
    safe_parse_with(schema, input, &Config::default())
}

/// Runs a schema with an explicit configuration.
pub fn safe_parse_with(schema: &Schema, input: &Value, config: &Config) -> ParseResult {
    let dataset = schema.run(Dataset::new(input.clone()), config);
    ParseResult::from_dataset(dataset)
}

/// Runs a schema and returns the output value, or the aggregate rejection.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use triage::{parse, string};
///
/// assert_eq!(parse(&string(), &json!("ok")).unwrap(), json!("ok"));
/// assert!(parse(&string(), &json!(1)).is_err());
/// ```
pub fn parse(schema: &Schema, input: &Value) -> Result<Value, ParseError> {
    parse_with(schema, input, &Config::default())
}

/// Like [`parse`], with an explicit configuration.
pub fn parse_with(schema: &Schema, input: &Value, config: &Config) -> Result<Value, ParseError> {
    let result = safe_parse_with(schema, input, config);
    match result.issues {
        Some(issues) => Err(ParseError::new(issues)),
        None => Ok(result.output),
    }
}

/// A reusable parser binding a schema and a configuration.
///
/// Pure currying: calling the parser is equivalent to calling `safe_parse`
/// with the captured pair every time; nothing is memoized.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use triage::{number, object, string, Parser};
///
/// let parser = Parser::new(object([("name", string()), ("age", number())]));
/// assert!(parser.safe_parse(&json!({"name": "a", "age": 1})).success());
/// assert!(!parser.safe_parse(&json!({})).success());
/// ```
#[derive(Clone)]
pub struct Parser {
    schema: Arc<Schema>,
    config: Config,
}

impl Parser {
    /// Binds a schema with the default configuration.
    pub fn new(schema: Schema) -> Self {
        Self::with_config(schema, Config::default())
    }

    /// Binds a schema with an explicit configuration.
    pub fn with_config(schema: Schema, config: Config) -> Self {
        Self {
            schema: Arc::new(schema),
            config,
        }
    }

    /// The bound schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The bound configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the bound schema against an input without raising.
    pub fn safe_parse(&self, input: &Value) -> ParseResult {
        safe_parse_with(&self.schema, input, &self.config)
    }

    /// Runs the bound schema and returns the output, or the rejection.
    pub fn parse(&self, input: &Value) -> Result<Value, ParseError> {
        parse_with(&self.schema, input, &self.config)
    }
}

#[cfg(feature = "async")]
pub use self::asynchronous::{parse_async, safe_parse_async, AsyncParser};

#[cfg(feature = "async")]
mod asynchronous {
    use super::*;
    use crate::async_schema::AsyncSchema;

    /// Runs an async schema against an input and returns the result without
    /// raising.
    pub async fn safe_parse_async(
        schema: &AsyncSchema,
        input: &Value,
        config: &Config,
    ) -> ParseResult {
        let dataset = schema.run(Dataset::new(input.clone()), config).await;
        ParseResult::from_dataset(dataset)
    }

    /// Runs an async schema and returns the output value, or the aggregate
    /// rejection.
    pub async fn parse_async(
        schema: &AsyncSchema,
        input: &Value,
        config: &Config,
    ) -> Result<Value, ParseError> {
        let result = safe_parse_async(schema, input, config).await;
        match result.issues {
            Some(issues) => Err(ParseError::new(issues)),
            None => Ok(result.output),
        }
    }

    /// A reusable parser binding an async schema and a configuration.
    #[derive(Clone)]
    pub struct AsyncParser {
        schema: Arc<AsyncSchema>,
        config: Config,
    }

    impl AsyncParser {
        /// Binds an async schema with the default configuration.
        pub fn new(schema: AsyncSchema) -> Self {
            Self::with_config(schema, Config::default())
        }

        /// Binds an async schema with an explicit configuration.
        pub fn with_config(schema: AsyncSchema, config: Config) -> Self {
            Self {
                schema: Arc::new(schema),
                config,
            }
        }

        /// The bound schema.
        pub fn schema(&self) -> &AsyncSchema {
            &self.schema
        }

        /// Runs the bound schema against an input without raising.
        pub async fn safe_parse(&self, input: &Value) -> ParseResult {
            safe_parse_async(&self.schema, input, &self.config).await
        }

        /// Runs the bound schema and returns the output, or the rejection.
        pub async fn parse(&self, input: &Value) -> Result<Value, ParseError> {
            parse_async(&self.schema, input, &self.config).await
        }
    }
}
