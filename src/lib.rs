//! # Triage
//!
//! A composable runtime validation and transformation engine. Small units —
//! schemas describing expected shape, actions describing extra constraints
//! or mutations — chain into pipelines that consume an arbitrary untyped
//! input ([`serde_json::Value`]) and produce either a validated/transformed
//! output or a structured, path-addressed list of failures.
//!
//! ## Overview
//!
//! Unlike validators that stop at the first error, triage collects every
//! issue by default, each one addressed by a path into the nested input.
//! Short-circuiting is opt-in per run: `abort_early` stops the whole tree at
//! the first issue, `abort_pipe_early` stops only the current pipe.
//!
//! ## Core Types
//!
//! - [`Schema`]: a node validating/typing a value, possibly recursing into
//!   nested schemas (objects, tuples, arrays, maps, sets, records, unions)
//! - [`Action`]: a constraint, transformation or annotation applied atop an
//!   already-typed value inside a [`pipe`]
//! - [`Dataset`]: the value/typed/issues carrier threaded through one run
//! - [`Issue`] / [`Issues`]: structured failure records with paths
//! - [`Config`]: per-run options (abort flags, language, message override)
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use triage::{min_length, min_value, number, object, pipe, safe_parse, string};
//!
//! let schema = object([
//!     ("name", pipe(string(), vec![min_length(2)])),
//!     ("age", pipe(number(), vec![min_value(0)])),
//! ]);
//!
//! let ok = safe_parse(&schema, &json!({"name": "Ada", "age": 36}));
//! assert!(ok.success());
//!
//! let bad = safe_parse(&schema, &json!({"name": "x", "age": -1}));
//! let issues = bad.issues.unwrap();
//! assert_eq!(issues.len(), 2);
//! assert_eq!(issues.first().dot_path(), "name");
//! ```
//!
//! ## Suspending mode
//!
//! With the `async` feature (default), every composite has a suspending
//! form that fans nested child validations out concurrently and produces
//! identical issue sets and orderings; see [`AsyncSchema`] and
//! [`pipe_async`].

pub mod action;
pub mod config;
pub mod dataset;
pub mod error;
pub mod interop;
pub mod message;
pub mod parse;
pub mod path;
pub mod schema;

#[cfg(feature = "async")]
pub mod async_schema;

pub use action::{
    check, description, integer, max_bytes, max_length, max_value, min_bytes, min_length,
    min_value, pattern, raw_check, raw_transform, title, to_lower_case, to_upper_case, transform,
    trim, Action, MetadataAction, RawCheckContext, RawTransformContext, TransformationAction,
    ValidationAction,
};
pub use config::Config;
pub use dataset::{stringify, Dataset};
pub use error::{Issue, IssueKind, Issues, ParseError};
pub use message::{
    delete_global_message, get_global_message, set_global_message, ErrorMessage,
};
pub use parse::{parse, parse_with, safe_parse, safe_parse_with, ParseResult, Parser};
pub use path::{render_path, Container, Origin, PathItem};
pub use schema::{
    any, array, boolean, get_description, get_title, literal, loose_object, loose_tuple, map,
    never, null, nullable, nullable_with_default, number, object, object_with_rest, optional,
    optional_with_default, picklist, pipe, record, set, strict_object, strict_tuple, string,
    tuple, tuple_with_rest, union, unknown, Schema,
};

#[cfg(feature = "async")]
pub use async_schema::{
    array_async, check_async, loose_object_async, loose_tuple_async, map_async, nullable_async,
    object_async, object_with_rest_async, optional_async, optional_async_with_default,
    pipe_async, record_async, set_async, strict_object_async, strict_tuple_async,
    transform_async, tuple_async, tuple_with_rest_async, union_async, AsyncAction, AsyncSchema,
};
#[cfg(feature = "async")]
pub use parse::{parse_async, safe_parse_async, AsyncParser};

/// Type alias for accumulating validation results over the public issue
/// collection.
pub type ValidationResult<T> = stillwater::Validation<T, Issues>;
