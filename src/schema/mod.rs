//! Schema definitions.
//!
//! A schema is a node that type-checks a value and possibly recurses into
//! nested schemas. The full set of nodes is a closed sum type — [`Schema`] —
//! so every dispatch site matches exhaustively and adding a node variant is
//! a compile-time-checked change.
//!
//! Nodes are immutable value objects created once by a constructor call and
//! reused across many parses; they carry no per-parse state.
//!
//! # Example
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
//! let result = safe_parse(&schema, &json!({"name": "x", "age": -1}));
//! let issues = result.issues.unwrap();
//! assert_eq!(issues.len(), 2);
//! assert_eq!(issues.first().dot_path(), "name");
//! ```

mod array;
mod literal;
mod map;
mod object;
mod picklist;
mod pipe;
mod primitive;
mod record;
mod set;
mod tuple;
mod union;
mod wrapper;

pub use array::ArraySchema;
pub use literal::LiteralSchema;
pub use map::MapSchema;
pub use object::{ObjectSchema, UnknownKeys};
pub use picklist::PicklistSchema;
pub use pipe::PipeSchema;
pub use primitive::{BooleanSchema, NeverSchema, NullSchema, NumberSchema, StringSchema};
pub use record::RecordSchema;
pub use set::SetSchema;
pub use tuple::{RestItems, TupleSchema};
pub use union::UnionSchema;
pub use wrapper::{NullableSchema, OptionalSchema};

#[cfg(feature = "async")]
pub(crate) use picklist::join_expects;

use indexmap::IndexMap;
use serde_json::Value;

use crate::action::Action;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::ErrorMessage;

/// A validation node: leaf type checks, wrappers and composite containers.
#[derive(Clone)]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Null(NullSchema),
    Any,
    Unknown,
    Never(NeverSchema),
    Literal(LiteralSchema),
    Picklist(PicklistSchema),
    Optional(OptionalSchema),
    Nullable(NullableSchema),
    Object(ObjectSchema),
    Tuple(TupleSchema),
    Array(ArraySchema),
    Map(MapSchema),
    Set(SetSchema),
    Record(RecordSchema),
    Union(UnionSchema),
    Pipe(PipeSchema),
}

impl Schema {
    /// Runs this schema against a dataset.
    ///
    /// Returns the dataset with `typed` set according to whether the value
    /// now conforms to this schema's declared shape, and with any issues
    /// appended. Expected failures never raise.
    pub fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Self::String(schema) => schema.run(dataset, config),
            Self::Number(schema) => schema.run(dataset, config),
            Self::Boolean(schema) => schema.run(dataset, config),
            Self::Null(schema) => schema.run(dataset, config),
            Self::Any | Self::Unknown => {
                let mut dataset = dataset;
                dataset.typed = true;
                dataset
            }
            Self::Never(schema) => schema.run(dataset, config),
            Self::Literal(schema) => schema.run(dataset, config),
            Self::Picklist(schema) => schema.run(dataset, config),
            Self::Optional(schema) => schema.run(dataset, config),
            Self::Nullable(schema) => schema.run(dataset, config),
            Self::Object(schema) => schema.run(dataset, config),
            Self::Tuple(schema) => schema.run(dataset, config),
            Self::Array(schema) => schema.run(dataset, config),
            Self::Map(schema) => schema.run(dataset, config),
            Self::Set(schema) => schema.run(dataset, config),
            Self::Record(schema) => schema.run(dataset, config),
            Self::Union(schema) => schema.run(dataset, config),
            Self::Pipe(schema) => schema.run(dataset, config),
        }
    }

    /// The human-readable expected-type descriptor for this node.
    pub fn expects(&self) -> &str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Null(_) => "null",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never(_) => "never",
            Self::Literal(schema) => &schema.expects,
            Self::Picklist(schema) => &schema.expects,
            Self::Optional(schema) => &schema.expects,
            Self::Nullable(schema) => &schema.expects,
            Self::Object(_) | Self::Map(_) | Self::Record(_) => "Object",
            Self::Tuple(_) | Self::Array(_) | Self::Set(_) => "Array",
            Self::Union(schema) => &schema.expects,
            Self::Pipe(schema) => schema.base.expects(),
        }
    }

    /// The type tag this node stamps onto its issues.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Boolean(_) => "boolean",
            Self::Null(_) => "null",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never(_) => "never",
            Self::Literal(_) => "literal",
            Self::Picklist(_) => "picklist",
            Self::Optional(_) => "optional",
            Self::Nullable(_) => "nullable",
            Self::Object(schema) => schema.type_tag(),
            Self::Tuple(schema) => schema.type_tag(),
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Set(_) => "set",
            Self::Record(_) => "record",
            Self::Union(_) => "union",
            Self::Pipe(schema) => schema.base.type_tag(),
        }
    }

    /// Sets the construction-time message used when this node itself fails.
    ///
    /// Nodes that cannot fail (`any`, `unknown`), wrappers whose failures
    /// come from their inner schema (`optional`, `nullable`) and pipes
    /// (whose message lives on the base schema) are returned unchanged.
    pub fn with_message(mut self, message: impl Into<ErrorMessage>) -> Self {
        let message = message.into();
        match &mut self {
            Self::String(schema) => schema.message = Some(message),
            Self::Number(schema) => schema.message = Some(message),
            Self::Boolean(schema) => schema.message = Some(message),
            Self::Null(schema) => schema.message = Some(message),
            Self::Any | Self::Unknown => {}
            Self::Never(schema) => schema.message = Some(message),
            Self::Literal(schema) => schema.message = Some(message),
            Self::Picklist(schema) => schema.message = Some(message),
            Self::Optional(_) | Self::Nullable(_) => {}
            Self::Object(schema) => schema.message = Some(message),
            Self::Tuple(schema) => schema.message = Some(message),
            Self::Array(schema) => schema.message = Some(message),
            Self::Map(schema) => schema.message = Some(message),
            Self::Set(schema) => schema.message = Some(message),
            Self::Record(schema) => schema.message = Some(message),
            Self::Union(schema) => schema.message = Some(message),
            Self::Pipe(_) => {}
        }
        self
    }
}

/// Validates any string.
pub fn string() -> Schema {
    Schema::String(StringSchema { message: None })
}

/// Validates any JSON number.
pub fn number() -> Schema {
    Schema::Number(NumberSchema { message: None })
}

/// Validates any boolean.
pub fn boolean() -> Schema {
    Schema::Boolean(BooleanSchema { message: None })
}

/// Validates JSON null.
pub fn null() -> Schema {
    Schema::Null(NullSchema { message: None })
}

/// Accepts every value.
pub fn any() -> Schema {
    Schema::Any
}

/// Accepts every value, without claiming anything about it.
pub fn unknown() -> Schema {
    Schema::Unknown
}

/// Rejects every value.
pub fn never() -> Schema {
    Schema::Never(NeverSchema { message: None })
}

/// Validates exact equality with a literal value.
pub fn literal(value: impl Into<Value>) -> Schema {
    Schema::Literal(LiteralSchema::new(value.into()))
}

/// Validates membership in a fixed set of literal options.
pub fn picklist<V: Into<Value>>(options: impl IntoIterator<Item = V>) -> Schema {
    Schema::Picklist(PicklistSchema::new(
        options.into_iter().map(Into::into).collect(),
    ))
}

/// Marks a container entry as tolerating absence.
///
/// Standalone, an optional schema behaves like its inner schema; only the
/// enclosing object or tuple treats a missing key or position as valid.
pub fn optional(inner: Schema) -> Schema {
    Schema::Optional(OptionalSchema::new(inner, None))
}

/// Like [`optional`], but a missing entry is replaced by a default value
/// (which is itself validated).
pub fn optional_with_default(inner: Schema, default: impl Into<Value>) -> Schema {
    Schema::Optional(OptionalSchema::new(inner, Some(default.into())))
}

/// Accepts null in place of the inner schema's value.
pub fn nullable(inner: Schema) -> Schema {
    Schema::Nullable(NullableSchema::new(inner, None))
}

/// Like [`nullable`], but null is replaced by a default value (which is
/// itself validated).
pub fn nullable_with_default(inner: Schema, default: impl Into<Value>) -> Schema {
    Schema::Nullable(NullableSchema::new(inner, Some(default.into())))
}

fn collect_entries<K, I>(entries: I) -> IndexMap<String, Schema>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    entries
        .into_iter()
        .map(|(key, schema)| (key.into(), schema))
        .collect()
}

/// Validates an object with declared entries; unknown keys are dropped.
pub fn object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    Schema::Object(ObjectSchema::new(collect_entries(entries), UnknownKeys::Strip))
}

/// Validates an object with declared entries; unknown keys pass through
/// untouched.
pub fn loose_object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    Schema::Object(ObjectSchema::new(collect_entries(entries), UnknownKeys::Loose))
}

/// Validates an object with declared entries; the first unknown key found
/// produces one issue and stops the scan.
pub fn strict_object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    Schema::Object(ObjectSchema::new(collect_entries(entries), UnknownKeys::Strict))
}

/// Validates an object with declared entries; every unknown key's value is
/// validated against `rest`.
pub fn object_with_rest<K, I>(entries: I, rest: Schema) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    Schema::Object(ObjectSchema::new(
        collect_entries(entries),
        UnknownKeys::Rest(Box::new(rest)),
    ))
}

/// Validates an array against positional item schemas; extra elements are
/// dropped.
pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::Tuple(TupleSchema::new(items.into_iter().collect(), RestItems::Strip))
}

/// Like [`tuple`], but extra elements pass through untouched.
pub fn loose_tuple(items: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::Tuple(TupleSchema::new(items.into_iter().collect(), RestItems::Loose))
}

/// Like [`tuple`], but any extra elements produce exactly one issue,
/// regardless of how many there are.
pub fn strict_tuple(items: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::Tuple(TupleSchema::new(
        items.into_iter().collect(),
        RestItems::Strict,
    ))
}

/// Like [`tuple`], but every extra element is validated against `rest`.
pub fn tuple_with_rest(items: impl IntoIterator<Item = Schema>, rest: Schema) -> Schema {
    Schema::Tuple(TupleSchema::new(
        items.into_iter().collect(),
        RestItems::Rest(Box::new(rest)),
    ))
}

/// Validates every element of an array against one item schema.
pub fn array(item: Schema) -> Schema {
    Schema::Array(ArraySchema::new(item))
}

/// Validates a keyed collection: every entry's key and value are validated
/// independently.
pub fn map(key: Schema, value: Schema) -> Schema {
    Schema::Map(MapSchema::new(key, value))
}

/// Validates an object with arbitrary keys: every entry's key and value are
/// validated independently.
pub fn record(key: Schema, value: Schema) -> Schema {
    Schema::Record(RecordSchema::new(key, value))
}

/// Validates a collection of unique elements against one item schema.
pub fn set(item: Schema) -> Schema {
    Schema::Set(SetSchema::new(item))
}

/// Tries member schemas in declared order; the first typed result wins.
pub fn union(options: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::Union(UnionSchema::new(options.into_iter().collect()))
}

/// Sequences a base schema with an ordered list of actions.
///
/// Actions run strictly in declaration order and only after the base schema
/// typed the value; see the crate docs for the short-circuit rules.
pub fn pipe(schema: Schema, actions: Vec<Action>) -> Schema {
    Schema::Pipe(PipeSchema::new(schema, actions))
}

/// Returns the description annotation attached to a pipe, if any.
pub fn get_description(schema: &Schema) -> Option<&str> {
    match schema {
        Schema::Pipe(pipe) => pipe.description(),
        _ => None,
    }
}

/// Returns the title annotation attached to a pipe, if any.
pub fn get_title(schema: &Schema) -> Option<&str> {
    match schema {
        Schema::Pipe(pipe) => pipe.title(),
        _ => None,
    }
}
