//! The suspending execution mode.
//!
//! [`AsyncSchema`] mirrors every composite with async children plus a
//! [`AsyncSchema::Sync`] embedding for any fully synchronous subtree, which
//! runs inline without suspending (the synchronous fast path). Composite
//! containers launch all nested child validations concurrently and await
//! them together, bounding total latency to the slowest child; results are
//! merged afterwards in declaration/insertion order, so both execution modes
//! produce identical issue sets and path orderings for the same input.
//!
//! Union members and pipe actions stay strictly sequential in both modes:
//! their semantics depend on earlier results.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use triage::{check_async, object_async, pipe_async, safe_parse_async, string, Config};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let schema = object_async([
//!     ("name", string().into()),
//!     ("handle", pipe_async(string(), vec![check_async(|v| async move {
//!         v != json!("admin")
//!     })])),
//! ]);
//! let result = safe_parse_async(&schema, &json!({"name": "x", "handle": "admin"}), &Config::default()).await;
//! assert_eq!(result.issues.unwrap().first().dot_path(), "handle");
//! # }
//! ```

mod action;
mod composite;

pub use action::{check_async, transform_async, AsyncAction};
pub use composite::{
    AsyncArraySchema, AsyncMapSchema, AsyncObjectSchema, AsyncRecordSchema, AsyncSetSchema,
    AsyncTupleSchema, AsyncUnknownKeys, AsyncRestItems,
};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use indexmap::IndexMap;
use serde_json::Value;

use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::{Issue, IssueKind};
use crate::message::ErrorMessage;
use crate::schema::Schema;

/// A schema that may suspend at user-supplied async predicates, transforms
/// or nested suspending children.
#[derive(Clone)]
pub enum AsyncSchema {
    /// A fully synchronous subtree, run inline without suspending.
    Sync(Schema),
    Optional(AsyncOptionalSchema),
    Nullable(AsyncNullableSchema),
    Object(AsyncObjectSchema),
    Tuple(AsyncTupleSchema),
    Array(AsyncArraySchema),
    Map(AsyncMapSchema),
    Set(AsyncSetSchema),
    Record(AsyncRecordSchema),
    Union(AsyncUnionSchema),
    Pipe(AsyncPipeSchema),
}

impl AsyncSchema {
    /// Runs this schema against a dataset, suspending as needed.
    pub fn run<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        match self {
            Self::Sync(schema) => futures_util::future::ready(schema.run(dataset, config)).boxed(),
            Self::Optional(schema) => schema.inner.run(dataset, config),
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
            Self::Sync(schema) => schema.expects(),
            Self::Optional(schema) => &schema.expects,
            Self::Nullable(schema) => &schema.expects,
            Self::Object(_) | Self::Map(_) | Self::Record(_) => "Object",
            Self::Tuple(_) | Self::Array(_) | Self::Set(_) => "Array",
            Self::Union(schema) => &schema.expects,
            Self::Pipe(schema) => schema.base.expects(),
        }
    }

    /// Returns the optional-entry default when this node tolerates absence.
    ///
    /// `Some(None)` means optional without default; `None` means required.
    pub(crate) fn as_optional(&self) -> Option<Option<&Value>> {
        match self {
            Self::Optional(schema) => Some(schema.default.as_ref()),
            Self::Sync(Schema::Optional(schema)) => Some(schema.default.as_ref()),
            _ => None,
        }
    }
}

impl From<Schema> for AsyncSchema {
    fn from(schema: Schema) -> Self {
        Self::Sync(schema)
    }
}

/// Marks an async container entry as tolerating absence.
#[derive(Clone)]
pub struct AsyncOptionalSchema {
    pub(crate) inner: Box<AsyncSchema>,
    pub(crate) default: Option<Value>,
    pub(crate) expects: String,
}

/// Accepts null in place of the inner async schema's value.
#[derive(Clone)]
pub struct AsyncNullableSchema {
    pub(crate) inner: Box<AsyncSchema>,
    pub(crate) default: Option<Value>,
    pub(crate) expects: String,
}

impl AsyncNullableSchema {
    fn run<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        async move {
            if dataset.value.is_null() {
                match &self.default {
                    Some(default) => {
                        dataset.value = default.clone();
                        self.inner.run(dataset, config).await
                    }
                    None => {
                        dataset.typed = true;
                        dataset
                    }
                }
            } else {
                self.inner.run(dataset, config).await
            }
        }
        .boxed()
    }
}

/// Tries member schemas in declared order, awaiting each in turn.
///
/// Sequential by design: the first typed member must win, so later members
/// must not run once a winner is found.
#[derive(Clone)]
pub struct AsyncUnionSchema {
    pub(crate) options: Vec<AsyncSchema>,
    pub(crate) expects: String,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncUnionSchema {
    fn run<'a>(&'a self, mut dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        async move {
            let mut member_issues: Vec<Issue> = Vec::new();

            for option in &self.options {
                let mut child = option.run(Dataset::new(dataset.value.clone()), config).await;
                if child.typed {
                    let issues = child.take_issues();
                    dataset.value = child.value;
                    dataset.typed = true;
                    dataset.append_issues(issues);
                    return dataset;
                }
                member_issues.extend(child.take_issues());
            }

            dataset.add_issue(
                IssueInfo {
                    kind: IssueKind::Schema,
                    type_tag: "union",
                    expects: Some(&self.expects),
                    message: self.message.as_ref(),
                    requirement: None,
                },
                "type",
                config,
                IssueOverrides {
                    issues: (!member_issues.is_empty()).then_some(member_issues),
                    ..Default::default()
                },
            );
            dataset
        }
        .boxed()
    }
}

/// One async-capable base schema followed by an ordered action list.
///
/// The short-circuit rules are identical to the synchronous pipe.
#[derive(Clone)]
pub struct AsyncPipeSchema {
    pub(crate) base: Box<AsyncSchema>,
    pub(crate) actions: Vec<AsyncAction>,
}

impl AsyncPipeSchema {
    fn run<'a>(&'a self, dataset: Dataset, config: &'a Config) -> BoxFuture<'a, Dataset> {
        async move {
            let mut dataset = self.base.run(dataset, config).await;

            for action in &self.actions {
                if action.is_metadata() {
                    continue;
                }
                if !dataset.typed {
                    break;
                }
                if action.is_transformation() && dataset.has_issues() {
                    dataset.typed = false;
                    break;
                }
                let issues_before = dataset.issues().len();
                dataset = action.run(dataset, config).await;
                if config.abort_pipe_early && dataset.issues().len() > issues_before {
                    break;
                }
            }

            dataset
        }
        .boxed()
    }
}

fn collect_entries<K, S, I>(entries: I) -> IndexMap<String, AsyncSchema>
where
    K: Into<String>,
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = (K, S)>,
{
    entries
        .into_iter()
        .map(|(key, schema)| (key.into(), schema.into()))
        .collect()
}

/// Marks an async container entry as tolerating absence.
pub fn optional_async(inner: impl Into<AsyncSchema>) -> AsyncSchema {
    let inner = inner.into();
    let expects = format!("({} | undefined)", inner.expects());
    AsyncSchema::Optional(AsyncOptionalSchema {
        inner: Box::new(inner),
        default: None,
        expects,
    })
}

/// Like [`optional_async`], with a default for missing entries.
pub fn optional_async_with_default(
    inner: impl Into<AsyncSchema>,
    default: impl Into<Value>,
) -> AsyncSchema {
    let inner = inner.into();
    let expects = format!("({} | undefined)", inner.expects());
    AsyncSchema::Optional(AsyncOptionalSchema {
        inner: Box::new(inner),
        default: Some(default.into()),
        expects,
    })
}

/// Accepts null in place of the inner async schema's value.
pub fn nullable_async(inner: impl Into<AsyncSchema>) -> AsyncSchema {
    let inner = inner.into();
    let expects = format!("({} | null)", inner.expects());
    AsyncSchema::Nullable(AsyncNullableSchema {
        inner: Box::new(inner),
        default: None,
        expects,
    })
}

/// Validates an object whose entries may suspend; unknown keys are dropped.
pub fn object_async<K, S, I>(entries: I) -> AsyncSchema
where
    K: Into<String>,
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = (K, S)>,
{
    AsyncSchema::Object(AsyncObjectSchema::new(
        collect_entries(entries),
        AsyncUnknownKeys::Strip,
    ))
}

/// Like [`object_async`]; unknown keys pass through untouched.
pub fn loose_object_async<K, S, I>(entries: I) -> AsyncSchema
where
    K: Into<String>,
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = (K, S)>,
{
    AsyncSchema::Object(AsyncObjectSchema::new(
        collect_entries(entries),
        AsyncUnknownKeys::Loose,
    ))
}

/// Like [`object_async`]; the first unknown key produces one issue.
pub fn strict_object_async<K, S, I>(entries: I) -> AsyncSchema
where
    K: Into<String>,
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = (K, S)>,
{
    AsyncSchema::Object(AsyncObjectSchema::new(
        collect_entries(entries),
        AsyncUnknownKeys::Strict,
    ))
}

/// Like [`object_async`]; every unknown key's value is validated.
pub fn object_with_rest_async<K, S, I>(entries: I, rest: impl Into<AsyncSchema>) -> AsyncSchema
where
    K: Into<String>,
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = (K, S)>,
{
    AsyncSchema::Object(AsyncObjectSchema::new(
        collect_entries(entries),
        AsyncUnknownKeys::Rest(Box::new(rest.into())),
    ))
}

fn collect_items<S, I>(items: I) -> Vec<AsyncSchema>
where
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = S>,
{
    items.into_iter().map(Into::into).collect()
}

/// Validates an array positionally; extras are dropped.
pub fn tuple_async<S, I>(items: I) -> AsyncSchema
where
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = S>,
{
    AsyncSchema::Tuple(AsyncTupleSchema::new(
        collect_items(items),
        AsyncRestItems::Strip,
    ))
}

/// Like [`tuple_async`]; extras pass through untouched.
pub fn loose_tuple_async<S, I>(items: I) -> AsyncSchema
where
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = S>,
{
    AsyncSchema::Tuple(AsyncTupleSchema::new(
        collect_items(items),
        AsyncRestItems::Loose,
    ))
}

/// Like [`tuple_async`]; extras produce exactly one issue.
pub fn strict_tuple_async<S, I>(items: I) -> AsyncSchema
where
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = S>,
{
    AsyncSchema::Tuple(AsyncTupleSchema::new(
        collect_items(items),
        AsyncRestItems::Strict,
    ))
}

/// Like [`tuple_async`]; every extra is validated against `rest`.
pub fn tuple_with_rest_async<S, I>(items: I, rest: impl Into<AsyncSchema>) -> AsyncSchema
where
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = S>,
{
    AsyncSchema::Tuple(AsyncTupleSchema::new(
        collect_items(items),
        AsyncRestItems::Rest(Box::new(rest.into())),
    ))
}

/// Validates every element of an array, fanning children out concurrently.
pub fn array_async(item: impl Into<AsyncSchema>) -> AsyncSchema {
    AsyncSchema::Array(AsyncArraySchema::new(item.into()))
}

/// Validates a keyed collection, fanning entries out concurrently.
pub fn map_async(key: impl Into<AsyncSchema>, value: impl Into<AsyncSchema>) -> AsyncSchema {
    AsyncSchema::Map(AsyncMapSchema::new(key.into(), value.into()))
}

/// Validates an object with arbitrary keys, fanning entries out
/// concurrently.
pub fn record_async(key: impl Into<AsyncSchema>, value: impl Into<AsyncSchema>) -> AsyncSchema {
    AsyncSchema::Record(AsyncRecordSchema::new(key.into(), value.into()))
}

/// Validates a collection of unique elements, fanning children out
/// concurrently.
pub fn set_async(item: impl Into<AsyncSchema>) -> AsyncSchema {
    AsyncSchema::Set(AsyncSetSchema::new(item.into()))
}

/// Tries member schemas in declared order; the first typed result wins.
pub fn union_async<S, I>(options: I) -> AsyncSchema
where
    S: Into<AsyncSchema>,
    I: IntoIterator<Item = S>,
{
    let options: Vec<AsyncSchema> = collect_items(options);
    let expects = crate::schema::join_expects(
        options.iter().map(|o| o.expects().to_string()).collect(),
        "|",
    );
    AsyncSchema::Union(AsyncUnionSchema {
        options,
        expects,
        message: None,
    })
}

/// Sequences an async-capable base schema with an ordered action list.
pub fn pipe_async(base: impl Into<AsyncSchema>, actions: Vec<AsyncAction>) -> AsyncSchema {
    AsyncSchema::Pipe(AsyncPipeSchema {
        base: Box::new(base.into()),
        actions,
    })
}
