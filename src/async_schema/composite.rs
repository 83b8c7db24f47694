//! Async composite containers.
//!
//! Every container launches its independent child validations concurrently
//! and awaits them together, then merges the finished child datasets
//! strictly in declaration/insertion order. Ordering guarantees are restored
//! at the fan-in join, so the issue sets and path orderings are identical to
//! the sequential mode.

use futures_util::future::{join, join_all, BoxFuture};
use futures_util::FutureExt;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::AsyncSchema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;
use crate::path::{Container, PathItem};

/// How an async object schema treats undeclared keys.
#[derive(Clone)]
pub enum AsyncUnknownKeys {
    Strip,
    Loose,
    Strict,
    Rest(Box<AsyncSchema>),
}

/// How an async tuple schema treats elements beyond its declared items.
#[derive(Clone)]
pub enum AsyncRestItems {
    Strip,
    Loose,
    Strict,
    Rest(Box<AsyncSchema>),
}

/// Merges a finished child into the parent dataset.
///
/// The path item is only built when the child actually carries issues.
/// Returns the child's output value, or `None` when `abort_early` stops the
/// scan (the failing entry is not added to the output).
fn absorb(
    dataset: &mut Dataset,
    child: Dataset,
    config: &Config,
    make_item: impl FnOnce() -> PathItem,
) -> Option<Value> {
    if child.has_issues() {
        let item = make_item();
        let value = dataset.merge_child(child, &item);
        if config.abort_early {
            dataset.typed = false;
            return None;
        }
        Some(value)
    } else {
        if !child.typed {
            dataset.typed = false;
        }
        Some(child.value)
    }
}

enum EntryOutcome {
    Validated { value: Value, child: Dataset },
    AbsentOptional,
    MissingRequired,
}

/// An async object schema; see the synchronous variant for the policy and
/// missing-key semantics, which are identical.
#[derive(Clone)]
pub struct AsyncObjectSchema {
    pub(crate) entries: IndexMap<String, AsyncSchema>,
    pub(crate) policy: AsyncUnknownKeys,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncObjectSchema {
    pub(crate) fn new(entries: IndexMap<String, AsyncSchema>, policy: AsyncUnknownKeys) -> Self {
        Self {
            entries,
            policy,
            message: None,
        }
    }

    fn type_tag(&self) -> &'static str {
        match self.policy {
            AsyncUnknownKeys::Strip => "object",
            AsyncUnknownKeys::Loose => "loose_object",
            AsyncUnknownKeys::Strict => "strict_object",
            AsyncUnknownKeys::Rest(_) => "object_with_rest",
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

    pub(crate) fn run<'a>(
        &'a self,
        mut dataset: Dataset,
        config: &'a Config,
    ) -> BoxFuture<'a, Dataset> {
        async move {
            let input = dataset.take_value();
            let Value::Object(obj) = &input else {
                dataset.value = input;
                dataset.add_issue(self.issue_info(), "type", config, IssueOverrides::default());
                return dataset;
            };

            dataset.typed = true;

            let outcomes = join_all(self.entries.iter().map(|(key, entry)| async move {
                match obj.get(key.as_str()) {
                    Some(value) => EntryOutcome::Validated {
                        value: value.clone(),
                        child: entry.run(Dataset::new(value.clone()), config).await,
                    },
                    None => match entry.as_optional() {
                        Some(Some(default)) => {
                            let default = default.clone();
                            let child = entry.run(Dataset::new(default.clone()), config).await;
                            EntryOutcome::Validated {
                                value: default,
                                child,
                            }
                        }
                        Some(None) => EntryOutcome::AbsentOptional,
                        None => EntryOutcome::MissingRequired,
                    },
                }
            }))
            .await;

            let mut output = Map::new();
            for ((key, _), outcome) in self.entries.iter().zip(outcomes) {
                match outcome {
                    EntryOutcome::Validated { value, child } => {
                        match absorb(&mut dataset, child, config, || {
                            PathItem::value(
                                Container::Object,
                                input.clone(),
                                key.as_str(),
                                value.clone(),
                            )
                        }) {
                            Some(child_value) => {
                                output.insert(key.clone(), child_value);
                            }
                            None => break,
                        }
                    }
                    EntryOutcome::AbsentOptional => {}
                    EntryOutcome::MissingRequired => {
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

            if !(dataset.has_issues() && config.abort_early) {
                match &self.policy {
                    AsyncUnknownKeys::Strip => {}
                    AsyncUnknownKeys::Loose => {
                        for (key, value) in obj {
                            if !self.entries.contains_key(key.as_str()) {
                                output.insert(key.clone(), value.clone());
                            }
                        }
                    }
                    AsyncUnknownKeys::Strict => {
                        for (key, value) in obj {
                            if !self.entries.contains_key(key.as_str()) {
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
                                break;
                            }
                        }
                    }
                    AsyncUnknownKeys::Rest(rest) => {
                        let extras: Vec<(&String, &Value)> = obj
                            .iter()
                            .filter(|(key, _)| !self.entries.contains_key(key.as_str()))
                            .collect();
                        let children = join_all(
                            extras
                                .iter()
                                .map(|(_, value)| rest.run(Dataset::new((*value).clone()), config)),
                        )
                        .await;
                        for ((key, value), child) in extras.into_iter().zip(children) {
                            match absorb(&mut dataset, child, config, || {
                                PathItem::value(
                                    Container::Object,
                                    input.clone(),
                                    key.as_str(),
                                    value.clone(),
                                )
                            }) {
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
        .boxed()
    }
}

enum ItemOutcome {
    Validated { value: Value, child: Dataset },
    AbsentOptional,
    MissingRequired { expected: String },
}

/// An async tuple schema; semantics match the synchronous variant.
#[derive(Clone)]
pub struct AsyncTupleSchema {
    pub(crate) items: Vec<AsyncSchema>,
    pub(crate) rest: AsyncRestItems,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncTupleSchema {
    pub(crate) fn new(items: Vec<AsyncSchema>, rest: AsyncRestItems) -> Self {
        Self {
            items,
            rest,
            message: None,
        }
    }

    fn type_tag(&self) -> &'static str {
        match self.rest {
            AsyncRestItems::Strip => "tuple",
            AsyncRestItems::Loose => "loose_tuple",
            AsyncRestItems::Strict => "strict_tuple",
            AsyncRestItems::Rest(_) => "tuple_with_rest",
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

    pub(crate) fn run<'a>(
        &'a self,
        mut dataset: Dataset,
        config: &'a Config,
    ) -> BoxFuture<'a, Dataset> {
        async move {
            let input = dataset.take_value();
            let Value::Array(arr) = &input else {
                dataset.value = input;
                dataset.add_issue(self.issue_info(), "type", config, IssueOverrides::default());
                return dataset;
            };

            dataset.typed = true;

            let outcomes = join_all(self.items.iter().enumerate().map(|(index, item)| {
                async move {
                    match arr.get(index) {
                        Some(value) => ItemOutcome::Validated {
                            value: value.clone(),
                            child: item.run(Dataset::new(value.clone()), config).await,
                        },
                        None => match item.as_optional() {
                            Some(Some(default)) => {
                                let default = default.clone();
                                let child = item.run(Dataset::new(default.clone()), config).await;
                                ItemOutcome::Validated {
                                    value: default,
                                    child,
                                }
                            }
                            Some(None) => ItemOutcome::AbsentOptional,
                            None => ItemOutcome::MissingRequired {
                                expected: item.expects().to_string(),
                            },
                        },
                    }
                }
            }))
            .await;

            let mut output = Vec::new();
            for (index, outcome) in outcomes.into_iter().enumerate() {
                match outcome {
                    ItemOutcome::Validated { value, child } => {
                        match absorb(&mut dataset, child, config, || {
                            PathItem::value(Container::Array, input.clone(), index, value.clone())
                        }) {
                            Some(child_value) => output.push(child_value),
                            None => break,
                        }
                    }
                    ItemOutcome::AbsentOptional => {}
                    ItemOutcome::MissingRequired { expected } => {
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

            if !(dataset.has_issues() && config.abort_early) && arr.len() > self.items.len() {
                match &self.rest {
                    AsyncRestItems::Strip => {}
                    AsyncRestItems::Loose => {
                        output.extend(arr[self.items.len()..].iter().cloned());
                    }
                    AsyncRestItems::Strict => {
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
                    }
                    AsyncRestItems::Rest(rest) => {
                        let extras = &arr[self.items.len()..];
                        let children = join_all(
                            extras
                                .iter()
                                .map(|value| rest.run(Dataset::new(value.clone()), config)),
                        )
                        .await;
                        for (offset, (value, child)) in
                            extras.iter().zip(children).enumerate()
                        {
                            let index = self.items.len() + offset;
                            match absorb(&mut dataset, child, config, || {
                                PathItem::value(
                                    Container::Array,
                                    input.clone(),
                                    index,
                                    value.clone(),
                                )
                            }) {
                                Some(child_value) => output.push(child_value),
                                None => break,
                            }
                        }
                    }
                }
            }

            dataset.value = Value::Array(output);
            dataset
        }
        .boxed()
    }
}

/// An async array schema; children fan out concurrently.
#[derive(Clone)]
pub struct AsyncArraySchema {
    pub(crate) item: Box<AsyncSchema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncArraySchema {
    pub(crate) fn new(item: AsyncSchema) -> Self {
        Self {
            item: Box::new(item),
            message: None,
        }
    }

    pub(crate) fn run<'a>(
        &'a self,
        mut dataset: Dataset,
        config: &'a Config,
    ) -> BoxFuture<'a, Dataset> {
        async move {
            let input = dataset.take_value();
            let Value::Array(arr) = &input else {
                dataset.value = input;
                dataset.add_issue(
                    IssueInfo {
                        kind: IssueKind::Schema,
                        type_tag: "array",
                        expects: Some("Array"),
                        message: self.message.as_ref(),
                        requirement: None,
                    },
                    "type",
                    config,
                    IssueOverrides::default(),
                );
                return dataset;
            };

            dataset.typed = true;

            let children = join_all(
                arr.iter()
                    .map(|value| self.item.run(Dataset::new(value.clone()), config)),
            )
            .await;

            let mut output = Vec::with_capacity(arr.len());
            for (index, (value, child)) in arr.iter().zip(children).enumerate() {
                match absorb(&mut dataset, child, config, || {
                    PathItem::value(Container::Array, input.clone(), index, value.clone())
                }) {
                    Some(child_value) => output.push(child_value),
                    None => break,
                }
            }

            dataset.value = Value::Array(output);
            dataset
        }
        .boxed()
    }
}

/// An async set schema; children fan out concurrently, output deduplicates.
#[derive(Clone)]
pub struct AsyncSetSchema {
    pub(crate) item: Box<AsyncSchema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncSetSchema {
    pub(crate) fn new(item: AsyncSchema) -> Self {
        Self {
            item: Box::new(item),
            message: None,
        }
    }

    pub(crate) fn run<'a>(
        &'a self,
        mut dataset: Dataset,
        config: &'a Config,
    ) -> BoxFuture<'a, Dataset> {
        async move {
            let input = dataset.take_value();
            let Value::Array(arr) = &input else {
                dataset.value = input;
                dataset.add_issue(
                    IssueInfo {
                        kind: IssueKind::Schema,
                        type_tag: "set",
                        expects: Some("Array"),
                        message: self.message.as_ref(),
                        requirement: None,
                    },
                    "type",
                    config,
                    IssueOverrides::default(),
                );
                return dataset;
            };

            dataset.typed = true;

            let children = join_all(
                arr.iter()
                    .map(|value| self.item.run(Dataset::new(value.clone()), config)),
            )
            .await;

            let mut output: Vec<Value> = Vec::new();
            for (value, child) in arr.iter().zip(children) {
                match absorb(&mut dataset, child, config, || {
                    PathItem::element(input.clone(), value.clone())
                }) {
                    Some(child_value) => {
                        if !output.contains(&child_value) {
                            output.push(child_value);
                        }
                    }
                    None => break,
                }
            }

            dataset.value = Value::Array(output);
            dataset
        }
        .boxed()
    }
}

/// An async keyed-collection schema.
#[derive(Clone)]
pub struct AsyncMapSchema {
    pub(crate) key: Box<AsyncSchema>,
    pub(crate) value: Box<AsyncSchema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncMapSchema {
    pub(crate) fn new(key: AsyncSchema, value: AsyncSchema) -> Self {
        Self {
            key: Box::new(key),
            value: Box::new(value),
            message: None,
        }
    }

    pub(crate) fn run<'a>(
        &'a self,
        dataset: Dataset,
        config: &'a Config,
    ) -> BoxFuture<'a, Dataset> {
        run_keyed_async(
            dataset,
            config,
            &self.key,
            &self.value,
            self.message.as_ref(),
            Container::Map,
            "map",
        )
    }
}

/// An async record schema.
#[derive(Clone)]
pub struct AsyncRecordSchema {
    pub(crate) key: Box<AsyncSchema>,
    pub(crate) value: Box<AsyncSchema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl AsyncRecordSchema {
    pub(crate) fn new(key: AsyncSchema, value: AsyncSchema) -> Self {
        Self {
            key: Box::new(key),
            value: Box::new(value),
            message: None,
        }
    }

    pub(crate) fn run<'a>(
        &'a self,
        dataset: Dataset,
        config: &'a Config,
    ) -> BoxFuture<'a, Dataset> {
        run_keyed_async(
            dataset,
            config,
            &self.key,
            &self.value,
            self.message.as_ref(),
            Container::Object,
            "record",
        )
    }
}

/// Shared algorithm for async map and record schemas.
///
/// Each entry's key and value runs are themselves joined, so one entry costs
/// the slower of the two, and all entries fan out together.
fn run_keyed_async<'a>(
    mut dataset: Dataset,
    config: &'a Config,
    key_schema: &'a AsyncSchema,
    value_schema: &'a AsyncSchema,
    message: Option<&'a ErrorMessage>,
    container: Container,
    type_tag: &'static str,
) -> BoxFuture<'a, Dataset> {
    async move {
        let input = dataset.take_value();
        let Value::Object(obj) = &input else {
            dataset.value = input;
            dataset.add_issue(
                IssueInfo {
                    kind: IssueKind::Schema,
                    type_tag,
                    expects: Some("Object"),
                    message,
                    requirement: None,
                },
                "type",
                config,
                IssueOverrides::default(),
            );
            return dataset;
        };

        dataset.typed = true;

        let pairs = join_all(obj.iter().map(|(key, value)| async move {
            join(
                key_schema.run(Dataset::new(Value::String(key.clone())), config),
                value_schema.run(Dataset::new(value.clone()), config),
            )
            .await
        }))
        .await;

        let mut output = Map::new();
        for ((key, value), (key_child, value_child)) in obj.iter().zip(pairs) {
            let out_key = match absorb(&mut dataset, key_child, config, || {
                PathItem::key(
                    container,
                    input.clone(),
                    key.as_str(),
                    Value::String(key.clone()),
                )
            }) {
                Some(out_key) => out_key,
                None => break,
            };
            let out_value = match absorb(&mut dataset, value_child, config, || {
                PathItem::value(container, input.clone(), key.as_str(), value.clone())
            }) {
                Some(out_value) => out_value,
                None => break,
            };
            let final_key = match out_key {
                Value::String(s) => s,
                _ => key.clone(),
            };
            output.insert(final_key, out_value);
        }

        dataset.value = Value::Object(output);
        dataset
    }
    .boxed()
}
