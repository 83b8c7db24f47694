//! Optional and nullable wrapper schemas.

use serde_json::Value;

use super::Schema;
use crate::config::Config;
use crate::dataset::Dataset;

/// Marks an entry as tolerating absence.
///
/// Absence only exists inside containers (a missing object key or tuple
/// position); the enclosing composite checks for this wrapper and either
/// skips the entry or validates the configured default. Standalone, the
/// wrapper simply delegates to its inner schema.
#[derive(Clone)]
pub struct OptionalSchema {
    pub(crate) inner: Box<Schema>,
    pub(crate) default: Option<Value>,
    pub(crate) expects: String,
}

impl OptionalSchema {
    pub(crate) fn new(inner: Schema, default: Option<Value>) -> Self {
        let expects = format!("({} | undefined)", inner.expects());
        Self {
            inner: Box::new(inner),
            default,
            expects,
        }
    }

    pub(crate) fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        self.inner.run(dataset, config)
    }
}

/// Accepts null in place of the inner schema's value.
///
/// Unlike [`OptionalSchema`] this does not tolerate absence: a missing
/// object key still fails even when its schema is nullable.
#[derive(Clone)]
pub struct NullableSchema {
    pub(crate) inner: Box<Schema>,
    pub(crate) default: Option<Value>,
    pub(crate) expects: String,
}

impl NullableSchema {
    pub(crate) fn new(inner: Schema, default: Option<Value>) -> Self {
        let expects = format!("({} | null)", inner.expects());
        Self {
            inner: Box::new(inner),
            default,
            expects,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.value.is_null() {
            match &self.default {
                Some(default) => {
                    dataset.value = default.clone();
                    self.inner.run(dataset, config)
                }
                None => {
                    dataset.typed = true;
                    dataset
                }
            }
        } else {
            self.inner.run(dataset, config)
        }
    }
}
