//! Record schema validation.

use super::map::run_keyed;
use super::Schema;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::message::ErrorMessage;
use crate::path::Container;

/// A schema for objects with arbitrary keys.
///
/// Runs the same keyed algorithm as [`super::MapSchema`] but reports
/// object-container path items, since a record is an object at the wire
/// level rather than a keyed-collection abstraction.
#[derive(Clone)]
pub struct RecordSchema {
    pub(crate) key: Box<Schema>,
    pub(crate) value: Box<Schema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl RecordSchema {
    pub(crate) fn new(key: Schema, value: Schema) -> Self {
        Self {
            key: Box::new(key),
            value: Box::new(value),
            message: None,
        }
    }

    pub(crate) fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        run_keyed(
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
