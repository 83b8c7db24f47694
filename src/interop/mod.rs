//! Interoperability with engine-agnostic consumers.
//!
//! This module provides the standard-schema adapter: a thin external-facing
//! wrapper deriving a generic validate contract from any schema's run, so
//! the engine is consumable without depending on the native node shape.

mod standard;

pub use standard::StandardSchema;
