//! Error types for validation failures.
//!
//! This module provides [`Issue`] for single failure records, [`Issues`] for
//! non-empty collections of them and [`ParseError`] for the aggregate
//! rejection raised by the `parse` entrypoint.

mod issue;

pub use issue::{Issue, IssueKind, Issues, ParseError};
