//! Issue records and non-empty issue collections.

use std::fmt::{self, Display};

use serde::Serialize;
use serde_json::Value;
use stillwater::prelude::*;

use crate::path::{render_path, PathItem};

/// The category of a failure.
///
/// `Schema` means the input's shape does not match, `Validation` means the
/// value is correctly shaped but violates a constraint, and `Transformation`
/// must not occur under normal operation (any occurrence is a bug in an
/// action's contract, not a user-input condition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Schema,
    Validation,
    Transformation,
}

/// A single structured failure record with full context.
///
/// `Issue` captures everything relevant about one failure:
/// - **kind** / **type_tag**: the failure category and the emitting node's tag
/// - **input**: the value that failed
/// - **expected** / **received**: human-readable type descriptors
/// - **message**: resolved error text
/// - **requirement**: the predicate or value that was violated, if any
/// - **path**: where in the data structure the failure occurred
/// - **issues**: nested per-member detail for union failures
///
/// Once appended to a dataset an issue is immutable except for `path`, which
/// enclosing containers extend (prepend) as the issue bubbles upward.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use triage::{safe_parse, min_length, pipe, string};
///
/// let schema = pipe(string(), vec![min_length(5)]);
/// let result = safe_parse(&schema, &json!("foo"));
/// let issues = result.issues.unwrap();
/// assert_eq!(issues.first().type_tag, "min_length");
/// assert_eq!(issues.first().expected.as_deref(), Some(">=5"));
/// assert_eq!(issues.first().received.as_deref(), Some("3"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    /// The failure category.
    pub kind: IssueKind,
    /// The emitting node's type tag (e.g. `string`, `min_length`).
    #[serde(rename = "type")]
    pub type_tag: &'static str,
    /// The value that failed.
    pub input: Value,
    /// Human-readable descriptor of what was expected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Human-readable descriptor of what was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    /// Resolved error message.
    pub message: String,
    /// The predicate or value that was violated, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Value>,
    /// Path from the root to the failing value. Never `Some(empty)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathItem>>,
    /// Nested per-member issues for union failures. Never `Some(empty)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<Issue>>,
    /// The localization key the message was resolved for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Set when the whole tree was configured to stop at the first issue.
    #[serde(rename = "abortEarly", skip_serializing_if = "Option::is_none")]
    pub abort_early: Option<bool>,
    /// Set when the surrounding pipe was configured to stop at the first issue.
    #[serde(rename = "abortPipeEarly", skip_serializing_if = "Option::is_none")]
    pub abort_pipe_early: Option<bool>,
}

impl Issue {
    /// Renders this issue's path as a dot string like `users[0].email`.
    ///
    /// Returns an empty string for root-level issues.
    pub fn dot_path(&self) -> String {
        self.path.as_deref().map(render_path).unwrap_or_default()
    }

    /// Returns the nesting depth of this issue (path length).
    pub fn depth(&self) -> usize {
        self.path.as_ref().map_or(0, Vec::len)
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.dot_path();
        if path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", path, self.message)
        }
    }
}

impl std::error::Error for Issue {}

// Issue must stay Send + Sync so schemas and parse results can cross
// threads. All fields are owned values; the assertions keep that true if
// the types change.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issue>();
    assert_sync::<Issue>();
};

/// A non-empty collection of issues.
///
/// `Issues` wraps a `NonEmptyVec<Issue>` so a failure always carries at
/// least one issue. The internal dataset carrier treats an empty list as
/// "absent"; the conversion to `Issues` at the public boundary is where the
/// "absent or non-empty" invariant becomes unrepresentable.
///
/// # Combining
///
/// `Issues` implements `Semigroup`, so failures from independent runs can
/// be merged:
///
/// ```rust
/// use serde_json::json;
/// use stillwater::prelude::*;
/// use triage::{safe_parse, number, string};
///
/// let a = safe_parse(&string(), &json!(1)).issues.unwrap();
/// let b = safe_parse(&number(), &json!("x")).issues.unwrap();
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issues(NonEmptyVec<Issue>);

impl Issues {
    /// Creates an `Issues` containing a single issue.
    pub fn single(issue: Issue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Creates an `Issues` from a `NonEmptyVec` of issues.
    pub fn from_non_empty(issues: NonEmptyVec<Issue>) -> Self {
        Self(issues)
    }

    /// Creates an `Issues` from a `Vec<Issue>`, or `None` if it is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        let mut iter = issues.into_iter();
        let mut list = NonEmptyVec::singleton(iter.next()?);
        for issue in iter {
            list = list.combine(NonEmptyVec::singleton(issue));
        }
        Some(Self(list))
    }

    /// Returns the number of issues in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns false since this collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained issues.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.0.iter()
    }

    /// Returns the first issue in the collection.
    pub fn first(&self) -> &Issue {
        self.0.head()
    }

    /// Returns all issues with the given type tag.
    pub fn with_type(&self, type_tag: &str) -> Vec<&Issue> {
        self.0.iter().filter(|i| i.type_tag == type_tag).collect()
    }

    /// Returns all issues whose rendered dot path equals `path`.
    pub fn at_path(&self, path: &str) -> Vec<&Issue> {
        self.0.iter().filter(|i| i.dot_path() == path).collect()
    }

    /// Converts this collection into a `Vec<Issue>`.
    pub fn into_vec(self) -> Vec<Issue> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<Issue> {
        &self.0
    }
}

impl Semigroup for Issues {
    fn combine(self, other: Self) -> Self {
        Issues(self.0.combine(other.0))
    }
}

impl Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for Issues {}

impl IntoIterator for Issues {
    type Item = Issue;
    type IntoIter = std::vec::IntoIter<Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = Box<dyn Iterator<Item = &'a Issue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issues>();
    assert_sync::<Issues>();
};

/// The aggregate rejection raised by the `parse` entrypoint.
///
/// Carries the full issue list collected over the run. This is the only
/// place expected validation failures surface as a Rust error; everywhere
/// else they thread through datasets.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{issues}")]
pub struct ParseError {
    issues: Issues,
}

impl ParseError {
    /// Wraps a non-empty issue collection.
    pub fn new(issues: Issues) -> Self {
        Self { issues }
    }

    /// Returns the collected issues.
    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    /// Consumes the error and returns the collected issues.
    pub fn into_issues(self) -> Issues {
        self.issues
    }
}
