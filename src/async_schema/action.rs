//! Async actions.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use crate::action::Action;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;

type AsyncPredicate = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;
type AsyncTransformFn = Arc<dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync>;

/// An action usable in an async pipe.
///
/// Every synchronous action lifts via [`From`]; the async-only variants
/// suspend at the user-supplied future. Keeping these in a separate type is
/// what makes embedding an async action in a synchronous pipe a
/// construction-time impossibility rather than a runtime check.
#[derive(Clone)]
pub enum AsyncAction {
    /// A lifted synchronous action.
    Sync(Action),
    /// A custom predicate awaiting a user-supplied future.
    CheckAsync {
        predicate: AsyncPredicate,
        message: Option<ErrorMessage>,
    },
    /// A custom transformation awaiting a user-supplied future.
    TransformAsync { f: AsyncTransformFn },
}

impl AsyncAction {
    /// Returns true for metadata actions.
    pub fn is_metadata(&self) -> bool {
        matches!(self, Self::Sync(action) if action.is_metadata())
    }

    /// Returns true for transformation actions.
    pub fn is_transformation(&self) -> bool {
        match self {
            Self::Sync(action) => action.is_transformation(),
            Self::CheckAsync { .. } => false,
            Self::TransformAsync { .. } => true,
        }
    }

    /// Sets the construction-time message on a validation action.
    pub fn with_message(self, message: impl Into<ErrorMessage>) -> Self {
        match self {
            Self::Sync(action) => Self::Sync(action.with_message(message)),
            Self::CheckAsync { predicate, .. } => Self::CheckAsync {
                predicate,
                message: Some(message.into()),
            },
            Self::TransformAsync { f } => Self::TransformAsync { f },
        }
    }

    pub(crate) async fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Self::Sync(action) => action.run(dataset, config),
            Self::CheckAsync { predicate, message } => {
                if !predicate(dataset.value.clone()).await {
                    dataset.add_issue(
                        IssueInfo {
                            kind: IssueKind::Validation,
                            type_tag: "check",
                            expects: None,
                            message: message.as_ref(),
                            requirement: None,
                        },
                        "input",
                        config,
                        IssueOverrides::default(),
                    );
                }
                dataset
            }
            Self::TransformAsync { f } => {
                let value = std::mem::replace(&mut dataset.value, Value::Null);
                dataset.value = f(value).await;
                dataset
            }
        }
    }
}

impl From<Action> for AsyncAction {
    fn from(action: Action) -> Self {
        Self::Sync(action)
    }
}

/// Requires a custom async predicate to hold.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use triage::{check_async, pipe_async, string, Config};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let schema = pipe_async(string(), vec![check_async(|value| async move {
///     // e.g. a uniqueness lookup against a store
///     value != json!("taken")
/// })]);
/// let result = triage::safe_parse_async(&schema, &json!("free"), &Config::default()).await;
/// assert!(result.success());
/// # }
/// ```
pub fn check_async<F, Fut>(predicate: F) -> AsyncAction
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    AsyncAction::CheckAsync {
        predicate: Arc::new(move |value| predicate(value).boxed()),
        message: None,
    }
}

/// Replaces the value with the result of a user-supplied future.
pub fn transform_async<F, Fut>(f: F) -> AsyncAction
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Value> + Send + 'static,
{
    AsyncAction::TransformAsync {
        f: Arc::new(move |value| f(value).boxed()),
    }
}
