//! Error messages and the global per-language message store.
//!
//! A message is either fixed text or a resolver closure receiving the issue
//! being built. Resolution precedence when an issue is created:
//!
//! 1. the caller's override passed to `add_issue`
//! 2. the node's own construction-time message
//! 3. the call-site config message
//! 4. the global store entry for the issue's `lang`
//! 5. the built-in `Invalid {label}: ...` format
//!
//! A call-site config message therefore never overrides an action's own
//! message.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::Issue;

/// An error message: fixed text or a resolver over the issue being built.
#[derive(Clone)]
pub enum ErrorMessage {
    /// Fixed message text.
    Text(String),
    /// A resolver computing the text from the issue being built.
    Resolver(Arc<dyn Fn(&Issue) -> String + Send + Sync>),
}

impl ErrorMessage {
    /// Creates a resolver message from a closure.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triage::ErrorMessage;
    ///
    /// let message = ErrorMessage::from_fn(|issue| {
    ///     format!("{} is not acceptable here", issue.received.as_deref().unwrap_or("input"))
    /// });
    /// ```
    pub fn from_fn(f: impl Fn(&Issue) -> String + Send + Sync + 'static) -> Self {
        Self::Resolver(Arc::new(f))
    }

    /// Resolves the message text for an issue.
    pub fn resolve(&self, issue: &Issue) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Resolver(f) => f(issue),
        }
    }
}

impl fmt::Debug for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Resolver(_) => f.debug_tuple("Resolver").field(&"<fn>").finish(),
        }
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

type MessageStore = RwLock<HashMap<Option<String>, ErrorMessage>>;

static GLOBAL_MESSAGES: Lazy<MessageStore> = Lazy::new(Default::default);

/// Registers the global default message for a language.
///
/// `None` is the default language used when a run has no `lang` configured.
/// Registered messages apply to every issue whose message is not set at the
/// node or call site.
pub fn set_global_message(lang: Option<&str>, message: impl Into<ErrorMessage>) {
    GLOBAL_MESSAGES
        .write()
        .insert(lang.map(str::to_string), message.into());
}

/// Returns the global default message for a language, if registered.
pub fn get_global_message(lang: Option<&str>) -> Option<ErrorMessage> {
    GLOBAL_MESSAGES
        .read()
        .get(&lang.map(str::to_string))
        .cloned()
}

/// Removes the global default message for a language.
pub fn delete_global_message(lang: Option<&str>) {
    GLOBAL_MESSAGES.write().remove(&lang.map(str::to_string));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use serde_json::json;

    fn dummy_issue() -> Issue {
        Issue {
            kind: IssueKind::Validation,
            type_tag: "check",
            input: json!(1),
            expected: None,
            received: Some("1".to_string()),
            message: String::new(),
            requirement: None,
            path: None,
            issues: None,
            lang: None,
            abort_early: None,
            abort_pipe_early: None,
        }
    }

    #[test]
    fn test_text_message_resolves_verbatim() {
        let message = ErrorMessage::from("broken");
        assert_eq!(message.resolve(&dummy_issue()), "broken");
    }

    #[test]
    fn test_resolver_message_sees_issue() {
        let message = ErrorMessage::from_fn(|issue| format!("got {}", issue.received.as_deref().unwrap()));
        assert_eq!(message.resolve(&dummy_issue()), "got 1");
    }

    #[test]
    fn test_global_store_roundtrip() {
        // Own lang key so parallel tests cannot interfere.
        set_global_message(Some("x-test"), "stored");
        let stored = get_global_message(Some("x-test")).unwrap();
        assert_eq!(stored.resolve(&dummy_issue()), "stored");
        delete_global_message(Some("x-test"));
        assert!(get_global_message(Some("x-test")).is_none());
    }

    #[test]
    fn test_global_store_misses_unknown_lang() {
        assert!(get_global_message(Some("x-unknown")).is_none());
    }
}
