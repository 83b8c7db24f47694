//! Parse configuration.

use crate::message::ErrorMessage;

/// Options recognized by every run.
///
/// The default configuration validates exhaustively: no short-circuiting,
/// default language, default messages.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use triage::{object, safe_parse_with, string, Config};
///
/// let schema = object([("a", string()), ("b", string())]);
/// let config = Config::new().abort_early(true);
/// let result = safe_parse_with(&schema, &json!({}), &config);
/// // abort_early stops the whole tree at the first issue
/// assert_eq!(result.issues.unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Stop the entire tree at the first issue.
    pub abort_early: bool,
    /// Stop only the current pipe's remaining actions at the first issue.
    pub abort_pipe_early: bool,
    /// Message localization key.
    pub lang: Option<String>,
    /// One-off message override. Never beats a node's own message.
    pub message: Option<ErrorMessage>,
}

impl Config {
    /// Creates the default configuration (exhaustive validation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the entire tree stops at the first issue.
    pub fn abort_early(mut self, abort_early: bool) -> Self {
        self.abort_early = abort_early;
        self
    }

    /// Sets whether a pipe stops its remaining actions at the first issue.
    pub fn abort_pipe_early(mut self, abort_pipe_early: bool) -> Self {
        self.abort_pipe_early = abort_pipe_early;
        self
    }

    /// Sets the message localization key.
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Sets a call-site message override.
    ///
    /// Node-level messages still win over this; see the precedence order on
    /// [`crate::message::ErrorMessage`].
    pub fn message(mut self, message: impl Into<ErrorMessage>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let config = Config::new();
        assert!(!config.abort_early);
        assert!(!config.abort_pipe_early);
        assert!(config.lang.is_none());
        assert!(config.message.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::new()
            .abort_early(true)
            .abort_pipe_early(true)
            .lang("de")
            .message("kaputt");
        assert!(config.abort_early);
        assert!(config.abort_pipe_early);
        assert_eq!(config.lang.as_deref(), Some("de"));
        assert!(config.message.is_some());
    }
}
