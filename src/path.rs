//! Path items for locating issues in nested structures.
//!
//! This module provides [`PathItem`] and its [`Container`]/[`Origin`] tags.
//! Every composite schema prepends one path item onto the issues bubbling out
//! of a child, so a finished path reads outer-to-inner and its length equals
//! the nesting depth at the point of failure.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;

/// The container type a path item steps through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    /// A JSON object entry (also used by record schemas).
    Object,
    /// A JSON array element (also used by tuple schemas).
    Array,
    /// A keyed-collection entry validated key-and-value independently.
    Map,
    /// A unique-element collection entry.
    Set,
}

/// Whether a path item addresses the entry's key or its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Key,
    Value,
}

/// One step locating an issue within nested data.
///
/// `input` is the immediate parent container's value at validation time,
/// `key` is the property name, index or map key (`None` for set elements),
/// and `value` is the element the step leads to.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use triage::{Container, Origin, PathItem};
///
/// let item = PathItem::value(Container::Object, json!({"name": "x"}), "name", json!("x"));
/// assert_eq!(item.container, Container::Object);
/// assert_eq!(item.origin, Origin::Value);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathItem {
    /// The container type.
    #[serde(rename = "type")]
    pub container: Container,
    /// Whether the step addresses the entry's key or value.
    pub origin: Origin,
    /// The immediate parent container's value.
    pub input: Value,
    /// The property name, index or map key. `None` for set elements.
    pub key: Option<Value>,
    /// The element's value.
    pub value: Value,
}

impl PathItem {
    /// Creates a path item with origin [`Origin::Value`].
    pub fn value(container: Container, input: Value, key: impl Into<Value>, value: Value) -> Self {
        Self {
            container,
            origin: Origin::Value,
            input,
            key: Some(key.into()),
            value,
        }
    }

    /// Creates a path item with origin [`Origin::Key`].
    pub fn key(container: Container, input: Value, key: impl Into<Value>, value: Value) -> Self {
        Self {
            container,
            origin: Origin::Key,
            input,
            key: Some(key.into()),
            value,
        }
    }

    /// Creates a keyless path item for set elements.
    pub fn element(input: Value, value: Value) -> Self {
        Self {
            container: Container::Set,
            origin: Origin::Value,
            input,
            key: None,
            value,
        }
    }
}

/// Renders a path as a dot string like `users[0].email`.
///
/// Indices render as `[n]`, keys as dot-separated names and keyless set
/// steps as `[*]`. The root (empty path) renders as an empty string.
pub fn render_path(path: &[PathItem]) -> String {
    let mut out = String::new();
    for (i, item) in path.iter().enumerate() {
        match &item.key {
            Some(Value::Number(n)) => {
                let _ = write!(out, "[{}]", n);
            }
            Some(Value::String(name)) => {
                if i > 0 {
                    out.push('.');
                }
                out.push_str(name);
            }
            Some(other) => {
                let _ = write!(out, "[{}]", other);
            }
            None => out.push_str("[*]"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn step(key: Value) -> PathItem {
        PathItem::value(Container::Object, json!({}), key, json!(null))
    }

    #[test]
    fn test_render_empty_path() {
        assert_eq!(render_path(&[]), "");
    }

    #[test]
    fn test_render_single_field() {
        assert_eq!(render_path(&[step(json!("user"))]), "user");
    }

    #[test]
    fn test_render_single_index() {
        assert_eq!(render_path(&[step(json!(0))]), "[0]");
    }

    #[test]
    fn test_render_nested_fields() {
        let path = vec![step(json!("user")), step(json!("email"))];
        assert_eq!(render_path(&path), "user.email");
    }

    #[test]
    fn test_render_complex_path() {
        let path = vec![step(json!("users")), step(json!(0)), step(json!("email"))];
        assert_eq!(render_path(&path), "users[0].email");
    }

    #[test]
    fn test_render_set_element() {
        let path = vec![step(json!("tags")), PathItem::element(json!([]), json!(1))];
        assert_eq!(render_path(&path), "tags[*]");
    }

    #[test]
    fn test_serialized_shape() {
        let item = PathItem::key(Container::Map, json!({"a": 1}), "a", json!("a"));
        let encoded = serde_json::to_value(&item).unwrap();
        assert_eq!(
            encoded,
            json!({
                "type": "map",
                "origin": "key",
                "input": {"a": 1},
                "key": "a",
                "value": "a",
            })
        );
    }

    #[test]
    fn test_element_has_no_key() {
        let item = PathItem::element(json!([1]), json!(1));
        assert_eq!(item.container, Container::Set);
        assert_eq!(item.key, None);
    }
}
