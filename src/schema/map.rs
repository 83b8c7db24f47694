//! Map schema validation.

use serde_json::{Map, Value};

use super::Schema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;
use crate::path::{Container, PathItem};

/// A schema for keyed collections where keys and values are validated
/// independently.
///
/// Each entry produces up to two child runs: the key (as a string value)
/// against the key schema with a key-origin path item, and the value against
/// the value schema with a value-origin path item. The output preserves the
/// insertion order of entries that were fully processed.
#[derive(Clone)]
pub struct MapSchema {
    pub(crate) key: Box<Schema>,
    pub(crate) value: Box<Schema>,
    pub(crate) message: Option<ErrorMessage>,
}

impl MapSchema {
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
            Container::Map,
            "map",
        )
    }
}

/// Shared algorithm for map and record schemas; they differ only in the
/// path-item container tag and the issue type tag.
pub(crate) fn run_keyed(
    mut dataset: Dataset,
    config: &Config,
    key_schema: &Schema,
    value_schema: &Schema,
    message: Option<&ErrorMessage>,
    container: Container,
    type_tag: &'static str,
) -> Dataset {
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
    let mut output = Map::new();

    for (key, value) in obj {
        let key_value = Value::String(key.clone());

        let key_child = key_schema.run(Dataset::new(key_value.clone()), config);
        let out_key = if key_child.has_issues() {
            let item = PathItem::key(container, input.clone(), key.as_str(), key_value);
            let merged = dataset.merge_child(key_child, &item);
            if config.abort_early {
                dataset.typed = false;
                break;
            }
            merged
        } else {
            if !key_child.typed {
                dataset.typed = false;
            }
            key_child.value
        };

        let value_child = value_schema.run(Dataset::new(value.clone()), config);
        let out_value = if value_child.has_issues() {
            let item = PathItem::value(container, input.clone(), key.as_str(), value.clone());
            let merged = dataset.merge_child(value_child, &item);
            if config.abort_early {
                dataset.typed = false;
                break;
            }
            merged
        } else {
            if !value_child.typed {
                dataset.typed = false;
            }
            value_child.value
        };

        // A key transformed to a non-string cannot live in a JSON object;
        // the original key is kept in that case.
        let final_key = match out_key {
            Value::String(s) => s,
            _ => key.clone(),
        };
        output.insert(final_key, out_value);
    }

    dataset.value = Value::Object(output);
    dataset
}

#[cfg(test)]
mod tests {
    use crate::schema::{map, number, picklist, pipe, string};
    use crate::{to_upper_case, Config, Dataset, Origin};
    use serde_json::json;

    fn run(schema: &crate::Schema, value: serde_json::Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::default())
    }

    #[test]
    fn test_valid_map() {
        let schema = map(string(), number());
        let dataset = run(&schema, json!({"a": 1, "b": 2}));
        assert!(dataset.typed);
        assert_eq!(dataset.value, json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_rejects_non_object() {
        let schema = map(string(), number());
        let dataset = run(&schema, json!([1, 2]));
        assert!(!dataset.typed);
        assert_eq!(dataset.issues()[0].type_tag, "map");
    }

    #[test]
    fn test_key_issue_has_key_origin() {
        let schema = map(picklist(["a", "b"]), number());
        let dataset = run(&schema, json!({"c": 1}));
        assert!(!dataset.typed);
        let issue = &dataset.issues()[0];
        let item = &issue.path.as_ref().unwrap()[0];
        assert_eq!(item.origin, Origin::Key);
        assert_eq!(item.container, crate::Container::Map);
        // The path item's value is the key itself.
        assert_eq!(item.value, json!("c"));
    }

    #[test]
    fn test_value_issue_has_value_origin() {
        let schema = map(string(), number());
        let dataset = run(&schema, json!({"a": "x"}));
        let item = &dataset.issues()[0].path.as_ref().unwrap()[0];
        assert_eq!(item.origin, Origin::Value);
        assert_eq!(item.value, json!("x"));
    }

    #[test]
    fn test_key_and_value_validated_independently() {
        let schema = map(picklist(["a"]), number());
        let dataset = run(&schema, json!({"b": "x"}));
        // Both the key and the value fail, each with its own issue.
        assert_eq!(dataset.issues().len(), 2);
        let origins: Vec<_> = dataset
            .issues()
            .iter()
            .map(|i| i.path.as_ref().unwrap()[0].origin)
            .collect();
        assert_eq!(origins, vec![Origin::Key, Origin::Value]);
    }

    #[test]
    fn test_transformed_keys() {
        let schema = map(pipe(string(), vec![to_upper_case()]), number());
        let dataset = run(&schema, json!({"a": 1}));
        assert!(dataset.typed);
        assert_eq!(dataset.value, json!({"A": 1}));
    }

    #[test]
    fn test_abort_early_stops_consuming_entries() {
        let schema = map(string(), number());
        let config = Config::new().abort_early(true);
        let dataset = schema.run(Dataset::new(json!({"a": 1, "b": "x", "c": 3})), &config);
        assert!(!dataset.typed);
        assert_eq!(dataset.issues().len(), 1);
        // The partial container holds the entries processed so far.
        assert_eq!(dataset.value, json!({"a": 1}));
    }
}
