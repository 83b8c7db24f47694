//! Primitive leaf schemas.

use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::IssueKind;
use crate::message::ErrorMessage;

macro_rules! leaf_schema {
    ($(#[$doc:meta])* $name:ident, $tag:literal, $check:expr) => {
        $(#[$doc])*
        #[derive(Clone, Default)]
        pub struct $name {
            pub(crate) message: Option<ErrorMessage>,
        }

        impl $name {
            pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
                #[allow(clippy::redundant_closure_call)]
                if ($check)(&dataset.value) {
                    dataset.typed = true;
                } else {
                    dataset.add_issue(
                        IssueInfo {
                            kind: IssueKind::Schema,
                            type_tag: $tag,
                            expects: Some($tag),
                            message: self.message.as_ref(),
                            requirement: None,
                        },
                        "type",
                        config,
                        IssueOverrides::default(),
                    );
                }
                dataset
            }
        }
    };
}

leaf_schema!(
    /// Type-checks for a string.
    StringSchema,
    "string",
    serde_json::Value::is_string
);

leaf_schema!(
    /// Type-checks for a JSON number.
    NumberSchema,
    "number",
    serde_json::Value::is_number
);

leaf_schema!(
    /// Type-checks for a boolean.
    BooleanSchema,
    "boolean",
    serde_json::Value::is_boolean
);

leaf_schema!(
    /// Type-checks for JSON null.
    NullSchema,
    "null",
    serde_json::Value::is_null
);

leaf_schema!(
    /// Rejects every value.
    NeverSchema,
    "never",
    |_: &serde_json::Value| false
);
