//! Union schema validation.

use super::picklist::join_expects;
use super::Schema;
use crate::config::Config;
use crate::dataset::{Dataset, IssueInfo, IssueOverrides};
use crate::error::{Issue, IssueKind};
use crate::message::ErrorMessage;

/// Tries member schemas in declared order.
///
/// The first member whose result is typed wins immediately, even when it
/// carries issues (those become the union's own issues); issues from members
/// tried before the winner are discarded. When no member types the value,
/// one aggregate issue is emitted whose nested `issues` list preserves every
/// member's detail in member order.
#[derive(Clone)]
pub struct UnionSchema {
    pub(crate) options: Vec<Schema>,
    pub(crate) expects: String,
    pub(crate) message: Option<ErrorMessage>,
}

impl UnionSchema {
    pub(crate) fn new(options: Vec<Schema>) -> Self {
        let expects = join_expects(
            options.iter().map(|o| o.expects().to_string()).collect(),
            "|",
        );
        Self {
            options,
            expects,
            message: None,
        }
    }

    pub(crate) fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let mut member_issues: Vec<Issue> = Vec::new();

        for option in &self.options {
            let mut child = option.run(Dataset::new(dataset.value.clone()), config);
            if child.typed {
                let issues = child.take_issues();
                dataset.value = child.value;
                dataset.typed = true;
                dataset.append_issues(issues);
                return dataset;
            }
            member_issues.extend(child.take_issues());
        }

        dataset.add_issue(
            IssueInfo {
                kind: IssueKind::Schema,
                type_tag: "union",
                expects: Some(&self.expects),
                message: self.message.as_ref(),
                requirement: None,
            },
            "type",
            config,
            IssueOverrides {
                issues: (!member_issues.is_empty()).then_some(member_issues),
                ..Default::default()
            },
        );
        dataset
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{number, pipe, string, union};
    use crate::{min_length, Config, Dataset};
    use serde_json::json;

    fn run(schema: &crate::Schema, value: serde_json::Value) -> Dataset {
        schema.run(Dataset::new(value), &Config::default())
    }

    #[test]
    fn test_first_matching_member_wins() {
        let schema = union([string(), number()]);
        assert!(run(&schema, json!("x")).typed);
        assert!(run(&schema, json!(1)).typed);
    }

    #[test]
    fn test_typed_member_with_issues_wins() {
        // The first member types strings but fails the length constraint;
        // the second would not type the value at all.
        let schema = union([pipe(string(), vec![min_length(5)]), number()]);
        let dataset = run(&schema, json!("abc"));
        assert!(dataset.typed);
        assert_eq!(dataset.issues().len(), 1);
        assert_eq!(dataset.issues()[0].type_tag, "min_length");
    }

    #[test]
    fn test_pre_winner_issues_are_discarded() {
        // The number member fails first, then the string member types with a
        // validation issue: only the winner's issues remain.
        let schema = union([number(), pipe(string(), vec![min_length(5)])]);
        let dataset = run(&schema, json!("abc"));
        assert!(dataset.typed);
        assert_eq!(dataset.issues().len(), 1);
        assert_eq!(dataset.issues()[0].type_tag, "min_length");
    }

    #[test]
    fn test_no_member_types_aggregates_single_issue() {
        let schema = union([string(), number()]);
        let dataset = run(&schema, json!(true));
        assert!(!dataset.typed);
        assert_eq!(dataset.issues().len(), 1);
        let issue = &dataset.issues()[0];
        assert_eq!(issue.type_tag, "union");
        assert_eq!(
            issue.message,
            "Invalid type: Expected (string | number) but received true"
        );
        // Per-member detail is preserved in member order.
        let nested = issue.issues.as_ref().unwrap();
        assert_eq!(nested.len(), 2);
        assert_eq!(nested[0].type_tag, "string");
        assert_eq!(nested[1].type_tag, "number");
    }

    #[test]
    fn test_union_result_value_is_winner_output() {
        let schema = union([number(), string()]);
        let dataset = run(&schema, json!("keep me"));
        assert_eq!(dataset.value, json!("keep me"));
    }
}
