//! The pipe composer.

use super::Schema;
use crate::action::{Action, MetadataAction};
use crate::config::Config;
use crate::dataset::Dataset;

/// One schema followed by an ordered list of actions.
///
/// Execution contract:
/// 1. The base schema runs first.
/// 2. If the result is untyped, no validation or transformation runs
///    (metadata stays a no-op) and the dataset returns unchanged.
/// 3. Otherwise actions run strictly in declaration order, threading the
///    dataset through each; order is never changed, so issue ordering is
///    deterministic.
/// 4. A transformation encountered while issues exist forces the typed flag
///    down and stops the pipe: transforms only see clean values.
/// 5. After an action adds issues, `abort_pipe_early` stops the remaining
///    actions of this pipe only; `abort_early` (which untypes the dataset
///    on every issue) halts the whole tree.
#[derive(Clone)]
pub struct PipeSchema {
    pub(crate) base: Box<Schema>,
    pub(crate) actions: Vec<Action>,
}

impl PipeSchema {
    pub(crate) fn new(base: Schema, actions: Vec<Action>) -> Self {
        Self {
            base: Box::new(base),
            actions,
        }
    }

    /// The first description annotation in this pipe, if any.
    pub(crate) fn description(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            Action::Metadata(MetadataAction::Description(text)) => Some(text.as_str()),
            _ => None,
        })
    }

    /// The first title annotation in this pipe, if any.
    pub(crate) fn title(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            Action::Metadata(MetadataAction::Title(text)) => Some(text.as_str()),
            _ => None,
        })
    }

    pub(crate) fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let mut dataset = self.base.run(dataset, config);

        for action in &self.actions {
            if action.is_metadata() {
                continue;
            }
            if !dataset.typed {
                break;
            }
            if action.is_transformation() && dataset.has_issues() {
                dataset.typed = false;
                break;
            }
            let issues_before = dataset.issues().len();
            dataset = action.run(dataset, config);
            if config.abort_pipe_early && dataset.issues().len() > issues_before {
                break;
            }
        }

        dataset
    }
}
