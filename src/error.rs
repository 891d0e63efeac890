use std::fmt;

use thiserror::Error;

use crate::action::ActionRef;
use crate::artifact::Artifact;

/// Two distinct actions declared the same output artifact.
///
/// This is a build misconfiguration reported to the user, not a fatal
/// condition: the affected target fails while independent targets keep
/// building. The conflict is raised synchronously by
/// [`ActionGraph::register_action`](crate::ActionGraph::register_action)
/// and the graph is left exactly as it was before the failed call.
#[derive(Clone, Error)]
#[error("file '{artifact}' is generated by these conflicting actions")]
pub struct ActionConflict {
    /// The action currently registered for the artifact.
    pub first: ActionRef,
    /// The action whose registration failed.
    pub second: ActionRef,
    /// The output artifact both actions declare.
    pub artifact: Artifact,
}

impl ActionConflict {
    pub(crate) fn new(first: ActionRef, second: ActionRef, artifact: Artifact) -> Self {
        Self {
            first,
            second,
            artifact,
        }
    }

    /// Multi-line report naming both actions, for user-facing error output.
    pub fn describe(&self) -> String {
        let mut acc = format!("file '{}' is generated by these conflicting actions:", self.artifact);

        for action in [&self.first, &self.second] {
            match action.progress_message() {
                Some(message) => acc.push_str(&format!("\n  {message}")),
                None => acc.push_str("\n  <action with no progress message>"),
            }
            if let Some(key) = action.describe_key() {
                for line in key.lines() {
                    acc.push_str(&format!("\n    {line}"));
                }
            }
        }

        acc
    }
}

impl fmt::Debug for ActionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |action: &ActionRef| action.progress_message().unwrap_or_else(|| "<action>".into());

        f.debug_struct("ActionConflict")
            .field("artifact", &self.artifact)
            .field("first", &name(&self.first))
            .field("second", &name(&self.second))
            .finish()
    }
}

/// Errors surfaced by the [`WorkQueue`](crate::WorkQueue) driver.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Couldn't build the worker pool.\n{0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("A worker job failed.\n{0}")]
    Job(anyhow::Error),
}
