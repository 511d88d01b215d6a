//! Ordered record of the states a workflow visited.

use std::fmt::Debug;

use tracing::debug;

/// States visited by one workflow run, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTrace<S> {
    workflow: &'static str,
    stages: Vec<S>,
}

impl<S> WorkflowTrace<S>
where
    S: Copy + Debug + PartialEq,
{
    /// Start a trace at `initial`.
    #[must_use]
    pub fn starting_at(workflow: &'static str, initial: S) -> Self {
        debug!(workflow, stage = ?initial, "workflow started");
        Self {
            workflow,
            stages: vec![initial],
        }
    }

    /// Record a transition into `stage`.
    pub fn enter(&mut self, stage: S) {
        debug!(workflow = self.workflow, from = ?self.last(), to = ?stage, "workflow transition");
        self.stages.push(stage);
    }

    /// Every visited state in order.
    #[must_use]
    pub fn stages(&self) -> &[S] {
        &self.stages
    }

    /// The state the workflow ended in.
    #[must_use]
    pub fn last(&self) -> Option<S> {
        self.stages.last().copied()
    }

    /// Whether `stage` was visited.
    #[must_use]
    pub fn visited(&self, stage: S) -> bool {
        self.stages.contains(&stage)
    }
}
