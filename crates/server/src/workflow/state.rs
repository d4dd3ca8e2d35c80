use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of one review workflow.
///
/// `Pending` and `Running` are transient; the other three are terminal.
/// `Running` is also reused as the status of a step while it executes,
/// though only `Completed` or `Failed` step results are ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
    HumanReviewRequired,
}

impl WorkflowStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::HumanReviewRequired
        )
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Pending => write!(f, "pending"),
            WorkflowStatus::Running => write!(f, "running"),
            WorkflowStatus::Completed => write!(f, "completed"),
            WorkflowStatus::Failed => write!(f, "failed"),
            WorkflowStatus::HumanReviewRequired => write!(f, "human_review_required"),
        }
    }
}

/// The four pipeline steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Routing,
    Architect,
    Review,
    TestGeneration,
}

impl WorkflowStep {
    /// Number of steps in a full pipeline run.
    pub const COUNT: usize = 4;
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStep::Routing => write!(f, "routing"),
            WorkflowStep::Architect => write!(f, "architect"),
            WorkflowStep::Review => write!(f, "review"),
            WorkflowStep::TestGeneration => write!(f, "test_generation"),
        }
    }
}
