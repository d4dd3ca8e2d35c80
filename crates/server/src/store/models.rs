use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::workflow::{WorkflowStatus, WorkflowStep};

/// Immutable description of the PR under review. Passed unchanged into
/// every agent call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    /// Path to the PR problem statement file.
    pub input_file: String,
    /// Root directory holding checked-out PR repositories.
    pub repo_root: String,
    /// Path to the repository the PR targets.
    pub repo_path: String,
    /// Module to consider for dependency analysis.
    pub module_path: String,
    /// How many hops away to search for relevant files.
    #[serde(default = "default_hop")]
    pub hop: u32,
    /// Prefix for log files.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    // Skip flags are accepted for compatibility; step execution currently
    // runs every stage regardless.
    #[serde(default)]
    pub skip_routing: bool,
    #[serde(default)]
    pub skip_architect: bool,
    #[serde(default)]
    pub skip_review: bool,
    #[serde(default)]
    pub update_deps_graph: bool,
    #[serde(default)]
    pub update_kd_graph: bool,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

fn default_hop() -> u32 {
    1
}

fn default_prefix() -> String {
    "hard".to_string()
}

fn default_verbose() -> bool {
    true
}

/// Outcome of one pipeline step. A running step has no record; only the
/// completed or failed result is appended, once, when the step finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step: WorkflowStep,
    pub status: WorkflowStatus,
    pub result: Option<JsonValue>,
    pub error: Option<String>,
    pub execution_time: Option<f64>,
}

/// One submitted review request and its progress.
///
/// `steps` is append-only, ordered by execution: routing, then architect,
/// review and test generation, stopping early when a step terminates the
/// workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub id: Uuid,
    pub request: ReviewRequest,
    pub status: WorkflowStatus,
    pub steps: Vec<StepResult>,
    pub human_review_required: bool,
    pub final_result: Option<JsonValue>,
    pub total_execution_time: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
