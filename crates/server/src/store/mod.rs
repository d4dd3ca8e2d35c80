mod memory;
mod models;

pub use memory::MemoryStore;
pub use models::{ReviewRequest, StepResult, WorkflowRecord};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::workflow::WorkflowStatus;

/// Authoritative record of all workflows known to the process.
///
/// Behind a trait so a persistent or replicated backing store can replace
/// the in-memory one without touching the engine or the API layer.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Allocate an id and insert a pending record with no steps.
    async fn create(&self, request: ReviewRequest) -> Uuid;

    /// Absent is an expected outcome, not an error: the id may be unknown
    /// or belong to a previous process instance.
    async fn get(&self, id: Uuid) -> Option<WorkflowRecord>;

    /// Set the status, refresh `updated_at` and append a step result when
    /// one is supplied. Unknown ids are ignored.
    async fn update_status(&self, id: Uuid, status: WorkflowStatus, step: Option<StepResult>);

    /// Terminal transition: records the final status, the aggregated result
    /// (when all steps ran), whether a human has to take over, and the
    /// total execution time in seconds. Unknown ids are ignored.
    async fn complete(
        &self,
        id: Uuid,
        status: WorkflowStatus,
        final_result: Option<JsonValue>,
        total_execution_time: f64,
    );

    /// All known workflows, oldest first.
    async fn list(&self) -> Vec<WorkflowRecord>;
}
