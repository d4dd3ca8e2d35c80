use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    store::{ReviewRequest, StepResult, WorkflowRecord, WorkflowStore},
    workflow::WorkflowStatus,
};

/// In-process store. Records live until the process exits; nothing is
/// evicted. The lock keeps every `get` a consistent snapshot even on a
/// multi-threaded runtime.
#[derive(Default)]
pub struct MemoryStore {
    workflows: RwLock<HashMap<Uuid, WorkflowRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn create(&self, request: ReviewRequest) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let record = WorkflowRecord {
            id,
            request,
            status: WorkflowStatus::Pending,
            steps: Vec::new(),
            human_review_required: false,
            final_result: None,
            total_execution_time: None,
            created_at: now,
            updated_at: now,
        };
        self.workflows.write().await.insert(id, record);
        info!("Created workflow {}", id);
        id
    }

    async fn get(&self, id: Uuid) -> Option<WorkflowRecord> {
        self.workflows.read().await.get(&id).cloned()
    }

    async fn update_status(&self, id: Uuid, status: WorkflowStatus, step: Option<StepResult>) {
        let mut workflows = self.workflows.write().await;
        let Some(record) = workflows.get_mut(&id) else {
            debug!("Ignoring status update for unknown workflow {}", id);
            return;
        };
        record.status = status;
        record.updated_at = Utc::now();
        if let Some(step) = step {
            record.steps.push(step);
        }
        debug!("Updated workflow {} status to {}", id, status);
    }

    async fn complete(
        &self,
        id: Uuid,
        status: WorkflowStatus,
        final_result: Option<JsonValue>,
        total_execution_time: f64,
    ) {
        let mut workflows = self.workflows.write().await;
        let Some(record) = workflows.get_mut(&id) else {
            debug!("Ignoring completion of unknown workflow {}", id);
            return;
        };
        record.status = status;
        record.human_review_required = status == WorkflowStatus::HumanReviewRequired;
        record.final_result = final_result;
        record.total_execution_time = Some(total_execution_time);
        record.updated_at = Utc::now();
        info!("Workflow {} finished with status {}", id, status);
    }

    async fn list(&self) -> Vec<WorkflowRecord> {
        let workflows = self.workflows.read().await;
        let mut all: Vec<_> = workflows.values().cloned().collect();
        all.sort_by_key(|w| w.created_at);
        all
    }
}
