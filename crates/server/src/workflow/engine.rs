use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    agent::AgentSuite,
    metrics,
    store::{ReviewRequest, StepResult, WorkflowStore},
    workflow::{WorkflowStatus, WorkflowStep},
    Error, Result,
};

/// Drives one workflow through the four-step sequence and records the
/// outcome in the store after every step.
///
/// Steps of a single workflow run strictly in sequence; workflows for
/// different ids interleave freely, one spawned task each.
pub struct WorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    agents: Arc<dyn AgentSuite>,
    cancelled: RwLock<HashSet<Uuid>>,
}

impl WorkflowEngine {
    pub fn new(store: Arc<dyn WorkflowStore>, agents: Arc<dyn AgentSuite>) -> Self {
        Self {
            store,
            agents,
            cancelled: RwLock::new(HashSet::new()),
        }
    }

    /// Run the pipeline for `id` to a terminal status.
    ///
    /// A failed step, an early-exit verdict or a cancellation stops the
    /// workflow without touching later steps. Returns an error only when
    /// the id is unknown, which is a caller bug rather than a runtime
    /// condition.
    pub async fn execute(&self, id: Uuid) -> Result<()> {
        let record = self
            .store
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(format!("workflow {id}")))?;

        info!("Executing workflow {}", id);
        metrics::WORKFLOWS_STARTED.inc();
        let started = Instant::now();
        self.store
            .update_status(id, WorkflowStatus::Running, None)
            .await;

        if let Err(e) = self.run_pipeline(id, &record.request, started).await {
            error!("Workflow {} failed: {}", id, e);
            self.finish(id, WorkflowStatus::Failed, None, started).await;
        }

        self.cancelled.write().await.remove(&id);
        Ok(())
    }

    /// Stop `id` before its next step and mark it failed. The running task
    /// notices the flag at the next step boundary and will not overwrite
    /// the cancelled status with its own outcome.
    pub async fn cancel(&self, id: Uuid) {
        warn!("Cancelling workflow {}", id);
        self.cancelled.write().await.insert(id);
        self.store
            .update_status(id, WorkflowStatus::Failed, None)
            .await;
    }

    async fn run_pipeline(
        &self,
        id: Uuid,
        request: &ReviewRequest,
        started: Instant,
    ) -> Result<()> {
        if self.stop_if_cancelled(id).await {
            self.finish(id, WorkflowStatus::Failed, None, started).await;
            return Ok(());
        }

        let routing = match self
            .run_step(id, WorkflowStep::Routing, self.agents.route(request))
            .await?
        {
            Some(routing) => routing,
            None => {
                self.finish(id, WorkflowStatus::Failed, None, started).await;
                return Ok(());
            }
        };
        if self.stop_if_cancelled(id).await {
            self.finish(id, WorkflowStatus::Failed, None, started).await;
            return Ok(());
        }
        if !routing.is_easy {
            info!("Workflow {} routed to human review: {}", id, routing.reason);
            self.finish(id, WorkflowStatus::HumanReviewRequired, None, started)
                .await;
            return Ok(());
        }

        let architecture = match self
            .run_step(
                id,
                WorkflowStep::Architect,
                self.agents.analyze_architecture(request),
            )
            .await?
        {
            Some(architecture) => architecture,
            None => {
                self.finish(id, WorkflowStatus::Failed, None, started).await;
                return Ok(());
            }
        };
        if self.stop_if_cancelled(id).await {
            self.finish(id, WorkflowStatus::Failed, None, started).await;
            return Ok(());
        }

        let review = match self
            .run_step(
                id,
                WorkflowStep::Review,
                self.agents.review_code(request, &architecture),
            )
            .await?
        {
            Some(review) => review,
            None => {
                self.finish(id, WorkflowStatus::Failed, None, started).await;
                return Ok(());
            }
        };
        if self.stop_if_cancelled(id).await {
            self.finish(id, WorkflowStatus::Failed, None, started).await;
            return Ok(());
        }
        if !review.overall_good {
            info!("Workflow {} needs human review after code review", id);
            self.finish(id, WorkflowStatus::HumanReviewRequired, None, started)
                .await;
            return Ok(());
        }

        let tests = match self
            .run_step(
                id,
                WorkflowStep::TestGeneration,
                self.agents.generate_tests(request, &architecture),
            )
            .await?
        {
            Some(tests) => tests,
            None => {
                self.finish(id, WorkflowStatus::Failed, None, started).await;
                return Ok(());
            }
        };
        if self.stop_if_cancelled(id).await {
            self.finish(id, WorkflowStatus::Failed, None, started).await;
            return Ok(());
        }

        let final_result = json!({
            "routing": serde_json::to_value(&routing)?,
            "architect": serde_json::to_value(&architecture)?,
            "review": serde_json::to_value(&review)?,
            "test_generation": serde_json::to_value(&tests)?,
        });
        self.finish(id, WorkflowStatus::Completed, Some(final_result), started)
            .await;
        Ok(())
    }

    /// Execute one step: time it, append the completed or failed result,
    /// and turn an agent error into a failed step record instead of
    /// propagating it. Returns the payload when the step completed.
    async fn run_step<T, F>(&self, id: Uuid, step: WorkflowStep, call: F) -> Result<Option<T>>
    where
        T: Serialize,
        F: Future<Output = anyhow::Result<T>>,
    {
        info!("Workflow {}: running step {}", id, step);
        let started = Instant::now();

        match call.await {
            Ok(output) => {
                let elapsed = started.elapsed().as_secs_f64();
                let record = StepResult {
                    step,
                    status: WorkflowStatus::Completed,
                    result: Some(serde_json::to_value(&output)?),
                    error: None,
                    execution_time: Some(elapsed),
                };
                info!(
                    "Workflow {}: step {} completed in {:.2}s",
                    id, step, elapsed
                );
                self.store
                    .update_status(id, WorkflowStatus::Running, Some(record))
                    .await;
                Ok(Some(output))
            }
            Err(e) => {
                let elapsed = started.elapsed().as_secs_f64();
                error!("Workflow {}: step {} failed: {}", id, step, e);
                let record = StepResult {
                    step,
                    status: WorkflowStatus::Failed,
                    result: None,
                    error: Some(e.to_string()),
                    execution_time: Some(elapsed),
                };
                self.store
                    .update_status(id, WorkflowStatus::Failed, Some(record))
                    .await;
                Ok(None)
            }
        }
    }

    async fn stop_if_cancelled(&self, id: Uuid) -> bool {
        let cancelled = self.cancelled.read().await.contains(&id);
        if cancelled {
            info!("Workflow {} cancelled, stopping before next step", id);
        }
        cancelled
    }

    async fn finish(
        &self,
        id: Uuid,
        status: WorkflowStatus,
        final_result: Option<serde_json::Value>,
        started: Instant,
    ) {
        self.store
            .complete(id, status, final_result, started.elapsed().as_secs_f64())
            .await;
        match status {
            WorkflowStatus::Completed => metrics::WORKFLOWS_COMPLETED.inc(),
            WorkflowStatus::HumanReviewRequired => metrics::WORKFLOWS_ESCALATED.inc(),
            _ => metrics::WORKFLOWS_FAILED.inc(),
        }
    }
}
