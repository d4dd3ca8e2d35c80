use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{error, info};
use uuid::Uuid;

use super::AppState;
use crate::{
    store::{ReviewRequest, StepResult},
    workflow::{WorkflowStatus, WorkflowStep},
};

/// Error shape shared by every endpoint: a status code plus the one
/// message the caller is allowed to see. Internals stay in the server log.
pub enum ApiError {
    NotFound(String),
    InvalidState(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::InvalidState(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn workflow_not_found(id: impl std::fmt::Display) -> ApiError {
    ApiError::NotFound(format!("Workflow {} not found", id))
}

/// Ids are opaque tokens to callers; anything that does not parse is
/// simply an unknown workflow, not a malformed request.
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| workflow_not_found(id))
}

#[derive(Serialize)]
pub struct StartResponse {
    workflow_id: Uuid,
    message: &'static str,
    status_endpoint: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    workflow_id: Uuid,
    status: WorkflowStatus,
    current_step: Option<WorkflowStep>,
    progress: f64,
    message: String,
    steps: Vec<StepResult>,
}

#[derive(Serialize)]
pub struct WorkflowResponse {
    workflow_id: Uuid,
    status: WorkflowStatus,
    steps: Vec<StepResult>,
    final_result: Option<JsonValue>,
    human_review_required: bool,
    total_execution_time: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct StepsResponse {
    workflow_id: Uuid,
    steps: Vec<StepResult>,
    total_steps: usize,
    completed_steps: usize,
    failed_steps: usize,
}

#[derive(Serialize)]
pub struct WorkflowSummary {
    workflow_id: Uuid,
    status: WorkflowStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    human_review_required: bool,
}

#[derive(Serialize)]
pub struct ListResponse {
    workflows: Vec<WorkflowSummary>,
    total: usize,
}

pub async fn start_workflow(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReviewRequest>,
) -> Json<StartResponse> {
    let id = state.store.create(request).await;

    // Fire-and-forget: the caller polls the status endpoint.
    let engine = state.engine.clone();
    tokio::spawn(async move {
        if let Err(e) = engine.execute(id).await {
            error!("Workflow {} execution error: {}", id, e);
        }
    });

    info!("Started workflow {}", id);
    Json(StartResponse {
        workflow_id: id,
        message: "Workflow started successfully. Use the workflow_id to poll for status updates.",
        status_endpoint: format!("/api/workflow/{}/status", id),
    })
}

pub async fn workflow_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get(id)
        .await
        .ok_or_else(|| workflow_not_found(id))?;

    let completed = record
        .steps
        .iter()
        .filter(|s| s.status == WorkflowStatus::Completed)
        .count();
    Ok(Json(StatusResponse {
        workflow_id: id,
        status: record.status,
        current_step: record.steps.last().map(|s| s.step),
        progress: completed as f64 / WorkflowStep::COUNT as f64 * 100.0,
        message: format!("Completed {}/{} steps", completed, WorkflowStep::COUNT),
        steps: record.steps,
    }))
}

pub async fn workflow_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get(id)
        .await
        .ok_or_else(|| workflow_not_found(id))?;

    if !record.status.is_terminal() {
        return Err(ApiError::InvalidState(format!(
            "Workflow {} is not completed yet. Current status: {}",
            id, record.status
        )));
    }

    Ok(Json(WorkflowResponse {
        workflow_id: id,
        status: record.status,
        steps: record.steps,
        final_result: record.final_result,
        human_review_required: record.human_review_required,
        total_execution_time: record.total_execution_time,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }))
}

pub async fn workflow_steps(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StepsResponse>, ApiError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get(id)
        .await
        .ok_or_else(|| workflow_not_found(id))?;

    let completed = record
        .steps
        .iter()
        .filter(|s| s.status == WorkflowStatus::Completed)
        .count();
    let failed = record
        .steps
        .iter()
        .filter(|s| s.status == WorkflowStatus::Failed)
        .count();
    Ok(Json(StepsResponse {
        workflow_id: id,
        total_steps: record.steps.len(),
        completed_steps: completed,
        failed_steps: failed,
        steps: record.steps,
    }))
}

pub async fn cancel_workflow(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, ApiError> {
    let id = parse_id(&id)?;
    let record = state
        .store
        .get(id)
        .await
        .ok_or_else(|| workflow_not_found(id))?;

    if record.status.is_terminal() {
        return Err(ApiError::InvalidState(format!(
            "Cannot cancel workflow {}. Current status: {}",
            id, record.status
        )));
    }

    state.engine.cancel(id).await;
    Ok(Json(json!({
        "workflow_id": id,
        "message": "Workflow cancelled successfully",
    })))
}

pub async fn list_workflows(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    let workflows: Vec<WorkflowSummary> = state
        .store
        .list()
        .await
        .into_iter()
        .map(|w| WorkflowSummary {
            workflow_id: w.id,
            status: w.status,
            created_at: w.created_at,
            updated_at: w.updated_at,
            human_review_required: w.human_review_required,
        })
        .collect();
    let total = workflows.len();
    Json(ListResponse { workflows, total })
}

pub async fn health() -> Json<JsonValue> {
    Json(json!({
        "status": "healthy",
        "service": "code-review-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn root() -> Json<JsonValue> {
    Json(json!({
        "message": "Code Review Agent API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/api/health",
    }))
}

pub async fn metrics() -> String {
    crate::metrics::gather_metrics()
}
