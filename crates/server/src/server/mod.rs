mod routes;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{config::Config, store::WorkflowStore, workflow::WorkflowEngine, Result};

pub struct AppState {
    pub store: Arc<dyn WorkflowStore>,
    pub engine: Arc<WorkflowEngine>,
}

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(_config: &Config, store: Arc<dyn WorkflowStore>, engine: Arc<WorkflowEngine>) -> Self {
        Self {
            state: Arc::new(AppState { store, engine }),
        }
    }

    pub fn build_router(&self) -> Router {
        let api = Router::new()
            .route("/workflow/start", post(routes::start_workflow))
            .route("/workflow/{id}/status", get(routes::workflow_status))
            .route("/workflow/{id}/result", get(routes::workflow_result))
            .route("/workflow/{id}/steps", get(routes::workflow_steps))
            .route("/workflow/{id}", delete(routes::cancel_workflow))
            .route("/workflows", get(routes::list_workflows))
            .route("/health", get(routes::health));

        Router::new()
            .route("/", get(routes::root))
            .route("/metrics", get(routes::metrics))
            .nest("/api", api)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    pub async fn start(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Listening on {}", addr);
        axum::serve(listener, self.build_router()).await?;
        Ok(())
    }
}
