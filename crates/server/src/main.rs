use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use code_review_server::{
    agent::{AgentSuite, StubAgentSuite},
    config::Config,
    server::Server,
    store::{MemoryStore, WorkflowStore},
    workflow::WorkflowEngine,
    Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    let store: Arc<dyn WorkflowStore> = Arc::new(MemoryStore::new());
    let agents: Arc<dyn AgentSuite> = Arc::new(StubAgentSuite::new());
    let engine = Arc::new(WorkflowEngine::new(store.clone(), agents));

    let server = Server::new(&config, store, engine);

    info!("Starting server on {}", config.server.addr);
    server.start(&config.server.addr).await
}
