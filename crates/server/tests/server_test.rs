use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use code_review_server::{
    agent::{AgentSuite, StubAgentSuite},
    config::Config,
    server::Server,
    store::{MemoryStore, WorkflowStore},
    workflow::WorkflowEngine,
};
use serde_json::{json, Value};

fn test_server(step_delay: Duration) -> axum_test::TestServer {
    let store: Arc<dyn WorkflowStore> = Arc::new(MemoryStore::new());
    let agents: Arc<dyn AgentSuite> = Arc::new(StubAgentSuite::with_uniform_delay(step_delay));
    let engine = Arc::new(WorkflowEngine::new(store.clone(), agents));
    let server = Server::new(&Config::default(), store, engine);
    axum_test::TestServer::new(server.build_router()).unwrap()
}

fn start_payload() -> Value {
    json!({
        "input_file": "data/code_review_data/pydata__xarray-6992_problem_statement.txt",
        "repo_root": "PR_repos",
        "repo_path": "PR_repos/xarray",
        "module_path": "xarray",
    })
}

async fn start_workflow(client: &axum_test::TestServer) -> String {
    let response = client.post("/api/workflow/start").json(&start_payload()).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        body["status_endpoint"],
        format!("/api/workflow/{}/status", body["workflow_id"].as_str().unwrap())
    );
    body["workflow_id"].as_str().unwrap().to_string()
}

async fn wait_until_terminal(client: &axum_test::TestServer, id: &str) -> Value {
    for _ in 0..500 {
        let response = client.get(&format!("/api/workflow/{}/status", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        match body["status"].as_str().unwrap() {
            "pending" | "running" => tokio::time::sleep(Duration::from_millis(10)).await,
            _ => return body,
        }
    }
    panic!("workflow {} never reached a terminal status", id);
}

#[tokio::test]
async fn health_and_root_endpoints() {
    let client = test_server(Duration::from_millis(10));

    let response = client.get("/api/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "code-review-server");

    let response = client.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["health"], "/api/health");
}

#[tokio::test]
async fn workflow_runs_to_completion() {
    let client = test_server(Duration::from_millis(10));
    let id = start_workflow(&client).await;

    let status = wait_until_terminal(&client, &id).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["progress"], 100.0);
    assert_eq!(status["current_step"], "test_generation");
    assert_eq!(status["message"], "Completed 4/4 steps");

    let response = client.get(&format!("/api/workflow/{}/result", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let result: Value = response.json();
    assert_eq!(result["status"], "completed");
    assert_eq!(result["human_review_required"], false);
    assert!(result["total_execution_time"].as_f64().unwrap() > 0.0);
    let steps = result["steps"].as_array().unwrap();
    let order: Vec<_> = steps.iter().map(|s| s["step"].as_str().unwrap()).collect();
    assert_eq!(order, ["routing", "architect", "review", "test_generation"]);
    for step in steps {
        assert_eq!(step["status"], "completed");
        assert!(step["execution_time"].as_f64().unwrap() > 0.0);
    }
    for key in ["routing", "architect", "review", "test_generation"] {
        assert!(
            result["final_result"].get(key).is_some(),
            "final result is missing the {key} payload"
        );
    }

    let response = client.get(&format!("/api/workflow/{}/steps", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total_steps"], 4);
    assert_eq!(body["completed_steps"], 4);
    assert_eq!(body["failed_steps"], 0);

    let response = client.get("/metrics").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("codereview_workflows_started_total"));
}

#[tokio::test]
async fn result_is_rejected_until_the_workflow_finishes() {
    let client = test_server(Duration::from_secs(2));
    let id = start_workflow(&client).await;

    // Nothing has completed yet: zero progress, not terminal.
    let response = client.get(&format!("/api/workflow/{}/status", id)).await;
    let status: Value = response.json();
    assert!(matches!(
        status["status"].as_str().unwrap(),
        "pending" | "running"
    ));
    assert_eq!(status["progress"], 0.0);
    assert!(status["current_step"].is_null());

    let response = client.get(&format!("/api/workflow/{}/result", id)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("is not completed yet"));
}

#[tokio::test]
async fn unknown_ids_yield_not_found() {
    let client = test_server(Duration::from_millis(10));
    let missing = "00000000-0000-0000-0000-000000000000";

    for path in [
        format!("/api/workflow/{}/status", missing),
        format!("/api/workflow/{}/result", missing),
        format!("/api/workflow/{}/steps", missing),
    ] {
        let response = client.get(&path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    let response = client.delete(&format!("/api/workflow/{}", missing)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    // A malformed id is just an unknown workflow to callers.
    let response = client.get("/api/workflow/not-a-uuid/status").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancel_stops_a_running_workflow_for_good() {
    let client = test_server(Duration::from_millis(300));
    let id = start_workflow(&client).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    let response = client.delete(&format!("/api/workflow/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "Workflow cancelled successfully");

    // A second cancel hits an already-terminal workflow.
    let response = client.delete(&format!("/api/workflow/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    // Give the background task time to notice the flag and wind down; the
    // cancelled status must not be overwritten by a late outcome.
    tokio::time::sleep(Duration::from_millis(800)).await;
    let response = client.get(&format!("/api/workflow/{}/status", id)).await;
    let status: Value = response.json();
    assert_eq!(status["status"], "failed");
    assert!(status["steps"].as_array().unwrap().len() <= 1);
}

#[tokio::test]
async fn list_reports_every_known_workflow() {
    let client = test_server(Duration::from_millis(10));
    let first = start_workflow(&client).await;
    let second = start_workflow(&client).await;
    wait_until_terminal(&client, &first).await;
    wait_until_terminal(&client, &second).await;

    let response = client.get("/api/workflows").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["total"], 2);
    let ids: Vec<_> = body["workflows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["workflow_id"].as_str().unwrap().to_string())
        .collect();
    assert!(ids.contains(&first));
    assert!(ids.contains(&second));
}
