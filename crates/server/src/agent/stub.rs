use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use tokio::time::sleep;
use tracing::info;

use super::{
    AgentSuite, ArchitectResult, ReviewResult, RoutingResult, TestCase, TestGenerationResult,
};
use crate::store::ReviewRequest;

/// Stand-in agents: each operation sleeps for a fixed duration and returns
/// a canned payload shaped like the real agent's output.
pub struct StubAgentSuite {
    routing_delay: Duration,
    architect_delay: Duration,
    review_delay: Duration,
    test_generation_delay: Duration,
}

impl Default for StubAgentSuite {
    fn default() -> Self {
        Self {
            routing_delay: Duration::from_secs(2),
            architect_delay: Duration::from_secs(3),
            review_delay: Duration::from_secs(4),
            test_generation_delay: Duration::from_secs(5),
        }
    }
}

impl StubAgentSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same canned behavior with one delay for every step. Keeps tests fast.
    pub fn with_uniform_delay(delay: Duration) -> Self {
        Self {
            routing_delay: delay,
            architect_delay: delay,
            review_delay: delay,
            test_generation_delay: delay,
        }
    }
}

#[async_trait]
impl AgentSuite for StubAgentSuite {
    async fn route(&self, request: &ReviewRequest) -> Result<RoutingResult> {
        info!("Routing PR described by {}", request.input_file);
        sleep(self.routing_delay).await;

        Ok(RoutingResult {
            is_easy: true,
            reason: "PR contains simple bug fixes and follows established patterns".to_string(),
            confidence: Some(0.85),
        })
    }

    async fn analyze_architecture(&self, request: &ReviewRequest) -> Result<ArchitectResult> {
        info!("Analyzing architecture of {}", request.repo_path);
        sleep(self.architect_delay).await;

        Ok(ArchitectResult {
            architect_info: json!({
                "files_affected": 3,
                "complexity_score": 0.6,
                "architectural_impact": "low",
            }),
            kd_graph: json!({
                "nodes": 15,
                "edges": 25,
                "centrality_scores": {},
            }),
            file_function_map: json!({
                "file1.py": ["function1", "function2"],
                "file2.py": ["function3"],
            }),
        })
    }

    async fn review_code(
        &self,
        request: &ReviewRequest,
        _architecture: &ArchitectResult,
    ) -> Result<ReviewResult> {
        info!("Reviewing changes in {}", request.repo_path);
        sleep(self.review_delay).await;

        Ok(ReviewResult {
            overall_good: true,
            reasons: vec![
                "Code follows style guidelines".to_string(),
                "No security vulnerabilities detected".to_string(),
                "Proper error handling implemented".to_string(),
            ],
            issues: Vec::new(),
        })
    }

    async fn generate_tests(
        &self,
        request: &ReviewRequest,
        _architecture: &ArchitectResult,
    ) -> Result<TestGenerationResult> {
        info!("Generating tests for {}", request.repo_path);
        sleep(self.test_generation_delay).await;

        Ok(TestGenerationResult {
            new_test_cases: vec![
                TestCase {
                    test_name: "test_function1_edge_case".to_string(),
                    test_code: "def test_function1_edge_case():\n    # Test implementation"
                        .to_string(),
                    coverage_type: "edge_case".to_string(),
                },
                TestCase {
                    test_name: "test_function2_error_handling".to_string(),
                    test_code: "def test_function2_error_handling():\n    # Test implementation"
                        .to_string(),
                    coverage_type: "error_handling".to_string(),
                },
            ],
            coverage_improvement: Some(0.15),
        })
    }
}
