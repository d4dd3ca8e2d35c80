use anyhow::Result;
use async_trait::async_trait;

use super::result::{ArchitectResult, ReviewResult, RoutingResult, TestGenerationResult};
use crate::store::ReviewRequest;

/// The four pipeline operations behind one contract.
///
/// The engine only sees this trait, so the stub suite, a real LLM-backed
/// suite or a test mock can be swapped in without touching orchestration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentSuite: Send + Sync {
    /// Decide whether the PR is simple enough for the automated pipeline.
    async fn route(&self, request: &ReviewRequest) -> Result<RoutingResult>;

    /// Analyze the architectural impact of the change.
    async fn analyze_architecture(&self, request: &ReviewRequest) -> Result<ArchitectResult>;

    /// Review the code, guided by the architecture analysis.
    async fn review_code(
        &self,
        request: &ReviewRequest,
        architecture: &ArchitectResult,
    ) -> Result<ReviewResult>;

    /// Propose new test cases covering the change.
    async fn generate_tests(
        &self,
        request: &ReviewRequest,
        architecture: &ArchitectResult,
    ) -> Result<TestGenerationResult>;
}
