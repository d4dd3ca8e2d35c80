//! Typed agent outputs, one per pipeline step.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Verdict from the routing agent: whether the PR is simple enough for the
/// automated pipeline or has to go to a human reviewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingResult {
    pub is_easy: bool,
    pub reason: String,
    pub confidence: Option<f32>,
}

/// Architecture analysis of the change: impact summary, knowledge graph
/// shape and the file-to-function map the later steps consult.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchitectResult {
    pub architect_info: JsonValue,
    pub kd_graph: JsonValue,
    pub file_function_map: JsonValue,
}

/// Verdict from the code review agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResult {
    pub overall_good: bool,
    pub reasons: Vec<String>,
    #[serde(default)]
    pub issues: Vec<JsonValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub test_name: String,
    pub test_code: String,
    pub coverage_type: String,
}

/// New test cases proposed for the change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestGenerationResult {
    pub new_test_cases: Vec<TestCase>,
    pub coverage_improvement: Option<f32>,
}
