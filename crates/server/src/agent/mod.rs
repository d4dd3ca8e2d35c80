//! Pipeline agents.
//!
//! Each pipeline step is an independent asynchronous agent behind the
//! [`AgentSuite`] contract. Real implementations are expected to call an
//! LLM backend; [`StubAgentSuite`] stands in with canned payloads until
//! they exist.

mod result;
mod stub;
mod suite;

pub use result::{ArchitectResult, ReviewResult, RoutingResult, TestCase, TestGenerationResult};
pub use stub::StubAgentSuite;
pub use suite::AgentSuite;

#[cfg(test)]
pub use suite::MockAgentSuite;
