//! Agents module - fixed-role task execution against a language model.
//!
//! # Design
//! - Each workflow stage delegates to exactly one [`AgentProfile`]
//! - [`TaskRunner`] is the opaque provider boundary: prompt text in, raw
//!   model text out; the workflow never assumes the reply is valid JSON
//! - [`LlmTaskRunner`] is the production implementation over [`LlmClient`];
//!   tests substitute scripted runners

mod profiles;
mod runner;

pub use profiles::{AgentProfile, AgentRoster};
pub use runner::LlmTaskRunner;

use std::sync::Arc;

use async_trait::async_trait;

use crate::tasks::TaskSpec;

/// Reference to a task runner (thread-safe shared pointer).
pub type TaskRunnerRef = Arc<dyn TaskRunner>;

/// Boundary to the external agent/task provider.
///
/// # Invariants
/// - `run_task()` never panics; provider failures are returned as `Err`
/// - The returned text is unstructured and may or may not contain JSON
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Execute one task under the given role and return the raw reply text.
    async fn run_task(&self, profile: &AgentProfile, task: &TaskSpec) -> anyhow::Result<String>;
}
