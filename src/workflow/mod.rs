//! Workflow module - the budget-constrained planning pipeline.
//!
//! # Key Concepts
//! - Feasibility: deterministic floor check before any model call
//! - Sequencer: six ordered agent stages, each feeding the next
//! - Extractor: tolerant JSON recovery from raw model text
//! - Auditor: deterministic backstop against unreliable model arithmetic
//! - Retry: bounded reruns with a tightened budget on overrun

mod audit;
mod extract;
mod feasibility;
mod request;
mod retry;
mod sequencer;
mod stage;

pub use audit::{audit, RealismAudit, MIN_MEAL_COST, MIN_NIGHTLY};
pub use extract::extract;
pub use feasibility::{
    check_feasibility, Feasibility, MAX_DAILY_PER_PERSON, MIN_DAILY_PER_PERSON,
};
pub use request::{Season, TripRequest};
pub use retry::{
    run, working_budget, BudgetSummary, Destination, FinalPlan, PlanMetadata,
    DEFAULT_MAX_ATTEMPTS, SHRINK_FACTOR,
};
pub use sequencer::{run_attempt, AttemptRecord, Stage};
pub use stage::StageResult;

use thiserror::Error;

/// Errors surfaced by a workflow invocation.
///
/// Parse failures never appear here: unrecoverable model output degrades to
/// a raw-text placeholder inside the pipeline instead of failing it.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A required input was missing or out of range. Pre-flight, never retried.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The stated budget cannot cover the minimum realistic cost.
    /// Pre-flight, no model call is made.
    #[error("budget {budget} cannot cover the minimum realistic cost of {minimum_required} for this trip")]
    Infeasible { budget: u64, minimum_required: u64 },

    /// Every attempt produced an over-budget plan.
    #[error("no plan within budget after {attempts} attempts: final cost {computed_total} against a budget of {budget_limit}")]
    BudgetUnsatisfiable {
        computed_total: u64,
        budget_limit: u64,
        attempts: u32,
    },

    /// A provider or stage error persisted across all retry attempts.
    #[error("workflow failed: {0}")]
    Failed(String),
}

impl WorkflowError {
    /// Whether the caller is at fault (maps to HTTP 400 at the API layer).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Infeasible { .. })
    }
}
