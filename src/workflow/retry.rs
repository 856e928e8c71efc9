//! Retry controller - bounded reruns with a tightened budget.
//!
//! On budget overrun the whole stage sequence reruns under a working
//! budget derived from the ORIGINAL budget (`original * SHRINK_FACTOR^k`
//! after k overruns), never from the previous attempt's already-shrunk
//! value. Provider errors are retried under the same working budget; only
//! after exhausting attempts do they surface.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::agents::{AgentRoster, TaskRunner};

use super::{
    audit, check_feasibility, run_attempt, AttemptRecord, RealismAudit, StageResult, TripRequest,
    WorkflowError,
};

/// Factor applied to the original budget after each over-budget attempt.
pub const SHRINK_FACTOR: f64 = 0.85;

/// Default bound on attempts per invocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Trip parameters echoed into the final plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub generated_at: String,
    pub trip_duration: u32,
    pub travelers: u32,
    pub currency: String,
    pub start_city: String,
    pub attempts: u32,
}

/// Destination choice and supporting research.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub city: String,
    pub selection_reasoning: String,
    pub research: StageResult,
}

/// Budget plan, verification verdict, and the deterministic audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub plan: StageResult,
    pub validation: StageResult,
    pub total_cost: u64,
    pub within_budget: bool,
    /// The caller's original budget, not the shrunk working value.
    pub budget_limit: u64,
    pub realistic: bool,
    pub validation_issues: Vec<String>,
}

/// The sole externally visible artifact of a successful invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalPlan {
    pub metadata: PlanMetadata,
    pub destination: Destination,
    pub transportation: StageResult,
    pub itinerary: StageResult,
    pub budget: BudgetSummary,
    pub recommendations: Vec<Value>,
}

impl FinalPlan {
    fn assemble(
        request: &TripRequest,
        record: AttemptRecord,
        attempts: u32,
        realism: RealismAudit,
    ) -> Self {
        let recommendations = record.validation.array("recommendations").to_vec();
        let total_cost = record.computed_total();
        let within_budget = record.within_budget();

        Self {
            metadata: PlanMetadata {
                generated_at: Utc::now().to_rfc3339(),
                trip_duration: request.duration,
                travelers: request.people,
                currency: request.currency.clone(),
                start_city: request.start_city.clone(),
                attempts,
            },
            destination: Destination {
                city: record.destination_city,
                selection_reasoning: record.city_selection.str_or("reasoning", "").to_string(),
                research: record.research,
            },
            transportation: record.transport,
            itinerary: record.itinerary,
            budget: BudgetSummary {
                plan: record.budget_plan,
                validation: record.validation,
                total_cost,
                within_budget,
                budget_limit: request.budget,
                realistic: realism.realistic,
                validation_issues: realism.issues,
            },
            recommendations,
        }
    }
}

/// Working budget after `shrinks` over-budget attempts, always derived
/// from the original value.
pub fn working_budget(original: u64, shrinks: u32) -> u64 {
    (original as f64 * SHRINK_FACTOR.powi(shrinks as i32)).round() as u64
}

/// Run the full workflow: validate, pre-check feasibility, then attempt
/// the stage sequence up to `max_attempts` times.
pub async fn run(
    runner: &dyn TaskRunner,
    roster: &AgentRoster,
    request: &TripRequest,
    max_attempts: u32,
) -> Result<FinalPlan, WorkflowError> {
    request.validate()?;

    let feasibility = check_feasibility(request);
    if !feasibility.feasible {
        return Err(WorkflowError::Infeasible {
            budget: request.budget,
            minimum_required: feasibility.minimum_required,
        });
    }

    let max_attempts = max_attempts.max(1);
    let original_budget = request.budget;
    let mut shrinks = 0u32;
    let mut last_total = 0u64;

    for attempt in 0..max_attempts {
        let mut working = request.clone();
        working.budget = working_budget(original_budget, shrinks);
        if shrinks > 0 {
            tracing::info!(
                attempt,
                working_budget = working.budget,
                original_budget,
                "retrying with tightened budget"
            );
        }

        let record = match run_attempt(runner, roster, &working, attempt).await {
            Ok(record) => record,
            Err(error) => {
                if attempt + 1 < max_attempts {
                    tracing::warn!(attempt, error = %error, "attempt failed, retrying");
                    continue;
                }
                return Err(WorkflowError::Failed(error.to_string()));
            }
        };

        if record.within_budget() {
            let realism = audit(&record.budget_plan, &working);
            if !realism.realistic {
                tracing::warn!(
                    attempt,
                    issues = realism.issues.len(),
                    "plan accepted with realism issues"
                );
            }
            return Ok(FinalPlan::assemble(request, record, attempt + 1, realism));
        }

        last_total = record.computed_total();
        tracing::warn!(
            attempt,
            computed_total = last_total,
            working_budget = working.budget,
            "plan exceeded budget"
        );
        shrinks += 1;
    }

    Err(WorkflowError::BudgetUnsatisfiable {
        computed_total: last_total,
        budget_limit: original_budget,
        attempts: max_attempts,
    })
}
