//! Budget realism auditor - deterministic backstop for model arithmetic.
//!
//! Model-computed sums are unreliable: a plan can claim a five-night stay
//! for less than the cheapest dormitory bed. This pass recomputes floor
//! values per category and flags any reported sum below them. Issues are
//! advisory only; the audit never blocks the pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::feasibility::MIN_DAILY_PER_PERSON;
use super::stage::number_of;
use super::{StageResult, TripRequest};

/// Minimum plausible nightly accommodation cost per room.
pub const MIN_NIGHTLY: u64 = 500;

/// Minimum plausible cost of one meal per person.
pub const MIN_MEAL_COST: u64 = 100;

const MEALS_PER_DAY: u64 = 3;

/// Outcome of the realism audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealismAudit {
    pub realistic: bool,
    pub issues: Vec<String>,
}

/// Audit an LLM-produced budget plan against deterministic floors.
///
/// Categories absent from the plan are skipped; the contract with the
/// budget agent is advisory only. Deterministic and idempotent.
pub fn audit(plan: &StageResult, request: &TripRequest) -> RealismAudit {
    let mut issues = Vec::new();

    let people = u64::from(request.people);
    let duration = u64::from(request.duration);
    let currency = &request.currency;

    let total_floor = people * duration * MIN_DAILY_PER_PERSON;
    if let Some(total) = plan.get("total_estimated_cost").and_then(number_of) {
        if (total as u64) < total_floor {
            issues.push(format!(
                "reported total {:.0} {currency} is below the realistic minimum of {total_floor} {currency} for {people} people over {duration} days",
                total
            ));
        }
    }

    let accommodation_floor = duration * MIN_NIGHTLY;
    if let Some(sum) = plan.get("accommodation").and_then(category_sum) {
        if (sum as u64) < accommodation_floor {
            issues.push(format!(
                "reported accommodation total {sum:.0} {currency} is below the realistic minimum of {accommodation_floor} {currency} for {duration} nights"
            ));
        }
    }

    let meals_floor = people * duration * MEALS_PER_DAY * MIN_MEAL_COST;
    if let Some(sum) = plan.get("meals").and_then(category_sum) {
        if (sum as u64) < meals_floor {
            issues.push(format!(
                "reported meals total {sum:.0} {currency} is below the realistic minimum of {meals_floor} {currency} for {people} people over {duration} days"
            ));
        }
    }

    RealismAudit {
        realistic: issues.is_empty(),
        issues,
    }
}

/// Sum a category however the model reported it: a bare number, an object
/// with a cost-like field, or an array of either.
fn category_sum(value: &Value) -> Option<f64> {
    match value {
        Value::Array(items) => {
            let mut sum = 0.0;
            let mut found = false;
            for item in items {
                if let Some(n) = entry_cost(item) {
                    sum += n;
                    found = true;
                }
            }
            found.then_some(sum)
        }
        other => entry_cost(other),
    }
}

fn entry_cost(value: &Value) -> Option<f64> {
    if let Some(n) = number_of(value) {
        return Some(n);
    }
    let object = value.as_object()?;
    for key in ["cost", "amount", "price", "total"] {
        if let Some(n) = object.get(key).and_then(number_of) {
            return Some(n);
        }
    }
    None
}
