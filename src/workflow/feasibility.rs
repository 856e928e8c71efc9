//! Deterministic budget feasibility pre-check.
//!
//! Runs before any model call so impossible requests never spend an LLM
//! invocation. Only the floor blocks execution; the ceiling is advisory.

use super::TripRequest;

/// Minimum realistic cost per person per day, in currency units.
pub const MIN_DAILY_PER_PERSON: u64 = 1_500;

/// Generous ceiling per person per day; beyond this the budget is likely a typo.
pub const MAX_DAILY_PER_PERSON: u64 = 50_000;

/// Outcome of the pre-check.
#[derive(Debug, Clone)]
pub struct Feasibility {
    pub feasible: bool,
    /// The computed floor: `people * duration * MIN_DAILY_PER_PERSON`.
    pub minimum_required: u64,
    pub message: Option<String>,
}

/// Check whether the stated budget can possibly cover the trip.
pub fn check_feasibility(request: &TripRequest) -> Feasibility {
    let person_days = u64::from(request.people) * u64::from(request.duration);
    let minimum_required = person_days * MIN_DAILY_PER_PERSON;

    if request.budget < minimum_required {
        return Feasibility {
            feasible: false,
            minimum_required,
            message: Some(format!(
                "budget {} is below the minimum realistic cost of {} for {} people over {} days",
                request.budget, minimum_required, request.people, request.duration
            )),
        };
    }

    let generous_ceiling = person_days * MAX_DAILY_PER_PERSON;
    if request.budget > generous_ceiling {
        tracing::warn!(
            budget = request.budget,
            ceiling = generous_ceiling,
            "budget far exceeds a realistic ceiling; proceeding anyway"
        );
    }

    Feasibility {
        feasible: true,
        minimum_required,
        message: None,
    }
}
