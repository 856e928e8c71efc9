//! Stage sequencer - six ordered agent stages per attempt.
//!
//! # Stage order
//! ```text
//! SelectCity -> ResearchCity -> PlanTransport -> PlanItinerary
//!            -> PlanBudget -> CheckBudget -> Done
//! ```
//! Stage N+1's task is built from the accumulated outputs of all prior
//! stages, so stages run strictly sequentially within one attempt. A
//! provider error aborts the attempt; malformed output does not (the
//! extractor degrades it to a raw-text placeholder instead).

use anyhow::Context;

use crate::agents::{AgentProfile, AgentRoster, TaskRunner};
use crate::tasks;

use super::{extract, StageResult, TripRequest};

/// The six sequential stages of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SelectCity,
    ResearchCity,
    PlanTransport,
    PlanItinerary,
    PlanBudget,
    CheckBudget,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SelectCity => "select_city",
            Self::ResearchCity => "research_city",
            Self::PlanTransport => "plan_transport",
            Self::PlanItinerary => "plan_itinerary",
            Self::PlanBudget => "plan_budget",
            Self::CheckBudget => "check_budget",
        };
        write!(f, "{name}")
    }
}

/// Frozen outputs of one full attempt. Later attempts never mutate
/// records produced by earlier ones.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// 0-indexed attempt number.
    pub attempt: u32,
    /// Budget this attempt ran under (possibly shrunk from the original).
    pub working_budget: u64,
    pub destination_city: String,
    pub city_selection: StageResult,
    pub research: StageResult,
    pub transport: StageResult,
    pub itinerary: StageResult,
    pub budget_plan: StageResult,
    pub validation: StageResult,
}

impl AttemptRecord {
    /// Verdict of the budget-check stage; absent means over budget.
    pub fn within_budget(&self) -> bool {
        self.validation.bool_or("within_budget", false)
    }

    /// Verified total, falling back to the planner's own estimate.
    pub fn computed_total(&self) -> u64 {
        let planned = self.budget_plan.u64_or("total_estimated_cost", 0);
        self.validation.u64_or("computed_total", planned)
    }
}

/// Run all six stages in order and assemble the attempt record.
pub async fn run_attempt(
    runner: &dyn TaskRunner,
    roster: &AgentRoster,
    request: &TripRequest,
    attempt: u32,
) -> anyhow::Result<AttemptRecord> {
    let mut request = request.clone();

    let city_selection = run_stage(
        runner,
        Stage::SelectCity,
        &roster.city_selector,
        tasks::choose_city(&request),
        attempt,
    )
    .await?;
    let destination_city = city_selection.str_or("destination_city", "Unknown").to_string();
    request.destination_city = Some(destination_city.clone());
    tracing::info!(attempt, city = %destination_city, "destination selected");

    let research = run_stage(
        runner,
        Stage::ResearchCity,
        &roster.local_expert,
        tasks::research_city(&destination_city, &request),
        attempt,
    )
    .await?;

    let transport = run_stage(
        runner,
        Stage::PlanTransport,
        &roster.transport,
        tasks::plan_transport(&request, &destination_city),
        attempt,
    )
    .await?;

    let itinerary = run_stage(
        runner,
        Stage::PlanItinerary,
        &roster.itinerary_planner,
        tasks::plan_itinerary(&request, &destination_city, &research),
        attempt,
    )
    .await?;

    let budget_plan = run_stage(
        runner,
        Stage::PlanBudget,
        &roster.budget_manager,
        tasks::plan_budget(&request, &destination_city, &itinerary),
        attempt,
    )
    .await?;

    let validation = run_stage(
        runner,
        Stage::CheckBudget,
        &roster.budget_checker,
        tasks::check_budget(&request, &destination_city, &budget_plan),
        attempt,
    )
    .await?;

    Ok(AttemptRecord {
        attempt,
        working_budget: request.budget,
        destination_city,
        city_selection,
        research,
        transport,
        itinerary,
        budget_plan,
        validation,
    })
}

/// Delegate one stage to its agent and extract the structured output.
async fn run_stage(
    runner: &dyn TaskRunner,
    stage: Stage,
    profile: &AgentProfile,
    task: tasks::TaskSpec,
    attempt: u32,
) -> anyhow::Result<StageResult> {
    tracing::debug!(attempt, stage = %stage, role = profile.role, "stage starting");

    let raw = runner
        .run_task(profile, &task)
        .await
        .with_context(|| format!("stage '{stage}' failed"))?;

    let result = extract(&raw);
    if result.is_fallback() {
        tracing::warn!(attempt, stage = %stage, "stage output degraded to raw text");
    } else {
        tracing::info!(attempt, stage = %stage, "stage complete");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::Season;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedRunner {
        replies: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedRunner {
        fn new(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().map(String::from).collect()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TaskRunner for ScriptedRunner {
        async fn run_task(
            &self,
            _profile: &crate::agents::AgentProfile,
            _task: &tasks::TaskSpec,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| anyhow::anyhow!("no scripted reply left"))
        }
    }

    fn request() -> TripRequest {
        TripRequest {
            interests: "culture, food, history".to_string(),
            budget: 50_000,
            duration: 5,
            start_city: "Mumbai".to_string(),
            season: Season::Winter,
            people: 2,
            currency: "INR".to_string(),
            destination_city: None,
        }
    }

    #[tokio::test]
    async fn six_stages_run_in_order_and_thread_outputs() {
        let runner = ScriptedRunner::new(vec![
            r#"```json
{"destination_city": "Jaipur", "reasoning": "affordable by train"}
```"#,
            r#"{"attractions": ["Hawa Mahal"], "cuisine": ["dal baati"]}"#,
            r#"{"long_distance_options": ["train"], "local_transport_options": ["auto"]}"#,
            r#"{"itinerary": [{"day": 1, "activities": []}]}"#,
            r#"{"accommodation": [{"cost": 10000}], "meals": [{"cost": 9000}], "total_estimated_cost": 43000}"#,
            r#"{"computed_total": 43000, "within_budget": true, "recommendations": []}"#,
        ]);

        let roster = AgentRoster::new();
        let record = run_attempt(&runner, &roster, &request(), 0).await.unwrap();

        assert_eq!(runner.calls.load(Ordering::SeqCst), 6);
        assert_eq!(record.destination_city, "Jaipur");
        assert!(record.within_budget());
        assert_eq!(record.computed_total(), 43_000);
        assert_eq!(record.working_budget, 50_000);
    }

    #[tokio::test]
    async fn malformed_stage_output_degrades_but_does_not_abort() {
        let runner = ScriptedRunner::new(vec![
            "no json here at all",
            r#"{"attractions": []}"#,
            r#"{"long_distance_options": []}"#,
            r#"{"itinerary": []}"#,
            r#"{"total_estimated_cost": 60000}"#,
            r#"{"computed_total": 60000, "within_budget": false}"#,
        ]);

        let roster = AgentRoster::new();
        let record = run_attempt(&runner, &roster, &request(), 0).await.unwrap();

        // City selection fell back, so downstream stages saw "Unknown".
        assert!(record.city_selection.is_fallback());
        assert_eq!(record.destination_city, "Unknown");
        assert!(!record.within_budget());
    }

    #[tokio::test]
    async fn provider_error_aborts_the_attempt() {
        let runner = ScriptedRunner::new(vec![r#"{"destination_city": "Goa"}"#]);
        let roster = AgentRoster::new();
        let error = run_attempt(&runner, &roster, &request(), 0)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("research_city"));
    }

    #[tokio::test]
    async fn validation_total_falls_back_to_planner_estimate() {
        let runner = ScriptedRunner::new(vec![
            r#"{"destination_city": "Goa"}"#,
            r#"{"attractions": []}"#,
            r#"{"long_distance_options": []}"#,
            r#"{"itinerary": []}"#,
            r#"{"total_estimated_cost": 48000}"#,
            r#"{"within_budget": true}"#,
        ]);
        let roster = AgentRoster::new();
        let record = run_attempt(&runner, &roster, &request(), 0).await.unwrap();
        assert_eq!(record.computed_total(), 48_000);
    }
}
