//! End-to-end workflow scenarios against a scripted provider.

mod common;

use common::{
    attempt_replies, comfortable_request, impossible_request, FailingRunner, ScriptedRunner,
};
use itinera::agents::AgentRoster;
use itinera::workflow::{self, WorkflowError};

#[tokio::test]
async fn impossible_budget_fails_before_any_model_call() {
    let runner = ScriptedRunner::new(Vec::new());
    let roster = AgentRoster::new();

    let error = workflow::run(&runner, &roster, &impossible_request(), 3)
        .await
        .unwrap_err();

    match error {
        WorkflowError::Infeasible {
            budget,
            minimum_required,
        } => {
            assert_eq!(budget, 500);
            // 2 people x 4 days x 1500
            assert_eq!(minimum_required, 12_000);
        }
        other => panic!("expected Infeasible, got {other:?}"),
    }
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn comfortable_budget_completes_in_one_attempt() {
    let runner = ScriptedRunner::new(attempt_replies("Jaipur", 43_000, true));
    let roster = AgentRoster::new();
    let request = comfortable_request();

    let plan = workflow::run(&runner, &roster, &request, 3).await.unwrap();

    assert_eq!(runner.call_count(), 6);
    assert_eq!(plan.metadata.attempts, 1);
    assert_eq!(plan.metadata.travelers, 2);
    assert_eq!(plan.destination.city, "Jaipur");
    assert!(plan.budget.within_budget);
    assert_eq!(plan.budget.total_cost, 43_000);
    assert_eq!(plan.budget.budget_limit, 50_000);
    assert!(plan.budget.realistic);
    assert_eq!(plan.recommendations.len(), 1);
}

#[tokio::test]
async fn over_budget_attempt_retries_with_budget_shrunk_from_the_original() {
    let mut replies = attempt_replies("Jaipur", 61_000, false);
    replies.extend(attempt_replies("Jaipur", 41_000, true));
    let runner = ScriptedRunner::new(replies);
    let roster = AgentRoster::new();

    let plan = workflow::run(&runner, &roster, &comfortable_request(), 3)
        .await
        .unwrap();

    assert_eq!(runner.call_count(), 12);
    assert_eq!(plan.metadata.attempts, 2);
    // The caller-facing limit stays the original budget.
    assert_eq!(plan.budget.budget_limit, 50_000);

    // The second attempt's stage-1 prompt carried 50000 * 0.85.
    let descriptions = runner.descriptions.lock().unwrap();
    assert!(descriptions[0].contains("Budget: 50000 INR"));
    assert!(descriptions[6].contains("Budget: 42500 INR"));
}

#[tokio::test]
async fn exhausted_attempts_cite_the_original_budget_and_final_total() {
    let mut replies = attempt_replies("Jaipur", 61_000, false);
    replies.extend(attempt_replies("Jaipur", 58_000, false));
    let runner = ScriptedRunner::new(replies);
    let roster = AgentRoster::new();

    let error = workflow::run(&runner, &roster, &comfortable_request(), 2)
        .await
        .unwrap_err();

    match error {
        WorkflowError::BudgetUnsatisfiable {
            computed_total,
            budget_limit,
            attempts,
        } => {
            assert_eq!(computed_total, 58_000);
            assert_eq!(budget_limit, 50_000);
            assert_eq!(attempts, 2);
        }
        other => panic!("expected BudgetUnsatisfiable, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_failure_is_retried_then_surfaced() {
    let runner = FailingRunner;
    let roster = AgentRoster::new();

    let error = workflow::run(&runner, &roster, &comfortable_request(), 3)
        .await
        .unwrap_err();

    match error {
        WorkflowError::Failed(message) => {
            assert!(message.contains("select_city"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_input_is_rejected_without_model_calls() {
    let runner = ScriptedRunner::new(Vec::new());
    let roster = AgentRoster::new();
    let mut request = comfortable_request();
    request.people = 0;

    let error = workflow::run(&runner, &roster, &request, 3)
        .await
        .unwrap_err();

    assert!(matches!(error, WorkflowError::InvalidInput(_)));
    assert_eq!(runner.call_count(), 0);
}

#[tokio::test]
async fn unrealistic_accepted_plan_carries_advisory_issues() {
    // Within budget but absurdly cheap: floors flag it, plan still returns.
    let mut replies = attempt_replies("Jaipur", 2_000, true);
    replies[4] = r#"{"accommodation": [{"cost": 300}], "meals": [{"cost": 200}],
                     "total_estimated_cost": 2000}"#
        .to_string();
    let runner = ScriptedRunner::new(replies);
    let roster = AgentRoster::new();

    let plan = workflow::run(&runner, &roster, &comfortable_request(), 3)
        .await
        .unwrap();

    assert!(plan.budget.within_budget);
    assert!(!plan.budget.realistic);
    assert_eq!(plan.budget.validation_issues.len(), 3);
}
