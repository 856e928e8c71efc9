//! Request and response schemas for the HTTP API.
//!
//! The plan request body deserializes directly into
//! [`crate::workflow::TripRequest`]; the types here cover responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Lifecycle of a plan-generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Status record for one background job.
#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub job_id: Uuid,
    pub status: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// Summary record for one completed plan, with the full plan embedded.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub plan_id: Uuid,
    pub status: String,
    pub destination: String,
    pub total_cost: u64,
    pub budget_limit: u64,
    pub within_budget: bool,
    pub created_at: String,
    pub plan_data: Value,
}

fn default_limit() -> usize {
    10
}

/// Query parameters for the plan listing endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}
