//! Route handlers and server setup.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::agents::{AgentRoster, TaskRunnerRef};
use crate::config::Config;
use crate::store::{JobStore, PlanStore};
use crate::workflow::{self, TripRequest, WorkflowError};

use super::types::{JobStatus, ListQuery, PlanResponse};

/// Shared application state behind every handler.
pub struct AppState {
    pub config: Config,
    pub runner: TaskRunnerRef,
    pub roster: AgentRoster,
    pub jobs: JobStore,
    pub plans: PlanStore,
}

impl AppState {
    pub fn new(config: Config, runner: TaskRunnerRef) -> Self {
        let plans = PlanStore::new(config.plans_dir.clone());
        Self {
            config,
            runner,
            roster: AgentRoster::new(),
            jobs: JobStore::new(),
            plans,
        }
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/plan", post(create_plan))
        .route("/plan/sync", post(create_plan_sync))
        .route("/plan/:id", get(get_plan).delete(delete_plan))
        .route("/plans", get(list_plans))
        .route("/job/:id", get(get_job))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve the API until shutdown.
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "itinera API listening");
    axum::serve(listener, router(Arc::new(state))).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Itinera Travel Planner",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /plan": "Create travel plan (async)",
            "POST /plan/sync": "Create travel plan (sync)",
            "GET /plan/{plan_id}": "Get plan by ID",
            "GET /job/{job_id}": "Check job status",
        },
    }))
}

/// Submit a plan request for background generation. Returns 202 with a
/// job id to poll.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TripRequest>,
) -> Result<(StatusCode, Json<JobStatus>), (StatusCode, String)> {
    request
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let status = state.jobs.create().await;
    tracing::info!(job_id = %status.job_id, start_city = %request.start_city, "plan job queued");

    let worker_state = Arc::clone(&state);
    let job_id = status.job_id;
    tokio::spawn(async move {
        generate_plan(worker_state, job_id, request).await;
    });

    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// Background worker: run the workflow, persist the plan, settle the job.
async fn generate_plan(state: Arc<AppState>, job_id: Uuid, request: TripRequest) {
    state.jobs.mark_processing(job_id).await;

    let outcome = workflow::run(
        state.runner.as_ref(),
        &state.roster,
        &request,
        state.config.max_attempts,
    )
    .await;

    match outcome {
        Ok(plan) => match state.plans.insert(&plan).await {
            Ok(record) => {
                tracing::info!(%job_id, plan_id = %record.plan_id, "plan job completed");
                state.jobs.complete(job_id, record.plan_id).await;
            }
            Err(error) => {
                tracing::error!(%job_id, %error, "failed to persist plan");
                state
                    .jobs
                    .fail(job_id, format!("failed to persist plan: {error}"))
                    .await;
            }
        },
        Err(error) => {
            tracing::warn!(%job_id, %error, "plan job failed");
            state.jobs.fail(job_id, error.to_string()).await;
        }
    }
}

/// Run the workflow in the caller's request. May take tens of seconds.
pub async fn create_plan_sync(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TripRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    let plan = workflow::run(
        state.runner.as_ref(),
        &state.roster,
        &request,
        state.config.max_attempts,
    )
    .await
    .map_err(error_response)?;

    let record = state
        .plans
        .insert(&plan)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(record))
}

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatus>, (StatusCode, String)> {
    state
        .jobs
        .get(job_id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Job not found".to_string()))
}

pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    state
        .plans
        .get(plan_id)
        .await
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))
}

pub async fn list_plans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<PlanResponse>> {
    Json(state.plans.recent(query.limit).await)
}

pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Path(plan_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state
        .plans
        .remove(plan_id)
        .await
        .map(|_| Json(json!({"message": "Plan deleted", "plan_id": plan_id})))
        .ok_or((StatusCode::NOT_FOUND, "Plan not found".to_string()))
}

/// Map workflow failures onto HTTP statuses; internal detail stays out of
/// the response body.
fn error_response(error: WorkflowError) -> (StatusCode, String) {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, error.to_string())
}
