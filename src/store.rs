//! Job and plan registries plus flat-file plan persistence.
//!
//! Two independent keyed stores, process-lifetime, no eviction: job id ->
//! status record, plan id -> plan record. Every completed plan is also
//! written to disk as one standalone JSON document named by its id.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::types::{JobState, JobStatus, PlanResponse};
use crate::workflow::FinalPlan;

/// In-memory registry of plan-generation jobs.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, JobStatus>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pending job and return its initial status record.
    pub async fn create(&self) -> JobStatus {
        let status = JobStatus {
            job_id: Uuid::new_v4(),
            status: JobState::Pending,
            message: Some("Plan generation started. Check /job/{job_id} for status.".to_string()),
            plan_id: None,
            error: None,
            created_at: Utc::now().to_rfc3339(),
            completed_at: None,
        };
        self.jobs.write().await.insert(status.job_id, status.clone());
        status
    }

    pub async fn get(&self, job_id: Uuid) -> Option<JobStatus> {
        self.jobs.read().await.get(&job_id).cloned()
    }

    pub async fn mark_processing(&self, job_id: Uuid) {
        if let Some(job) = self.jobs.write().await.get_mut(&job_id) {
            job.status = JobState::Processing;
            job.message = None;
        }
    }

    pub async fn complete(&self, job_id: Uuid, plan_id: Uuid) {
        if let Some(job) = self.jobs.write().await.get_mut(&job_id) {
            job.status = JobState::Completed;
            job.plan_id = Some(plan_id);
            job.completed_at = Some(Utc::now().to_rfc3339());
        }
    }

    pub async fn fail(&self, job_id: Uuid, error: String) {
        if let Some(job) = self.jobs.write().await.get_mut(&job_id) {
            job.status = JobState::Failed;
            job.error = Some(error);
            job.completed_at = Some(Utc::now().to_rfc3339());
        }
    }
}

/// Registry of completed plans with one-file-per-plan persistence.
pub struct PlanStore {
    dir: PathBuf,
    plans: RwLock<HashMap<Uuid, PlanResponse>>,
}

impl PlanStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            plans: RwLock::new(HashMap::new()),
        }
    }

    fn path_for(&self, plan_id: Uuid) -> PathBuf {
        self.dir.join(format!("{plan_id}.json"))
    }

    /// Register a completed plan and write its JSON document to disk.
    pub async fn insert(&self, plan: &FinalPlan) -> anyhow::Result<PlanResponse> {
        let plan_id = Uuid::new_v4();
        let record = PlanResponse {
            plan_id,
            status: "completed".to_string(),
            destination: plan.destination.city.clone(),
            total_cost: plan.budget.total_cost,
            budget_limit: plan.budget.budget_limit,
            within_budget: plan.budget.within_budget,
            created_at: Utc::now().to_rfc3339(),
            plan_data: serde_json::to_value(plan).context("failed to serialize plan")?,
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let document =
            serde_json::to_string_pretty(plan).context("failed to serialize plan document")?;
        tokio::fs::write(self.path_for(plan_id), document)
            .await
            .context("failed to write plan document")?;

        self.plans.write().await.insert(plan_id, record.clone());
        Ok(record)
    }

    pub async fn get(&self, plan_id: Uuid) -> Option<PlanResponse> {
        self.plans.read().await.get(&plan_id).cloned()
    }

    /// The most recently created `limit` plans, oldest first.
    pub async fn recent(&self, limit: usize) -> Vec<PlanResponse> {
        let mut records: Vec<PlanResponse> = self.plans.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        records
    }

    /// Remove a plan from the registry and delete its document.
    pub async fn remove(&self, plan_id: Uuid) -> Option<PlanResponse> {
        let removed = self.plans.write().await.remove(&plan_id);
        if removed.is_some() {
            if let Err(error) = tokio::fs::remove_file(self.path_for(plan_id)).await {
                if error.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(%plan_id, %error, "failed to delete plan document");
                }
            }
        }
        removed
    }
}
