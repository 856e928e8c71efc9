//! Shared test fixtures: a scripted task runner and canned stage replies.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use itinera::agents::{AgentProfile, TaskRunner};
use itinera::tasks::TaskSpec;
use itinera::workflow::{Season, TripRequest};

/// Task runner that replays canned replies and records what it was asked.
pub struct ScriptedRunner {
    replies: Mutex<VecDeque<String>>,
    pub calls: AtomicUsize,
    pub descriptions: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            descriptions: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskRunner for ScriptedRunner {
    async fn run_task(&self, _profile: &AgentProfile, task: &TaskSpec) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.descriptions
            .lock()
            .unwrap()
            .push(task.description.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no scripted reply left"))
    }
}

/// Runner whose provider always fails.
pub struct FailingRunner;

#[async_trait]
impl TaskRunner for FailingRunner {
    async fn run_task(&self, _profile: &AgentProfile, _task: &TaskSpec) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("model provider unavailable"))
    }
}

/// Six stage replies for one attempt, exercising fenced and bare JSON.
pub fn attempt_replies(city: &str, computed_total: u64, within_budget: bool) -> Vec<String> {
    vec![
        format!(
            "Here is my pick:\n```json\n{{\"destination_city\": \"{city}\", \"reasoning\": \"reachable and affordable\"}}\n```"
        ),
        r#"{"attractions": ["Old Fort", "City Museum"], "cuisine": ["street food"],
            "cultural_norms": [], "transportation_tips": [], "local_activities": []}"#
            .to_string(),
        r#"{"long_distance_options": ["overnight train"], "local_transport_options": ["metro"],
            "reasoning": "cheapest round trip"}"#
            .to_string(),
        r#"{"itinerary": [{"day": 1, "activities": [{"activity": "walking tour"}]},
                           {"day": 2, "activities": []}]}"#
            .to_string(),
        format!(
            r#"{{"transportation": [{{"cost": 8000}}], "accommodation": [{{"cost": 12000}}],
                "activities": [{{"cost": 5000}}], "meals": [{{"cost": 9000}}],
                "emergency_fund": 2000, "visa_fees": 0,
                "total_estimated_cost": {computed_total}}}"#
        ),
        format!(
            r#"{{"schema_version": "1.0", "computed_total": {computed_total},
                "within_budget": {within_budget}, "over_by": 0, "flags": [],
                "recommendations": ["carry cash for markets"]}}"#
        ),
    ]
}

pub fn comfortable_request() -> TripRequest {
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

pub fn impossible_request() -> TripRequest {
    TripRequest {
        interests: "luxury".to_string(),
        budget: 500,
        duration: 4,
        start_city: "Chennai".to_string(),
        season: Season::Winter,
        people: 2,
        currency: "INR".to_string(),
        destination_city: None,
    }
}
