//! HTTP API for the travel planner.
//!
//! ## Endpoints
//!
//! - `POST /plan` - Submit a plan request (async, returns a job id)
//! - `GET /job/{id}` - Poll job status
//! - `GET /plan/{id}` - Fetch a completed plan
//! - `POST /plan/sync` - Generate a plan in the caller's request
//! - `GET /plans` - List recent plans
//! - `DELETE /plan/{id}` - Remove a plan and its persisted document
//! - `GET /` - Health check

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
