//! Axum-based HTTP surface for gemrelay.
//!
//! Stands in for the serverless platform: it turns each POST into a handler
//! event, runs the handler and returns its status and JSON body.
//!
//! # Components
//!
//! - `handlers`: analysis, health and metrics endpoints.
//! - `middleware`: request ID tracking.
//! - `routes`: router and shared state.
//!
//! Author: kelexine (<https://github.com/kelexine>)

mod handlers;
mod middleware;
mod routes;

pub use handlers::{HealthResponse, HealthStatus};
pub use routes::{create_router, AppState, NETLIFY_FUNCTION_PATH};
