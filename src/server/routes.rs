// HTTP routes configuration
// Author: kelexine (https://github.com/kelexine)

use super::handlers::{analysis_handler, health_handler, metrics_handler};
use super::middleware::request_id_layers;
use crate::config::ServerConfig;
use crate::handler::AnalysisHandler;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Netlify Functions path, served too so existing frontends need no changes.
pub const NETLIFY_FUNCTION_PATH: &str = "/.netlify/functions/getAIAnalysis";

#[derive(Clone)]
pub struct AppState {
    pub handler: AnalysisHandler,
    /// Largest accepted body, reported back when a request exceeds it.
    pub body_limit: usize,
}

pub fn create_router(config: &ServerConfig, handler: AnalysisHandler) -> Router {
    let state = AppState {
        handler,
        body_limit: config.body_limit_bytes,
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/api/analysis", post(analysis_handler))
        .route(NETLIFY_FUNCTION_PATH, post(analysis_handler))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id)
                .layer(propagate_request_id)
                .layer(TraceLayer::new_for_http())
                // Enforced by the body extractor so the handler can answer in JSON.
                .layer(DefaultBodyLimit::max(config.body_limit_bytes)),
        )
        .with_state(state)
}
