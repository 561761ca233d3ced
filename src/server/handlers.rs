// HTTP request handlers
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use crate::error::RelayError;
use crate::models::{HandlerEvent, HandlerResponse};
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub model: String,
    pub credential_configured: bool,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Reports whether the relay could serve a request right now.
///
/// A missing API key only degrades the service: input validation still works
/// and callers get a clean 500, so the process stays up.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let credential_configured = state.handler.credential_configured();

    Json(HealthResponse {
        status: if credential_configured {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        model: state.handler.model().to_string(),
        credential_configured,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Hosts the relay the way a serverless platform would: the raw body becomes
/// the event body and the handler's status/body are sent back verbatim.
///
/// Bodies that cannot become an event (too large, not UTF-8) still get the
/// JSON error envelope.
pub async fn analysis_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Response {
    let bytes = match body {
        Ok(bytes) => bytes,
        Err(rejection) => {
            let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RelayError::PayloadTooLarge(state.body_limit)
            } else {
                RelayError::InvalidInput(rejection.body_text())
            };
            return state.handler.reject(err).into_response();
        }
    };

    match String::from_utf8(bytes.to_vec()) {
        Ok(body) => state
            .handler
            .handle(HandlerEvent::with_body(body))
            .await
            .into_response(),
        Err(e) => state
            .handler
            .reject(RelayError::InvalidInput(format!("body is not valid UTF-8: {}", e)))
            .into_response(),
    }
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}
