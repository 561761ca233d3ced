//! The relay request handler.
//!
//! One invocation runs a linear pipeline:
//!
//! 1. decode and validate the body (400 on failure, before anything else)
//! 2. resolve the API key (500 on failure, before any network access)
//! 3. build the single-turn Gemini payload
//! 4. call `generateContent` once
//! 5. extract `candidates[0].content.parts[0].text`
//! 6. answer `{"text": ...}`
//!
//! Every failure is caught here and turned into `{"error": ...}` with the
//! matching status code.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::credentials::CredentialProvider;
use crate::error::{RelayError, Result};
use crate::gemini::GeminiClient;
use crate::metrics;
use crate::models::{
    AnalysisRequest, AnalysisResponse, ErrorBody, GenerateContentRequest, HandlerEvent,
    HandlerResponse,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, Instrument};

#[derive(Clone)]
pub struct AnalysisHandler {
    client: GeminiClient,
    credentials: Arc<dyn CredentialProvider>,
}

impl AnalysisHandler {
    pub fn new(client: GeminiClient, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            client,
            credentials,
        }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Whether an API key is currently available. Used by health reporting.
    pub fn credential_configured(&self) -> bool {
        self.credentials.api_key().is_some()
    }

    /// Platform entry point. Never fails; errors become JSON error bodies.
    pub async fn handle(&self, event: HandlerEvent) -> HandlerResponse {
        let invocation_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("invocation", id = %invocation_id);

        async move {
            let start = Instant::now();
            let result = self.run(event.body.as_deref()).await;
            self.respond(result, start)
        }
        .instrument(span)
        .await
    }

    /// Answer a request that was refused before a handler event could be
    /// built (unreadable or oversized body). Same envelope, logging and
    /// metrics as `handle`.
    pub fn reject(&self, err: RelayError) -> HandlerResponse {
        let invocation_id = uuid::Uuid::new_v4();
        let _span = tracing::info_span!("invocation", id = %invocation_id).entered();

        error!("Request rejected before handling: {}", err);
        self.respond(Err(err), Instant::now())
    }

    fn respond(&self, result: Result<String>, start: Instant) -> HandlerResponse {
        let duration = start.elapsed().as_secs_f64();

        let response = match result {
            Ok(text) => {
                info!("Relayed {} chars of AI output", text.chars().count());
                metrics::record_invocation(200, "ok", duration);
                HandlerResponse {
                    status_code: 200,
                    body: json_body(&AnalysisResponse { text }),
                }
            }
            Err(e) => {
                let status = e.status_code().as_u16();
                metrics::record_invocation(status, e.kind(), duration);
                HandlerResponse {
                    status_code: status,
                    body: json_body(&ErrorBody {
                        error: e.client_message(),
                    }),
                }
            }
        };

        info!(status = response.status_code, "Invocation finished in {:.3}s", duration);
        response
    }

    /// The pipeline proper. Returns the extracted text on success.
    async fn run(&self, body: Option<&str>) -> Result<String> {
        let request = parse_request(body)?;
        let (system_prompt, user_prompt) = match request.prompts() {
            Some(prompts) => prompts,
            None => {
                error!(
                    "Missing prompt in request body: {}",
                    body.unwrap_or_default()
                );
                return Err(RelayError::InvalidInput(
                    "missing 'systemPrompt' or 'userPrompt' in body".to_string(),
                ));
            }
        };

        let api_key = self.credentials.api_key().ok_or_else(|| {
            error!(
                "API key is not configured ({})",
                self.credentials.source()
            );
            RelayError::MissingCredential
        })?;

        let payload = GenerateContentRequest::from_prompts(system_prompt, user_prompt);

        self.client
            .generate_text(&api_key, &payload)
            .await
            .map_err(|e| {
                error!(kind = e.kind(), "Gemini call failed: {}", e);
                e
            })
    }
}

/// Serializes a response body. The fallback keeps the body valid JSON even if
/// encoding ever fails.
fn json_body<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"error":"Failed to encode response"}"#.to_string())
}

fn parse_request(body: Option<&str>) -> Result<AnalysisRequest> {
    let raw = body.ok_or_else(|| {
        error!("Request has no body");
        RelayError::InvalidInput("request body is missing".to_string())
    })?;

    serde_json::from_str(raw).map_err(|e| {
        error!("Failed to parse request body: {} (body: {})", e, raw);
        RelayError::InvalidInput(e.to_string())
    })
}
