// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use crate::config::GeminiConfig;
use crate::credentials::ApiKey;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::gemini::{extract_text, GenerateContentRequest};
use crate::utils::logging::sanitize;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::borrow::Cow;
use std::time::Instant;
use tracing::{debug, error, warn};

/// Client for the public Gemini `generateContent` endpoint.
///
/// Holds no per-request state; the API key is supplied on every call so that
/// it can be resolved fresh for each invocation. Cloning is cheap and shares
/// the connection pool.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_base_url: String,
    model: String,
    sanitize_logs: bool,
}

impl GeminiClient {
    /// Create a client for the configured base URL and model.
    ///
    /// No request timeout is set; transport defaults apply.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_http_client(http_client, config))
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_http_client(http_client: Client, config: &GeminiConfig) -> Self {
        Self {
            http_client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            sanitize_logs: true,
        }
    }

    /// Whether upstream text is passed through `sanitize` before logging.
    /// On by default; driven by `logging.sanitize_credentials`.
    pub fn sanitize_logs(mut self, enabled: bool) -> Self {
        self.sanitize_logs = enabled;
        self
    }

    /// The model every request is sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Full request URL, credential included. Never log this.
    fn endpoint(&self, api_key: &ApiKey) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base_url,
            self.model,
            urlencoding::encode(api_key.expose())
        )
    }

    /// Call `generateContent` once and return the extracted answer text.
    ///
    /// Failures map onto the three upstream error kinds:
    /// - no HTTP response at all → `UpstreamTransport`
    /// - non-2xx status → `UpstreamApi` (body logged, not surfaced)
    /// - 2xx without usable text → `InvalidUpstreamResponse`
    pub async fn generate_text(
        &self,
        api_key: &ApiKey,
        request: &GenerateContentRequest,
    ) -> Result<String> {
        debug!("Calling generateContent API for model: {}", self.model);
        let start = Instant::now();

        let response = self
            .http_client
            .post(self.endpoint(api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream_call(&self.model, "transport_error", start.elapsed().as_secs_f64());
                // The URL carries the key; strip it before the error goes anywhere.
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                RelayError::UpstreamTransport(e.to_string())
            })?;

        let status = response.status();

        if !status.is_success() {
            metrics::record_upstream_call(
                &self.model,
                &format!("http_{}", status.as_u16()),
                start.elapsed().as_secs_f64(),
            );
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(
                        "Failed to read Gemini error body (HTTP {}): {}",
                        status,
                        e.without_url()
                    );
                    String::new()
                }
            };
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                self.loggable(&error_text)
            );
            return Err(RelayError::UpstreamApi {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.as_u16().to_string()),
                body: error_text,
            });
        }

        let result = self.read_text(response).await;
        let outcome = match &result {
            Ok(_) => "success",
            Err(RelayError::UpstreamTransport(_)) => "body_read_error",
            Err(_) => "invalid_response",
        };
        metrics::record_upstream_call(&self.model, outcome, start.elapsed().as_secs_f64());
        result
    }

    /// Read a 2xx body and pull the answer out of it.
    async fn read_text(&self, response: reqwest::Response) -> Result<String> {
        let response_text = response.text().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to read Gemini response body: {}", e);
            RelayError::UpstreamTransport(format!("Failed to read response body: {}", e))
        })?;

        debug!(
            "Raw Gemini response (first 500 chars): {}",
            self.loggable(&response_text.chars().take(500).collect::<String>())
        );

        let document: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            error!("Response body: {}", self.loggable(&response_text));
            RelayError::InvalidUpstreamResponse(format!("response is not JSON: {}", e))
        })?;

        match extract_text(&document) {
            Ok(text) => Ok(text.to_string()),
            Err(reason) => {
                error!("Invalid Gemini response ({}): {}", reason, self.loggable(&response_text));
                Err(RelayError::InvalidUpstreamResponse(reason.to_string()))
            }
        }
    }

    /// Upstream text as it should appear in logs.
    fn loggable<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.sanitize_logs {
            Cow::Owned(sanitize(text))
        } else {
            Cow::Borrowed(text)
        }
    }
}
