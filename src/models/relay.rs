// Inbound request, outbound response and platform envelope types
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Body sent by the frontend.
///
/// Both fields are optional at the decoding level so that absence and emptiness
/// can be reported the same way by [`AnalysisRequest::prompts`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub user_prompt: Option<String>,
}

impl AnalysisRequest {
    /// Returns `(system_prompt, user_prompt)` when both are present and non-empty.
    pub fn prompts(&self) -> Option<(&str, &str)> {
        let system = self.system_prompt.as_deref().filter(|s| !s.is_empty())?;
        let user = self.user_prompt.as_deref().filter(|s| !s.is_empty())?;
        Some((system, user))
    }
}

/// Successful answer relayed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub text: String,
}

/// Error envelope relayed to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Invocation event delivered by the hosting platform.
///
/// Platforms send many more fields (headers, path, method); only the raw body
/// matters here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandlerEvent {
    #[serde(default)]
    pub body: Option<String>,
}

impl HandlerEvent {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// What the handler hands back to the platform. `body` is always JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}
