//! Data models for the relay.
//!
//! - `relay`: what the frontend sends and receives, plus the platform
//!   invocation envelope
//! - `gemini`: the upstream `generateContent` request and response navigation

// Author: kelexine (https://github.com/kelexine)

pub mod gemini;
pub mod relay;

pub use gemini::{extract_text, GenerateContentRequest};
pub use relay::{AnalysisRequest, AnalysisResponse, ErrorBody, HandlerEvent, HandlerResponse};
