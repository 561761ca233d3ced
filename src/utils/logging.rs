//! Structured logging and credential-safe trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application,
//! supporting multiple output formats and providing a helper that keeps the
//! Gemini API key out of log sinks.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{RelayError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line output, handy for platform log viewers.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`. Logs go to stderr so that `invoke` can keep
/// stdout for the handler response.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| RelayError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Sanitizes API keys from text that is about to be logged.
///
/// Two shapes are masked:
/// - `key=<value>` query parameters, as they appear in request URLs
/// - bare Google API keys, which start with `AIza`
pub fn sanitize(input: &str) -> String {
    let mut result = redact_after(input, "key=", "[REDACTED_API_KEY]");
    result = redact_after(&result, "AIza", "[REDACTED_API_KEY]");
    result
}

/// Replaces every token that follows `marker` (marker included for Google
/// keys, excluded for query parameters) up to the next delimiter.
fn redact_after(input: &str, marker: &str, placeholder: &str) -> String {
    let keep_marker = marker.ends_with('=');
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(marker) {
        let token_start = pos + marker.len();
        let token_len = rest[token_start..]
            .find(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '&' | ')' | ','))
            .unwrap_or(rest.len() - token_start);

        if keep_marker {
            out.push_str(&rest[..token_start]);
        } else {
            out.push_str(&rest[..pos]);
        }
        out.push_str(placeholder);
        rest = &rest[token_start + token_len..];
    }

    out.push_str(rest);
    out
}
