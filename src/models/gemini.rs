// Gemini generateContent wire types
// Author: kelexine (https://github.com/kelexine)

use serde::Serialize;
use serde_json::Value;

/// Body of a single-turn `generateContent` call.
///
/// Only the fields gemrelay sends are modelled; anything extra would change the
/// request the upstream sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Exactly one user turn, no history.
    pub contents: Vec<Content>,

    /// System-level instruction.
    pub system_instruction: SystemInstruction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// Builds the fixed-shape payload. Prompts are passed through untouched.
    pub fn from_prompts(system_prompt: &str, user_prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: user_prompt.to_string(),
                }],
            }],
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
        }
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response document.
///
/// Each level is checked explicitly; the error names the first level that was
/// missing or had the wrong shape.
pub fn extract_text(response: &Value) -> std::result::Result<&str, &'static str> {
    let candidates = response
        .get("candidates")
        .and_then(Value::as_array)
        .ok_or("missing candidates")?;
    let candidate = candidates.first().ok_or("no candidates")?;
    let content = candidate.get("content").ok_or("candidate has no content")?;
    let parts = content
        .get("parts")
        .and_then(Value::as_array)
        .ok_or("content has no parts")?;
    let part = parts.first().ok_or("content parts are empty")?;
    let text = part
        .get("text")
        .and_then(Value::as_str)
        .ok_or("first part has no text")?;

    if text.is_empty() {
        return Err("text is empty");
    }
    Ok(text)
}
