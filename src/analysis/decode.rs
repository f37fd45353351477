//! Structured-response decoder for model output.
//!
//! Model output is unreliable input: the JSON we asked for may arrive raw,
//! wrapped in a fenced code block (with or without a language tag), or not at
//! all. Contract: try a strict parse, then a fence-stripped parse, then give
//! up with `None` so the caller can fall back to raw text.

use serde_json::Value;

/// Decode a model response as JSON, tolerating fenced code blocks.
pub fn decode_structured(response: &str) -> Option<Value> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let inner = strip_fences(trimmed)?;
    serde_json::from_str(inner).ok()
}

/// Extract the contents of the first fenced code block, dropping an optional
/// language tag after the opening fence.
fn strip_fences(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];

    let body = after_fence.strip_prefix("json").unwrap_or(after_fence);

    let end = body.find("```")?;
    Some(body[..end].trim())
}
