//! JSON extraction from extraction-model responses
//!
//! Model responses often wrap the payload in a markdown fence or surround it
//! with prose. This helper recovers the JSON object so it can be handed to the
//! normalizers.

use crate::error::{ParseError, Result};
use serde_json::Value;

/// Extracts JSON payloads from response text
pub struct JsonExtractor;

impl JsonExtractor {
    /// Extract and parse the JSON payload of a response
    ///
    /// Handles, in order:
    /// - a ```` ```json ```` fenced block
    /// - a bare ```` ``` ```` fenced block
    /// - the outermost `{ ... }` span
    /// - the whole text
    pub fn extract(response: &str) -> Result<Value> {
        let cleaned = response.trim();
        if cleaned.is_empty() {
            return Err(ParseError::NoJsonFound);
        }

        let candidate = Self::from_fence(cleaned, "```json")
            .or_else(|| Self::from_fence(cleaned, "```"))
            .or_else(|| Self::outer_object(cleaned))
            .unwrap_or(cleaned);

        if candidate.is_empty() {
            return Err(ParseError::NoJsonFound);
        }

        serde_json::from_str(candidate).map_err(|e| {
            log::debug!("Response was not valid JSON: {}", e);
            ParseError::from(e)
        })
    }

    /// Extract the payload and require it to be an object
    pub fn extract_object(response: &str) -> Result<Value> {
        let value = Self::extract(response)?;
        if value.is_object() {
            Ok(value)
        } else {
            Err(ParseError::NotAnObject(json_kind(&value).to_string()))
        }
    }

    fn from_fence<'a>(content: &'a str, opening: &str) -> Option<&'a str> {
        let start = content.find(opening)? + opening.len();
        let rest = &content[start..];
        let end = rest.find("```")?;
        Some(rest[..end].trim())
    }

    fn outer_object(content: &str) -> Option<&str> {
        let start = content.find('{')?;
        let end = content.rfind('}')?;
        (end > start).then(|| &content[start..=end])
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
