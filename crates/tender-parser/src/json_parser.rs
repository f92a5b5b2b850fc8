//! JSON access utilities
//!
//! Path lookups over untrusted `serde_json::Value` trees. Every accessor returns
//! `None` or an empty slice on a missing key or an unexpected shape.

use serde_json::Value;
use tender_core::leaf::unwrap_value_with_depth;

/// JSON access utilities
pub struct JsonParser;

impl JsonParser {
    /// Get a value by key path (e.g. `["date_limite_remise_plis", "heure"]`)
    pub fn get_path<'a>(obj: &'a Value, path: &[&str]) -> Option<&'a Value> {
        path.iter().try_fold(obj, |current, key| current.get(*key))
    }

    /// Get a display string by key path, unwrapping `{value: ...}` objects
    ///
    /// Surrounding whitespace is trimmed and blank strings count as absent.
    pub fn get_text(obj: &Value, path: &[&str], max_depth: usize) -> Option<String> {
        unwrap_value_with_depth(Self::get_path(obj, path), max_depth).and_then(Self::clean_text)
    }

    /// Get an array by key path, seeing through `{value: [...]}` wrappers
    ///
    /// Anything other than an array yields an empty slice.
    pub fn get_array<'a>(obj: &'a Value, path: &[&str], max_depth: usize) -> &'a [Value] {
        Self::get_path(obj, path)
            .map(|v| Self::peel(v, max_depth))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Strip at most `max_depth` `{value: ...}` wrappers from a value
    pub fn peel(value: &Value, max_depth: usize) -> &Value {
        let mut current = value;
        for _ in 0..max_depth {
            match current.get("value") {
                Some(inner) if current.is_object() => current = inner,
                _ => break,
            }
        }
        current
    }

    /// Trim text, mapping blank strings to `None`
    pub fn clean_text(text: String) -> Option<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == text.len() {
            Some(text)
        } else {
            Some(trimmed.to_string())
        }
    }
}
