//! Value unwrapping for AI-produced JSON
//!
//! Extraction output mixes plain values with wrapped `{ "value": X, "source": ... }`
//! objects, sometimes wrapped more than once. A raw JSON value is decoded into a
//! [`Leaf`] and then resolved into an optional display string.

use serde_json::Value;

/// Maximum number of `{value: ...}` wrappers peeled before giving up
pub const MAX_UNWRAP_DEPTH: usize = 10;

/// Decoded shape of a raw JSON leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// A string or number, rendered as text
    Plain(String),
    /// An object carrying a `value` key
    Wrapped(Box<Leaf>),
    /// Null, booleans, arrays, objects without `value`, or wrapping too deep
    Unsupported,
}

impl Leaf {
    /// Decode a raw value, peeling at most `max_depth` wrapper objects
    pub fn decode(value: &Value, max_depth: usize) -> Leaf {
        match value {
            Value::String(s) => Leaf::Plain(s.clone()),
            Value::Number(n) => Leaf::Plain(n.to_string()),
            Value::Object(map) => match map.get("value") {
                Some(_) if max_depth == 0 => {
                    log::debug!("Wrapped value exceeds unwrap depth, treating as absent");
                    Leaf::Unsupported
                }
                Some(inner) => Leaf::Wrapped(Box::new(Leaf::decode(inner, max_depth - 1))),
                None => Leaf::Unsupported,
            },
            Value::Null | Value::Bool(_) | Value::Array(_) => Leaf::Unsupported,
        }
    }

    /// Resolve the leaf into its display string
    pub fn resolve(self) -> Option<String> {
        let mut current = self;
        loop {
            match current {
                Leaf::Plain(s) => return Some(s),
                Leaf::Wrapped(inner) => current = *inner,
                Leaf::Unsupported => return None,
            }
        }
    }
}

/// Unwrap a raw value into a string using the default depth bound
///
/// `None` (an absent key) and JSON `null` both give `None`.
pub fn unwrap_value(value: Option<&Value>) -> Option<String> {
    unwrap_value_with_depth(value, MAX_UNWRAP_DEPTH)
}

/// Unwrap a raw value into a string, peeling at most `max_depth` wrappers
pub fn unwrap_value_with_depth(value: Option<&Value>, max_depth: usize) -> Option<String> {
    value.and_then(|v| Leaf::decode(v, max_depth).resolve())
}
