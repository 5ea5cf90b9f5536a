//! Normalization of backend error payloads into one user-facing string.

use serde_json::Value;

/// Reduce an arbitrary error payload to a single message.
///
/// - a bare string is used as is
/// - an object with a non-empty `message` string uses it
/// - an object with a `body` (or `pageErrors`) is reduced through it
/// - an array is the comma-joined list of its entries' messages
/// - anything else is serialized verbatim
///
/// A payload that carries no message at all reduces to [`UNKNOWN_ERROR`].
pub fn reduce_errors(payload: &Value) -> String {
    let message = reduce(payload);
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Shown when a failure payload holds no message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

fn reduce(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(reduce)
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("message")
                && !message.is_empty()
            {
                return message.clone();
            }
            if let Some(body) = map.get("body").filter(|b| !b.is_null()) {
                return reduce(body);
            }
            if let Some(page_errors @ Value::Array(_)) = map.get("pageErrors") {
                return reduce(page_errors);
            }
            payload.to_string()
        }
        other => other.to_string(),
    }
}
