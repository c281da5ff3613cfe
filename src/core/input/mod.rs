//! Best-effort coercion of raw task input into a JSON value.

use crate::core::outcome::Outcome;
use serde_json::{Map, Value};

/// Coerce raw input into the value the transformation chain operates on.
///
/// Absent input becomes an empty object. Strings that look like a JSON object
/// or array are parsed; when parsing fails the original string is kept.
pub fn normalize_input(input: Option<Value>) -> Outcome<Value> {
    match input {
        None | Some(Value::Null) => Outcome::Ok(Value::Object(Map::new())),
        Some(Value::String(text)) => parse_structured_text(text),
        Some(other) => Outcome::Ok(other),
    }
}

fn parse_structured_text(text: String) -> Outcome<Value> {
    let trimmed = text.trim();
    if !looks_structured(trimmed) {
        return Outcome::Ok(Value::String(text));
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(parsed) => Outcome::Ok(parsed),
        Err(err) => {
            tracing::warn!(error = %err, "input looks like JSON but failed to parse; keeping raw string");
            Outcome::degraded(
                Value::String(text),
                format!("input string is not valid JSON: {}", err),
            )
        }
    }
}

fn looks_structured(trimmed: &str) -> bool {
    (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
}
