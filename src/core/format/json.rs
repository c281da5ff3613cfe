use crate::core::outcome::Outcome;
use serde_json::Value;

/// Pretty-printed JSON; strings are assumed to be encoded already.
pub fn to_json(value: Value) -> Outcome<Value> {
    if value.is_string() {
        return Outcome::Ok(value);
    }
    match serde_json::to_string_pretty(&value) {
        Ok(encoded) => Outcome::Ok(Value::String(encoded)),
        Err(err) => {
            tracing::warn!(error = %err, "JSON encoding failed; using compact form");
            Outcome::degraded(Value::String(value.to_string()), err.to_string())
        }
    }
}
