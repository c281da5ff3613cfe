//! Annotating validator.
//!
//! Validation never removes or rejects data: it stamps `validated: true` and
//! reports rule violations as a degraded outcome.

use crate::core::outcome::Outcome;
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
struct ValidationRules {
    #[serde(default)]
    required: Vec<String>,
}

pub fn validate(value: Value, rules: &Map<String, Value>) -> Outcome<Value> {
    let mut problems = Vec::new();
    let rules = match serde_json::from_value::<ValidationRules>(Value::Object(rules.clone())) {
        Ok(rules) => rules,
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed validation rules");
            problems.push(format!("malformed validation rules: {}", err));
            ValidationRules::default()
        }
    };

    let annotated = match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| annotate(item, &rules, Some(index), &mut problems))
                .collect(),
        ),
        other => annotate(other, &rules, None, &mut problems),
    };

    if problems.is_empty() {
        Outcome::Ok(annotated)
    } else {
        Outcome::degraded(annotated, problems.join("; "))
    }
}

fn annotate(
    value: Value,
    rules: &ValidationRules,
    index: Option<usize>,
    problems: &mut Vec<String>,
) -> Value {
    let mut record = match value {
        Value::Object(record) => record,
        other => return other,
    };

    for field in &rules.required {
        if record.get(field).map_or(true, Value::is_null) {
            let location = index
                .map(|index| format!("record {}", index))
                .unwrap_or_else(|| "record".to_string());
            tracing::warn!(field = %field, location = %location, "required field missing");
            problems.push(format!("{} is missing required field '{}'", location, field));
        }
    }

    record.insert("validated".to_string(), Value::Bool(true));
    Value::Object(record)
}
