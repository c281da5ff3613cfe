use super::{parse_config, TransformError, Transformation};
use flowsmith_types::TransformKind;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Stable sort of an array of records by one field.
pub struct SortTransform;

#[derive(Debug, Default, Deserialize)]
struct SortConfig {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    direction: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Asc,
    Desc,
}

impl SortConfig {
    fn direction(&self) -> Direction {
        match self.direction.as_deref() {
            None => Direction::Asc,
            Some(raw) if raw.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(raw) if raw.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(raw) => {
                tracing::warn!(direction = %raw, "unknown sort direction; sorting ascending");
                Direction::Asc
            }
        }
    }
}

impl Transformation for SortTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::Sort
    }

    fn apply(&self, value: Value, config: Option<&Value>) -> Result<Value, TransformError> {
        let config: SortConfig = parse_config(self.kind(), config)?;
        let mut items = match value {
            Value::Array(items) => items,
            other => return Ok(other),
        };
        let Some(field) = config.field.as_deref() else {
            return Ok(Value::Array(items));
        };

        let direction = config.direction();
        items.sort_by(|a, b| compare_records(a, b, field, direction));
        Ok(Value::Array(items))
    }
}

fn sort_key<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}

/// Records missing the field always go last; present values honor direction.
fn compare_records(a: &Value, b: &Value, field: &str, direction: Direction) -> Ordering {
    match (sort_key(a, field), sort_key(b, field)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            let ordering = compare_values(left, right);
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        }
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::String(a), Value::String(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
