use super::{parse_config, TransformError, Transformation};
use crate::utils::values::{display_text, loose_equals};
use flowsmith_types::TransformKind;
use serde::Deserialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;

/// Keeps records matching every configured condition.
pub struct FilterTransform;

#[derive(Debug, Default, Deserialize)]
struct FilterConfig {
    #[serde(default)]
    conditions: Option<Vec<Condition>>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    operator: Option<String>,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

impl FromStr for Operator {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "equals" => Ok(Operator::Equals),
            "notEquals" => Ok(Operator::NotEquals),
            "contains" => Ok(Operator::Contains),
            "greaterThan" => Ok(Operator::GreaterThan),
            "lessThan" => Ok(Operator::LessThan),
            _ => Err(()),
        }
    }
}

impl Transformation for FilterTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::Filter
    }

    fn apply(&self, value: Value, config: Option<&Value>) -> Result<Value, TransformError> {
        let config: FilterConfig = parse_config(self.kind(), config)?;
        let conditions = match config.conditions {
            Some(conditions) if !conditions.is_empty() => conditions,
            _ => return Ok(value),
        };

        let filtered = match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .filter(|item| matches_all(item, &conditions))
                    .collect(),
            ),
            Value::Object(_) if matches_all(&value, &conditions) => value,
            Value::Object(_) => Value::Null,
            scalar => scalar,
        };
        Ok(filtered)
    }
}

fn matches_all(item: &Value, conditions: &[Condition]) -> bool {
    conditions.iter().all(|condition| matches(item, condition))
}

fn matches(item: &Value, condition: &Condition) -> bool {
    let (Some(field), Some(operator)) = (&condition.field, &condition.operator) else {
        return true;
    };
    let Ok(operator) = operator.parse::<Operator>() else {
        tracing::warn!(operator = %operator, field = %field, "unknown filter operator; condition ignored");
        return true;
    };

    let actual = item.get(field.as_str());
    let expected = &condition.value;
    match operator {
        Operator::Equals => loose_equals(actual.unwrap_or(&Value::Null), expected),
        Operator::NotEquals => !loose_equals(actual.unwrap_or(&Value::Null), expected),
        Operator::Contains => actual
            .map(|actual| display_text(actual).contains(&display_text(expected)))
            .unwrap_or(false),
        Operator::GreaterThan => compare(actual, expected) == Some(Ordering::Greater),
        Operator::LessThan => compare(actual, expected) == Some(Ordering::Less),
    }
}

fn compare(actual: Option<&Value>, expected: &Value) -> Option<Ordering> {
    match (actual?, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
