use super::{parse_config, TransformError, Transformation};
use crate::utils::values::{coerce_number, display_text, number_value};
use flowsmith_types::TransformKind;
use serde::Deserialize;
use serde_json::{Map, Value};

const DEFAULT_SEPARATOR: &str = ",";

/// Collapses an array of records into one summary object.
pub struct AggregateTransform;

#[derive(Debug, Default, Deserialize)]
struct AggregateConfig {
    #[serde(default)]
    operations: Option<Vec<Operation>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    field: String,
    #[serde(rename = "type")]
    op: AggregateOp,
    #[serde(default)]
    output_name: Option<String>,
    #[serde(default)]
    separator: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AggregateOp {
    Sum,
    Avg,
    Min,
    Max,
    Concat,
}

impl AggregateOp {
    fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Sum => "sum",
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Concat => "concat",
        }
    }
}

impl Operation {
    fn output_key(&self) -> String {
        self.output_name
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.op.as_str(), self.field))
    }

    fn evaluate(&self, items: &[Value]) -> Value {
        let field_values = || items.iter().map(|item| item.get(self.field.as_str()));
        let numbers = || field_values().map(coerce_number);
        if items.is_empty() && !matches!(self.op, AggregateOp::Concat) {
            return number_value(0.0);
        }

        match self.op {
            AggregateOp::Sum => number_value(numbers().sum()),
            AggregateOp::Avg => number_value(numbers().sum::<f64>() / items.len() as f64),
            AggregateOp::Min => number_value(numbers().fold(f64::INFINITY, f64::min)),
            AggregateOp::Max => number_value(numbers().fold(f64::NEG_INFINITY, f64::max)),
            AggregateOp::Concat => {
                let separator = self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR);
                let parts: Vec<String> = field_values()
                    .map(|value| value.map(display_text).unwrap_or_default())
                    .collect();
                Value::String(parts.join(separator))
            }
        }
    }
}

impl Transformation for AggregateTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::Aggregate
    }

    fn apply(&self, value: Value, config: Option<&Value>) -> Result<Value, TransformError> {
        let config: AggregateConfig = parse_config(self.kind(), config)?;
        let items = match value {
            Value::Array(items) => items,
            other => return Ok(other),
        };

        let mut summary = Map::new();
        summary.insert("aggregated".to_string(), Value::Bool(true));
        summary.insert("count".to_string(), Value::from(items.len()));
        for operation in config.operations.unwrap_or_default() {
            summary.insert(operation.output_key(), operation.evaluate(&items));
        }
        Ok(Value::Object(summary))
    }
}
