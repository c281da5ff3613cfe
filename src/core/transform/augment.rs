use super::{parse_config, TransformError, Transformation};
use flowsmith_types::TransformKind;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Sets literal fields on records and stamps `augmented: true`.
pub struct AugmentTransform;

#[derive(Debug, Default, Deserialize)]
struct AugmentConfig {
    #[serde(default)]
    fields: Option<Vec<FieldAssignment>>,
}

#[derive(Debug, Deserialize)]
struct FieldAssignment {
    name: String,
    #[serde(default)]
    value: Value,
}

impl Transformation for AugmentTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::Augment
    }

    fn apply(&self, value: Value, config: Option<&Value>) -> Result<Value, TransformError> {
        let config: AugmentConfig = parse_config(self.kind(), config)?;
        let fields = config.fields.unwrap_or_default();

        let augmented = match value {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| augment_record(item, &fields))
                    .collect(),
            ),
            other => augment_record(other, &fields),
        };
        Ok(augmented)
    }
}

fn augment_record(value: Value, fields: &[FieldAssignment]) -> Value {
    let mut record = match value {
        Value::Object(record) => record,
        other => return other,
    };
    for field in fields {
        record.insert(field.name.clone(), field.value.clone());
    }
    stamp(&mut record);
    Value::Object(record)
}

fn stamp(record: &mut Map<String, Value>) {
    record.insert("augmented".to_string(), Value::Bool(true));
}
