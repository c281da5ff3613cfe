use super::{parse_config, TransformError, Transformation};
use flowsmith_types::TransformKind;
use serde::Deserialize;
use serde_json::{Map, Value};

const LOWERCASE: &str = "lowercase";

/// Rewrites object keys and stamps `normalized: true`.
pub struct NormalizeTransform;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeConfig {
    #[serde(default)]
    key_casing: Option<String>,
}

impl Transformation for NormalizeTransform {
    fn kind(&self) -> TransformKind {
        TransformKind::Normalize
    }

    fn apply(&self, value: Value, config: Option<&Value>) -> Result<Value, TransformError> {
        let config: NormalizeConfig = parse_config(self.kind(), config)?;
        let lowercase = config.key_casing.as_deref() == Some(LOWERCASE);
        Ok(normalize_value(value, lowercase))
    }
}

fn normalize_value(value: Value, lowercase: bool) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_value(item, lowercase))
                .collect(),
        ),
        Value::Object(map) => {
            let mut normalized = Map::with_capacity(map.len() + 1);
            for (key, field) in map {
                let key = if lowercase { key.to_lowercase() } else { key };
                normalized.insert(key, field);
            }
            normalized.insert("normalized".to_string(), Value::Bool(true));
            Value::Object(normalized)
        }
        scalar => scalar,
    }
}
