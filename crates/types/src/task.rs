use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Action type tag for the data-processing parameter variant.
pub const DATA_PROCESSING_ACTION: &str = "dataProcessing";

const ACTION_TYPE_KEY: &str = "actionType";

/// Declarative unit of workflow configuration supplied per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub task_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TaskParameters>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        task_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_type: task_type.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: TaskParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Task parameters keyed by `actionType`.
///
/// A missing `actionType` is read as data processing, the only action the
/// pipeline knows how to run. Any other action keeps its raw parameter map.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskParameters {
    DataProcessing(DataProcessingParams),
    Other {
        action_type: String,
        params: Map<String, Value>,
    },
}

impl TaskParameters {
    pub fn action_type(&self) -> &str {
        match self {
            TaskParameters::DataProcessing(_) => DATA_PROCESSING_ACTION,
            TaskParameters::Other { action_type, .. } => action_type,
        }
    }

    pub fn as_data_processing(&self) -> Option<&DataProcessingParams> {
        match self {
            TaskParameters::DataProcessing(params) => Some(params),
            TaskParameters::Other { .. } => None,
        }
    }

    /// JSON form of the parameters, including the `actionType` tag.
    pub fn to_value(&self) -> Value {
        let mut map = match self {
            TaskParameters::DataProcessing(params) => match serde_json::to_value(params) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            TaskParameters::Other { params, .. } => params.clone(),
        };
        map.insert(
            ACTION_TYPE_KEY.to_string(),
            Value::String(self.action_type().to_string()),
        );
        Value::Object(map)
    }
}

impl From<DataProcessingParams> for TaskParameters {
    fn from(params: DataProcessingParams) -> Self {
        TaskParameters::DataProcessing(params)
    }
}

impl Serialize for TaskParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TaskParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut map = Map::<String, Value>::deserialize(deserializer)?;
        let action_type = match map.get(ACTION_TYPE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(tag)) => Some(tag.clone()),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "actionType must be a string, got {}",
                    other
                )))
            }
        };

        match action_type {
            Some(tag) if !tag.eq_ignore_ascii_case(DATA_PROCESSING_ACTION) => {
                map.remove(ACTION_TYPE_KEY);
                Ok(TaskParameters::Other {
                    action_type: tag,
                    params: map,
                })
            }
            _ => DataProcessingParams::deserialize(Value::Object(map))
                .map(TaskParameters::DataProcessing)
                .map_err(de::Error::custom),
        }
    }
}

/// Concrete parameter record for the `dataProcessing` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataProcessingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    #[serde(default)]
    pub transformations: Vec<TransformStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
    #[serde(default)]
    pub validation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<Map<String, Value>>,
}

/// One named, configured step of a transformation chain.
///
/// The kind is kept as written so unknown kinds survive parsing and can be
/// skipped by the chain instead of failing the whole task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl TransformStep {
    pub fn new(kind: impl Into<String>, config: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            config,
        }
    }

    pub fn of(kind: TransformKind, config: Value) -> Self {
        Self::new(kind.as_str(), Some(config))
    }

    /// Resolved kind, or `None` when the step names an unknown transformation.
    pub fn resolved_kind(&self) -> Option<TransformKind> {
        self.kind.parse().ok()
    }
}

/// Closed set of supported transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Normalize,
    Filter,
    Augment,
    Aggregate,
    Sort,
}

impl TransformKind {
    pub const ALL: [TransformKind; 5] = [
        TransformKind::Normalize,
        TransformKind::Filter,
        TransformKind::Augment,
        TransformKind::Aggregate,
        TransformKind::Sort,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Normalize => "normalize",
            TransformKind::Filter => "filter",
            TransformKind::Augment => "augment",
            TransformKind::Aggregate => "aggregate",
            TransformKind::Sort => "sort",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TransformKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unknown transformation kind '{}'", value))
    }
}
