use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Output of one pipeline invocation. Shared immutably once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub data: Value,
    pub metadata: ProcessingMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingMetadata {
    pub processed_at: DateTime<Utc>,
    pub task_id: String,
    pub task_name: String,
    pub task_type: String,
    pub action_type: String,
    /// Number of transformation steps applied to the data.
    pub transformations: usize,
    pub validated: bool,
}
