use anyhow::{Context, Result};
use flowsmith_types::Task;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where a command reads its JSON payload from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Stdin,
    File(PathBuf),
}

impl From<Option<PathBuf>> for PayloadSource {
    /// `None` and `-` both mean stdin.
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => PayloadSource::File(path),
            _ => PayloadSource::Stdin,
        }
    }
}

/// Read a payload, parsing it as JSON when possible.
///
/// Empty payloads yield `None`. Text that is not valid JSON is kept as a
/// string value so the pipeline can decide what to do with it.
pub fn read_payload(source: &PayloadSource) -> Result<Option<Value>> {
    let text = match source {
        PayloadSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read payload from stdin")?;
            buffer
        }
        PayloadSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read payload {}", path.display()))?,
    };
    Ok(parse_payload(&text))
}

pub fn parse_payload(text: &str) -> Option<Value> {
    let trimmed = text.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(trimmed.to_string())),
    }
}

/// Load and parse a task definition file.
pub fn load_task(path: &Path) -> Result<Task> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read task file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse task file {}", path.display()))
}
