//! Output encodings for processed data.
//!
//! Formatting never fails: every encoder degrades to a fixed or stringified
//! fallback instead of returning an error.

use crate::core::outcome::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

mod csv;
mod json;
mod text;
mod xml;

pub use csv::{to_csv, CSV_FALLBACK};
pub use json::to_json;
pub use text::to_text;
pub use xml::{to_xml, XML_ERROR_DOCUMENT};

/// Encoding applied to processed data. Names are matched case-insensitively
/// wherever they are read, `txt` being an alias for `text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Xml,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Xml => "xml",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "xml" => Ok(OutputFormat::Xml),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(format!(
                "unsupported output format '{}'; supported values are json, csv, xml, text",
                value
            )),
        }
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Encode `value` with a known output format.
pub fn format_value(value: Value, format: OutputFormat) -> Outcome<Value> {
    match format {
        OutputFormat::Json => to_json(value),
        OutputFormat::Csv => to_csv(&value).map(Value::String),
        OutputFormat::Xml => to_xml(&value).map(Value::String),
        OutputFormat::Text => Outcome::Ok(to_text(value)),
    }
}

/// Encode `value` with a format named by a task. Unknown names leave the
/// value untouched.
pub fn format_output(value: Value, format: &str) -> Outcome<Value> {
    match format.parse::<OutputFormat>() {
        Ok(format) => format_value(value, format),
        Err(reason) => {
            tracing::warn!(format = %format, "unsupported output format; returning data unchanged");
            Outcome::degraded(value, reason)
        }
    }
}
