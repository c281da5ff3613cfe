use crate::core::outcome::Outcome;
use crate::utils::values::display_text;
use indexmap::IndexSet;
use serde_json::{Map, Value};

/// Placeholder emitted when the value has no tabular shape.
pub const CSV_FALLBACK: &str = "data,in,csv,format";

pub fn to_csv(value: &Value) -> Outcome<String> {
    match value {
        Value::Array(items) => Outcome::Ok(rows_to_csv(items)),
        Value::Object(record) => Outcome::Ok(record_to_csv(record)),
        _ => Outcome::degraded(
            CSV_FALLBACK.to_string(),
            "CSV output requires an array or object",
        ),
    }
}

/// Header is the union of keys across records, in order of first appearance.
fn rows_to_csv(items: &[Value]) -> String {
    let mut headers: IndexSet<&str> = IndexSet::new();
    for item in items {
        if let Value::Object(record) = item {
            headers.extend(record.keys().map(String::as_str));
        }
    }

    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(join_cells(headers.iter().map(|header| escape_cell(header))));
    for item in items {
        let row = headers
            .iter()
            .map(|header| item.get(*header).map(cell).unwrap_or_default());
        lines.push(join_cells(row));
    }
    lines.join("\n")
}

fn record_to_csv(record: &Map<String, Value>) -> String {
    let header = join_cells(record.keys().map(|key| escape_cell(key)));
    let values = join_cells(record.values().map(cell));
    format!("{}\n{}", header, values)
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(",")
}

fn cell(value: &Value) -> String {
    escape_cell(&display_text(value))
}

fn escape_cell(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
