use crate::core::outcome::Outcome;
use serde_json::Value;
use std::fmt::Write;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const ROOT_TAG: &str = "data";
const ITEM_TAG: &str = "item";
const INDENT: &str = "  ";
const MAX_DEPTH: usize = 128;

/// Document returned when the value cannot be rendered.
pub const XML_ERROR_DOCUMENT: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<error>Failed to convert data to XML</error>";

#[derive(Debug)]
enum XmlError {
    TooDeep,
    Write(std::fmt::Error),
}

impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            XmlError::TooDeep => write!(f, "value nests deeper than {} levels", MAX_DEPTH),
            XmlError::Write(err) => write!(f, "failed to write XML: {}", err),
        }
    }
}

impl From<std::fmt::Error> for XmlError {
    fn from(err: std::fmt::Error) -> Self {
        XmlError::Write(err)
    }
}

pub fn to_xml(value: &Value) -> Outcome<String> {
    let mut body = String::new();
    match render(&mut body, ROOT_TAG, value, 0) {
        Ok(()) => Outcome::Ok(format!("{}\n{}", DECLARATION, body.trim_end())),
        Err(err) => {
            tracing::warn!(error = %err, "XML conversion failed; emitting error document");
            Outcome::degraded(XML_ERROR_DOCUMENT.to_string(), err.to_string())
        }
    }
}

fn render(out: &mut String, tag: &str, value: &Value, depth: usize) -> Result<(), XmlError> {
    if depth > MAX_DEPTH {
        return Err(XmlError::TooDeep);
    }
    let indent = INDENT.repeat(depth);

    match value {
        Value::Null => writeln!(out, "{}<{}/>", indent, tag)?,
        Value::Bool(_) | Value::Number(_) => {
            writeln!(out, "{}<{}>{}</{}>", indent, tag, value, tag)?
        }
        Value::String(text) => writeln!(out, "{}<{}>{}</{}>", indent, tag, escape(text), tag)?,
        Value::Array(items) if items.is_empty() => writeln!(out, "{}<{}></{}>", indent, tag, tag)?,
        Value::Object(record) if record.is_empty() => {
            writeln!(out, "{}<{}></{}>", indent, tag, tag)?
        }
        Value::Array(items) => {
            writeln!(out, "{}<{}>", indent, tag)?;
            for item in items {
                render(out, ITEM_TAG, item, depth + 1)?;
            }
            writeln!(out, "{}</{}>", indent, tag)?;
        }
        Value::Object(record) => {
            writeln!(out, "{}<{}>", indent, tag)?;
            for (key, child) in record {
                render(out, &sanitize_tag(key), child, depth + 1)?;
            }
            writeln!(out, "{}</{}>", indent, tag)?;
        }
    }
    Ok(())
}

/// Restrict a key to `[A-Za-z0-9_-]`, keeping the result a legal element name.
fn sanitize_tag(key: &str) -> String {
    let sanitized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    match sanitized.chars().next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => sanitized,
        _ => format!("_{}", sanitized),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
