use flowsmith::core::format::{
    format_output, format_value, to_csv, to_xml, OutputFormat, CSV_FALLBACK, XML_ERROR_DOCUMENT,
};
use flowsmith::core::outcome::Outcome;
use insta::assert_snapshot;
use serde_json::{json, Value};

fn text(outcome: Outcome<Value>) -> String {
    match outcome.into_value() {
        Value::String(text) => text,
        other => panic!("expected encoded text, got {}", other),
    }
}

#[test]
fn test_csv_header_is_union_of_keys() {
    let csv = text(format_output(json!([{"a": 1}, {"b": 2}]), "csv"));
    assert_eq!(csv, "a,b\n1,\n,2");
}

#[test]
fn test_csv_quotes_and_nested_values() {
    let rows = json!([
        {"name": "Doe, Jane", "tags": ["vip", "eu"], "note": null},
        {"name": "Roe \"RJ\" Richard", "note": "line\nbreak"}
    ]);
    assert_snapshot!(to_csv(&rows).into_value(), @r###"
    name,tags,note
    "Doe, Jane","[""vip"",""eu""]",
    "Roe ""RJ"" Richard",,"line
    break"
    "###);
}

#[test]
fn test_csv_of_scalar_uses_placeholder() {
    let outcome = format_output(json!(42), "CSV");
    assert!(outcome.is_degraded());
    assert_eq!(text(outcome), CSV_FALLBACK);
}

#[test]
fn test_xml_document_layout() {
    let doc = to_xml(&json!({
        "order id": 7,
        "items": [{"sku": "A-1", "qty": 2}],
        "note": "<fragile> & 'urgent'",
        "gift": null,
        "tags": []
    }))
    .into_value();
    assert_snapshot!(doc, @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <data>
      <order_id>7</order_id>
      <items>
        <item>
          <sku>A-1</sku>
          <qty>2</qty>
        </item>
      </items>
      <note>&lt;fragile&gt; &amp; &apos;urgent&apos;</note>
      <gift/>
      <tags></tags>
    </data>
    "###);
}

#[test]
fn test_xml_too_deep_degrades_to_error_document() {
    let mut value = json!({"leaf": true});
    for _ in 0..200 {
        value = json!({ "nested": value });
    }
    let outcome = format_value(value, OutputFormat::Xml);
    assert!(outcome.is_degraded());
    assert_eq!(text(outcome), XML_ERROR_DOCUMENT);
}

#[test]
fn test_json_output_parses_back_to_input() {
    let values = vec![
        json!({"a": [1, 2.5, {"b": null}], "c": "text"}),
        json!([true, false]),
        json!(3),
        json!(null),
    ];
    for value in values {
        let encoded = text(format_output(value.clone(), "json"));
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, value);
    }
}

#[test]
fn test_json_keeps_key_order() {
    let encoded = text(format_output(json!({"z": 1, "a": 2}), "json"));
    assert_eq!(encoded, "{\n  \"z\": 1,\n  \"a\": 2\n}");
}

#[test]
fn test_text_is_identity_on_strings() {
    for input in ["hello", "", "{\"not\": \"parsed\"}"] {
        let out = format_output(json!(input), "text");
        assert_eq!(out, Outcome::Ok(json!(input)));
        let again = format_output(out.into_value(), "txt");
        assert_eq!(again, Outcome::Ok(json!(input)));
    }
}

#[test]
fn test_unsupported_format_returns_value_unchanged() {
    let value = json!([{"a": 1}]);
    let outcome = format_output(value.clone(), "yaml");
    assert!(outcome.is_degraded());
    assert_eq!(outcome.into_value(), value);
}
