use flowsmith::core::config::{ConfigLoader, FlowsmithConfig};
use flowsmith::core::format::OutputFormat;
use flowsmith::core::DataProcessor;
use flowsmith::logging::ConsoleOutput;
use flowsmith::types::{DataProcessingParams, Task};
use serde_json::json;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_flowsmith_env() {
    for v in &[
        "FLOWSMITH_CACHE_CAPACITY",
        "FLOWSMITH_CACHE_INPUT_PREFIX_CHARS",
        "FLOWSMITH_OUTPUT_DEFAULT_FORMAT",
        "FLOWSMITH_LOG_LEVEL",
        "FLOWSMITH_CONSOLE_OUTPUT",
    ] {
        env::remove_var(v);
    }
}

/// Test integration of config loading with environment variables
#[test]
#[serial]
fn test_config_loading_integration() {
    clear_flowsmith_env();
    let temp_dir = TempDir::new().unwrap();
    let workspace_path = temp_dir.path();

    let config_content = r#"
[cache]
capacity = 10
input_prefix_chars = 20

[output]
default_format = "xml"

[logging]
default_level = "flowsmith=debug"
console_output = "none"
"#;
    fs::write(workspace_path.join("flowsmith.toml"), config_content).unwrap();

    let config = ConfigLoader::load_from_workspace(workspace_path).unwrap();

    assert_eq!(config.cache.capacity, 10);
    assert_eq!(config.cache.input_prefix_chars, 20);
    assert_eq!(config.output.default_format, OutputFormat::Xml);
    assert_eq!(config.logging.default_level, "flowsmith=debug");
    assert_eq!(config.logging.console_output, Some(ConsoleOutput::None));
}

#[test]
#[serial]
fn test_env_overrides_take_precedence() {
    clear_flowsmith_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("flowsmith.toml"),
        "[cache]\ncapacity = 10\n\n[output]\ndefault_format = \"csv\"\n",
    )
    .unwrap();

    env::set_var("FLOWSMITH_CACHE_CAPACITY", "3");
    env::set_var("FLOWSMITH_OUTPUT_DEFAULT_FORMAT", "TEXT");
    env::set_var("FLOWSMITH_LOG_LEVEL", "warn");

    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    assert_eq!(config.cache.capacity, 3);
    assert_eq!(config.output.default_format, OutputFormat::Text);
    assert_eq!(config.logging.default_level, "warn");

    clear_flowsmith_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_flowsmith_env();
    let temp_dir = TempDir::new().unwrap();

    env::set_var("FLOWSMITH_CACHE_CAPACITY", "lots");
    env::set_var("FLOWSMITH_OUTPUT_DEFAULT_FORMAT", "yaml");

    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    assert_eq!(config, FlowsmithConfig::default());

    clear_flowsmith_env();
}

#[test]
#[serial]
fn test_zero_capacity_from_env_is_rejected() {
    clear_flowsmith_env();
    let temp_dir = TempDir::new().unwrap();
    env::set_var("FLOWSMITH_CACHE_CAPACITY", "0");

    let err = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap_err();
    assert_eq!(err.code, "CFG-VALID-001");

    clear_flowsmith_env();
}

#[test]
#[serial]
fn test_invalid_log_directive_is_rejected() {
    clear_flowsmith_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("flowsmith.toml"),
        "[logging]\ndefault_level = \"flowsmith=loud\"\n",
    )
    .unwrap();

    let err = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap_err();
    assert_eq!(err.code, "CFG-VALID-002");
    assert!(err.recovery_suggestions[0].contains("flowsmith=debug"));
}

#[test]
#[serial]
fn test_configured_processor_uses_default_format_and_capacity() {
    clear_flowsmith_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("flowsmith.toml"),
        "[cache]\ncapacity = 1\n\n[output]\ndefault_format = \"csv\"\n",
    )
    .unwrap();
    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    let processor = DataProcessor::from_config(&config);

    let task = Task::new("cfg", "Configured", "action")
        .with_parameters(DataProcessingParams::default().into());
    let result = processor
        .process(Some(&task), Some(json!([{"a": 1}])))
        .unwrap();
    assert_eq!(result.data, json!("a\n1"));

    processor
        .process(Some(&task), Some(json!([{"a": 2}])))
        .unwrap();
    assert_eq!(processor.cache().len(), 1);
    assert_eq!(processor.computations(), 2);
}
