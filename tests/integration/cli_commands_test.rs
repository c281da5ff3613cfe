use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BIN: &str = "flowsmith";

const TASK: &str = r#"{
  "id": "cli-task",
  "name": "CLI task",
  "type": "action",
  "parameters": {
    "actionType": "dataProcessing",
    "transformations": [
      {"type": "sort", "config": {"field": "n", "direction": "asc"}},
      {"type": "explode"}
    ],
    "outputFormat": "csv"
  }
}"#;

fn flowsmith(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("binary should build");
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("FLOWSMITH_CACHE_CAPACITY")
        .env_remove("FLOWSMITH_CACHE_INPUT_PREFIX_CHARS")
        .env_remove("FLOWSMITH_OUTPUT_DEFAULT_FORMAT")
        .env_remove("FLOWSMITH_LOG_LEVEL")
        .env_remove("FLOWSMITH_CONSOLE_OUTPUT");
    cmd
}

fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("task.json"), TASK).unwrap();
    fs::write(
        dir.path().join("input.json"),
        r#"[{"n": 3, "label": "c"}, {"n": 1, "label": "a"}]"#,
    )
    .unwrap();
    dir
}

#[test]
fn version_flag_prints_crate_version() {
    let dir = TempDir::new().unwrap();
    flowsmith(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(starts_with(format!("{BIN} {}", flowsmith::VERSION)));
}

#[test]
fn help_lists_pipeline_commands() {
    let dir = TempDir::new().unwrap();
    flowsmith(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("PIPELINE COMMANDS"))
        .stdout(contains("process"))
        .stdout(contains("check-task"));
}

#[test]
fn process_prints_result_with_metadata() {
    let dir = workspace();
    let output = flowsmith(dir.path())
        .args(["process", "--task", "task.json", "--input", "input.json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["data"], "n,label\n1,a\n3,c");
    assert_eq!(result["metadata"]["taskId"], "cli-task");
    assert_eq!(result["metadata"]["transformations"], 1);
    assert_eq!(result["metadata"]["validated"], false);
}

#[test]
fn process_reads_input_from_stdin() {
    let dir = workspace();
    flowsmith(dir.path())
        .args(["process", "--task", "task.json", "--input", "-"])
        .write_stdin(r#"[{"n": 2}, {"n": 1}]"#)
        .assert()
        .success()
        .stdout(contains(r#""data": "n\n1\n2""#));
}

#[test]
fn process_repeat_logs_cache_hits() {
    let dir = workspace();
    flowsmith(dir.path())
        .env("FLOWSMITH_LOG_LEVEL", "info")
        .args([
            "process", "--task", "task.json", "--input", "input.json", "--repeat", "3",
        ])
        .assert()
        .success()
        .stderr(contains("cache_hit=true"))
        .stderr(contains("computations=1"));
}

#[test]
fn invalid_env_override_is_logged_and_ignored() {
    let dir = workspace();
    flowsmith(dir.path())
        .env("FLOWSMITH_OUTPUT_DEFAULT_FORMAT", "yaml")
        .args(["check-task", "--task", "task.json"])
        .assert()
        .success()
        .stdout(contains("Output format: csv"))
        .stderr(contains("environment override ignored"))
        .stderr(contains("FLOWSMITH_OUTPUT_DEFAULT_FORMAT"))
        .stderr(contains("yaml"));
}

#[test]
fn process_without_parameters_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("task.json"),
        r#"{"id": "bare", "name": "Bare", "type": "action"}"#,
    )
    .unwrap();

    flowsmith(dir.path())
        .args(["process", "--task", "task.json", "--input", "-"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(contains("PIPE-PARAMS-001"));
}

#[test]
fn format_encodes_payload_directly() {
    let dir = workspace();
    flowsmith(dir.path())
        .args(["format", "--format", "xml", "--input", "input.json"])
        .assert()
        .success()
        .stdout(starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<data>\n  <item>"));
}

#[test]
fn check_task_flags_unknown_steps() {
    let dir = workspace();
    flowsmith(dir.path())
        .args(["check-task", "--task", "task.json"])
        .assert()
        .success()
        .stdout(contains("Action type: dataProcessing"))
        .stdout(contains("2. explode (unknown, skipped)"))
        .stdout(contains("Output format: csv"));
}

#[test]
fn workspace_config_sets_default_format() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("task.json"),
        r#"{"id": "t", "name": "T", "type": "action", "parameters": {}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("flowsmith.toml"),
        "[output]\ndefault_format = \"text\"\n",
    )
    .unwrap();

    flowsmith(dir.path())
        .args(["process", "--task", "task.json", "--input", "-"])
        .write_stdin(r#"{"a": 1}"#)
        .assert()
        .success()
        .stdout(contains(r#""data": "{\"a\":1}""#));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = workspace();
    flowsmith(dir.path())
        .args(["--config", "absent.toml", "check-task", "--task", "task.json"])
        .assert()
        .failure()
        .stderr(contains("absent.toml"));
}
