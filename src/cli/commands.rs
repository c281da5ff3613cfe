use crate::{
    cli::args::{CheckTaskArgs, FormatArgs, ProcessArgs},
    core::{
        format::{format_output, OutputFormat},
        ConfigLoader, DataProcessor, FlowsmithConfig,
    },
    utils::serialization::{load_task, read_payload, PayloadSource},
    Result,
};
use anyhow::{anyhow, Context};
use flowsmith_types::{Task, TaskParameters};
use serde_json::Value;
use std::env;
use std::path::Path;

/// Resolve configuration from an explicit file or the working directory.
pub fn load_config(path: Option<&Path>) -> Result<FlowsmithConfig> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("config file {} does not exist", path.display()));
            }
            ConfigLoader::load_with_overrides(path)?
        }
        None => {
            let cwd = env::current_dir().context("failed to resolve working directory")?;
            ConfigLoader::load_from_workspace(&cwd)?
        }
    };
    Ok(config)
}

pub fn process(config: &FlowsmithConfig, args: ProcessArgs) -> Result<String> {
    let task = load_task(&args.task)?;
    let input = read_payload(&PayloadSource::from(args.input))?;
    let processor = DataProcessor::from_config(config);

    let mut last = None;
    for run in 1..=args.repeat {
        let (result, trace) = processor.process_traced(Some(&task), input.clone())?;
        for degradation in &trace.degradations {
            tracing::warn!(stage = %degradation.stage, reason = %degradation.reason, "pipeline degraded");
        }
        tracing::info!(
            run,
            cache_hit = trace.cache_hit,
            fingerprint = %trace.fingerprint,
            "invocation complete"
        );
        last = Some(result);
    }

    tracing::info!(
        runs = args.repeat,
        computations = processor.computations(),
        cached_entries = processor.cache().len(),
        "processing finished"
    );
    let result = last.ok_or_else(|| anyhow!("--repeat must be at least 1"))?;
    serde_json::to_string_pretty(result.as_ref()).context("failed to encode processing result")
}

pub fn format(args: FormatArgs) -> Result<String> {
    let payload = read_payload(&PayloadSource::from(args.input))?.unwrap_or(Value::Null);
    let (formatted, reason) = format_output(payload, &args.format).into_parts();
    if let Some(reason) = reason {
        tracing::warn!(format = %args.format, %reason, "formatting degraded");
    }
    match formatted {
        Value::String(text) => Ok(text),
        other => serde_json::to_string_pretty(&other).context("failed to encode payload"),
    }
}

pub fn check_task(config: &FlowsmithConfig, args: CheckTaskArgs) -> Result<String> {
    let task = load_task(&args.task)?;
    Ok(describe_task(&task, config.output.default_format))
}

fn describe_task(task: &Task, default_format: OutputFormat) -> String {
    let mut lines = vec![
        format!("Task: {} ({})", task.id, task.name),
        format!("Type: {}", task.task_type),
    ];

    let Some(parameters) = task.parameters.as_ref() else {
        lines.push("Parameters: missing (processing will fail)".to_string());
        return lines.join("\n");
    };
    lines.push(format!("Action type: {}", parameters.action_type()));

    match parameters {
        TaskParameters::DataProcessing(params) => {
            if params.transformations.is_empty() {
                lines.push("Transformations: none".to_string());
            } else {
                lines.push("Transformations:".to_string());
                lines.extend(params.transformations.iter().enumerate().map(|(index, step)| {
                    let note = if step.resolved_kind().is_some() {
                        ""
                    } else {
                        " (unknown, skipped)"
                    };
                    format!("  {}. {}{}", index + 1, step.kind, note)
                }));
            }

            let format_line = match params.output_format.as_deref() {
                None => format!("{} (default)", default_format),
                Some(name) => match name.parse::<OutputFormat>() {
                    Ok(format) => format.to_string(),
                    Err(_) => format!("{} (unsupported, data returned unchanged)", name),
                },
            };
            lines.push(format!("Output format: {}", format_line));

            let validation = match (params.validation, params.validation_rules.is_some()) {
                (true, true) => "enabled",
                (true, false) => "enabled but no rules given",
                (false, _) => "disabled",
            };
            lines.push(format!("Validation: {}", validation));
        }
        TaskParameters::Other { .. } => {
            lines.push("Transformations: none".to_string());
            lines.push(format!("Output format: {} (default)", default_format));
        }
    }
    lines.join("\n")
}
