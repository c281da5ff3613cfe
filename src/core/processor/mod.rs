#![allow(clippy::result_large_err)] // AppError carries context the CLI reports verbatim.

//! Pipeline orchestration: input normalization, the transformation chain,
//! validation and formatting, memoized per invocation fingerprint.

use crate::core::cache::{Fingerprint, ResultCache, DEFAULT_INPUT_PREFIX_CHARS};
use crate::core::config::FlowsmithConfig;
use crate::core::error::AppError;
use crate::core::format::{format_output, format_value, OutputFormat};
use crate::core::input::normalize_input;
use crate::core::outcome::Outcome;
use crate::core::transform::apply_all;
use crate::core::types::{ErrorCategory, PipelineStage};
use crate::core::validator::validate;
use chrono::Utc;
use flowsmith_types::{ProcessingMetadata, ProcessingResult, Task, TaskParameters};
use serde::Serialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Knobs that influence how a pipeline run is keyed and encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorSettings {
    pub input_prefix_chars: usize,
    pub default_format: OutputFormat,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            input_prefix_chars: DEFAULT_INPUT_PREFIX_CHARS,
            default_format: OutputFormat::default(),
        }
    }
}

/// A recoverable fallback taken while computing a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub stage: PipelineStage,
    pub reason: String,
}

/// What happened during one `process_traced` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingTrace {
    pub fingerprint: Fingerprint,
    pub cache_hit: bool,
    /// Empty on a cache hit; degradations belong to the run that computed the entry.
    pub degradations: Vec<Degradation>,
}

impl ProcessingTrace {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

pub struct DataProcessor {
    cache: Arc<ResultCache>,
    settings: ProcessorSettings,
    computations: AtomicU64,
}

impl DataProcessor {
    pub fn new(cache: Arc<ResultCache>) -> Self {
        Self::with_settings(cache, ProcessorSettings::default())
    }

    pub fn with_settings(cache: Arc<ResultCache>, settings: ProcessorSettings) -> Self {
        DataProcessor {
            cache,
            settings,
            computations: AtomicU64::new(0),
        }
    }

    /// Build a processor with a fresh cache sized from `config`.
    pub fn from_config(config: &FlowsmithConfig) -> Self {
        let cache = Arc::new(ResultCache::new(config.cache.capacity));
        Self::with_settings(
            cache,
            ProcessorSettings {
                input_prefix_chars: config.cache.input_prefix_chars,
                default_format: config.output.default_format,
            },
        )
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn settings(&self) -> ProcessorSettings {
        self.settings
    }

    /// Number of pipeline runs that missed the cache.
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }

    pub fn process(
        &self,
        task: Option<&Task>,
        input: Option<Value>,
    ) -> Result<Arc<ProcessingResult>, AppError> {
        self.process_traced(task, input).map(|(result, _)| result)
    }

    pub fn process_traced(
        &self,
        task: Option<&Task>,
        input: Option<Value>,
    ) -> Result<(Arc<ProcessingResult>, ProcessingTrace), AppError> {
        let task = task.ok_or_else(|| {
            AppError::new(ErrorCategory::ValidationError, "Task is required")
                .with_code("PIPE-TASK-001")
                .with_suggestion("Pass a task definition with id, name and type")
        })?;
        let parameters = task.parameters.as_ref().ok_or_else(|| {
            let mut error =
                AppError::new(ErrorCategory::ValidationError, "Task parameters are required")
                    .with_code("PIPE-PARAMS-001")
                    .with_suggestion("Add a parameters object with an actionType to the task");
            error.add_context("task_id", &task.id);
            error
        })?;

        let fingerprint = Fingerprint::compute(
            &task.id,
            &parameters.to_value(),
            input.as_ref(),
            self.settings.input_prefix_chars,
        );

        if let Some(cached) = self.cache.get(&fingerprint) {
            tracing::debug!(task_id = %task.id, %fingerprint, "result cache hit");
            return Ok((
                cached,
                ProcessingTrace {
                    fingerprint,
                    cache_hit: true,
                    degradations: Vec::new(),
                },
            ));
        }

        self.computations.fetch_add(1, Ordering::Relaxed);
        let mut degradations = Vec::new();
        let result = Arc::new(self.run_pipeline(task, parameters, input, &mut degradations));

        if let Some((evicted, _)) = self.cache.insert(fingerprint.clone(), Arc::clone(&result)) {
            tracing::debug!(fingerprint = %evicted, "evicted oldest cached result");
        }
        tracing::info!(
            task_id = %task.id,
            transformations = result.metadata.transformations,
            degraded = !degradations.is_empty(),
            "task processed"
        );

        Ok((
            result,
            ProcessingTrace {
                fingerprint,
                cache_hit: false,
                degradations,
            },
        ))
    }

    fn run_pipeline(
        &self,
        task: &Task,
        parameters: &TaskParameters,
        input: Option<Value>,
        degradations: &mut Vec<Degradation>,
    ) -> ProcessingResult {
        let mut record = |stage: PipelineStage, outcome: Outcome<Value>| -> Value {
            let (value, reason) = outcome.into_parts();
            if let Some(reason) = reason {
                degradations.push(Degradation { stage, reason });
            }
            value
        };

        let data = record(PipelineStage::Input, normalize_input(input));

        let (data, applied, validated) = match parameters {
            TaskParameters::DataProcessing(params) => {
                let (chained, reason) = apply_all(data, &params.transformations).into_parts();
                let data = record(
                    PipelineStage::Transform,
                    match reason {
                        Some(reason) => Outcome::degraded(chained.value, reason),
                        None => Outcome::Ok(chained.value),
                    },
                );

                let rules = params.validation_rules.as_ref().filter(|_| params.validation);
                let data = match rules {
                    Some(rules) => record(PipelineStage::Validation, validate(data, rules)),
                    None => data,
                };

                let formatted = match params.output_format.as_deref() {
                    Some(format) => format_output(data, format),
                    None => format_value(data, self.settings.default_format),
                };
                (
                    record(PipelineStage::Format, formatted),
                    chained.applied,
                    rules.is_some(),
                )
            }
            TaskParameters::Other { action_type, .. } => {
                tracing::debug!(task_id = %task.id, %action_type, "no transformations for action type");
                let formatted = format_value(data, self.settings.default_format);
                (record(PipelineStage::Format, formatted), 0, false)
            }
        };

        ProcessingResult {
            data,
            metadata: ProcessingMetadata {
                processed_at: Utc::now(),
                task_id: task.id.clone(),
                task_name: task.name.clone(),
                task_type: task.task_type.clone(),
                action_type: parameters.action_type().to_string(),
                transformations: applied,
                validated,
            },
        }
    }
}

impl Default for DataProcessor {
    fn default() -> Self {
        Self::new(Arc::new(ResultCache::default()))
    }
}
