#![allow(clippy::result_large_err)]

use super::FlowsmithConfig;
use crate::core::error::AppError;
use crate::core::format::OutputFormat;
use crate::core::types::ErrorCategory;
use crate::logging::ConsoleOutput;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const CONFIG_FILE_NAME: &str = "flowsmith.toml";

/// An environment override that was set but could not be parsed, so the
/// file or default value stayed in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    pub variable: &'static str,
    pub value: String,
    pub reason: String,
}

impl fmt::Display for RejectedOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}='{}' ignored: {}", self.variable, self.value, self.reason)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from `<workspace>/flowsmith.toml`, falling back to defaults
    /// when the file is absent. Environment variables override file values.
    pub fn load_from_workspace(workspace_path: &Path) -> Result<FlowsmithConfig, AppError> {
        Self::load_with_overrides(&workspace_path.join(CONFIG_FILE_NAME))
    }

    /// Load an explicit config file with environment overrides applied.
    pub fn load_with_overrides(path: &Path) -> Result<FlowsmithConfig, AppError> {
        let mut config = Self::load_from_file(path)?.unwrap_or_default();
        Self::apply_env_overrides(&mut config);
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load config from specific file path
    /// Returns Ok(None) if file doesn't exist
    pub fn load_from_file(path: &Path) -> Result<Option<FlowsmithConfig>, AppError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCategory::IoError,
                format!("Failed to read config file {}", path.display()),
                Box::new(e),
            )
            .with_code("CFG-READ-001")
        })?;

        let config: FlowsmithConfig = toml::from_str(&content).map_err(|e| {
            AppError::with_source(
                ErrorCategory::ConfigError,
                format!("Failed to parse config file {}", path.display()),
                Box::new(e),
            )
            .with_code("CFG-PARSE-001")
            .with_suggestion("Supported sections are [cache], [output] and [logging]")
        })?;

        Ok(Some(config))
    }

    /// Apply environment variable overrides to the configuration
    /// Environment variables take precedence over config file values
    fn apply_env_overrides(config: &mut FlowsmithConfig) {
        if let Ok(capacity_str) = env::var("FLOWSMITH_CACHE_CAPACITY") {
            if let Ok(capacity) = capacity_str.trim().parse::<usize>() {
                config.cache.capacity = capacity;
            }
        }

        if let Ok(prefix_str) = env::var("FLOWSMITH_CACHE_INPUT_PREFIX_CHARS") {
            if let Ok(prefix) = prefix_str.trim().parse::<usize>() {
                config.cache.input_prefix_chars = prefix;
            }
        }

        if let Ok(format_str) = env::var("FLOWSMITH_OUTPUT_DEFAULT_FORMAT") {
            if let Ok(format) = format_str.parse::<OutputFormat>() {
                config.output.default_format = format;
            }
        }

        config.logging.apply_env_overrides();
    }

    /// Overrides that are set but unparseable and were therefore skipped.
    ///
    /// Config is loaded before tracing is installed, so callers report these
    /// once logging is up.
    pub fn rejected_env_overrides() -> Vec<RejectedOverride> {
        let mut rejected = Vec::new();
        check_override::<usize>(&mut rejected, "FLOWSMITH_CACHE_CAPACITY");
        check_override::<usize>(&mut rejected, "FLOWSMITH_CACHE_INPUT_PREFIX_CHARS");
        check_override::<OutputFormat>(&mut rejected, "FLOWSMITH_OUTPUT_DEFAULT_FORMAT");
        check_override::<ConsoleOutput>(&mut rejected, "FLOWSMITH_CONSOLE_OUTPUT");
        rejected
    }

    /// Get documentation for supported environment variables
    pub fn env_var_documentation() -> &'static [&'static str] {
        &[
            "FLOWSMITH_CACHE_CAPACITY - Override result cache capacity (default: 50)",
            "FLOWSMITH_CACHE_INPUT_PREFIX_CHARS - Override how many input characters form the cache key (default: 100)",
            "FLOWSMITH_OUTPUT_DEFAULT_FORMAT - Override the format used when a task names none (json/csv/xml/text)",
            "FLOWSMITH_LOG_LEVEL - Override the default tracing level (RUST_LOG still wins)",
            "FLOWSMITH_CONSOLE_OUTPUT - Override the console log sink (stdout/stderr/none)",
        ]
    }

    /// Validate configuration values
    pub fn validate_config(config: &FlowsmithConfig) -> Result<(), AppError> {
        if config.cache.capacity == 0 {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "cache.capacity must be at least 1",
            )
            .with_code("CFG-VALID-001")
            .with_suggestion("Set cache.capacity or FLOWSMITH_CACHE_CAPACITY to 1 or more"));
        }

        config.logging.validate().map_err(|e| {
            AppError::new(ErrorCategory::ConfigError, e.to_string())
                .with_code("CFG-VALID-002")
                .with_suggestion("Use a level such as info or a directive such as flowsmith=debug")
        })?;

        Ok(())
    }
}

fn check_override<T>(rejected: &mut Vec<RejectedOverride>, variable: &'static str)
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Ok(value) = env::var(variable) else {
        return;
    };
    if let Err(err) = value.trim().parse::<T>() {
        rejected.push(RejectedOverride {
            variable,
            value,
            reason: err.to_string(),
        });
    }
}
