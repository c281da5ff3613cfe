use crate::logging::console::ConsoleOutput;
use crate::Result;
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing_subscriber::filter::Directive;

const DEFAULT_LEVEL: &str = "info";

/// `[logging]` section of flowsmith.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub console_output: Option<ConsoleOutput>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            console_output: None,
        }
    }
}

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

impl LoggingConfig {
    /// Apply `FLOWSMITH_LOG_LEVEL` and `FLOWSMITH_CONSOLE_OUTPUT`. Unparseable
    /// sink names are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("FLOWSMITH_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.default_level = level;
            }
        }

        if let Ok(raw) = env::var("FLOWSMITH_CONSOLE_OUTPUT") {
            if let Ok(output) = raw.parse::<ConsoleOutput>() {
                self.console_output = Some(output);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        Directive::from_str(&self.default_level)
            .map_err(|_| anyhow!("logging.default_level must be a valid tracing directive"))?;
        Ok(())
    }
}
