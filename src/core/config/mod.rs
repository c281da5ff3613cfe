pub mod loader;

pub use loader::ConfigLoader;

use crate::core::cache::{DEFAULT_CACHE_CAPACITY, DEFAULT_INPUT_PREFIX_CHARS};
use crate::core::format::OutputFormat;
use crate::logging::config::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Main flowsmith configuration loaded from flowsmith.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlowsmithConfig {
    /// Result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Result cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached results
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Number of serialized input characters that take part in the cache key
    #[serde(default = "default_input_prefix_chars")]
    pub input_prefix_chars: usize,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Format used when a task does not name one
    #[serde(default)]
    pub default_format: OutputFormat,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            input_prefix_chars: default_input_prefix_chars(),
        }
    }
}

fn default_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_input_prefix_chars() -> usize {
    DEFAULT_INPUT_PREFIX_CHARS
}
