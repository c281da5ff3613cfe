pub mod config;
pub mod console;

pub use config::LoggingConfig;
pub use console::ConsoleOutput;

use crate::Result;
use anyhow::{anyhow, Context};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Handle describing the sinks chosen during initialization.
#[derive(Debug)]
pub struct LoggingGuard {
    console_output: ConsoleOutput,
}

impl LoggingGuard {
    /// Returns the console output configuration used during initialization.
    pub fn console_output(&self) -> ConsoleOutput {
        self.console_output
    }
}

/// Initialize tracing for the process.
///
/// `RUST_LOG` takes precedence over `config.default_level`. Pass
/// `stdout_reserved` when the command writes its result to stdout. Errors when
/// invoked more than once per process.
pub fn init(config: &LoggingConfig, stdout_reserved: bool) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    config.validate()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .context("failed to configure tracing level")?;

    let console_output = console::select_console_output(stdout_reserved, config.console_output);
    let console_layer = console::console_layer::<Registry>(console_output);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LoggingGuard { console_output })
}

#[cfg(test)]
/// Reset the initialization guard so tests can exercise `init` repeatedly.
pub fn reset_for_tests() {
    LOGGER_INITIALIZED.store(false, Ordering::SeqCst);
}
