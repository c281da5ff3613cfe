pub mod args;
pub mod commands;

pub use args::{CheckTaskArgs, FormatArgs, ProcessArgs};
use crate::core::config::ConfigLoader;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
PIPELINE COMMANDS:\n{subcommands}\n";

#[derive(Parser, Debug)]
#[command(name = "flowsmith")]
#[command(version = crate::VERSION)]
#[command(about = "Declarative data-processing pipeline for workflow tasks")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: check a task definition, then process input through it. Configuration is read from ./flowsmith.toml unless --config is given."
)]
pub struct Args {
    /// Configuration file (default: ./flowsmith.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Run a task's pipeline over an input payload",
        long_about = "Process normalizes the input, applies the task's transformations in order, validates and formats the data, and prints the result with its metadata as JSON.",
        after_help = "Example:\n    flowsmith process --task task.json --input data.json --repeat 3"
    )]
    Process(ProcessArgs),
    #[command(
        about = "Encode a JSON payload in an output format",
        long_about = "Format applies one output encoder (json, csv, xml, text) to a payload without running any transformations.",
        after_help = "Example:\n    flowsmith format --format csv --input rows.json"
    )]
    Format(FormatArgs),
    #[command(
        about = "Inspect a task definition",
        long_about = "Check-task parses a task file and reports its action type, transformation steps (flagging unknown kinds) and resolved output format.",
        after_help = "Example:\n    flowsmith check-task --task task.json"
    )]
    CheckTask(CheckTaskArgs),
}

pub fn run(args: Args) -> crate::Result<()> {
    let config = commands::load_config(args.config.as_deref())?;
    let _guard = crate::logging::init(&config.logging, true)?;
    for rejected in ConfigLoader::rejected_env_overrides() {
        tracing::warn!(
            variable = rejected.variable,
            value = %rejected.value,
            reason = %rejected.reason,
            "environment override ignored"
        );
    }

    let output = match args.command {
        Command::Process(process_args) => commands::process(&config, process_args)?,
        Command::Format(format_args) => commands::format(format_args)?,
        Command::CheckTask(check_args) => commands::check_task(&config, check_args)?,
    };
    println!("{}", output);
    Ok(())
}
