use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Task definition (JSON) whose parameters drive the pipeline
    #[arg(long, value_name = "FILE")]
    pub task: PathBuf,

    /// Input payload; JSON is parsed, anything else is passed through as text (default: stdin)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Run the same invocation this many times against one processor (default: 1)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub repeat: u32,
}

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Output format: json, csv, xml, text or txt
    #[arg(long, value_name = "FORMAT")]
    pub format: String,

    /// JSON payload to encode (default: stdin)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckTaskArgs {
    /// Task definition (JSON) to inspect
    #[arg(long, value_name = "FILE")]
    pub task: PathBuf,
}
