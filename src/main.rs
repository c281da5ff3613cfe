use clap::Parser;
use flowsmith::cli::{self, Args};

fn main() -> flowsmith::Result<()> {
    let args = Args::parse();
    cli::run(args)
}
