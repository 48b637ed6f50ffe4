use std::path::PathBuf;

use clap::Parser;

/// Tabshell: a minimal multi-tab browser shell.
#[derive(Parser, Debug)]
#[command(name = "tabshell", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
