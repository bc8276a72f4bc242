//! Command-line argument parsing for rcondeck
//!
//! Uses clap for argument parsing with derive macros.

use clap::Parser;
use std::path::PathBuf;

/// rcondeck - terminal dashboard for RCON servers and their containers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the config file
    ///
    /// Defaults to ./config.yaml, then ~/.config/rcondeck/config.yaml.
    /// Files ending in .toml are parsed as TOML, anything else as YAML.
    #[arg(long, short = 'c', env = "RCONDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter for the diagnostic log file (overrides RCONDECK_LOG)
    ///
    /// Example: --log-level rcondeck_client=debug,rcondeck_protocol=trace
    #[arg(long)]
    pub log_level: Option<String>,

    /// Validate the config, print the server list, and exit
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// Container management program (overrides container.program)
    #[arg(long)]
    pub container_program: Option<String>,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
