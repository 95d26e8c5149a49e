//! CLI definitions for ReadAll.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ReadAll CLI.
#[derive(Parser)]
#[command(name = "readall")]
#[command(about = "Select, mark read and deselect every message in a webmail tab")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.readall/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chrome remote debugging endpoint, overrides the config file
    #[arg(short, long, global = true, env = "READALL_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Only consider tabs whose URL contains this text
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Commands {
    /// Run the workflow once on the matching tab (default)
    Run,

    /// List open tabs with the provider each resolves to
    Detect,

    /// Print the provider order and the hosts each one answers to
    Providers,
}
