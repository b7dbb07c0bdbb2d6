//! CLI definitions and command implementations for the grace demo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod error;
pub mod init;
pub mod run;

/// grace — run heartbeat workers until a stop signal or timeout.
#[derive(Debug, Parser)]
#[command(name = "grace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a default TOML configuration file.
    Init {
        /// Output path for the configuration file.
        #[arg(short, long, default_value = "grace.toml")]
        output: PathBuf,

        /// Overwrite the file if it already exists.
        #[arg(long, default_value_t = false)]
        force: bool,

        /// Number of heartbeat workers to configure.
        #[arg(short, long, default_value_t = 2)]
        workers: usize,

        /// Forced-stop timeout in seconds; omit to stop on signal only.
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Run the demo workers until a stop signal, a timeout, or a failure.
    Run {
        /// Path to the TOML configuration file.
        #[arg(short, long, env = "GRACE_CONFIG", default_value = "grace.toml")]
        config: PathBuf,

        /// Force a clean stop after this many seconds; overrides the config.
        #[arg(short, long, env = "GRACE_TIMEOUT")]
        timeout: Option<u64>,
    },
}
