//! grace demo CLI
//!
//! Runs a handful of heartbeat workers under the [`grace::Grace`]
//! coordinator so shutdown behaviour can be watched from a terminal.
//!
//! ```sh
//! grace init                # Generate default grace.toml
//! grace run --timeout 10    # Run until a signal or 10 seconds pass
//! ```

mod cmd;
mod config;
mod telemetry;

use clap::Parser;
use cmd::{Cli, Commands};

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            output,
            force,
            workers,
            timeout,
        } => cmd::init::run(&output, force, workers, timeout),
        Commands::Run { config, timeout } => cmd::run::run(&config, timeout).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
