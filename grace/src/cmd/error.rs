//! Errors of the demo CLI.

use thiserror::Error;

/// Failure of a `grace` subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file could not be resolved, read, parsed, or written.
    #[error("config: {0}")]
    Config(String),

    /// The coordinator failed to start or a worker failed.
    #[error(transparent)]
    Grace(#[from] grace::Error),
}

impl CliError {
    /// Creates a configuration error from a message and its underlying cause.
    pub fn config(msg: impl std::fmt::Display, err: impl std::fmt::Display) -> Self {
        Self::Config(format!("{msg}: {err}"))
    }
}
