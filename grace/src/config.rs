//! Configuration loading and default template generation for the demo CLI.
//!
//! This module provides:
//!
//! - [`Config`] — Settings for `grace run`.
//! - [`load_config`] — Reads and parses a TOML configuration file.
//! - [`render_config`] / [`generate_default_config`] — Produce the commented
//!   TOML template written by `grace init`.
//!
//! # Configuration File Format
//!
//! ```toml
//! timeout_secs = 30
//! workers = 2
//! tick_ms = 1000
//! log_level = "info"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cmd::error::CliError;

/// Settings for the `run` command. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    timeout_secs: Option<u64>,
    workers: usize,
    tick_ms: u64,
    fail_after_ms: Option<u64>,
    log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            workers: 2,
            tick_ms: 1000,
            fail_after_ms: None,
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// Forced stop after this long, if set.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Number of demo workers to run.
    pub const fn workers(&self) -> usize {
        self.workers
    }

    /// Heartbeat interval of each worker.
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// When set, worker 0 fails after this long.
    pub fn fail_after(&self) -> Option<Duration> {
        self.fail_after_ms.map(Duration::from_millis)
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

/// Load configuration from a TOML file at the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be resolved, read, or parsed.
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let config_path = path.canonicalize().map_err(|e| {
        CliError::config(
            format!("failed to resolve config path '{}'", path.display()),
            e,
        )
    })?;
    let content = std::fs::read_to_string(&config_path).map_err(|e| {
        CliError::config(
            format!("failed to read config file '{}'", config_path.display()),
            e,
        )
    })?;
    toml::from_str(&content).map_err(|e| {
        CliError::config(
            format!("failed to parse TOML config '{}'", config_path.display()),
            e,
        )
    })
}

/// Parse configuration from TOML text.
///
/// # Errors
///
/// Returns an error if `content` is not a valid configuration.
pub fn parse_config(content: &str) -> Result<Config, CliError> {
    toml::from_str(content).map_err(|e| CliError::config("invalid configuration", e))
}

/// Generate a default TOML configuration template.
pub fn generate_default_config() -> String {
    render_config(Config::default().workers, None)
}

/// Render the commented template with the given worker count and timeout.
pub fn render_config(workers: usize, timeout_secs: Option<u64>) -> String {
    let timeout = timeout_secs.map_or_else(
        || "# timeout_secs = 30".to_owned(),
        |secs| format!("timeout_secs = {secs}"),
    );
    format!(
        r#"# grace demo configuration

# Force a clean stop after this many seconds. Omit to wait for a signal
# (SIGINT, SIGQUIT, SIGHUP or SIGTERM).
{timeout}

# Number of heartbeat workers sharing the shutdown token.
workers = {workers}

# Interval between worker heartbeats, in milliseconds.
tick_ms = 1000

# Make worker 0 fail after this many milliseconds to see the first error
# cancel every other worker.
# fail_after_ms = 5000

# Log filter used when RUST_LOG is not set.
log_level = "info"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).expect("valid template");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config: Config = toml::from_str(
            r#"
            timeout_secs = 5
            workers = 4
            fail_after_ms = 250
            "#,
        )
        .expect("valid config");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.workers(), 4);
        assert_eq!(config.tick(), Duration::from_secs(1));
        assert_eq!(config.fail_after(), Some(Duration::from_millis(250)));
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn rendered_overrides_round_trip() {
        let config = parse_config(&render_config(6, Some(15))).expect("valid template");
        assert_eq!(config.workers(), 6);
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.tick(), Config::default().tick());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("port = 8080").is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).expect_err("missing");
        assert!(matches!(err, CliError::Config(_)));
    }
}
