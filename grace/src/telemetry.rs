//! Tracing subscriber setup for the demo CLI.
//!
//! Provides [`Telemetry`] for configuring console logging. The filter comes
//! from `RUST_LOG` when set, otherwise from the configured log level.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Service identity and log filter for the console subscriber.
#[derive(Debug, Default)]
pub struct Telemetry {
    name: Option<&'static str>,
    version: Option<&'static str>,
    log_level: Option<String>,
}

impl Telemetry {
    /// Creates a new, empty [`Telemetry`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service name.
    #[must_use]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Sets the service version.
    #[must_use]
    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    /// Sets the log level filter used when `RUST_LOG` is not set.
    ///
    /// Accepts any valid [`EnvFilter`] directive string (e.g. `"debug"`,
    /// `"grace=debug"`).
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Installs the global subscriber.
    pub fn register(self) {
        let fallback = self.log_level.as_deref().unwrap_or("info");
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
            .with(tracing_subscriber::fmt::layer())
            .init();

        tracing::info!(
            name = self.name.unwrap_or("unknown"),
            version = self.version.unwrap_or("unknown"),
            "console logging registered"
        );
    }
}
