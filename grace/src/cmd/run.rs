//! `grace run` command — run heartbeat workers under the coordinator.
//!
//! Each worker ticks on its own interval and returns once the shared token is
//! cancelled. Optionally worker 0 fails on purpose, which cancels the rest.

use std::path::Path;
use std::time::Duration;

use dotenvy::dotenv;
use grace::{Grace, ShutdownToken};

use super::error::CliError;
use crate::config::load_config;
use crate::telemetry::Telemetry;

/// Execute the `run` command.
///
/// `timeout_secs` overrides the configured timeout.
///
/// # Errors
///
/// Returns an error if configuration loading or signal registration fails,
/// or the first error returned by a worker.
pub async fn run(config_path: &Path, timeout_secs: Option<u64>) -> Result<(), CliError> {
    // Load .env variables
    dotenv().ok();

    let config = load_config(config_path)?;

    Telemetry::new()
        .with_name(env!("CARGO_PKG_NAME"))
        .with_version(env!("CARGO_PKG_VERSION"))
        .with_log_level(config.log_level())
        .register();

    let (grace, token) = Grace::try_new()?;
    let tick = config.tick();
    let fail_after = config.fail_after();
    let workers = (0..config.workers()).map(|id| {
        let fail_after = if id == 0 { fail_after } else { None };
        worker(id, token.clone(), tick, fail_after)
    });

    let timeout = timeout_secs.map(Duration::from_secs).or_else(|| config.timeout());
    tracing::info!(workers = config.workers(), ?timeout, "waiting for shutdown");
    let result = match timeout {
        Some(timeout) => grace.wait_with_timeout_and_func(timeout, workers).await,
        None => grace.wait_with_func(workers).await,
    };
    if result.is_ok() {
        tracing::info!("finished clean");
    }
    result.map_err(CliError::from)
}

async fn worker(
    id: usize,
    token: ShutdownToken,
    tick: Duration,
    fail_after: Option<Duration>,
) -> Result<(), String> {
    let mut interval = tokio::time::interval(tick);
    let failure = async {
        match fail_after {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(failure);

    loop {
        tokio::select! {
            () = token.cancelled() => {
                tracing::info!(worker = id, "closing worker");
                return Ok(());
            }
            () = &mut failure => {
                return Err(format!("worker {id} failed on purpose"));
            }
            _ = interval.tick() => {
                tracing::debug!(worker = id, "tick");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use grace::StopSignal;
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn workers_stop_on_signal() {
        let (tx, rx) = mpsc::unbounded_channel();
        let (grace, token) = Grace::with_source(rx);
        let workers =
            (0..3).map(|id| worker(id, token.clone(), Duration::from_millis(10), None));
        tx.send(StopSignal::Interrupt).expect("listener alive");

        grace.wait_with_func(workers).await.expect("clean stop");
        assert!(token.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn failing_worker_cancels_the_rest() {
        let (_tx, rx) = mpsc::unbounded_channel::<StopSignal>();
        let (grace, token) = Grace::with_source(rx);
        let workers = (0..3).map(|id| {
            let fail_after = (id == 0).then_some(Duration::from_millis(50));
            worker(id, token.clone(), Duration::from_millis(10), fail_after)
        });

        let err = grace.wait_with_func(workers).await.expect_err("worker 0 fails");
        assert_eq!(err.to_string(), "worker 0 failed on purpose");
    }
}
