//! Task group with first-error aggregation.
//!
//! [`TaskGroup`] runs tasks on a [`TaskTracker`], records the first failure in
//! completion order and cancels the shared [`ShutdownToken`] with it, so every
//! sibling is asked to unwind. [`TaskGroup::join`] still waits for all of them.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::task::JoinError;
use tokio_util::task::TaskTracker;

use crate::error::{BoxError, Error};
use crate::token::ShutdownToken;

/// Owner of the shared token and every registered task.
#[derive(Debug)]
pub struct TaskGroup {
    tracker: TaskTracker,
    token: ShutdownToken,
    first_error: Arc<OnceLock<Error>>,
}

impl TaskGroup {
    /// Creates an empty group around `token`.
    #[must_use]
    pub fn new(token: ShutdownToken) -> Self {
        Self {
            tracker: TaskTracker::new(),
            token,
            first_error: Arc::default(),
        }
    }

    /// The token shared by every task in the group.
    #[must_use]
    pub const fn token(&self) -> &ShutdownToken {
        &self.token
    }

    /// Number of tasks that have not returned yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Starts `task` concurrently with the rest of the group.
    ///
    /// Must be called from within a tokio runtime. A panicking task is reported
    /// as [`Error::Panicked`] only when panics unwind; under `panic = "abort"`
    /// (as in this workspace's release profile) the process aborts instead.
    pub fn spawn<F, E>(&self, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.spawn_inner(async move { task.await.map_err(Error::task) });
    }

    pub(crate) fn spawn_inner<F>(&self, task: F)
    where
        F: Future<Output = Result<(), Error>> + Send + 'static,
    {
        let token = self.token.clone();
        let first_error = Arc::clone(&self.first_error);
        // The task runs in its own tokio task so a panic surfaces as a JoinError
        // here instead of unwinding through the tracker.
        let handle = tokio::spawn(task);
        self.tracker.spawn(async move {
            let outcome = handle.await.unwrap_or_else(|err| Err(join_failure(err)));
            if let Err(err) = outcome {
                record(&first_error, &token, err);
            }
        });
    }

    /// Arms the timeout trigger: cancels the token cleanly after `timeout`.
    ///
    /// Firing on an already-cancelled token is a no-op, so the timer also
    /// stands down as soon as the token is cancelled for any other reason.
    pub fn arm_timeout(&self, timeout: Duration) {
        let token = self.token.clone();
        self.tracker.spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(timeout) => {
                    tracing::warn!("force finished after {}s", timeout.as_secs_f64());
                    token.cancel();
                }
                () = token.cancelled() => {}
            }
        });
    }

    /// Waits for every task to return.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any task, in completion order.
    pub async fn join(self) -> Result<(), Error> {
        self.tracker.close();
        self.tracker.wait().await;
        self.first_error.get().cloned().map_or(Ok(()), Err)
    }
}

fn record(first_error: &OnceLock<Error>, token: &ShutdownToken, err: Error) {
    match first_error.set(err.clone()) {
        Ok(()) => tracing::warn!(%err, "task failed, cancelling group"),
        Err(discarded) => tracing::debug!(err = %discarded, "discarding subsequent task error"),
    }
    token.cancel_with(err);
}

fn join_failure(err: JoinError) -> Error {
    match err.try_into_panic() {
        Ok(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_owned());
            Error::Panicked(msg)
        }
        Err(err) => Error::task(err),
    }
}
