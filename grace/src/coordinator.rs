//! The [`Grace`] coordinator.
//!
//! Construction spawns the signal listener right away; the `wait*` methods
//! register any extra tasks, optionally arm a timeout, then join the group.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{BoxError, Error};
use crate::group::TaskGroup;
use crate::signal::{self, OsSignals, SignalSource};
use crate::token::ShutdownToken;

/// Graceful shutdown for zero to many tasks.
///
/// Every task shares one [`ShutdownToken`]. The token is cancelled by an OS
/// stop signal, by an armed timeout, by the first task that fails, or by an
/// explicit [`cancel`](Self::cancel). Cancellation is cooperative: a task
/// that never looks at the token keeps the `wait*` call blocked.
#[derive(Debug)]
pub struct Grace {
    group: TaskGroup,
}

impl Grace {
    /// Creates a coordinator listening for OS termination signals.
    ///
    /// Returns the coordinator together with the shared token, which tasks can
    /// select on alongside their own work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signal`] if signal registration fails.
    pub fn try_new() -> Result<(Self, ShutdownToken), Error> {
        Ok(Self::with_source(OsSignals::try_new()?))
    }

    /// Like [`try_new`](Self::try_new), but also stops when `parent` is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signal`] if signal registration fails.
    pub fn with_parent(parent: &CancellationToken) -> Result<(Self, ShutdownToken), Error> {
        Ok(Self::with_parent_and_source(parent, OsSignals::try_new()?))
    }

    /// Creates a coordinator driven by a custom [`SignalSource`].
    #[must_use]
    pub fn with_source<S: SignalSource>(source: S) -> (Self, ShutdownToken) {
        Self::start(ShutdownToken::new(), source)
    }

    /// Creates a coordinator driven by `source` and derived from `parent`.
    #[must_use]
    pub fn with_parent_and_source<S: SignalSource>(
        parent: &CancellationToken,
        source: S,
    ) -> (Self, ShutdownToken) {
        Self::start(ShutdownToken::child_of(parent), source)
    }

    fn start<S: SignalSource>(token: ShutdownToken, source: S) -> (Self, ShutdownToken) {
        let group = TaskGroup::new(token.clone());
        group.spawn_inner(signal::listen(source, token.clone()));
        (Self { group }, token)
    }

    /// Registers a task ahead of waiting. It starts running immediately.
    ///
    /// See [`TaskGroup::spawn`] for how panics are reported.
    pub fn spawn<F, E>(&self, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.group.spawn(task);
    }

    /// Waits for a stop signal (or any other cancellation) and for every
    /// registered task to return.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any task.
    pub async fn wait(self) -> Result<(), Error> {
        self.group.join().await
    }

    /// Waits at most `timeout` before forcing a clean stop.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any task.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), Error> {
        self.group.arm_timeout(timeout);
        self.group.join().await
    }

    /// Runs `tasks` concurrently and waits for all of them and for a stop.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any task, in completion order.
    pub async fn wait_with_func<I, F, E>(self, tasks: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        for task in tasks {
            self.group.spawn(task);
        }
        self.group.join().await
    }

    /// Runs `tasks` concurrently and forces a clean stop after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by any task, in completion order.
    pub async fn wait_with_timeout_and_func<I, F, E>(
        self,
        timeout: Duration,
        tasks: I,
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.group.arm_timeout(timeout);
        for task in tasks {
            self.group.spawn(task);
        }
        self.group.join().await
    }

    /// The shared token.
    #[must_use]
    pub const fn token(&self) -> &ShutdownToken {
        self.group.token()
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.token().is_done()
    }

    /// The error that caused the stop, if any.
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        self.token().err()
    }

    /// Requests a clean stop from the caller's side.
    pub fn cancel(&self) {
        self.token().cancel();
    }
}
