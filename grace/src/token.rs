//! Shared one-shot stop signal.
//!
//! [`ShutdownToken`] pairs a [`CancellationToken`] (done-state and broadcast
//! wake-up) with a first-write-wins cause slot, so every party that observes
//! the stop can also learn why it happened.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::error::Error;

/// Cloneable handle to the coordinator's cancellation state.
///
/// Transitions from running to done exactly once. The cause recorded by the
/// first [`cancel`](Self::cancel) / [`cancel_with`](Self::cancel_with) call is
/// fixed for the lifetime of the token.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: CancellationToken,
    cause: Arc<OnceLock<Option<Error>>>,
}

impl ShutdownToken {
    /// Creates a fresh, not-yet-cancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that is also cancelled when `parent` is.
    ///
    /// A stop inherited from the parent carries no cause.
    #[must_use]
    pub fn child_of(parent: &CancellationToken) -> Self {
        Self {
            inner: parent.child_token(),
            cause: Arc::default(),
        }
    }

    /// Requests a clean stop.
    pub fn cancel(&self) {
        self.finish(None);
    }

    /// Requests a stop caused by `err`.
    pub fn cancel_with(&self, err: Error) {
        self.finish(Some(err));
    }

    fn finish(&self, cause: Option<Error>) {
        // A stop that already happened (possibly through the parent or the raw
        // handle) keeps whatever cause it had.
        if self.inner.is_cancelled() {
            self.seal();
            return;
        }
        // Cause is written before waking waiters so they always see it.
        let _ = self.cause.set(cause);
        self.inner.cancel();
    }

    /// Fixes the cause slot once the token is done. A stop that bypassed
    /// `finish` is recorded as clean.
    fn seal(&self) -> Option<&Option<Error>> {
        self.is_done().then(|| self.cause.get_or_init(|| None))
    }

    /// Returns `true` once a stop has been requested.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.inner.is_cancelled()
    }

    /// Completes once a stop has been requested; immediately if it already was.
    pub async fn cancelled(&self) {
        self.inner.cancelled().await;
    }

    /// Returns the error that caused the stop, if any.
    ///
    /// `None` while still running and after a clean stop (signal, timeout,
    /// explicit cancel, or parent cancellation).
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        self.seal().cloned().flatten()
    }

    /// The recorded cause as a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the error that caused the stop, if the stop was not clean.
    pub fn result(&self) -> Result<(), Error> {
        self.err().map_or(Ok(()), Err)
    }

    /// The underlying [`CancellationToken`], for APIs that accept one directly.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.inner.clone()
    }
}
