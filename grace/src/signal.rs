//! Stop signal handling.
//!
//! [`OsSignals`] listens for OS termination signals (SIGINT/SIGQUIT/SIGHUP/
//! SIGTERM on Unix, Ctrl+C on Windows). Any [`SignalSource`] can stand in for
//! it, which is how tests and embedders inject their own stop events.
//! [`listen`] bridges a source into the shared [`ShutdownToken`].

use std::fmt;
use std::future::Future;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::sync::mpsc;

use crate::error::Error;
use crate::token::ShutdownToken;

/// A termination request delivered by a [`SignalSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopSignal {
    /// `SIGINT`, Ctrl+C.
    Interrupt,
    /// `SIGQUIT`, Ctrl+\.
    Quit,
    /// `SIGHUP`, the controlling terminal went away.
    Hangup,
    /// `SIGTERM`, the polite way to ask a process to exit.
    Terminate,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Quit => "SIGQUIT",
            Self::Hangup => "SIGHUP",
            Self::Terminate => "SIGTERM",
        })
    }
}

/// Supplies termination events to the signal listener.
pub trait SignalSource: Send + 'static {
    /// Waits for the next stop event.
    ///
    /// Returns `None` once the source can produce no more events.
    fn recv(&mut self) -> impl Future<Output = Option<StopSignal>> + Send;
}

impl SignalSource for mpsc::Receiver<StopSignal> {
    async fn recv(&mut self) -> Option<StopSignal> {
        Self::recv(self).await
    }
}

impl SignalSource for mpsc::UnboundedReceiver<StopSignal> {
    async fn recv(&mut self) -> Option<StopSignal> {
        Self::recv(self).await
    }
}

/// Process-wide OS termination signals.
#[derive(Debug)]
pub struct OsSignals {
    #[cfg(unix)]
    interrupt: Signal,
    #[cfg(unix)]
    quit: Signal,
    #[cfg(unix)]
    hangup: Signal,
    #[cfg(unix)]
    terminate: Signal,
}

impl OsSignals {
    /// Registers handlers for every termination signal.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signal`] if the platform refuses a registration.
    #[cfg(unix)]
    pub fn try_new() -> Result<Self, Error> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt()).map_err(Error::signal)?,
            quit: signal(SignalKind::quit()).map_err(Error::signal)?,
            hangup: signal(SignalKind::hangup()).map_err(Error::signal)?,
            terminate: signal(SignalKind::terminate()).map_err(Error::signal)?,
        })
    }

    /// Registers the Ctrl+C handler.
    ///
    /// # Errors
    ///
    /// Never fails on this platform; registration happens lazily on first
    /// receive.
    #[cfg(not(unix))]
    #[allow(clippy::unnecessary_wraps)]
    pub const fn try_new() -> Result<Self, Error> {
        Ok(Self {})
    }
}

impl SignalSource for OsSignals {
    #[cfg(unix)]
    async fn recv(&mut self) -> Option<StopSignal> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some(StopSignal::Interrupt),
            Some(()) = self.quit.recv() => Some(StopSignal::Quit),
            Some(()) = self.hangup.recv() => Some(StopSignal::Hangup),
            Some(()) = self.terminate.recv() => Some(StopSignal::Terminate),
            else => None,
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> Option<StopSignal> {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Some(StopSignal::Interrupt),
            Err(err) => {
                tracing::error!(%err, "unable to listen for ctrl-c");
                None
            }
        }
    }
}

/// The signal listener task.
///
/// Races the next stop event against the token being cancelled for some other
/// reason. A received signal cancels the token cleanly and returns `Ok`; an
/// already-done token returns its recorded cause so the real failure is not
/// masked. An exhausted source falls back to waiting on the token alone, so
/// this never returns while the token is still running.
///
/// # Errors
///
/// Returns the token's recorded cause when the stop was not signal-driven.
pub async fn listen<S: SignalSource>(mut source: S, token: ShutdownToken) -> Result<(), Error> {
    tokio::select! {
        received = source.recv() => {
            if let Some(signal) = received {
                tracing::info!(%signal, "received stop signal");
                token.cancel();
                return Ok(());
            }
            token.cancelled().await;
        }
        () = token.cancelled() => {}
    }
    tracing::debug!("closing signal listener");
    token.result()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn signal_cancels_cleanly() {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = ShutdownToken::new();
        let listener = tokio::spawn(listen(rx, token.clone()));

        tx.send(StopSignal::Terminate).expect("listener alive");
        listener.await.expect("join").expect("clean stop");
        assert!(token.is_done());
        assert!(token.err().is_none());
    }

    #[tokio::test]
    async fn already_done_surfaces_the_cause() {
        let (_tx, rx) = mpsc::channel::<StopSignal>(1);
        let token = ShutdownToken::new();
        token.cancel_with(Error::task("upstream failed"));

        let err = listen(rx, token).await.expect_err("cause propagated");
        assert_eq!(err.to_string(), "upstream failed");
    }

    #[tokio::test(start_paused = true)]
    async fn closed_source_keeps_waiting_on_the_token() {
        let (tx, rx) = mpsc::unbounded_channel::<StopSignal>();
        drop(tx);
        let token = ShutdownToken::new();
        let mut listener = tokio::spawn(listen(rx, token.clone()));

        assert!(
            tokio::time::timeout(Duration::from_secs(60), &mut listener)
                .await
                .is_err()
        );

        token.cancel();
        listener.await.expect("join").expect("clean stop");
    }

    #[test]
    fn signal_names() {
        assert_eq!(StopSignal::Interrupt.to_string(), "SIGINT");
        assert_eq!(StopSignal::Quit.to_string(), "SIGQUIT");
        assert_eq!(StopSignal::Hangup.to_string(), "SIGHUP");
        assert_eq!(StopSignal::Terminate.to_string(), "SIGTERM");
    }
}
