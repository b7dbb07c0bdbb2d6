//! Unified error types for the coordinator.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error accepted from caller tasks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type returned by every `wait*` operation.
///
/// Cloneable so the same cause can be recorded on the shared token and
/// returned from the group's join.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A registered task returned an error.
    #[error("{0}")]
    Task(Arc<dyn std::error::Error + Send + Sync + 'static>),

    /// A registered task panicked.
    #[error("task panicked: {0}")]
    Panicked(String),

    /// Subscribing to OS stop signals failed.
    #[error("signal: {0}")]
    Signal(Arc<std::io::Error>),
}

impl Error {
    /// Wraps an arbitrary task error.
    pub fn task(err: impl Into<BoxError>) -> Self {
        Self::Task(Arc::from(err.into()))
    }

    /// Wraps a failed signal registration.
    pub fn signal(err: std::io::Error) -> Self {
        Self::Signal(Arc::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_error_displays_inner_message() {
        let err = Error::task("boom");
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn clones_share_the_same_cause() {
        let err = Error::task(std::io::Error::other("disk gone"));
        let copy = err.clone();
        match (err, copy) {
            (Error::Task(a), Error::Task(b)) => assert!(Arc::ptr_eq(&a, &b)),
            _ => panic!("expected task errors"),
        }
    }
}
