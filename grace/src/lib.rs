//! Graceful shutdown for zero to many async tasks.
//!
//! [`Grace`] runs caller tasks on a shared task group and hands every one of
//! them the same [`ShutdownToken`]. The token is cancelled when the process
//! receives a termination signal, when an optional timeout elapses, when the
//! first task fails, or when the caller asks for it. The `wait*` methods block
//! until every task has returned and yield the first error, if any.
//!
//! ```no_run
//! use std::convert::Infallible;
//!
//! # async fn serve() -> Result<(), grace::Error> {
//! let (grace, token) = grace::Grace::try_new()?;
//! let worker = token.clone();
//! grace
//!     .wait_with_func([async move {
//!         // real work goes here, racing against the stop request
//!         worker.cancelled().await;
//!         Ok::<(), Infallible>(())
//!     }])
//!     .await
//! # }
//! ```
//!
//! Cancellation is cooperative: a task that never observes the token keeps
//! `wait*` blocked. Only the first failure is reported; tasks that need every
//! error should collect their own before returning.

mod coordinator;
mod error;
mod group;
pub mod signal;
mod token;

pub use coordinator::Grace;
pub use error::{BoxError, Error};
pub use group::TaskGroup;
pub use signal::{OsSignals, SignalSource, StopSignal};
pub use token::ShutdownToken;
pub use tokio_util::sync::CancellationToken;
