//! Real OS signal delivery. Kept in its own test binary because the handler
//! is installed process-wide.

#![cfg(unix)]

use grace::Grace;
use nix::sys::signal::{Signal, raise};

#[tokio::test]
async fn sigterm_stops_the_coordinator() {
    let (grace, token) = Grace::try_new().expect("signal registration");

    raise(Signal::SIGTERM).expect("deliver SIGTERM to this process");

    grace.wait().await.expect("signal is a clean stop");
    assert!(token.is_done());
    assert!(token.err().is_none());
}
