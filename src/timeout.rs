//! Races a behaviour against an optional deadline.

use std::future::Future;
use std::time::Duration;

/// The deadline elapsed before the behaviour settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimedOut {
    pub(crate) after: Duration,
}

impl TimedOut {
    pub(crate) fn millis(self) -> u64 {
        u64::try_from(self.after.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Await `future`, giving up once `timeout` elapses.
///
/// A future that loses the race is dropped: it is never polled again and
/// receives no cancellation signal of its own.
pub(crate) async fn call_with_timeout<F>(
    future: F,
    timeout: Option<Duration>,
) -> Result<F::Output, TimedOut>
where
    F: Future,
{
    match timeout {
        Some(after) => tokio::time::timeout(after, future)
            .await
            .map_err(|_| TimedOut { after }),
        None => Ok(future.await),
    }
}
