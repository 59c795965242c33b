use crate::{Error, Result};

use std::fmt::Debug;
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::debug;

/// Outcome of one status check.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll<T> {
    Pending,
    Ready(T),
}

/// Decides how long to wait before the next status check.
pub trait PollPolicy: Debug + Send + Sync {
    /// `attempt` counts the checks already made, starting at 1. `None` gives up.
    fn next_delay(&self, attempt: u32) -> Option<Duration>;
}

impl<P: PollPolicy + ?Sized> PollPolicy for Box<P> {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (**self).next_delay(attempt)
    }
}

/// Same wait every time, forever.
#[derive(Debug, Clone, Copy)]
pub struct FixedInterval {
    interval: Duration,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedInterval {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl PollPolicy for FixedInterval {
    fn next_delay(&self, _attempt: u32) -> Option<Duration> {
        Some(self.interval)
    }
}

/// Same wait every time, for at most `max_attempts` checks.
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    interval: Duration,
    max_attempts: u32,
}

impl Bounded {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl PollPolicy for Bounded {
    fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt < self.max_attempts {
            Some(self.interval)
        } else {
            None
        }
    }
}

/// Fetch with `fetch` and hand the result to `settle` until it is ready,
/// sleeping between checks as `policy` says.
pub async fn poll_until<S, T, F, Fut, C>(
    policy: &dyn PollPolicy,
    table: &str,
    mut fetch: F,
    mut settle: C,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S>>,
    C: FnMut(S) -> Result<Poll<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        if let Poll::Ready(value) = settle(fetch().await?)? {
            debug!("`{table}` settled after {attempt} poll(s)");
            return Ok(value);
        }

        match policy.next_delay(attempt) {
            Some(delay) => sleep(delay).await,
            None => {
                return Err(Error::PollExhausted {
                    table: table.to_string(),
                    attempts: attempt,
                })
            }
        }
    }
}
