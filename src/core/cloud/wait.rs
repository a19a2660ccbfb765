//! Poll a stack until its classifier calls it done.
//!
//! Interval and deadline are measured through a [`Clock`], so tests drive
//! simulated time instead of sleeping.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::StatusClassifier;
use crate::core::constants::{DEFAULT_POLL_INTERVAL, DEFAULT_STACK_TIMEOUT};
use crate::error::{CloudError, Result};

/// Time source for the poll loop.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, duration: Duration);
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How long and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_STACK_TIMEOUT,
        }
    }
}

/// Poll `describe` until `classifier` reports the stack complete.
///
/// Returns `Ok` when the final status is healthy,
/// `CloudError::StackUnhealthy` when it is not, and `CloudError::Timeout`
/// once `policy.timeout` has elapsed without completion. The deadline is
/// checked after every poll, so it is overrun by at most one interval.
/// An error from `describe` ends the wait immediately.
pub fn poll_stack<F>(
    stack: &str,
    classifier: StatusClassifier,
    policy: &WaitPolicy,
    clock: &dyn Clock,
    mut describe: F,
) -> Result<()>
where
    F: FnMut() -> Result<String>,
{
    let started = clock.now();
    debug!(stack, classifier = classifier.name(), timeout = ?policy.timeout, "waiting for stack");

    loop {
        let status = describe()?;
        trace!(stack, status = %status, "polled stack status");

        if classifier.is_complete(&status) {
            if classifier.is_healthy(&status) {
                debug!(stack, status = %status, "stack settled");
                return Ok(());
            }
            return Err(CloudError::StackUnhealthy {
                stack: stack.to_string(),
                status,
            }
            .into());
        }

        let elapsed = clock.now().saturating_duration_since(started);
        if elapsed >= policy.timeout {
            return Err(CloudError::Timeout {
                stack: stack.to_string(),
                elapsed,
                status,
            }
            .into());
        }

        clock.sleep(policy.interval);
    }
}
