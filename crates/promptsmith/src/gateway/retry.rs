//! When to retry a failed completion call, and how long to wait first.
//!
//! Only [transient](CompletionError::is_transient) failures are retried.
//! A rate-limit response that names its own `Retry-After` is waited out
//! exactly; if that wait is longer than [`RetryPolicy::max_delay`] the call
//! fails immediately instead of holding the caller's request open.

use crate::error::CompletionError;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Zero disables retrying.
    pub max_retries: u32,
    /// Wait before the first retry; doubles on each further retry.
    pub base_delay: Duration,
    /// Longest single wait, whether computed or requested by the server.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// How long to wait before retrying after `error` on the 0-indexed
    /// `attempt`, or `None` to give up and return the error.
    pub fn next_delay(&self, attempt: u32, error: &CompletionError) -> Option<Duration> {
        if attempt >= self.max_retries || !error.is_transient() {
            return None;
        }
        match error {
            CompletionError::RateLimited {
                retry_after: Some(wait),
                ..
            } => (*wait <= self.max_delay).then_some(*wait),
            _ => Some(
                self.base_delay
                    .saturating_mul(2u32.saturating_pow(attempt))
                    .min(self.max_delay),
            ),
        }
    }
}
