// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restart policy for the watch subscription.

use std::time::Duration;

/// Exponential backoff with jitter for re-subscribing after a lost watch.
///
/// The delay before attempt `n` is `base_delay * 2^(n-1)`, capped at
/// `max_delay`, plus 0 to 10% jitter. A subscription that stayed up for at
/// least `reset_after` resets the attempt counter.
///
/// # Examples
///
/// ```rust
/// use remotecfg::service::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .with_base_delay(Duration::from_millis(100))
///     .with_max_attempts(5);
///
/// assert!(policy.delay_for(3) >= Duration::from_millis(400));
/// assert!(policy.allows(5));
/// assert!(!policy.allows(6));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first restart.
    pub base_delay: Duration,
    /// Upper bound for the delay, before jitter.
    pub max_delay: Duration,
    /// Give up after this many consecutive failed subscriptions. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Uptime after which a subscription counts as healthy.
    pub reset_after: Duration,
}

impl RetryPolicy {
    /// Never restart: the first lost subscription is final.
    pub fn never() -> Self {
        Self {
            max_attempts: Some(0),
            ..Self::default()
        }
    }

    /// Sets the first restart delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Limits the number of consecutive restarts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Sets the uptime after which the attempt counter resets.
    pub fn with_reset_after(mut self, uptime: Duration) -> Self {
        self.reset_after = uptime;
        self
    }

    /// Returns `true` if restart number `attempt` (1-based) may proceed.
    pub fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempt <= max)
    }

    /// The delay to wait before restart number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);

        let exponential_base = 2u64.saturating_pow(attempt - 1);
        let capped_delay = base_ms.saturating_mul(exponential_base).min(max_ms);

        // Apply jitter (0 to 10% of the delay)
        let jitter_range = capped_delay / 10;
        let jitter = if jitter_range > 0 {
            fastrand::u64(0..jitter_range)
        } else {
            0
        };

        Duration::from_millis(capped_delay.saturating_add(jitter))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_attempts: None,
            reset_after: Duration::from_secs(30),
        }
    }
}
