//! Retry policy and backoff math for transient fetch failures.

use std::time::Duration;

use crate::{FetchErrorKind, ValidationError};

/// Exponential backoff schedule for retrying failed requests.
///
/// The delay is calculated as `base * (factor ^ attempt)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub factor: f64,
    /// Cap applied after scaling.
    pub max: Duration,
    /// Apply random jitter (+/- 50%) to the delay.
    pub jitter: bool,
}

impl Backoff {
    /// Calculate the delay for a given attempt (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        let scale = self.factor.powi(attempt as i32);
        let seconds = self.base.as_secs_f64() * scale;
        let capped_seconds = seconds.min(self.max.as_secs_f64());

        let mut delay = Duration::from_secs_f64(capped_seconds);

        if self.jitter {
            let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
            let random_offset = fastrand::u64(0..=(jitter_ms * 2));
            let total_ms = delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
            delay = Duration::from_millis(total_ms.max(0) as u64);
        }

        delay
    }
}

/// Retry policy for the per-symbol fetch loop.
///
/// `max_retries` is the total number of fetch attempts per symbol.
/// Rate-limit responses back off more aggressively (factor 3) than other
/// transient failures (factor 2); both sequences start from `base_delay`,
/// which doubles as the steady-state pacing interval between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub rate_limit_factor: f64,
    pub transient_factor: f64,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            rate_limit_factor: 3.0,
            transient_factor: 2.0,
            max_delay: Duration::from_secs(30),
            jitter: false,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_retries == 0 {
            return Err(ValidationError::ZeroRetries);
        }
        if !self.rate_limit_factor.is_finite() || self.rate_limit_factor < 1.0 {
            return Err(ValidationError::InvalidBackoffFactor {
                field: "rate_limit_factor",
            });
        }
        if !self.transient_factor.is_finite() || self.transient_factor < 1.0 {
            return Err(ValidationError::InvalidBackoffFactor {
                field: "transient_factor",
            });
        }
        Ok(())
    }

    /// Backoff sequence for a failure of the given class.
    pub fn backoff_for(&self, kind: FetchErrorKind) -> Backoff {
        let factor = match kind {
            FetchErrorKind::RateLimited => self.rate_limit_factor,
            _ => self.transient_factor,
        };
        Backoff {
            base: self.base_delay,
            factor,
            max: self.max_delay,
            jitter: self.jitter,
        }
    }
}
