//! Steady-state request pacing against the upstream quote source.
//!
//! Independent of retry backoff, every outgoing request pays a fixed base
//! delay so the sustained request rate stays bounded. The pacer wraps a
//! governor rate limiter with a one-request burst and a period equal to
//! the base delay.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Paces requests to at most one per interval.
#[derive(Clone)]
pub struct Pacer {
    limiter: Arc<DirectRateLimiter>,
    clock: DefaultClock,
    interval: Duration,
}

impl Pacer {
    /// Build a pacer allowing one request per `interval`.
    ///
    /// Returns `None` for a zero interval, which disables pacing.
    pub fn new(interval: Duration) -> Option<Self> {
        if interval.is_zero() {
            return None;
        }

        let burst = NonZeroU32::new(1).expect("burst of one is non-zero");
        let quota = Quota::with_period(interval)
            .expect("interval is greater than zero")
            .allow_burst(burst);

        Some(Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            clock: DefaultClock::default(),
            interval,
        })
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Try to take rate budget without waiting.
    ///
    /// On failure returns the delay until budget becomes available.
    pub fn check(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Wait until a request may proceed.
    pub async fn pace(&self) {
        loop {
            match self.check() {
                Ok(()) => return,
                Err(wait) => {
                    tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
                }
            }
        }
    }
}
