use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Per-provider request-rate gate.
///
/// Wraps a direct governor limiter sized from a (window, limit) quota. The
/// batch fetcher already paces traffic with inter-batch delays; this gate is
/// the hard ceiling that keeps a misconfigured scan from exceeding an
/// upstream free-tier budget.
#[derive(Clone)]
pub struct RateGate {
    limiter: Arc<DirectRateLimiter>,
    clock: DefaultClock,
}

impl RateGate {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
            clock: DefaultClock::default(),
        }
    }

    /// Quote-API friendly default: 300 requests per minute.
    pub fn per_minute(limit: u32) -> Self {
        Self::new(Duration::from_secs(60), limit)
    }

    /// Tries to take one cell of rate budget. When the budget is exhausted
    /// the recommended wait before retrying is returned instead.
    pub fn acquire(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let safe_limit = quota_limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_burst_then_rejects() {
        let gate = RateGate::new(Duration::from_secs(60), 2);

        assert!(gate.acquire().is_ok());
        assert!(gate.acquire().is_ok());

        let wait = gate.acquire().expect_err("third request should be gated");
        assert!(wait > Duration::ZERO);
    }

    #[test]
    fn zero_limit_is_clamped_to_one() {
        let gate = RateGate::new(Duration::from_secs(1), 0);
        assert!(gate.acquire().is_ok());
    }
}
