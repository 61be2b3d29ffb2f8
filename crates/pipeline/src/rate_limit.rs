//! Evenly spaced request pacing for LLM calls.
//!
//! A limiter of `N` requests per minute hands out one cell every `60s / N`
//! with a burst of one, so concurrent pipeline runs sharing one limiter are
//! serialized onto the same schedule.

use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota};

pub struct RateLimiter {
    inner: Option<DefaultDirectRateLimiter>,
}

impl RateLimiter {
    /// Create a limiter allowing `max_per_minute` acquisitions per minute.
    /// `0` means unlimited.
    pub fn per_minute(max_per_minute: u32) -> Self {
        Self {
            inner: pacing_quota(max_per_minute).map(DefaultDirectRateLimiter::direct),
        }
    }

    /// Wait for the next free slot.
    pub async fn acquire(&self) {
        let Some(limiter) = &self.inner else {
            return;
        };
        if limiter.check().is_ok() {
            return;
        }
        tracing::debug!("Rate limit: waiting for next LLM slot");
        limiter.until_ready().await;
    }
}

/// One cell every `60s / max_per_minute`, burst of one. `None` for `0`.
fn pacing_quota(max_per_minute: u32) -> Option<Quota> {
    if max_per_minute == 0 {
        return None;
    }
    Quota::with_period(Duration::from_secs(60) / max_per_minute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn zero_disables_pacing() {
        assert!(pacing_quota(0).is_none());
        assert!(RateLimiter::per_minute(0).inner.is_none());
    }

    #[test]
    fn quota_spaces_calls_evenly_with_burst_of_one() {
        let quota = pacing_quota(5).unwrap();
        assert_eq!(quota.replenish_interval(), Duration::from_secs(12));
        assert_eq!(quota.burst_size().get(), 1);
    }

    #[tokio::test]
    async fn unlimited_never_waits() {
        let limiter = RateLimiter::per_minute(0);
        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn first_call_is_immediate_then_spaced() {
        // 6000 per minute is one slot every 10 ms.
        let limiter = RateLimiter::per_minute(6000);
        let start = Instant::now();

        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(18));
    }
}
