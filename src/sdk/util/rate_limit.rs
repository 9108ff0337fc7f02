use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

pub type Limiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Nominatim's usage policy allows one request per second.
pub const NOMINATIM_PER_SECOND: u32 = 1;

pub fn per_minute(requests: u32) -> Limiter {
    let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

pub fn per_second(requests: u32) -> Limiter {
    let quota = Quota::per_second(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
    Arc::new(RateLimiter::direct(quota))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quota_falls_back_to_one() {
        let limiter = per_second(0);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
