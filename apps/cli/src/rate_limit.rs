//! Per-client token-bucket rate limiting for the HTTP control plane (§6
//! "Rate limiting"), adapted from the kernel's own token-bucket benchmark
//! into a synchronous, non-blocking check suited to request middleware:
//! exhaustion returns `false` (the caller answers `429`) instead of waiting.

use std::sync::Mutex;
use std::time::Instant;

use dashmap::DashMap;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    buckets: DashMap<String, Mutex<Bucket>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(requests_per_second: u32) -> Self {
        let capacity = f64::from(requests_per_second.max(1));
        Self {
            capacity,
            refill_per_sec: capacity,
            buckets: DashMap::new(),
        }
    }

    /// Refill `key`'s bucket for elapsed time, then attempt to take one
    /// token. Returns `true` if the request may proceed.
    pub fn try_acquire(&self, key: &str) -> bool {
        let entry = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Mutex::new(Bucket { tokens: self.capacity, last_refill: Instant::now() }));
        let mut bucket = entry.lock().expect("rate limiter bucket mutex poisoned");

        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_requests_up_to_capacity() {
        let limiter = RateLimiter::new(3);
        assert!(limiter.try_acquire("client-a"));
        assert!(limiter.try_acquire("client-a"));
        assert!(limiter.try_acquire("client-a"));
        assert!(!limiter.try_acquire("client-a"));
    }

    #[test]
    fn tracks_clients_independently() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.try_acquire("client-a"));
        assert!(!limiter.try_acquire("client-a"));
        assert!(limiter.try_acquire("client-b"));
    }

    #[test]
    fn refills_over_time() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.try_acquire("client-a"));
        assert!(!limiter.try_acquire("client-a"));
        std::thread::sleep(std::time::Duration::from_millis(1100));
        assert!(limiter.try_acquire("client-a"));
    }
}
