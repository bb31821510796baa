use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        let now = Instant::now();
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
            last_seen: now,
        }
    }

    /// Refill tokens based on elapsed time. Uses double precision arithmetic.
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Try to consume one token. Returns the seconds to wait when denied.
    /// Small epsilon to avoid fp surprises
    fn try_consume(&mut self) -> Result<(), u64> {
        self.last_seen = Instant::now();
        self.refill();
        if self.tokens + 1e-12 >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let needed = 1.0 - self.tokens;
            Err(((needed / self.refill_per_sec).ceil() as u64).max(1))
        }
    }
}

/// Per-key token bucket store with periodic eviction of idle buckets.
/// Keys are client IPs; used to throttle anonymous contact and rating posts.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
}

impl RateLimiterStore {
    pub fn new(capacity: f64, refill_per_sec: f64, bucket_ttl: Duration) -> Self {
        let store = Self {
            map: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec,
        };

        // spawn eviction task
        {
            let map_clone = store.map.clone();
            tokio::spawn(async move {
                let interval = Duration::from_secs(30);
                loop {
                    sleep(interval).await;
                    let now = Instant::now();
                    let keys_to_remove: Vec<String> = map_clone
                        .iter()
                        .filter_map(|entry| {
                            let bucket = entry.value().lock();
                            if now.duration_since(bucket.last_seen) > bucket_ttl {
                                Some(entry.key().clone())
                            } else {
                                None
                            }
                        })
                        .collect();

                    for key in keys_to_remove {
                        map_clone.remove(&key);
                    }
                }
            });
        }

        store
    }

    fn get_bucket(&self, key: &str) -> Arc<Mutex<TokenBucket>> {
        if let Some(existing) = self.map.get(key) {
            existing.clone()
        } else {
            let bucket = Arc::new(Mutex::new(TokenBucket::new(
                self.capacity,
                self.refill_per_sec,
            )));
            match self.map.entry(key.to_string()) {
                dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(bucket.clone());
                    bucket
                }
            }
        }
    }

    /// Ok when the request may proceed; Err carries a retry-after estimate in
    /// seconds.
    pub fn check(&self, key: &str) -> Result<(), u64> {
        let bucket = self.get_bucket(key);
        let mut bucket = bucket.lock();
        bucket.try_consume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_capacity_then_denies() {
        let store = RateLimiterStore::new(2.0, 0.01, Duration::from_secs(60));
        assert!(store.check("10.0.0.1").is_ok());
        assert!(store.check("10.0.0.1").is_ok());
        let retry_after = store.check("10.0.0.1").unwrap_err();
        assert!(retry_after >= 1);
    }

    #[tokio::test]
    async fn keys_are_limited_independently() {
        let store = RateLimiterStore::new(1.0, 0.01, Duration::from_secs(60));
        assert!(store.check("10.0.0.1").is_ok());
        assert!(store.check("10.0.0.2").is_ok());
    }
}
