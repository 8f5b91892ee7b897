//! # Debouncer
//!
//! Rejects a client that was admitted less than one window ago. Not a token
//! bucket: only the last admitted timestamp per client is kept.
//!
//! Entries expire once the window has passed and the map is capped, so a
//! long-lived process does not grow with every client it has ever seen.
//!
//! The lookup and the insert are two separate cache operations. Two requests
//! from the same client racing through [`Debouncer::admit`] at the same instant
//! can both be admitted.
use std::time::{Duration, Instant};

use moka::sync::Cache;

pub struct Debouncer {
    window: Duration,
    last_admitted: Cache<String, Instant>,
}

impl Debouncer {
    pub fn new(window: Duration, capacity: u64) -> Self {
        let last_admitted = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(window)
            .build();

        Self {
            window,
            last_admitted,
        }
    }

    /// Records `now` for `client` and returns `true`, unless the client was
    /// admitted within the window, in which case nothing is recorded.
    pub fn admit(&self, client: &str, now: Instant) -> bool {
        if let Some(last) = self.last_admitted.get(client) {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }

        self.last_admitted.insert(client.to_string(), now);
        true
    }
}
