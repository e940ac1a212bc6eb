use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// Single-slot read cache with a fixed time-to-live. The slot is mutex-guarded
/// so hosts that call handlers from multiple worker threads observe a
/// consistent (value, timestamp) pair.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value if it is younger than the TTL.
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().expect("cache slot lock");
        slot.as_ref()
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, value: T) {
        let mut slot = self.slot.lock().expect("cache slot lock");
        *slot = Some(Entry {
            value,
            stored_at: Instant::now(),
        });
    }

    /// Drop the cached value so the next read goes back to the source.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("cache slot lock");
        if slot.take().is_some() {
            tracing::debug!("cache invalidated");
        }
    }
}
