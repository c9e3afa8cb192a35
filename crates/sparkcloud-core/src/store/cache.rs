// ── Time-bounded single-value cache ──
//
// Holds one value and the instant it was fetched. Callers pass `now`
// explicitly; the refresh closure runs under the slot lock, so concurrent
// readers of an expired entry share a single refresh.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::trace;

struct Entry<T> {
    value: Arc<T>,
    fetched_at: Instant,
}

/// One cached value with a freshness window.
///
/// A TTL of zero disables caching: every lookup refreshes.
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<Entry<T>>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value if it was fetched less than `ttl` before
    /// `now`, otherwise run `refresh` and cache its result.
    ///
    /// A failed refresh leaves the previous entry in place and returns the
    /// error.
    pub async fn get_or_refresh<F, Fut, E>(&self, now: Instant, refresh: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(entry) = slot.as_ref() {
            let age = now.saturating_duration_since(entry.fetched_at);
            if age < self.ttl {
                trace!(?age, "cache hit");
                return Ok(Arc::clone(&entry.value));
            }
        }

        let value = Arc::new(refresh().await?);
        *slot = Some(Entry {
            value: Arc::clone(&value),
            fetched_at: now,
        });
        Ok(value)
    }

    /// Run `refresh` unconditionally and cache its result.
    pub async fn force_refresh<F, Fut, E>(&self, now: Instant, refresh: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;
        let value = Arc::new(refresh().await?);
        *slot = Some(Entry {
            value: Arc::clone(&value),
            fetched_at: now,
        });
        Ok(value)
    }

    /// Drop the cached value; the next lookup refreshes.
    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }

    /// The cached value regardless of age, if any.
    pub async fn peek(&self) -> Option<Arc<T>> {
        self.slot
            .lock()
            .await
            .as_ref()
            .map(|entry| Arc::clone(&entry.value))
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
