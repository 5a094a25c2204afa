use std::time::{Duration, Instant};

/// Default time-to-live for a cached fetch: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// The last good fetch plus when it happened. Replaced wholesale on
/// refresh, never mutated in place.
struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

/// Time-boxed memoization of a fetch call.
///
/// Owned by whoever drives the pipeline and constructed with an explicit
/// TTL; there is no process-wide instance. Failures are never stored, so a
/// bad fetch is retried on the next call.
pub struct FetchCache<T> {
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
}

impl<T: Clone> FetchCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Return the cached value while it is fresh, otherwise invoke
    /// `fetch_fn` and store its result. An `Err` is handed straight back
    /// and nothing is cached.
    pub fn get_or_fetch<E>(&mut self, fetch_fn: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if let Some(entry) = &self.entry {
            if entry.fetched_at.elapsed() < self.ttl {
                return Ok(entry.value.clone());
            }
        }

        let value = fetch_fn()?;
        self.entry = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Discard the stored result unconditionally; the next `get_or_fetch`
    /// will invoke its fetch function.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl<T: Clone> Default for FetchCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
