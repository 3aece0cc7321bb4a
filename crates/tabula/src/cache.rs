//! Keyed, TTL-based result cache.
//!
//! A [`CacheService`] maps [`CacheKey`]s to shared results. Entries expire
//! lazily: an expired entry is treated as a miss the next time it is looked
//! up, and nothing sweeps the map in the background. Failed fetches are
//! never stored.
//!
//! The service is cheap to clone; clones share the same entries.
//! [`CacheService::global`] returns the process-wide instance that
//! connections use unless another one is injected.

use std::any::Any;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, trace};

use tabula_core::Result;
use tabula_core::error::InvalidInputError;

/// Time-to-live applied when a caller does not pass one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Identity of one cached result.
///
/// Built from a scope (the connection name), an operation name and the
/// canonical JSON encoding of the operation's fully resolved arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    scope: String,
    operation: String,
    args: String,
}

impl CacheKey {
    /// Build a key from resolved arguments.
    ///
    /// # Errors
    ///
    /// Fails only if `args` cannot be serialized.
    pub fn new<A>(scope: impl Into<String>, operation: impl Into<String>, args: &A) -> Result<Self>
    where
        A: Serialize + ?Sized,
    {
        let args = serde_json::to_string(args).map_err(|e| InvalidInputError::Other {
            message: format!("cache key arguments: {}", e),
        })?;

        Ok(Self {
            scope: scope.into(),
            operation: operation.into(),
            args,
        })
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Canonical encoding of the arguments.
    pub fn args(&self) -> &str {
        &self.args
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    /// `None` when the TTL is too large to represent.
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Counters describing cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Stored entries, including expired ones not yet evicted.
    pub entries: usize,
}

/// A concurrent result cache shared by connections.
#[derive(Clone, Default)]
pub struct CacheService {
    inner: Arc<CacheInner>,
}

#[derive(Default)]
struct CacheInner {
    entries: DashMap<CacheKey, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheService {
    /// Create an empty, independent cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide shared cache.
    pub fn global() -> &'static CacheService {
        static GLOBAL: OnceLock<CacheService> = OnceLock::new();
        GLOBAL.get_or_init(CacheService::new)
    }

    /// Look up a live entry.
    ///
    /// An expired entry is evicted and reported as a miss.
    pub fn get<T>(&self, key: &CacheKey) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let now = Instant::now();
        // Copy out before evicting; the read guard must not outlive this line.
        let found = self
            .inner
            .entries
            .get(key)
            .map(|entry| (entry.is_live(now), Arc::clone(&entry.value)));

        match found {
            Some((true, value)) => value.downcast::<T>().ok(),
            Some((false, _)) => {
                if self
                    .inner
                    .entries
                    .remove_if(key, |_, entry| !entry.is_live(now))
                    .is_some()
                {
                    trace!(operation = key.operation(), "Evicted expired entry");
                }
                None
            }
            None => None,
        }
    }

    /// Store a value for `ttl`. A zero TTL stores nothing.
    pub fn insert<T>(&self, key: CacheKey, value: Arc<T>, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        if ttl.is_zero() {
            return;
        }

        let entry = CacheEntry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.inner.entries.insert(key, entry);
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// The entry map is not locked while `fetch` runs, so concurrent misses
    /// on the same key may each call `fetch`; the last result stored wins.
    /// Errors from `fetch` are returned unchanged and leave the cache as it
    /// was.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, ttl: Duration, fetch: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.get::<T>(&key) {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            debug!(operation = key.operation(), "Cache hit");
            return Ok(value);
        }

        self.inner.misses.fetch_add(1, Ordering::Relaxed);
        debug!(operation = key.operation(), ttl_secs = ttl.as_secs(), "Cache miss");

        let value = Arc::new(fetch().await?);
        self.insert(key, Arc::clone(&value), ttl);
        Ok(value)
    }

    /// Remove a single entry. Returns true if it was present.
    pub fn remove(&self, key: &CacheKey) -> bool {
        self.inner.entries.remove(key).is_some()
    }

    /// Remove every entry of an operation, across all scopes.
    pub fn invalidate(&self, operation: &str) -> usize {
        let before = self.inner.entries.len();
        self.inner.entries.retain(|key, _| key.operation != operation);
        before - self.inner.entries.len()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.inner.entries.clear();
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.entries.len();
        self.inner.entries.retain(|_, entry| entry.is_live(now));
        before - self.inner.entries.len()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            misses: self.inner.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl std::fmt::Debug for CacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheService")
            .field("stats", &self.stats())
            .finish()
    }
}
