//! In-memory caches with a freshness window
//!
//! [`TtlCache`] is the shared building block: a bounded LRU map whose entries
//! expire a fixed time after they were written. Expired entries are treated
//! as absent and dropped on the next lookup. Two concrete caches are built on
//! top of it:
//!
//! - [`DocumentCache`]: token list documents, including negative entries for
//!   lists that could not be fetched or validated
//! - [`ResourceCache`]: logo image bytes with their content type

use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::trace;

use crate::models::{ImageResource, TokenListDocument};

/// Hit/miss counters and current size of a cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

struct CacheSlot<V> {
    value: V,
    expires_at: Instant,
}

/// Bounded, time-expiring cache keyed by URL
///
/// Cloning shares the underlying storage.
pub struct TtlCache<V> {
    name: &'static str,
    ttl: Duration,
    capacity: NonZeroUsize,
    entries: Arc<Mutex<LruCache<String, CacheSlot<V>>>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            ttl: self.ttl,
            capacity: self.capacity,
            entries: Arc::clone(&self.entries),
            hits: Arc::clone(&self.hits),
            misses: Arc::clone(&self.misses),
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `capacity` entries for `ttl` each
    ///
    /// A zero capacity is raised to one.
    pub fn new(name: &'static str, ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            ttl,
            capacity,
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Fresh value for `key`, if any
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(slot) if slot.expires_at > Instant::now() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!("{} cache hit: {}", self.name, key);
                return Some(slot.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            trace!("{} cache entry expired: {}", self.name, key);
            entries.pop(key);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store `value` under `key`, replacing any previous entry
    pub async fn put(&self, key: &str, value: V) {
        let slot = CacheSlot {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.lock().await.put(key.to_string(), slot);
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.lock().await.len(),
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cached outcome of fetching one token list
#[derive(Debug, Clone)]
pub enum DocumentEntry {
    /// Fetched and validated
    Available(Arc<TokenListDocument>),
    /// Fetch or validation failed; not retried until the entry expires
    Unavailable,
}

impl DocumentEntry {
    pub fn document(&self) -> Option<Arc<TokenListDocument>> {
        match self {
            Self::Available(document) => Some(Arc::clone(document)),
            Self::Unavailable => None,
        }
    }
}

/// Token list documents keyed by source URL
pub type DocumentCache = TtlCache<DocumentEntry>;

/// Logo images keyed by logo URL
pub type ResourceCache = TtlCache<ImageResource>;
