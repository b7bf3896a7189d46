//! TTL-bucketed quote caching.
//!
//! Expiry works without an eviction thread: cache keys embed the current
//! TTL bucket (`floor(unix_now / ttl)`), so once the wall clock rolls into
//! the next bucket every lookup naturally misses and fresh fetches repopulate
//! the new bucket. Entries from old buckets linger until [`purge_stale`]
//! (or a process restart) removes them.
//!
//! [`purge_stale`]: MemoryQuoteCache::purge_stale

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::provider::{FailureReason, FetchFailure, FetchOutcome, QuoteProvider};
use crate::{Symbol, UtcDateTime};

/// Cache key: one symbol within one TTL window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: Symbol,
    pub bucket: u64,
}

impl CacheKey {
    pub fn new(symbol: Symbol, bucket: u64) -> Self {
        Self { symbol, bucket }
    }
}

/// Bucket index for the current wall-clock time and a TTL width.
pub fn current_bucket(ttl_seconds: u64) -> u64 {
    let now = UtcDateTime::now().unix_timestamp().max(0) as u64;
    now / ttl_seconds.max(1)
}

/// Injected cache capability.
///
/// The scanner only depends on this trait, so the in-memory store can be
/// swapped for a bounded or shared implementation without touching callers.
/// Failed outcomes are cached alongside quotes: within one bucket a failing
/// symbol is not refetched, and the next bucket retries it naturally.
pub trait QuoteCache: Send + Sync {
    /// TTL window width used to derive bucket indices.
    fn ttl_seconds(&self) -> u64;

    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> Pin<Box<dyn Future<Output = Option<FetchOutcome>> + Send + 'a>>;

    fn put<'a>(
        &'a self,
        key: CacheKey,
        outcome: FetchOutcome,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Process-wide in-memory cache store.
#[derive(Clone)]
pub struct MemoryQuoteCache {
    ttl_seconds: u64,
    entries: Arc<tokio::sync::RwLock<HashMap<CacheKey, FetchOutcome>>>,
}

impl MemoryQuoteCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds: ttl_seconds.max(1),
            entries: Arc::new(tokio::sync::RwLock::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop entries whose bucket has rolled over. Optional housekeeping for
    /// long-running embedders; correctness never depends on it.
    pub async fn purge_stale(&self) {
        let current = current_bucket(self.ttl_seconds);
        let mut entries = self.entries.write().await;
        entries.retain(|key, _| key.bucket >= current);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

impl QuoteCache for MemoryQuoteCache {
    fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    fn get<'a>(
        &'a self,
        key: &'a CacheKey,
    ) -> Pin<Box<dyn Future<Output = Option<FetchOutcome>> + Send + 'a>> {
        Box::pin(async move { self.entries.read().await.get(key).cloned() })
    }

    fn put<'a>(
        &'a self,
        key: CacheKey,
        outcome: FetchOutcome,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            self.entries.write().await.insert(key, outcome);
        })
    }
}

/// Resolve one symbol through the cache, fetching on a miss.
///
/// The deadline wraps only the provider fetch, and an expired fetch is
/// stored as a `Timeout` failure like any other outcome. Timing out after
/// the cache write would drop the result and re-hit a hanging upstream on
/// every pass in the same bucket.
///
/// Two concurrent misses for the same symbol may both reach the provider;
/// the second write wins. That duplication is bounded by the batch size and
/// is not a correctness problem, so no per-symbol locking is done here.
pub async fn get_or_fetch(
    cache: &dyn QuoteCache,
    provider: &dyn QuoteProvider,
    symbol: &Symbol,
    fetch_timeout: Duration,
) -> FetchOutcome {
    let key = CacheKey::new(symbol.clone(), current_bucket(cache.ttl_seconds()));

    if let Some(cached) = cache.get(&key).await {
        return cached;
    }

    let outcome = match tokio::time::timeout(fetch_timeout, provider.fetch_quote(symbol)).await {
        Ok(outcome) => outcome,
        Err(_) => FetchOutcome::Failed(FetchFailure::new(
            symbol.clone(),
            FailureReason::Timeout,
            provider.id(),
        )),
    };
    cache.put(key, outcome.clone()).await;
    outcome
}
