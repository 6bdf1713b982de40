use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::price::PriceHistory;

/// How long a fetched history stays valid (30 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Cache key: (symbol, start date, end date), e.g. ("AAPL", 2024-01-02, 2025-01-02)
pub type HistoryCacheKey = (String, NaiveDate, NaiveDate);

/// Result of one history lookup, as remembered by the cache.
///
/// `Unavailable` carries a human-readable reason for logs.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    Available(PriceHistory),
    Unavailable(String),
}

impl FetchResult {
    pub fn is_available(&self) -> bool {
        matches!(self, FetchResult::Available(_))
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: FetchResult,
    fetched_at: Instant,
}

/// In-memory memo of history fetches with a fixed time-to-live.
///
/// - A lookup within the TTL returns the stored result, available or not.
/// - An expired entry is treated as a miss and overwritten by the next fetch.
/// - Lives only as long as the process; nothing is written to disk.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: HashMap<HistoryCacheKey, CacheEntry>,
    ttl: Duration,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn key(symbol: &str, from: NaiveDate, to: NaiveDate) -> HistoryCacheKey {
        (symbol.to_uppercase(), from, to)
    }

    /// Get a live entry for `key`, or None if missing or expired.
    pub fn get(&self, key: &HistoryCacheKey) -> Option<&FetchResult> {
        self.get_at(key, Instant::now())
    }

    /// Same as [`HistoryCache::get`] evaluated at an explicit instant.
    pub fn get_at(&self, key: &HistoryCacheKey, now: Instant) -> Option<&FetchResult> {
        self.entries
            .get(key)
            .filter(|e| !self.is_expired(e, now))
            .map(|e| &e.result)
    }

    pub fn insert(&mut self, key: HistoryCacheKey, result: FetchResult) {
        self.insert_at(key, result, Instant::now());
    }

    pub fn insert_at(&mut self, key: HistoryCacheKey, result: FetchResult, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                result,
                fetched_at: now,
            },
        );
    }

    /// Drop every expired entry. Returns the number removed.
    pub fn prune_expired(&mut self) -> usize {
        self.prune_expired_at(Instant::now())
    }

    pub fn prune_expired_at(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.fetched_at) < ttl);
        before - self.entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.fetched_at) >= self.ttl
    }
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}
