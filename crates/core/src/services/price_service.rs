use chrono::NaiveDate;

use crate::models::cache::{FetchResult, HistoryCache};
use crate::providers::traits::HistoryProvider;

/// Fetches price history from a provider and memoizes the answer.
///
/// Cache strategy:
/// - Keyed by `(symbol, from, to)`; a hit within the TTL skips the network.
/// - Failures are remembered too, so a bad ticker is not re-requested on
///   every render until the entry expires.
/// - Expired entries are swept on every miss, so the map only holds live
///   windows plus the one being fetched.
/// - No retries. One failed call yields `Unavailable`.
///
/// Never returns an error: anything the provider raises is logged and
/// downgraded to [`FetchResult::Unavailable`].
pub struct PriceService {
    provider: Box<dyn HistoryProvider>,
    cache: HistoryCache,
}

impl PriceService {
    pub fn new(provider: Box<dyn HistoryProvider>) -> Self {
        Self::with_cache(provider, HistoryCache::new())
    }

    pub fn with_cache(provider: Box<dyn HistoryProvider>, cache: HistoryCache) -> Self {
        Self { provider, cache }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &HistoryCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut HistoryCache {
        &mut self.cache
    }

    /// Get the daily history for `symbol` over `[from, to]`.
    ///
    /// 1. Live cache entry → return it.
    /// 2. Otherwise drop expired entries and ask the provider once; an
    ///    error or an empty table becomes `Unavailable`. Column checks are left to valuation.
    /// 3. Store the result (either kind) and return it.
    pub async fn fetch_history(&mut self, symbol: &str, from: NaiveDate, to: NaiveDate) -> FetchResult {
        let key = HistoryCache::key(symbol, from, to);

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(symbol, %from, %to, "history cache hit");
            return hit.clone();
        }
        tracing::debug!(symbol, %from, %to, "history cache miss");
        let pruned = self.cache.prune_expired();
        if pruned > 0 {
            tracing::debug!(pruned, "expired histories dropped");
        }

        let result = match self.provider.get_history(symbol, from, to).await {
            Ok(history) if history.is_empty() => {
                FetchResult::Unavailable(format!("no trading data for {symbol} between {from} and {to}"))
            }
            Ok(history) => {
                tracing::info!(
                    symbol,
                    rows = history.len(),
                    provider = self.provider.name(),
                    "history fetched"
                );
                FetchResult::Available(history)
            }
            Err(e) => FetchResult::Unavailable(e.to_string()),
        };

        if let FetchResult::Unavailable(reason) = &result {
            tracing::warn!(symbol, %reason, "history unavailable");
        }

        self.cache.insert(key, result.clone());
        result
    }
}
