use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PriceHistory;

/// Abstraction over a daily price history source.
///
/// Implementations return every trading day in `[from, to]` (both ends
/// inclusive), sorted ascending. An empty history is a valid `Ok`; callers
/// decide what "no data" means for them.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get daily history for `symbol` between `from` and `to` inclusive.
    async fn get_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceHistory, CoreError>;
}
