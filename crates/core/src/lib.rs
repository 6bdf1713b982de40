pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    cache::{FetchResult, HistoryCache},
    position::Position,
    settings::Settings,
    valuation::{Outcome, Report},
};
use providers::{registry::provider_for, traits::HistoryProvider};
use services::{
    export_service::ExportService, price_service::PriceService,
    valuation_service::ValuationService,
};

use errors::CoreError;

/// Shown when the history fetch fails or comes back empty.
pub const UNAVAILABLE_MESSAGE: &str =
    "Could not fetch historical data for that ticker/date. Check the ticker and date.";

/// Shown when a history arrived but has no price column to value against.
pub const NO_PRICES_MESSAGE: &str = "No close prices available.";

/// Shown before any ticker is entered.
pub const MISSING_TICKER_MESSAGE: &str = "Enter a ticker to begin.";

/// Main entry point for the stock-pl core library.
///
/// Owns the history fetcher (and with it the fetch cache) plus the pure
/// services. One call to [`StockTracker::evaluate`] is one render pass.
#[must_use]
pub struct StockTracker {
    settings: Settings,
    price_service: PriceService,
    valuation_service: ValuationService,
    export_service: ExportService,
}

impl std::fmt::Debug for StockTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockTracker")
            .field("settings", &self.settings)
            .field("provider", &self.price_service.provider_name())
            .field("cached_histories", &self.price_service.cache().len())
            .finish()
    }
}

impl StockTracker {
    /// Build a tracker with the provider named in `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let provider = provider_for(&settings)?;
        Ok(Self::with_provider(settings, provider))
    }

    /// Build a tracker around an explicit provider (tests, alternative sources).
    pub fn with_provider(settings: Settings, provider: Box<dyn HistoryProvider>) -> Self {
        let cache = HistoryCache::with_ttl(settings.cache_ttl);
        Self {
            price_service: PriceService::with_cache(provider, cache),
            valuation_service: ValuationService::new(),
            export_service: ExportService::new(),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run one pass: fetch `[buy_date, today]` for the position and value it.
    ///
    /// Never fails. A missing ticker, a failed fetch and a history without
    /// prices all come back as non-`Available` outcomes, and valuation is
    /// skipped for them.
    pub async fn evaluate(&mut self, position: &Position, today: NaiveDate) -> Outcome {
        if !position.has_ticker() {
            return Outcome::MissingTicker;
        }

        let history = match self
            .price_service
            .fetch_history(&position.ticker, position.buy_date, today)
            .await
        {
            FetchResult::Available(history) => history,
            FetchResult::Unavailable(_) => return Outcome::Unavailable(UNAVAILABLE_MESSAGE.into()),
        };

        match self.valuation_service.evaluate(&history, position) {
            Ok(valuation) => Outcome::Available(Report {
                position: position.clone(),
                valuation,
            }),
            Err(e) => {
                tracing::warn!(ticker = %position.ticker, error = %e, "valuation skipped");
                Outcome::Unavailable(NO_PRICES_MESSAGE.into())
            }
        }
    }

    /// CSV bytes for a report's series, with the file name to save them under.
    pub fn export_csv(&self, report: &Report) -> Result<(String, Vec<u8>), CoreError> {
        let bytes = self.export_service.to_csv(&report.valuation.series)?;
        Ok((ExportService::file_name(&report.position.ticker), bytes))
    }

    // ── Cache Inspection ────────────────────────────────────────────

    /// Number of remembered fetches, expired ones included.
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.price_service.cache().len()
    }

    /// Drop expired fetches. Returns the number removed.
    pub fn cache_prune_expired(&mut self) -> usize {
        self.price_service.cache_mut().prune_expired()
    }

    pub fn cache_clear(&mut self) {
        self.price_service.cache_mut().clear();
    }
}
