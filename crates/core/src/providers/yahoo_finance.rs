use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use super::traits::HistoryProvider;
use super::yahoo_chart::exchange_date;
use crate::errors::CoreError;
use crate::models::price::{HistoryRow, PriceHistory};

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance history via the `yahoo_finance_api` crate.
///
/// Daily bars carry both close and adjusted close; any symbol Yahoo lists
/// (stocks, ETFs, indices) works without an API key.
///
/// Prices are in the listing's native currency; no conversion is done.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let invalid = |e: String| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Invalid date {date}: {e}"),
        };
        let month = time::Month::try_from(date.month() as u8).map_err(|e| invalid(e.to_string()))?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| invalid(e.to_string()))?
            .with_hms(0, 0, 0)
            .map_err(|e| invalid(e.to_string()))?
            .assume_utc();
        Ok(odt)
    }
}

/// Yahoo reports missing prices as NaN; treat those as absent.
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[async_trait]
impl HistoryProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceHistory, CoreError> {
        // Bars are stamped at the exchange open, a UTC day early east of UTC.
        let start = Self::to_offset_datetime(from - chrono::Duration::days(1))?;
        // End is exclusive upstream; push it one day out so `to` is included.
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?;

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch history for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let gmtoffset = resp.metadata().map(|m| i64::from(m.gmtoffset)).unwrap_or_default();

        let rows: Vec<HistoryRow> = quotes
            .iter()
            .filter_map(|q| {
                let date = exchange_date(q.timestamp, gmtoffset)?;
                (date >= from && date <= to).then(|| HistoryRow {
                    date,
                    close: finite(q.close),
                    adj_close: finite(q.adjclose),
                })
            })
            .collect();

        tracing::debug!(symbol, rows = rows.len(), "yahoo_finance_api history received");
        Ok(PriceHistory::from_rows(symbol, rows))
    }
}
