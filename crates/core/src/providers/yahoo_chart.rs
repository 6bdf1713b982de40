use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::traits::HistoryProvider;
use crate::errors::CoreError;
use crate::models::price::{HistoryRow, PriceHistory};

const PROVIDER: &str = "Yahoo Chart";

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance v8 chart endpoint, called directly over HTTP.
///
/// Unlike the connector-based provider this one sees the raw nullable
/// `close` and `adjclose` arrays, so days Yahoo lists without a price
/// come through as missing rather than NaN.
///
/// No request timeout is set; a slow response simply delays the caller.
pub struct YahooChartProvider {
    client: Client,
    base_url: String,
}

impl YahooChartProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the provider at another host (a mirror, or a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

impl Default for YahooChartProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Yahoo chart response types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

/// Parse a chart JSON body into history rows within `[from, to]`.
pub fn parse_chart_body(
    symbol: &str,
    body: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PriceHistory, CoreError> {
    let resp: ChartResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse chart for {symbol}: {e}"),
    })?;

    if let Some(err) = resp.chart.error {
        return Err(CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("{}: {}", err.code, err.description),
        });
    }

    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No chart data returned for {symbol}"),
        })?;

    let gmtoffset = result.meta.map(|m| m.gmtoffset).unwrap_or_default();
    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();
    let adj_closes = result
        .indicators
        .adjclose
        .and_then(|ac| ac.into_iter().next())
        .and_then(|ac| ac.adjclose)
        .unwrap_or_default();

    let pick = |values: &[Option<f64>], i: usize| -> Option<f64> {
        values.get(i).copied().flatten().filter(|v| v.is_finite())
    };

    let rows = timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let date = exchange_date(ts, gmtoffset)?;
            (date >= from && date <= to).then(|| HistoryRow {
                date,
                close: pick(&closes, i),
                adj_close: pick(&adj_closes, i),
            })
        })
        .collect();

    Ok(PriceHistory::from_rows(symbol, rows))
}

/// Calendar date of a bar in the exchange's own timezone. Bars are stamped
/// at the local open, which for markets east of UTC is the previous UTC day.
pub fn exchange_date(ts: i64, gmtoffset: i64) -> Option<NaiveDate> {
    chrono::DateTime::from_timestamp(ts.checked_add(gmtoffset)?, 0).map(|dt| dt.date_naive())
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Utc.from_utc_datetime(&dt).timestamp())
        .unwrap_or_default()
}

#[async_trait]
impl HistoryProvider for YahooChartProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceHistory, CoreError> {
        // One day of slack: bars are stamped at the exchange open, which east
        // of UTC falls on the previous UTC day.
        let period1 = unix_seconds(from - chrono::Duration::days(1));
        // period2 is exclusive; the next midnight keeps `to` in range.
        let period2 = unix_seconds(to + chrono::Duration::days(1));
        let url = self.chart_url(symbol);
        tracing::debug!(%url, period1, period2, "requesting chart");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Yahoo answers unknown symbols with a 404 that still carries a chart error.
            return match parse_chart_body(symbol, &body, from, to) {
                Err(e) => Err(e),
                Ok(_) => Err(CoreError::Api {
                    provider: PROVIDER.into(),
                    message: format!("HTTP {status} for {symbol}"),
                }),
            };
        }

        let history = parse_chart_body(symbol, &body, from, to)?;
        tracing::debug!(symbol, rows = history.len(), "chart history received");
        Ok(history)
    }
}
