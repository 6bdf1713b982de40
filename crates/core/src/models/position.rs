use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Ticker used when the user has not typed one yet.
pub const DEFAULT_TICKER: &str = "AAPL";

/// Default share count.
pub const DEFAULT_SHARES: f64 = 1.0;

/// Default buy price per share (USD).
pub const DEFAULT_BUY_PRICE: f64 = 100.0;

/// How far back the default buy date sits from today.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// A single stock position as entered by the user.
///
/// Rebuilt from input on every render pass; never persisted.
/// The ticker is normalized (trimmed, uppercased) on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Ticker symbol, e.g. "AAPL". May be empty while the user has not entered one.
    pub ticker: String,

    /// Purchase date (daily granularity)
    pub buy_date: NaiveDate,

    /// Number of shares held, fractional allowed
    pub shares: f64,

    /// Price paid per share
    pub buy_price: f64,
}

impl Position {
    /// Build a validated position. Shares and buy price must be finite and >= 0.
    pub fn new(
        ticker: impl AsRef<str>,
        buy_date: NaiveDate,
        shares: f64,
        buy_price: f64,
    ) -> Result<Self, CoreError> {
        validate_amount("Shares", shares)?;
        validate_amount("Buy price", buy_price)?;
        Ok(Self {
            ticker: normalize_ticker(ticker.as_ref()),
            buy_date,
            shares,
            buy_price,
        })
    }

    /// The input form's initial state relative to `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_string(),
            buy_date: default_buy_date(today),
            shares: DEFAULT_SHARES,
            buy_price: DEFAULT_BUY_PRICE,
        }
    }

    /// Amount originally paid: `shares × buy_price`.
    pub fn purchase_value(&self) -> f64 {
        self.shares * self.buy_price
    }

    /// True when there is no ticker to look up.
    pub fn has_ticker(&self) -> bool {
        !self.ticker.is_empty()
    }

    pub fn set_ticker(&mut self, ticker: &str) {
        self.ticker = normalize_ticker(ticker);
    }

    pub fn set_shares(&mut self, shares: f64) -> Result<(), CoreError> {
        validate_amount("Shares", shares)?;
        self.shares = shares;
        Ok(())
    }

    pub fn set_buy_price(&mut self, buy_price: f64) -> Result<(), CoreError> {
        validate_amount("Buy price", buy_price)?;
        self.buy_price = buy_price;
        Ok(())
    }
}

/// Trim surrounding whitespace and uppercase.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// One year (365 days) before `today`.
pub fn default_buy_date(today: NaiveDate) -> NaiveDate {
    today - Duration::days(DEFAULT_LOOKBACK_DAYS)
}

fn validate_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::ValidationError(format!(
            "{field} must be a finite number, got {value}"
        )));
    }
    if value < 0.0 {
        return Err(CoreError::ValidationError(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}
