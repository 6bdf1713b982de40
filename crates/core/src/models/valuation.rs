use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::position::Position;
use super::price::PriceColumn;

/// Figures for the last date in the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSummary {
    /// Last date in the price series
    pub date: NaiveDate,

    /// Last non-missing price in the series
    pub latest_price: f64,

    /// shares × latest_price
    pub current_value: f64,

    /// current_value − purchase_value
    pub profit_amount: f64,

    /// profit_amount / purchase_value × 100, or 0 when nothing was paid
    pub profit_percent: f64,
}

/// One date of the derived series. All three values share the date of the
/// underlying price and are `None` on days the price is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
    pub portfolio_value: Option<f64>,
    pub profit: Option<f64>,
}

/// Everything computed for a position from one price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    /// Column the prices were read from
    pub column: PriceColumn,

    /// shares × buy_price
    pub purchase_value: f64,

    pub summary: LatestSummary,

    /// Aligned price / portfolio value / profit series, date ascending
    pub series: Vec<ValuationPoint>,
}

/// Outcome of a single render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No ticker entered; nothing fetched.
    MissingTicker,

    /// Fetch failed or no usable prices; nothing else is rendered.
    Unavailable(String),

    Available(Report),
}

/// A position together with its valuation, ready to render or export.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub position: Position,
    pub valuation: Valuation,
}
