use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::price::{PriceHistory, PricePoint};
use crate::models::valuation::{LatestSummary, Valuation, ValuationPoint};

/// Turns a price history and a position into profit/loss figures.
///
/// Pure arithmetic with no I/O or caching. Everything is recomputed from
/// the history on each call.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value `position` against `history`.
    ///
    /// Prices come from the Close column, or Adj Close when Close is absent.
    /// Errors with `NoPriceData` when neither column has a single value.
    pub fn evaluate(&self, history: &PriceHistory, position: &Position) -> Result<Valuation, CoreError> {
        let column = history.preferred_column().ok_or_else(|| {
            CoreError::NoPriceData(format!("no Close or Adj Close prices for {}", history.symbol))
        })?;
        let prices = history.series(column);

        let purchase_value = position.purchase_value();
        let series = Self::derive_series(&prices, position.shares, purchase_value);
        let summary = Self::latest_summary(&prices, position.shares, purchase_value)?;

        Ok(Valuation {
            column,
            purchase_value,
            summary,
            series,
        })
    }

    /// Pointwise `value = shares × price` and `profit = value − purchase_value`,
    /// on the same dates as `prices`.
    pub fn derive_series(prices: &[PricePoint], shares: f64, purchase_value: f64) -> Vec<ValuationPoint> {
        prices
            .iter()
            .map(|p| {
                let portfolio_value = p.price.map(|price| price * shares);
                ValuationPoint {
                    date: p.date,
                    price: p.price,
                    portfolio_value,
                    profit: portfolio_value.map(|v| v - purchase_value),
                }
            })
            .collect()
    }

    /// Summary at the series' last date, priced at the last non-missing entry.
    pub fn latest_summary(
        prices: &[PricePoint],
        shares: f64,
        purchase_value: f64,
    ) -> Result<LatestSummary, CoreError> {
        let date = prices
            .last()
            .map(|p| p.date)
            .ok_or_else(|| CoreError::NoPriceData("price series is empty".into()))?;
        let latest_price = prices
            .iter()
            .rev()
            .find_map(|p| p.price)
            .ok_or_else(|| CoreError::NoPriceData("every price in the series is missing".into()))?;

        let current_value = shares * latest_price;
        let profit_amount = current_value - purchase_value;

        Ok(LatestSummary {
            date,
            latest_price,
            current_value,
            profit_amount,
            profit_percent: profit_percent(profit_amount, purchase_value),
        })
    }
}

/// `profit / paid × 100`, defined as 0 when nothing was paid.
pub fn profit_percent(profit_amount: f64, purchase_value: f64) -> f64 {
    if purchase_value != 0.0 {
        profit_amount / purchase_value * 100.0
    } else {
        0.0
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
