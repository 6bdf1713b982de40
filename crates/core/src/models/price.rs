use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day as returned by a history provider.
///
/// Either price field may be missing for a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub close: Option<f64>,
    pub adj_close: Option<f64>,
}

/// Which price column a series was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceColumn {
    Close,
    AdjClose,
}

impl std::fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceColumn::Close => write!(f, "Close"),
            PriceColumn::AdjClose => write!(f, "Adj Close"),
        }
    }
}

/// Time-indexed table of daily prices for one symbol.
///
/// Rows are sorted by date ascending with no duplicate dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub rows: Vec<HistoryRow>,
}

impl PriceHistory {
    /// Build a history from unordered rows: sorts by date and keeps the
    /// last row seen for any repeated date.
    pub fn from_rows(symbol: impl Into<String>, mut rows: Vec<HistoryRow>) -> Self {
        rows.sort_by_key(|r| r.date);
        let mut deduped: Vec<HistoryRow> = Vec::with_capacity(rows.len());
        for row in rows {
            match deduped.last_mut() {
                Some(last) if last.date == row.date => *last = row,
                _ => deduped.push(row),
            }
        }
        Self {
            symbol: symbol.into(),
            rows: deduped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A column counts as present if at least one row has a value in it.
    pub fn has_column(&self, column: PriceColumn) -> bool {
        self.rows.iter().any(|r| r.value(column).is_some())
    }

    /// The column to price from: Close first, Adj Close as a fallback.
    pub fn preferred_column(&self) -> Option<PriceColumn> {
        [PriceColumn::Close, PriceColumn::AdjClose]
            .into_iter()
            .find(|c| self.has_column(*c))
    }

    /// Project one column into a price series, keeping missing days as `None`.
    pub fn series(&self, column: PriceColumn) -> Vec<PricePoint> {
        self.rows
            .iter()
            .map(|r| PricePoint {
                date: r.date,
                price: r.value(column),
            })
            .collect()
    }
}

impl HistoryRow {
    pub fn value(&self, column: PriceColumn) -> Option<f64> {
        match column {
            PriceColumn::Close => self.close,
            PriceColumn::AdjClose => self.adj_close,
        }
    }
}

/// A single price data point (date → price). `None` marks a day the
/// provider listed without a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Option<f64>,
}
