use chrono::NaiveDateTime;

use crate::errors::CoreError;
use crate::models::valuation::ValuationPoint;

/// Header of the exported table. The first (index) column is unnamed.
pub const CSV_HEADER: [&str; 4] = ["", "price", "portfolio_value", "profit_vs_buy"];

/// Index timestamps are written at midnight in this layout.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serializes valuation series to CSV and reads them back.
///
/// Columns: date, price, portfolio_value, profit_vs_buy.
/// Missing values are written as empty fields.
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Download name for a ticker's export, e.g. `AAPL_portfolio.csv`.
    pub fn file_name(ticker: &str) -> String {
        format!("{ticker}_portfolio.csv")
    }

    /// Render the series as UTF-8 CSV bytes, one row per date in order.
    pub fn to_csv(&self, series: &[ValuationPoint]) -> Result<Vec<u8>, CoreError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for point in series {
            let date = point
                .date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.format(DATE_FORMAT).to_string())
                .unwrap_or_else(|| point.date.to_string());
            writer.write_record([
                date,
                format_value(point.price),
                format_value(point.portfolio_value),
                format_value(point.profit),
            ])?;
        }
        writer
            .into_inner()
            .map_err(|e| CoreError::Serialization(format!("Failed to flush CSV: {e}")))
    }

    /// Parse a CSV produced by [`ExportService::to_csv`].
    pub fn parse_csv(&self, data: &[u8]) -> Result<Vec<ValuationPoint>, CoreError> {
        let mut reader = csv::Reader::from_reader(data);

        let headers = reader.headers()?.clone();
        if headers.iter().ne(CSV_HEADER.iter().copied()) {
            return Err(CoreError::Deserialization(format!(
                "Unexpected CSV header: {}",
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        let mut points = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or_default();
            let date = NaiveDateTime::parse_from_str(field(0), DATE_FORMAT)
                .map_err(|e| {
                    CoreError::Deserialization(format!("Row {}: bad date {:?}: {e}", line + 1, field(0)))
                })?
                .date();
            points.push(ValuationPoint {
                date,
                price: parse_value(field(1), line)?,
                portfolio_value: parse_value(field(2), line)?,
                profit: parse_value(field(3), line)?,
            });
        }
        Ok(points)
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_value(raw: &str, line: usize) -> Result<Option<f64>, CoreError> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| CoreError::Deserialization(format!("Row {}: bad number {raw:?}: {e}", line + 1)))
}
