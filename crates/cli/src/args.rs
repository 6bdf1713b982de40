use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use stock_pl_core::models::position::{DEFAULT_BUY_PRICE, DEFAULT_SHARES, DEFAULT_TICKER};
use stock_pl_core::models::settings::{ProviderKind, Settings};

use crate::render::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "stock-pl")]
#[command(
    about = "Simple stock profit / loss tracker",
    long_about = "Enter a ticker, the buy date, shares and buy price. \
                  Shows profit since that date and plots portfolio value over time."
)]
#[command(version)]
pub struct Cli {
    /// Ticker symbol (e.g. AAPL)
    #[arg(default_value = DEFAULT_TICKER)]
    pub ticker: String,

    /// Buy date (YYYY-MM-DD), defaults to one year ago
    #[arg(short = 'd', long, value_parser = parse_date)]
    pub buy_date: Option<NaiveDate>,

    /// Shares held (can be fractional)
    #[arg(short, long, default_value_t = DEFAULT_SHARES, value_parser = parse_amount)]
    pub shares: f64,

    /// Buy price per share (USD)
    #[arg(short = 'p', long, default_value_t = DEFAULT_BUY_PRICE, value_parser = parse_amount)]
    pub buy_price: f64,

    /// Edit inputs at a prompt; every change re-renders the report
    #[arg(short, long)]
    pub interactive: bool,

    /// Write {TICKER}_portfolio.csv into this directory
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Price history source
    #[arg(long, value_enum, default_value_t = ProviderArg::Yahoo)]
    pub provider: ProviderArg,

    /// Minutes a fetched history is reused before refetching
    #[arg(long, default_value_t = 30)]
    pub cache_ttl_mins: u64,

    /// Base URL for the chart provider
    #[arg(long)]
    pub chart_base_url: Option<String>,

    /// Chart width in terminal columns
    #[arg(long, default_value_t = 80)]
    pub chart_width: u16,

    /// Height of each chart in terminal rows
    #[arg(long, default_value_t = 14)]
    pub chart_height: u16,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// yahoo_finance_api connector
    Yahoo,
    /// Direct Yahoo v8 chart endpoint
    YahooChart,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Yahoo => ProviderKind::Yahoo,
            ProviderArg::YahooChart => ProviderKind::YahooChart,
        }
    }
}

impl Cli {
    pub fn settings(&self) -> Settings {
        Settings {
            provider: self.provider.into(),
            cache_ttl: Duration::from_secs(self.cache_ttl_mins * 60),
            chart_base_url: self.chart_base_url.clone(),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            chart_width: self.chart_width,
            chart_height: self.chart_height,
        }
    }
}

/// Parse a YYYY-MM-DD date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {s:?}: {e}. Expected YYYY-MM-DD"))
}

/// Parse a finite, non-negative decimal.
pub fn parse_amount(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("Invalid number {s:?}: {e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{s} must be a non-negative number"));
    }
    Ok(value)
}
