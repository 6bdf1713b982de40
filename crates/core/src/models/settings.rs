use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::cache::DEFAULT_CACHE_TTL;

/// Which upstream source supplies daily price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    /// `yahoo_finance_api` connector
    #[default]
    Yahoo,
    /// Direct HTTP call to the Yahoo v8 chart endpoint
    YahooChart,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Yahoo => write!(f, "yahoo"),
            ProviderKind::YahooChart => write!(f, "yahoo-chart"),
        }
    }
}

/// Runtime settings. Built from command-line flags; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// History source
    pub provider: ProviderKind,

    /// How long a fetched history is reused
    pub cache_ttl: Duration,

    /// Override for the chart endpoint base URL (YahooChart only)
    pub chart_base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            cache_ttl: DEFAULT_CACHE_TTL,
            chart_base_url: None,
        }
    }
}
