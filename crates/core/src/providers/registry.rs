use crate::errors::CoreError;
use crate::models::settings::{ProviderKind, Settings};

use super::traits::HistoryProvider;
use super::yahoo_chart::YahooChartProvider;
use super::yahoo_finance::YahooFinanceProvider;

/// Build the history provider selected in `settings`.
pub fn provider_for(settings: &Settings) -> Result<Box<dyn HistoryProvider>, CoreError> {
    let provider: Box<dyn HistoryProvider> = match settings.provider {
        ProviderKind::Yahoo => Box::new(YahooFinanceProvider::new()?),
        ProviderKind::YahooChart => match &settings.chart_base_url {
            Some(url) => Box::new(YahooChartProvider::with_base_url(url.clone())),
            None => Box::new(YahooChartProvider::new()),
        },
    };
    tracing::debug!(provider = provider.name(), "history provider selected");
    Ok(provider)
}
