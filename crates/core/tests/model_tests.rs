// ═══════════════════════════════════════════════════════════════════
// Model Tests — Position, PriceHistory, HistoryCache
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::time::{Duration, Instant};

use stock_pl_core::errors::CoreError;
use stock_pl_core::models::cache::{FetchResult, HistoryCache, DEFAULT_CACHE_TTL};
use stock_pl_core::models::position::{default_buy_date, normalize_ticker, Position};
use stock_pl_core::models::price::{HistoryRow, PriceColumn, PriceHistory};
use stock_pl_core::models::settings::{ProviderKind, Settings};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn row(date: &str, close: Option<f64>, adj_close: Option<f64>) -> HistoryRow {
    HistoryRow {
        date: d(date),
        close,
        adj_close,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Position
// ═══════════════════════════════════════════════════════════════════

mod position {
    use super::*;

    #[test]
    fn ticker_is_trimmed_and_uppercased() {
        let p = Position::new("  aapl \n", d("2023-01-01"), 10.0, 130.0).unwrap();
        assert_eq!(p.ticker, "AAPL");
    }

    #[test]
    fn normalize_ticker_keeps_suffixes() {
        assert_eq!(normalize_ticker(" brk.b "), "BRK.B");
        assert_eq!(normalize_ticker("005930.ks"), "005930.KS");
    }

    #[test]
    fn blank_ticker_is_allowed_but_flagged() {
        let p = Position::new("   ", d("2023-01-01"), 1.0, 1.0).unwrap();
        assert!(!p.has_ticker());
    }

    #[test]
    fn purchase_value_is_shares_times_price() {
        let p = Position::new("AAPL", d("2023-01-01"), 10.0, 130.0).unwrap();
        assert_eq!(p.purchase_value(), 1300.0);
    }

    #[test]
    fn fractional_shares_allowed() {
        let p = Position::new("AAPL", d("2023-01-01"), 0.123456, 100.0).unwrap();
        assert!((p.purchase_value() - 12.3456).abs() < 1e-9);
    }

    #[test]
    fn zero_values_allowed() {
        let p = Position::new("AAPL", d("2023-01-01"), 0.0, 0.0).unwrap();
        assert_eq!(p.purchase_value(), 0.0);
    }

    #[test]
    fn negative_shares_rejected() {
        let err = Position::new("AAPL", d("2023-01-01"), -1.0, 100.0).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("Shares")));
    }

    #[test]
    fn negative_price_rejected() {
        let err = Position::new("AAPL", d("2023-01-01"), 1.0, -0.01).unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(ref m) if m.contains("Buy price")));
    }

    #[test]
    fn non_finite_rejected() {
        assert!(Position::new("AAPL", d("2023-01-01"), f64::NAN, 1.0).is_err());
        assert!(Position::new("AAPL", d("2023-01-01"), 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn setters_validate_and_keep_old_value() {
        let mut p = Position::new("AAPL", d("2023-01-01"), 1.0, 100.0).unwrap();
        assert!(p.set_shares(-5.0).is_err());
        assert_eq!(p.shares, 1.0);
        p.set_shares(2.5).unwrap();
        assert_eq!(p.shares, 2.5);
        assert!(p.set_buy_price(f64::NAN).is_err());
        assert_eq!(p.buy_price, 100.0);
        p.set_ticker(" msft ");
        assert_eq!(p.ticker, "MSFT");
    }

    #[test]
    fn defaults_match_the_input_form() {
        let today = d("2025-06-15");
        let p = Position::default_for(today);
        assert_eq!(p.ticker, "AAPL");
        assert_eq!(p.buy_date, d("2024-06-15"));
        assert_eq!(p.shares, 1.0);
        assert_eq!(p.buy_price, 100.0);
    }

    #[test]
    fn default_buy_date_is_365_days_back_across_leap_year() {
        assert_eq!(default_buy_date(d("2024-03-01")), d("2023-03-02"));
    }
}

// ═══════════════════════════════════════════════════════════════════
// PriceHistory
// ═══════════════════════════════════════════════════════════════════

mod price_history {
    use super::*;

    #[test]
    fn from_rows_sorts_by_date() {
        let h = PriceHistory::from_rows(
            "AAPL",
            vec![
                row("2024-01-04", Some(3.0), None),
                row("2024-01-02", Some(1.0), None),
                row("2024-01-03", Some(2.0), None),
            ],
        );
        let dates: Vec<_> = h.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![d("2024-01-02"), d("2024-01-03"), d("2024-01-04")]);
    }

    #[test]
    fn from_rows_keeps_last_duplicate() {
        let h = PriceHistory::from_rows(
            "AAPL",
            vec![
                row("2024-01-02", Some(1.0), None),
                row("2024-01-02", Some(1.5), None),
            ],
        );
        assert_eq!(h.len(), 1);
        assert_eq!(h.rows[0].close, Some(1.5));
    }

    #[test]
    fn close_is_preferred_when_both_present() {
        let h = PriceHistory::from_rows("AAPL", vec![row("2024-01-02", Some(10.0), Some(9.5))]);
        assert_eq!(h.preferred_column(), Some(PriceColumn::Close));
    }

    #[test]
    fn adj_close_used_when_close_absent() {
        let h = PriceHistory::from_rows(
            "AAPL",
            vec![row("2024-01-02", None, Some(9.5)), row("2024-01-03", None, Some(9.7))],
        );
        assert_eq!(h.preferred_column(), Some(PriceColumn::AdjClose));
    }

    #[test]
    fn one_close_value_makes_the_column_present() {
        let h = PriceHistory::from_rows(
            "AAPL",
            vec![row("2024-01-02", None, Some(9.5)), row("2024-01-03", Some(10.0), Some(9.7))],
        );
        assert_eq!(h.preferred_column(), Some(PriceColumn::Close));
    }

    #[test]
    fn no_column_when_nothing_priced() {
        let h = PriceHistory::from_rows("AAPL", vec![row("2024-01-02", None, None)]);
        assert_eq!(h.preferred_column(), None);
        assert!(PriceHistory::default().preferred_column().is_none());
    }

    #[test]
    fn series_keeps_missing_days() {
        let h = PriceHistory::from_rows(
            "AAPL",
            vec![row("2024-01-02", Some(1.0), None), row("2024-01-03", None, None)],
        );
        let s = h.series(PriceColumn::Close);
        assert_eq!(s.len(), 2);
        assert_eq!(s[1].price, None);
    }

    #[test]
    fn column_display_names() {
        assert_eq!(PriceColumn::Close.to_string(), "Close");
        assert_eq!(PriceColumn::AdjClose.to_string(), "Adj Close");
    }
}

// ═══════════════════════════════════════════════════════════════════
// HistoryCache
// ═══════════════════════════════════════════════════════════════════

mod history_cache {
    use super::*;

    fn sample() -> FetchResult {
        FetchResult::Available(PriceHistory::from_rows(
            "AAPL",
            vec![row("2024-01-02", Some(185.0), Some(184.0))],
        ))
    }

    #[test]
    fn default_ttl_is_thirty_minutes() {
        assert_eq!(DEFAULT_CACHE_TTL, Duration::from_secs(1800));
        assert_eq!(HistoryCache::new().ttl(), DEFAULT_CACHE_TTL);
    }

    #[test]
    fn key_uppercases_symbol() {
        let k = HistoryCache::key("aapl", d("2024-01-01"), d("2024-12-31"));
        assert_eq!(k, ("AAPL".to_string(), d("2024-01-01"), d("2024-12-31")));
    }

    #[test]
    fn hit_within_ttl() {
        let mut cache = HistoryCache::new();
        let key = HistoryCache::key("AAPL", d("2024-01-01"), d("2024-12-31"));
        let t0 = Instant::now();
        cache.insert_at(key.clone(), sample(), t0);
        assert_eq!(cache.get_at(&key, t0 + Duration::from_secs(29 * 60)), Some(&sample()));
    }

    #[test]
    fn miss_at_or_after_ttl() {
        let mut cache = HistoryCache::new();
        let key = HistoryCache::key("AAPL", d("2024-01-01"), d("2024-12-31"));
        let t0 = Instant::now();
        cache.insert_at(key.clone(), sample(), t0);
        assert!(cache.get_at(&key, t0 + DEFAULT_CACHE_TTL).is_none());
        assert!(cache.get_at(&key, t0 + Duration::from_secs(3600)).is_none());
    }

    #[test]
    fn different_window_is_a_different_entry() {
        let mut cache = HistoryCache::new();
        cache.insert(HistoryCache::key("AAPL", d("2024-01-01"), d("2024-12-31")), sample());
        assert!(cache
            .get(&HistoryCache::key("AAPL", d("2024-01-02"), d("2024-12-31")))
            .is_none());
        assert!(cache
            .get(&HistoryCache::key("MSFT", d("2024-01-01"), d("2024-12-31")))
            .is_none());
    }

    #[test]
    fn unavailable_results_are_cached_too() {
        let mut cache = HistoryCache::new();
        let key = HistoryCache::key("NOPE", d("2024-01-01"), d("2024-12-31"));
        cache.insert(key.clone(), FetchResult::Unavailable("not found".into()));
        assert_eq!(
            cache.get(&key),
            Some(&FetchResult::Unavailable("not found".into()))
        );
    }

    #[test]
    fn reinsert_refreshes_the_entry() {
        let mut cache = HistoryCache::with_ttl(Duration::from_secs(60));
        let key = HistoryCache::key("AAPL", d("2024-01-01"), d("2024-12-31"));
        let t0 = Instant::now();
        cache.insert_at(key.clone(), FetchResult::Unavailable("x".into()), t0);
        let t1 = t0 + Duration::from_secs(90);
        cache.insert_at(key.clone(), sample(), t1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at(&key, t1 + Duration::from_secs(30)), Some(&sample()));
    }

    #[test]
    fn prune_removes_only_expired() {
        let mut cache = HistoryCache::with_ttl(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at(HistoryCache::key("OLD", d("2024-01-01"), d("2024-12-31")), sample(), t0);
        cache.insert_at(
            HistoryCache::key("NEW", d("2024-01-01"), d("2024-12-31")),
            sample(),
            t0 + Duration::from_secs(50),
        );
        let removed = cache.prune_expired_at(t0 + Duration::from_secs(70));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties() {
        let mut cache = HistoryCache::new();
        cache.insert(HistoryCache::key("AAPL", d("2024-01-01"), d("2024-12-31")), sample());
        cache.clear();
        assert!(cache.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════

#[test]
fn settings_defaults() {
    let s = Settings::default();
    assert_eq!(s.provider, ProviderKind::Yahoo);
    assert_eq!(s.cache_ttl, DEFAULT_CACHE_TTL);
    assert!(s.chart_base_url.is_none());
    assert_eq!(ProviderKind::YahooChart.to_string(), "yahoo-chart");
}
