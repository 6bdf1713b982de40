// ═══════════════════════════════════════════════════════════════════
// Input Tests — argument parsing, prompt commands, applying edits
// ═══════════════════════════════════════════════════════════════════

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use stock_pl_core::models::position::Position;
use stock_pl_core::models::settings::ProviderKind;

use stock_pl_cli::args::{parse_amount, parse_date, Cli};
use stock_pl_cli::input::{apply, parse_command, Command};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ── Command-line arguments ──────────────────────────────────────────

mod args {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["stock-pl"]).unwrap();
        assert_eq!(cli.ticker, "AAPL");
        assert_eq!(cli.buy_date, None);
        assert_eq!(cli.shares, 1.0);
        assert_eq!(cli.buy_price, 100.0);
        assert!(!cli.interactive);
        assert!(cli.export.is_none());

        let settings = cli.settings();
        assert_eq!(settings.provider, ProviderKind::Yahoo);
        assert_eq!(settings.cache_ttl, Duration::from_secs(30 * 60));
    }

    #[test]
    fn full_position() {
        let cli = Cli::try_parse_from([
            "stock-pl", "msft", "-d", "2023-01-03", "-s", "2.5", "-p", "240.10", "--export", "out",
        ])
        .unwrap();
        assert_eq!(cli.ticker, "msft");
        assert_eq!(cli.buy_date, Some(d("2023-01-03")));
        assert_eq!(cli.shares, 2.5);
        assert_eq!(cli.buy_price, 240.10);
        assert_eq!(cli.export, Some(PathBuf::from("out")));
    }

    #[test]
    fn provider_and_cache_flags() {
        let cli = Cli::try_parse_from([
            "stock-pl",
            "--provider",
            "yahoo-chart",
            "--cache-ttl-mins",
            "5",
            "--chart-base-url",
            "http://localhost:8080",
        ])
        .unwrap();
        let settings = cli.settings();
        assert_eq!(settings.provider, ProviderKind::YahooChart);
        assert_eq!(settings.cache_ttl, Duration::from_secs(300));
        assert_eq!(settings.chart_base_url.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn negative_shares_rejected() {
        assert!(Cli::try_parse_from(["stock-pl", "--shares=-1"]).is_err());
    }

    #[test]
    fn bad_date_rejected() {
        assert!(Cli::try_parse_from(["stock-pl", "-d", "01/02/2023"]).is_err());
    }

    #[test]
    fn parse_helpers() {
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), d("2024-02-29"));
        assert!(parse_date("2023-02-29").is_err());
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert_eq!(parse_amount("1.000001").unwrap(), 1.000001);
        assert!(parse_amount("-0.5").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("ten").is_err());
    }
}

// ── Prompt commands ─────────────────────────────────────────────────

mod commands {
    use super::*;

    #[test]
    fn parses_edits() {
        assert_eq!(parse_command("ticker msft").unwrap(), Command::Ticker("msft".into()));
        assert_eq!(parse_command("DATE 2023-01-03").unwrap(), Command::BuyDate(d("2023-01-03")));
        assert_eq!(parse_command("shares 2.5\n").unwrap(), Command::Shares(2.5));
        assert_eq!(parse_command("p 99.99").unwrap(), Command::BuyPrice(99.99));
    }

    #[test]
    fn parses_controls() {
        assert_eq!(parse_command("").unwrap(), Command::Show);
        assert_eq!(parse_command("help").unwrap(), Command::Help);
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert_eq!(parse_command("export").unwrap(), Command::Export(PathBuf::from(".")));
        assert_eq!(parse_command("export /tmp/x").unwrap(), Command::Export(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn empty_ticker_is_an_edit() {
        assert_eq!(parse_command("ticker").unwrap(), Command::Ticker(String::new()));
    }

    #[test]
    fn rejects_bad_values_and_unknown_words() {
        assert!(parse_command("shares -1").is_err());
        assert!(parse_command("price abc").is_err());
        assert!(parse_command("date tomorrow").is_err());
        let err = parse_command("buy 10").unwrap_err();
        assert!(err.to_string().contains("Unknown command"));
    }

    #[test]
    fn edit_classification() {
        assert!(Command::Shares(1.0).is_edit());
        assert!(!Command::Show.is_edit());
        assert!(!Command::Export(PathBuf::from(".")).is_edit());
    }

    #[test]
    fn apply_updates_position() {
        let mut p = Position::new("AAPL", d("2023-01-01"), 1.0, 100.0).unwrap();
        apply(&mut p, &Command::Ticker(" tsla ".into())).unwrap();
        apply(&mut p, &Command::BuyDate(d("2023-06-01"))).unwrap();
        apply(&mut p, &Command::Shares(3.0)).unwrap();
        apply(&mut p, &Command::BuyPrice(250.0)).unwrap();
        assert_eq!(p, Position::new("TSLA", d("2023-06-01"), 3.0, 250.0).unwrap());
    }

    #[test]
    fn apply_ignores_controls() {
        let mut p = Position::new("AAPL", d("2023-01-01"), 1.0, 100.0).unwrap();
        let before = p.clone();
        apply(&mut p, &Command::Show).unwrap();
        apply(&mut p, &Command::Quit).unwrap();
        assert_eq!(p, before);
    }
}
