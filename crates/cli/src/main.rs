use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use stock_pl_core::models::position::{default_buy_date, Position};
use stock_pl_core::models::valuation::Outcome;
use stock_pl_core::StockTracker;

use stock_pl_cli::app::{run_interactive, run_once, write_export};
use stock_pl_cli::args::Cli;
use stock_pl_cli::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let today = || chrono::Local::now().date_naive();
    let position = Position::new(
        &cli.ticker,
        cli.buy_date.unwrap_or_else(|| default_buy_date(today())),
        cli.shares,
        cli.buy_price,
    )?;

    let mut tracker = StockTracker::new(cli.settings()).context("Failed to set up price provider")?;
    tracing::debug!(?tracker, "tracker ready");
    let opts = cli.render_options();
    let mut stdout = io::stdout().lock();

    if cli.interactive {
        let mut stdin = io::stdin().lock();
        return run_interactive(&mut tracker, position, today, &opts, &mut stdin, &mut stdout).await;
    }

    let outcome = run_once(&mut tracker, &position, today(), &opts, &mut stdout).await?;
    if let (Some(dir), Outcome::Available(report)) = (&cli.export, &outcome) {
        let path = write_export(&tracker, report, dir)?;
        writeln!(stdout, "Saved {}", path.display())?;
    }
    Ok(())
}
