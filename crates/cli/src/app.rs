use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use stock_pl_core::models::position::Position;
use stock_pl_core::models::valuation::{Outcome, Report};
use stock_pl_core::StockTracker;
use tracing::info;

use crate::input::{apply, parse_command, Command, HELP};
use crate::render::{render_outcome, RenderOptions};

/// Write a report's CSV into `dir` as `{TICKER}_portfolio.csv`.
pub fn write_export(tracker: &StockTracker, report: &Report, dir: &Path) -> Result<PathBuf> {
    let (file_name, bytes) = tracker.export_csv(report)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), rows = report.valuation.series.len(), "CSV exported");
    Ok(path)
}

/// One render pass written to `out`. Returns the outcome for callers that
/// need the report afterwards (export).
pub async fn run_once(
    tracker: &mut StockTracker,
    position: &Position,
    today: NaiveDate,
    opts: &RenderOptions,
    out: &mut impl Write,
) -> Result<Outcome> {
    let outcome = tracker.evaluate(position, today).await;
    out.write_all(render_outcome(&outcome, opts).as_bytes())?;
    out.flush()?;
    Ok(outcome)
}

/// Prompt loop: each accepted edit triggers a fresh render pass. Fetches
/// are shared through the tracker's cache, so re-rendering the same
/// ticker and date window within the TTL does not hit the network.
///
/// `today` is asked again for every pass, so a session left open past
/// midnight fetches up to the new date.
pub async fn run_interactive(
    tracker: &mut StockTracker,
    mut position: Position,
    today: impl Fn() -> NaiveDate,
    opts: &RenderOptions,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "{HELP}\n")?;
    let mut last = run_once(tracker, &position, today(), opts, out).await?;

    loop {
        write!(
            out,
            "[{} | {} | {} sh @ {}] > ",
            if position.has_ticker() { position.ticker.as_str() } else { "-" },
            position.buy_date,
            position.shares,
            position.buy_price
        )?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }

        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match &cmd {
            Command::Quit => return Ok(()),
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Show => last = run_once(tracker, &position, today(), opts, out).await?,
            Command::Export(dir) => match &last {
                Outcome::Available(report) => match write_export(tracker, report, dir) {
                    Ok(path) => writeln!(out, "Saved {}", path.display())?,
                    Err(e) => writeln!(out, "Export failed: {e:#}")?,
                },
                _ => writeln!(out, "Nothing to export yet.")?,
            },
            edit => {
                if let Err(e) = apply(&mut position, edit) {
                    writeln!(out, "{e}")?;
                    continue;
                }
                last = run_once(tracker, &position, today(), opts, out).await?;
            }
        }
    }
}
