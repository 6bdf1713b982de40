use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use stock_pl_core::models::position::Position;

use crate::args::{parse_amount, parse_date};

pub const HELP: &str = "\
Commands:
  ticker <SYMBOL>     set the ticker (e.g. ticker msft)
  date <YYYY-MM-DD>   set the buy date
  shares <N>          set the share count
  price <P>           set the buy price per share
  export [DIR]        write {TICKER}_portfolio.csv (default: current dir)
  show                render again with the current inputs
  help                this text
  quit                exit";

/// One line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ticker(String),
    BuyDate(NaiveDate),
    Shares(f64),
    BuyPrice(f64),
    Export(PathBuf),
    Show,
    Help,
    Quit,
}

impl Command {
    /// True for edits that change the position and so need a new render pass.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Command::Ticker(_) | Command::BuyDate(_) | Command::Shares(_) | Command::BuyPrice(_)
        )
    }
}

/// Parse a prompt line. Keywords are case-insensitive.
pub fn parse_command(line: &str) -> Result<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "ticker" | "t" => Command::Ticker(rest.to_string()),
        "date" | "d" => Command::BuyDate(parse_date(rest).map_err(anyhow::Error::msg)?),
        "shares" | "s" => Command::Shares(parse_amount(rest).map_err(anyhow::Error::msg)?),
        "price" | "p" => Command::BuyPrice(parse_amount(rest).map_err(anyhow::Error::msg)?),
        "export" | "e" => Command::Export(if rest.is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(rest)
        }),
        "show" | "" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command {other:?}. Type `help` for a list."),
    };
    Ok(cmd)
}

/// Apply an edit to `position`. Non-edit commands leave it untouched.
/// A rejected value keeps the previous one.
pub fn apply(position: &mut Position, cmd: &Command) -> Result<()> {
    match cmd {
        Command::Ticker(t) => position.set_ticker(t),
        Command::BuyDate(d) => position.buy_date = *d,
        Command::Shares(n) => position.set_shares(*n)?,
        Command::BuyPrice(p) => position.set_buy_price(*p)?,
        Command::Export(_) | Command::Show | Command::Help | Command::Quit => {}
    }
    Ok(())
}
