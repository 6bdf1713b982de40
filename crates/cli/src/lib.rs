//! Command-line front end for the stock profit/loss tracker.
//!
//! ```bash
//! # AAPL bought a year ago, 10 shares at $130
//! stock-pl AAPL --shares 10 --buy-price 130
//!
//! # explicit date, CSV written to ./out/MSFT_portfolio.csv
//! stock-pl msft -d 2023-01-03 -s 5 -p 240 --export out
//!
//! # edit inputs at a prompt; each change re-renders
//! stock-pl --interactive
//! ```

pub mod app;
pub mod args;
pub mod input;
pub mod logging;
pub mod render;
