//! Terminal presentation of a valuation report.
//!
//! Output order: metrics, the two stacked charts, then the latest-data
//! table. Everything here formats already-computed numbers.

use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget},
};
use stock_pl_core::models::valuation::{Outcome, Report};
use stock_pl_core::MISSING_TICKER_MESSAGE;

/// Chart sizing in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub chart_width: u16,
    /// Height of each of the two charts
    pub chart_height: u16,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            chart_width: 80,
            chart_height: 14,
        }
    }
}

/// Full text for one render pass.
pub fn render_outcome(outcome: &Outcome, opts: &RenderOptions) -> String {
    match outcome {
        Outcome::MissingTicker => format!("{MISSING_TICKER_MESSAGE}\n"),
        Outcome::Unavailable(message) => format!("Error: {message}\n"),
        Outcome::Available(report) => render_report(report, opts),
    }
}

pub fn render_report(report: &Report, opts: &RenderOptions) -> String {
    let mut out = String::new();
    out.push_str(&render_metrics(report));
    out.push_str("\n### Price & Portfolio value\n");
    out.push_str(&render_charts(report, opts));
    out.push_str("\n### Latest data\n");
    out.push_str(&render_latest_table(report));
    out.push('\n');
    out
}

// ── Metrics ─────────────────────────────────────────────────────────

/// Buy value, current value (profit as delta) and profit % (profit as delta).
pub fn render_metrics(report: &Report) -> String {
    let v = &report.valuation;
    let s = &v.summary;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Buy value (USD)", "Current value (USD)", "Profit (%)"]);
    table.add_row(vec![
        format_currency(v.purchase_value),
        format_currency(s.current_value),
        format_percent(s.profit_percent),
    ]);
    table.add_row(vec![
        String::new(),
        format_delta(&format_currency(s.profit_amount), s.profit_amount),
        format_delta(&format_number(s.profit_amount), s.profit_amount),
    ]);
    format!("{table}\n")
}

fn format_delta(text: &str, amount: f64) -> String {
    let arrow = if amount < 0.0 { '↓' } else { '↑' };
    format!("{arrow} {text}")
}

// ── Latest-data table ───────────────────────────────────────────────

/// One row keyed by the last date in the series.
pub fn render_latest_table(report: &Report) -> String {
    let s = &report.valuation.summary;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Date", "Price", "Portfolio value", "Profit (USD)", "Profit (%)"]);
    table.add_row(vec![
        Cell::new(s.date),
        Cell::new(format_currency(s.latest_price)).set_alignment(CellAlignment::Right),
        Cell::new(format_currency(s.current_value)).set_alignment(CellAlignment::Right),
        Cell::new(format_currency(s.profit_amount)).set_alignment(CellAlignment::Right),
        Cell::new(format_percent(s.profit_percent)).set_alignment(CellAlignment::Right),
    ]);
    format!("{table}\n")
}

// ── Charts ──────────────────────────────────────────────────────────

/// Price on top, portfolio value below with a dashed buy-value line.
/// Both share the same date axis.
pub fn render_charts(report: &Report, opts: &RenderOptions) -> String {
    let series = &report.valuation.series;
    let purchase_value = report.valuation.purchase_value;
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return String::new();
    };
    let origin = first.date;

    let price_runs = line_runs(series.iter().map(|p| (day_offset(origin, p.date), p.price)));
    let value_runs = line_runs(
        series
            .iter()
            .map(|p| (day_offset(origin, p.date), p.portfolio_value)),
    );

    let x_max = day_offset(origin, last.date).max(1.0);
    let x_labels = date_labels(origin, last.date);
    let buy_line = dashed_line(purchase_value, x_max, opts.chart_width);

    let width = opts.chart_width.max(20);
    let height = opts.chart_height.max(5);
    let area = Rect::new(0, 0, width, height * 2);
    let mut buf = Buffer::empty(area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(height), Constraint::Length(height)])
        .split(area);

    let price_title = format!(" {} price ", report.position.ticker);
    let price_bounds = y_bounds(price_runs.iter().flatten().map(|p| p.1));
    Chart::new(run_datasets(&price_runs, None, Color::Blue))
    .block(Block::default().borders(Borders::ALL).title(price_title))
    .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels.clone()))
    .y_axis(
        Axis::default()
            .title("Price (USD)")
            .bounds(price_bounds)
            .labels(value_labels(price_bounds)),
    )
    .render(rows[0], &mut buf);

    let value_bounds = y_bounds(
        value_runs
            .iter()
            .flatten()
            .map(|p| p.1)
            .chain([purchase_value]),
    );
    let mut value_datasets = run_datasets(&value_runs, Some("Portfolio value"), Color::Green);
    value_datasets.push(
        Dataset::default()
            .name("Buy value")
            .marker(Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Gray))
            .data(&buy_line),
    );
    Chart::new(value_datasets)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Portfolio value since buy date "),
    )
    .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
    .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
    .y_axis(
        Axis::default()
            .title("Value (USD)")
            .bounds(value_bounds)
            .labels(value_labels(value_bounds)),
    )
    .render(rows[1], &mut buf);

    buffer_to_string(&buf)
}

/// Split a series into runs of consecutive priced points. A missing value
/// ends the current run so the chart shows a break there.
pub fn line_runs(points: impl Iterator<Item = (f64, Option<f64>)>) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current = Vec::new();
    for (x, y) in points {
        match y {
            Some(y) => current.push((x, y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// One line dataset per run; only the first carries the legend name.
/// A lone point has no segment to draw, so it is plotted as a dot.
fn run_datasets<'a>(runs: &'a [Vec<(f64, f64)>], name: Option<&'a str>, color: Color) -> Vec<Dataset<'a>> {
    runs.iter()
        .enumerate()
        .map(|(i, run)| {
            let graph_type = if run.len() > 1 {
                GraphType::Line
            } else {
                GraphType::Scatter
            };
            let dataset = Dataset::default()
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(color))
                .data(run);
            match name {
                Some(name) if i == 0 => dataset.name(name),
                _ => dataset,
            }
        })
        .collect()
}

fn day_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    (date - origin).num_days() as f64
}

fn date_labels(first: NaiveDate, last: NaiveDate) -> Vec<String> {
    let mid = first + (last - first) / 2;
    vec![first.to_string(), mid.to_string(), last.to_string()]
}

fn value_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = (bounds[0] + bounds[1]) / 2.0;
    vec![
        format_number(bounds[0]),
        format_number(mid),
        format_number(bounds[1]),
    ]
}

/// Min/max of `values` padded by 5%; a flat series gets ±1.
fn y_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return [0.0, 1.0];
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    [lo - pad, hi + pad]
}

/// Horizontal run of points at `y`, two on / two off across the width.
fn dashed_line(y: f64, x_max: f64, width: u16) -> Vec<(f64, f64)> {
    let steps = usize::from(width.max(2));
    (0..steps)
        .filter(|i| i % 4 < 2)
        .map(|i| (x_max * i as f64 / (steps - 1) as f64, y))
        .collect()
}

fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                line.push_str(cell.symbol());
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

// ── Number formatting ───────────────────────────────────────────────

/// `1234.5` → `1,234.50`
pub fn format_number(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// `1234.5` → `$1,234.50`, `-200` → `-$200.00`
pub fn format_currency(value: f64) -> String {
    let number = format_number(value);
    match number.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${number}"),
    }
}

/// `15.3846` → `15.38%`
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}
