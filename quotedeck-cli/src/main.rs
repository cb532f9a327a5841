//! QuoteDeck CLI: the dashboard's sections as plain text.
//!
//! Commands:
//! - `market`: recent rows, statistics and company metrics for a ticker,
//!   plus an optional close-price PNG
//! - `tips`: tips dataset preview and the mean total bill chart
//! - `plot`: upload a CSV and build a bar chart from chosen columns

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quotedeck_core::chart::render_line_chart_png;
use quotedeck_core::data::YahooProvider;
use quotedeck_core::domain::{parse_date, DateRange, SamplingInterval};
use quotedeck_core::flow::{
    MarketOutcome, MarketReport, PlotOutcome, ProfileOutcome, TipsOutcome, EMPTY_WARNING,
};
use quotedeck_core::format::bar_table;
use quotedeck_core::table::TextTable;
use quotedeck_core::{DashboardConfig, DashboardEvent, Session};

#[derive(Parser)]
#[command(name = "quotedeck-cli", about = "QuoteDeck CLI: market dashboard sections as text")]
struct Cli {
    /// Config file (default: <config dir>/quotedeck/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price history, statistics and company metrics for a ticker.
    Market {
        /// Ticker symbol. Defaults to the configured one.
        #[arg(long)]
        symbol: Option<String>,

        /// Start date (YYYY-MM-DD). Defaults to the configured start.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Sampling interval: 1d, 1wk or 1mo.
        #[arg(long)]
        interval: Option<SamplingInterval>,

        /// Write the close-price chart to this PNG.
        #[arg(long)]
        chart_out: Option<PathBuf>,

        /// Print the full series as JSON instead of the text sections.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Tips dataset preview and bar chart (written as tips_barplot.png).
    Tips {
        /// Directory for the PNG. Defaults to the configured export dir.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Build a bar chart of mean Y per X from a CSV file.
    Plot {
        /// CSV file with a header row.
        #[arg(long)]
        file: PathBuf,

        /// Column for the X axis.
        #[arg(long)]
        x: String,

        /// Numeric column to average.
        #[arg(long)]
        y: String,

        /// Categorical column to split bars by.
        #[arg(long)]
        group: Option<String>,

        /// Also write the chart as <y>_vs_<x>.png into the export dir.
        #[arg(long, default_value_t = false)]
        export: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = DashboardConfig::load(cli.config.as_deref())?;
    tracing::debug!(symbol = %config.symbol, export_dir = %config.export_dir.display(), "config loaded");

    match cli.command {
        Commands::Market {
            symbol,
            start,
            end,
            interval,
            chart_out,
            json,
        } => run_market(config, symbol, start, end, interval, chart_out, json),
        Commands::Tips { out_dir } => run_tips(config, out_dir),
        Commands::Plot {
            file,
            x,
            y,
            group,
            export,
        } => run_plot(config, file, x, y, group, export),
    }
}

fn run_market(
    mut config: DashboardConfig,
    symbol: Option<String>,
    start: Option<String>,
    end: Option<String>,
    interval: Option<SamplingInterval>,
    chart_out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    if let Some(symbol) = symbol {
        config.symbol = symbol.to_uppercase();
    }
    if let Some(interval) = interval {
        config.default_interval = interval;
    }
    let start = match start {
        Some(s) => parse_date(&s)?,
        None => config.default_start,
    };
    let end = match end {
        Some(s) => parse_date(&s)?,
        None => chrono::Local::now().date_naive(),
    };

    let provider = Arc::new(YahooProvider::new()?);
    let mut session = Session::with_range(config, provider, DateRange::new(start, end));
    session.start();

    let report = match session.market() {
        Some(MarketOutcome::Ready(report)) => report,
        Some(MarketOutcome::Empty { .. }) => {
            eprintln!("{EMPTY_WARNING}");
            return Ok(());
        }
        Some(MarketOutcome::Failed { message, .. }) => bail!("{message}"),
        None => bail!("market flow did not run"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(report.series.as_ref())?);
        return Ok(());
    }

    print_market(report);

    if let Some(path) = chart_out {
        render_line_chart_png(&report.chart, &path)?;
        println!("\nChart saved to: {}", path.display());
    }
    Ok(())
}

fn print_market(report: &MarketReport) {
    let q = &report.query;
    println!(
        "{} {} to {} ({})",
        q.symbol, q.range.start, q.range.end, q.interval.label()
    );
    section("Recent rows", &report.preview);
    section("Statistics", &report.stats_table);

    println!("\nCompany");
    match &report.profile {
        ProfileOutcome::Ready(view) => {
            for (label, value) in view.tiles() {
                println!("  {label:<16} {value}");
            }
        }
        ProfileOutcome::Failed(message) => println!("  {message}"),
    }
}

fn run_tips(mut config: DashboardConfig, out_dir: Option<PathBuf>) -> Result<()> {
    if let Some(dir) = out_dir {
        config.export_dir = dir;
    }
    let provider = Arc::new(YahooProvider::new()?);
    let mut session = Session::new(config, provider);
    session.apply(DashboardEvent::ToggleTips);

    match session.tips() {
        Some(TipsOutcome::Ready(report)) => {
            section("Tips dataset", &report.preview);
            println!("\n{}", report.chart.title);
            println!("{}", bar_table(&report.chart).to_plain());
            println!("\nChart saved to: {}", report.export.display());
            Ok(())
        }
        Some(TipsOutcome::Failed(message)) => bail!("{message}"),
        None => bail!("tips chart is disabled"),
    }
}

fn run_plot(
    config: DashboardConfig,
    file: PathBuf,
    x: String,
    y: String,
    group: Option<String>,
    export: bool,
) -> Result<()> {
    let provider = Arc::new(YahooProvider::new()?);
    let mut session = Session::new(config, provider);
    session.apply(DashboardEvent::Upload(file));
    if let Some(err) = session.upload_error() {
        bail!("{err}");
    }

    let Some(upload) = session.upload() else {
        bail!("no table loaded");
    };
    let columns = upload.x_options();
    for column in [&x, &y] {
        if !columns.contains(column) {
            bail!("unknown column '{column}'. Columns: {}", columns.join(", "));
        }
    }
    if let Some(g) = &group {
        if !upload.group_options().contains(&Some(g.clone())) {
            bail!("'{g}' is not a categorical column");
        }
    }
    section(upload.table().name(), upload.preview());

    session.apply(DashboardEvent::SelectX(x));
    session.apply(DashboardEvent::SelectY(y));
    session.apply(DashboardEvent::SelectGroup(group));
    session.apply(DashboardEvent::BuildChart);

    match session.upload().and_then(|u| u.plot()) {
        Some(PlotOutcome::Ready(data)) => {
            println!("\n{}", data.title);
            println!("{}", bar_table(data).to_plain());
        }
        Some(PlotOutcome::Failed(message)) => bail!("{message}"),
        None => bail!("chart was not built"),
    }

    if export {
        session.apply(DashboardEvent::ExportUploadChart);
        match session.upload_export() {
            Some(Ok(path)) => println!("\nChart saved to: {}", path.display()),
            Some(Err(message)) => bail!("{message}"),
            None => {}
        }
    }
    Ok(())
}

fn section(title: &str, table: &TextTable) {
    println!("\n{title}");
    println!("{}", table.to_plain());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn market_accepts_interval_tokens() {
        let cli = Cli::try_parse_from([
            "quotedeck-cli", "market", "--start", "2020-01-01", "--end", "2020-02-01", "--interval", "1mo",
        ])
        .unwrap();
        match cli.command {
            Commands::Market { interval, start, .. } => {
                assert_eq!(interval, Some(SamplingInterval::Monthly));
                assert_eq!(start.as_deref(), Some("2020-01-01"));
            }
            _ => panic!("expected market command"),
        }
    }

    #[test]
    fn bad_interval_is_rejected() {
        assert!(Cli::try_parse_from(["quotedeck-cli", "market", "--interval", "2h"]).is_err());
    }
}
