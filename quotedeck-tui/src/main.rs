//! QuoteDeck TUI: three-panel market dashboard with vim-style navigation.
//!
//! Panels:
//! 1. Market: close-price chart, recent rows, statistics, company metrics
//! 2. Datasets: tips chart toggle and upload-and-plot
//! 3. Help: keyboard shortcuts

mod app;
mod input;
mod theme;
mod ui;

#[cfg(test)]
mod test_helpers;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use quotedeck_core::data::YahooProvider;
use quotedeck_core::{DashboardConfig, Session};

use crate::app::AppState;

#[derive(Parser)]
#[command(name = "quotedeck", version, about = "Terminal market dashboard")]
struct Args {
    /// Config file (default: <config dir>/quotedeck/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::load(args.config.as_deref())?;
    init_logging(&config)?;
    tracing::info!(symbol = %config.symbol, "starting quotedeck tui");

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let provider = Arc::new(YahooProvider::new()?);
    let mut app = AppState::new(Session::new(config, provider));
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(cache = ?app.session.market_flow().cache_stats(), "quotedeck tui exiting");
    result
}

/// Log to `quotedeck.log` so output does not tear the alternate screen.
fn init_logging(config: &DashboardConfig) -> Result<()> {
    let dir = config.resolved_log_dir();
    std::fs::create_dir_all(&dir).with_context(|| format!("create log dir {}", dir.display()))?;
    let path = dir.join("quotedeck.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 3. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
