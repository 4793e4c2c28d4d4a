//! Satoshi market watcher
//!
//! Polls Polymarket for the "who is Satoshi" market once per interval and
//! renders the outcome probabilities as a sorted table in the terminal.
//!
//! # Usage
//! ```bash
//! satoshi-watch
//! satoshi-watch --interval-secs 30 --log-file watch.log
//! ```
//!
//! Press `q` or Ctrl+C to quit.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use polymarket_feed::{PriceFetcher, PriceSnapshot};

use app::App;

/// How long the event loop waits for input before redrawing
const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "satoshi-watch")]
#[command(about = "Terminal watcher for the 'who is Satoshi' Polymarket odds")]
#[command(version)]
struct Cli {
    /// Seconds between fetch cycles
    #[arg(long, default_value = "60")]
    interval_secs: u64,

    /// Write tracing output to this file (stdout belongs to the TUI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level when --log-file is set (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Messages from the poll task to the UI loop
enum FeedEvent {
    Snapshot(PriceSnapshot),
    Error(String),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging goes to a file when requested; with no file, no subscriber is
    // installed, since writing to stdout would corrupt the alternate screen.
    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let runtime = tokio::runtime::Runtime::new()?;

    // Startup precondition: a site we cannot resolve against is fatal before
    // the terminal is taken over.
    let mut fetcher = PriceFetcher::new()?;
    runtime
        .block_on(fetcher.resolve_build_id())
        .context("failed to resolve initial build id")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let interval = Duration::from_secs(cli.interval_secs);
    runtime.spawn(poll_loop(fetcher, tx, interval));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Background fetch cycle: one fetch per interval, never overlapping.
/// A failed cycle logs, reports to the UI, and waits for the next interval.
async fn poll_loop(
    mut fetcher: PriceFetcher,
    tx: mpsc::UnboundedSender<FeedEvent>,
    interval: Duration,
) {
    loop {
        let event = match fetcher.fetch().await {
            Ok(snapshot) => {
                info!("fetched {} outcomes", snapshot.outcomes.len());
                FeedEvent::Snapshot(snapshot)
            }
            Err(e) => {
                warn!("fetch cycle failed: {}", e);
                FeedEvent::Error(e.to_string())
            }
        };

        if tx.send(event).is_err() {
            // UI is gone, nothing left to feed.
            return;
        }

        tokio::time::sleep(interval).await;
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut rx: mpsc::UnboundedReceiver<FeedEvent>,
) -> Result<()> {
    let mut app = App::new();

    loop {
        // Apply everything the poll task produced since the last tick.
        while let Ok(event) = rx.try_recv() {
            match event {
                FeedEvent::Snapshot(snapshot) => app.on_snapshot(snapshot),
                FeedEvent::Error(message) => app.on_error(message),
            }
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        if event::poll(EVENT_POLL_TIMEOUT)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => app.should_quit = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    _ => {}
                },
                // The next draw picks up the new frame area.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
