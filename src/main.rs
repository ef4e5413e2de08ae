//! User list - browse a cached list of users in the terminal
//!
//! Loads users from the configured endpoint (or from a cache younger than an
//! hour), shows them as cards and lets the user delete them locally.

mod app;
mod ui;

use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, TerminalController};
use userlist::cache::CacheManager;
use userlist::cli::{Cli, StartupConfig};
use userlist::clock::SystemClock;
use userlist::controller::UserListController;
use userlist::data::UsersClient;
use userlist::storage::{FileStorage, MemoryStorage};

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written next to the cache
const LOG_FILE_PREFIX: &str = "userlist";
const LOG_FILE_SUFFIX: &str = "log";

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Initialize the tracing subscriber, logging to a file in `log_dir`
///
/// The terminal belongs to the UI, so nothing is written to stdout/stderr.
/// Use RUST_LOG to control the level (e.g., RUST_LOG=debug).
fn init_tracing(log_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    std::fs::create_dir_all(log_dir)?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

/// Builds the controller from the startup configuration
fn build_controller(
    config: &StartupConfig,
    storage: FileStorage,
) -> Result<TerminalController, Box<dyn std::error::Error>> {
    let mut cache = CacheManager::new(storage, SystemClock);
    if config.clear_cache {
        info!("Clearing cached users");
        cache.clear()?;
    }

    let source = UsersClient::new().with_endpoint(config.endpoint.clone());
    Ok(UserListController::new(cache, MemoryStorage::new(), source)?)
}

/// Main event loop: draw, poll keys, apply finished loads
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            ui::render_user_list(frame, app);
            if app.show_help {
                ui::render_help_overlay(frame);
            }
        })?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key)?;
                }
            }
        }

        app.poll_fetches()?;

        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let storage = match &config.cache_dir {
        Some(dir) => FileStorage::with_dir(dir.clone()),
        None => FileStorage::new().ok_or("Could not determine a cache directory; pass --cache-dir")?,
    };
    let log_dir: PathBuf = storage.dir().to_path_buf();
    let _log_guard = init_tracing(&log_dir)?;
    info!(endpoint = %config.endpoint, cache_dir = %log_dir.display(), "User list starting");

    let controller = build_controller(&config, storage)?;
    let mut app = App::new(controller);

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match app.start() {
        Ok(()) => run_app(&mut terminal, &mut app),
        Err(e) => Err(e.into()),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("User list shutting down");
    result
}
