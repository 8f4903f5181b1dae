//! widgetdash - weather and headlines in your terminal
//!
//! A terminal UI that keeps a weather panel and a news ticker up to date in
//! the background, falling back to the last cached data when a provider fails.

use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use widgetdash::app::App;
use widgetdash::cli::{Cli, DashboardConfig};
use widgetdash::refresh::{self, Dashboard};
use widgetdash::render::Board;
use widgetdash::store::{FileStore, KvStore, MemoryStore};
use widgetdash::widget::{HttpTransport, Transport};
use widgetdash::{logging, ui};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Picks the persistent store, falling back to memory when no data directory exists
fn open_store(config: &DashboardConfig) -> (Arc<dyn KvStore>, Option<PathBuf>) {
    let file_store = match &config.data_dir {
        Some(dir) => Some(FileStore::with_dir(dir.clone())),
        None => FileStore::new(),
    };
    match file_store {
        Some(store) => {
            let dir = store.dir().to_path_buf();
            (Arc::new(store), Some(dir))
        }
        None => (Arc::new(MemoryStore::new()), None),
    }
}

/// Main event loop
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    dashboard: &mut Dashboard,
) -> io::Result<()> {
    loop {
        app.terminal_width = terminal.size()?.width;

        // Apply completed refresh cycles
        while let Some(message) = refresh::try_recv(dashboard) {
            app.apply_refresh_message(message);
        }

        if app.refresh_requested {
            info!("manual refresh requested");
            dashboard.refresh_all();
            app.refresh_requested = false;
        }

        // Render UI
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        app.tick();

        // Check if we should quit
        if app.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse before touching the terminal so --help and errors print normally
    let cli = Cli::parse();
    let config = match DashboardConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(2);
        }
    };

    let (store, data_dir) = open_store(&config);
    let _log_guard = match &data_dir {
        Some(dir) => match logging::init(dir, config.debug) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("Warning: logging disabled: {}", err);
                None
            }
        },
        None => None,
    };
    info!(data_dir = ?data_dir, "starting widgetdash");

    let board = Board::new();
    let mut dashboard = Dashboard::new();
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.timeout)?);
    refresh::start_widgets(&config, transport, Arc::clone(&store), &board, &mut dashboard)?;

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(board, store);
    let result = run(&mut terminal, &mut app, &mut dashboard);

    dashboard.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    info!("widgetdash stopped");

    result?;
    Ok(())
}
