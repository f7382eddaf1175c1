//! Weather Box - Historical daily temperatures in the terminal
//!
//! A terminal UI application that fetches daily temperature statistics from
//! the Open-Meteo archive for a location and date range, charts them, and
//! pages through them in a table. `--plain` prints the table instead.

use std::io::{self, Stdout};
use std::panic;
use std::process;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use weatherbox::app::{App, AppState};
use weatherbox::cli::{Cli, StartupConfig};
use weatherbox::report::render_report;
use weatherbox::ui;

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

/// Logs go to stderr; `RUST_LOG` overrides the default level.
///
/// The dashboard owns the terminal, so it logs nothing unless asked.
fn init_tracing(plain: bool) {
    let default_level = if plain { "info" } else { "off" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Fetches once and prints the table to stdout
async fn run_plain(config: &StartupConfig) -> i32 {
    let mut app = App::new(config);
    app.load().await;

    match &app.state {
        AppState::Failed(message) => {
            eprintln!("Error: {}", message);
            1
        }
        _ => {
            let summary = app.range_summary();
            print!(
                "{}",
                render_report(&app.location_heading(), summary.as_deref(), app.records())
            );
            0
        }
    }
}

/// Runs a fetch while still reading keys, so `q` can abandon a slow load
async fn load_interruptible(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let fetch = app.start_load();
    tokio::pin!(fetch);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        tokio::select! {
            outcome = &mut fetch => {
                app.finish_load(outcome);
                return Ok(());
            }
            _ = tokio::time::sleep(Duration::from_millis(100)) => {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        app.handle_key(key);
                    }
                }
                // Dropping the pending fetch cancels the request
                if app.should_quit {
                    return Ok(());
                }
            }
        }
    }
}

async fn run_dashboard(config: &StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);

    // Trigger initial data load
    load_interruptible(&mut terminal, &mut app).await?;

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| ui::render(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Handle reload request
        if app.refresh_requested && !app.should_quit {
            app.refresh_requested = false;
            load_interruptible(&mut terminal, &mut app).await?;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    init_tracing(config.plain);

    if config.plain {
        let code = run_plain(&config).await;
        process::exit(code);
    }

    run_dashboard(&config).await
}
