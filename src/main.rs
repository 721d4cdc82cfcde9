mod app;
mod config;
mod db;
mod logging;
mod models;
mod ui;
mod validation;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::app::App;
use crate::config::BackendKind;
use crate::ui::route::Route;

/// Terminal dashboard for companies, contacts and tasks
#[derive(Parser, Debug)]
#[command(name = "crm-dashboard", version, about)]
struct Cli {
    /// Data service to use, overrides CRM_BACKEND
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,

    /// Screen to open first, e.g. /companies
    #[arg(long, default_value = "/")]
    route: String,

    /// Log file, overrides CRM_LOG_FILE
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::init()?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if let Some(log_file) = cli.log_file {
        config.log_file = log_file;
    }

    let _guard = logging::init(&config.log_file, &config.log_filter)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting crm dashboard");

    // Connect before taking over the terminal so errors print normally
    let db = db::init(&config).await?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(db, Route::from_path(&cli.route));
    app.load_current_route().await;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = %err, "dashboard stopped");
        println!("Error: {}", err);
    }

    println!("Thanks for using CRM Dashboard!");

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key).await;
        }

        if app.should_quit() {
            break;
        }
    }

    tracing::info!("quit");
    Ok(())
}
