mod api;
mod app;
mod bootstrap;
mod cli;
mod config;
mod logging;
mod runtime;
mod time_utils;
mod types;
mod ui;

use anyhow::Result;
use api::{ApiClient, DevBackend, TaskService};
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::TaskdeckConfig;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use time::UtcOffset;

fn main() -> Result<()> {
    // The local offset can only be read while the process is single-threaded
    let local_offset = time_utils::local_offset();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(local_offset))
}

async fn async_main(local_offset: UtcOffset) -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ConfigPath => {
            let path = TaskdeckConfig::config_path()?;
            if !path.exists() {
                TaskdeckConfig::default().save()?;
                eprintln!("Created default config.");
            }
            println!("{}", path.display());
            Ok(())
        }
        Commands::Run => {
            let cfg = TaskdeckConfig::load()?;
            let service = ApiClient::new(&cfg.api_url)?;
            run(Arc::new(service), cfg, local_offset).await
        }
        Commands::Dev => {
            let cfg = TaskdeckConfig::load()?;
            println!("Dev mode: using in-memory tasks, nothing is saved.");
            run(Arc::new(DevBackend::new()), cfg, local_offset).await
        }
    }
}

async fn run(
    service: Arc<dyn TaskService>,
    cfg: TaskdeckConfig,
    local_offset: UtcOffset,
) -> Result<()> {
    logging::init(&cfg)?;
    tracing::info!(api_url = %cfg.api_url, user_id = cfg.user_id, "starting taskdeck");

    let mut app = App::new(cfg.user_id, &cfg, local_offset);
    bootstrap::initialize_app_state(&mut app, service.as_ref()).await;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = runtime::run_app(&mut terminal, &mut app, service, cfg.refresh_interval()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!("event loop failed: {err:#}");
        eprintln!("Error: {:?}", err);
    }

    res
}
