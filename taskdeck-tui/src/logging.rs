use crate::config::TaskdeckConfig;
use anyhow::{Context, Result};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "TASKDECK_LOG";

/// Log to a file; the terminal belongs to the UI. `TASKDECK_LOG` takes
/// precedence over the configured level.
pub fn init(config: &TaskdeckConfig) -> Result<()> {
    let path = TaskdeckConfig::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    let log_file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}
