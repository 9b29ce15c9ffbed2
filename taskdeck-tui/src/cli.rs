use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "taskdeck")]
#[command(about = "Terminal task manager with list and timeline views")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run against the task service configured in config.toml
    Run,
    /// Run in dev mode with local in-memory data
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
}
