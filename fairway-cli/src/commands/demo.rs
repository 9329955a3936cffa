//! Demo mode toggle

use anyhow::{Context, Result};
use clap::Subcommand;
use fairway_core::config::Config;

use super::get_app_dir;
use crate::output;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Enable demo mode (seeded in-memory backend, no credentials needed)
    On,
    /// Disable demo mode
    Off,
    /// Show whether demo mode is enabled
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create app directory {}", app_dir.display()))?;

    let mut config = Config::load(&app_dir)?;

    match command.unwrap_or(DemoCommands::Status) {
        DemoCommands::On => {
            config.enable_demo_mode();
            config.save(&app_dir)?;
            output::success("Demo mode enabled");
        }
        DemoCommands::Off => {
            config.disable_demo_mode();
            config.save(&app_dir)?;
            output::success("Demo mode disabled");
        }
        DemoCommands::Status => {
            let status = if config.demo_mode { "on" } else { "off" };
            println!("Demo mode is {status}");
        }
    }
    Ok(())
}
