//! Command implementations

pub mod auth;
pub mod demo;
pub mod score;
pub mod standings;
pub mod tour;

use std::path::PathBuf;

use anyhow::{Context, Result};
use fairway_core::FairwayContext;

/// Application directory, `~/.fairway` unless `FAIRWAY_DIR` overrides it.
pub fn get_app_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FAIRWAY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".fairway"))
}

pub fn get_context() -> Result<FairwayContext> {
    let app_dir = get_app_dir()?;
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("Failed to create app directory {}", app_dir.display()))?;
    FairwayContext::new(&app_dir).context("Failed to initialize Fairway")
}
