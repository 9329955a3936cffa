//! Configuration management
//!
//! Settings live in `settings.json` under the app directory:
//! ```json
//! {
//!   "app": { "demoMode": false },
//!   "backend": { "url": "https://...", "anonKey": "..." }
//! }
//! ```
//! Environment variables override the file for CI and local development.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    backend: BackendSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackendSettings {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    anon_key: Option<String>,
}

/// Fairway configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub demo_mode: bool,
    pub backend_url: Option<String>,
    pub backend_anon_key: Option<String>,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Load config from the app directory
    ///
    /// Demo mode can be toggled via the settings file (`fw demo on`) or the
    /// FAIRWAY_DEMO_MODE environment variable (for CI/testing). Backend
    /// credentials come from the file or FAIRWAY_SUPABASE_URL /
    /// FAIRWAY_SUPABASE_ANON_KEY.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let settings_path = app_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let demo_mode = match std::env::var("FAIRWAY_DEMO_MODE").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.app.demo_mode,
        };

        let backend_url = std::env::var("FAIRWAY_SUPABASE_URL")
            .ok()
            .or_else(|| raw.backend.url.clone());
        let backend_anon_key = std::env::var("FAIRWAY_SUPABASE_ANON_KEY")
            .ok()
            .or_else(|| raw.backend.anon_key.clone());

        Ok(Self {
            demo_mode,
            backend_url,
            backend_anon_key,
            _raw_settings: raw,
        })
    }

    /// Save config to the app directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, app_dir: &Path) -> Result<()> {
        let settings_path = app_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.app.demo_mode = self.demo_mode;
        settings.backend.url = self.backend_url.clone();
        settings.backend.anon_key = self.backend_anon_key.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Enable demo mode
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
    }

    /// The backend URL and anon key, required outside demo mode
    pub fn require_backend(&self) -> Result<(String, String)> {
        match (&self.backend_url, &self.backend_anon_key) {
            (Some(url), Some(key)) => Ok((url.clone(), key.clone())),
            _ => Err(Error::config(
                "missing backend credentials; set backend.url and backend.anonKey \
                 in settings.json or the FAIRWAY_SUPABASE_* environment variables",
            )),
        }
    }
}
