//! User settings for Rubik
//!
//! Stores the backend URL and display preferences in `config.json`.
//! `RUBIK_API_URL` overrides the stored URL without rewriting the file.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::paths::RubikPaths;
use crate::error::RubikError;

/// Environment variable overriding [`Settings::api_url`]
pub const API_URL_ENV: &str = "RUBIK_API_URL";

/// User settings for Rubik
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the REST backend
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_currency() -> String {
    "R$".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist.
    /// The `RUBIK_API_URL` override is applied in both cases.
    pub fn load_or_create(paths: &RubikPaths) -> Result<Self, RubikError> {
        let settings_path = paths.settings_file();

        let mut settings = if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| RubikError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str::<Settings>(&contents)
                .map_err(|e| RubikError::Config(format!("Failed to parse settings file: {}", e)))?
        } else {
            Settings::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                settings.api_url = url;
            }
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RubikPaths) -> Result<(), RubikError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| RubikError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| RubikError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
