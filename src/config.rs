//! Configuration management for boxoffice
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/boxoffice/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::ClientConfig;

pub const OMDB_KEY_ENV: &str = "OMDB_API_KEY";
pub const TMDB_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub omdb_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    pub omdb_base_url: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub tmdb_image_base_url: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/boxoffice/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("boxoffice").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load config from a specific file. A missing file yields defaults;
    /// an unreadable or malformed one is logged and also yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no config file");
                return Self::default();
            }
        };

        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Apply key overrides with precedence: explicit value, then the
    /// environment variable, then whatever the file had.
    pub fn with_overrides(
        mut self,
        omdb_api_key: Option<String>,
        tmdb_api_key: Option<String>,
    ) -> Self {
        self.omdb_api_key = pick_key(omdb_api_key, OMDB_KEY_ENV, self.omdb_api_key);
        self.tmdb_api_key = pick_key(tmdb_api_key, TMDB_KEY_ENV, self.tmdb_api_key);
        self
    }

    /// Immutable client configuration for `MetadataClient`
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.omdb_api_key.clone(), self.tmdb_api_key.clone());
        if let Some(ref url) = self.omdb_base_url {
            config.omdb_base_url = url.clone();
        }
        if let Some(ref url) = self.tmdb_base_url {
            config.tmdb_base_url = url.clone();
        }
        if let Some(ref url) = self.tmdb_image_base_url {
            config.tmdb_image_base_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Copy safe to print: keys reduced to their last four characters
    pub fn masked(&self) -> Self {
        Self {
            omdb_api_key: self.omdb_api_key.as_deref().map(mask_key),
            tmdb_api_key: self.tmdb_api_key.as_deref().map(mask_key),
            ..self.clone()
        }
    }
}

fn pick_key(explicit: Option<String>, env_var: &str, file: Option<String>) -> Option<String> {
    let env = std::env::var(env_var).ok();
    [explicit, env, file]
        .into_iter()
        .flatten()
        .find(|k| !k.is_empty())
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
