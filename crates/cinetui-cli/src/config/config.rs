//! Application configuration data model.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cinetui_api::catalog::FavoriteSort;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog backend settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Theater listing settings.
    #[serde(default)]
    pub theaters: TheatersConfig,
    /// Favorites view settings.
    #[serde(default)]
    pub favorites: FavoritesConfig,
}

/// Catalog backend settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the catalog backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    String::from("http://127.0.0.1:8000")
}

/// Theater listing settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TheatersConfig {
    /// City used for the now-playing listing.
    #[serde(default = "default_city")]
    pub city: String,
}

impl Default for TheatersConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
        }
    }
}

fn default_city() -> String {
    String::from("北京")
}

/// Favorites view settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct FavoritesConfig {
    /// Initial sort order for the favorites list.
    #[serde(default)]
    pub sort_by: FavoriteSort,
}

impl AppConfig {
    /// Loads configuration from the given path.
    ///
    /// Returns the default configuration if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}
