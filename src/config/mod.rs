//! Configuration management
//!
//! This module handles loading and parsing configuration for the Sensive blog.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Theme configuration
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Uploaded media configuration
    #[serde(default)]
    pub media: MediaConfig,
    /// Page listing sizes
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/sensive.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Active theme name
    #[serde(default = "default_theme")]
    pub active: String,
    /// Path to themes directory
    #[serde(default = "default_theme_path")]
    pub path: PathBuf,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            active: default_theme(),
            path: default_theme_path(),
        }
    }
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_theme_path() -> PathBuf {
    PathBuf::from("themes")
}

/// Uploaded media configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Public URL prefix that post image paths are resolved against
    #[serde(default = "default_media_url")]
    pub url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            url: default_media_url(),
        }
    }
}

fn default_media_url() -> String {
    "/media/".to_string()
}

/// How many items each page block shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Posts in the "most popular" block
    #[serde(default = "default_block_size")]
    pub popular_posts: u32,
    /// Posts in the "freshest" block of the index page
    #[serde(default = "default_block_size")]
    pub fresh_posts: u32,
    /// Tags in the "popular tags" block
    #[serde(default = "default_block_size")]
    pub popular_tags: u32,
    /// Posts listed on a tag page
    #[serde(default = "default_tag_posts")]
    pub tag_posts: u32,
    /// Characters kept in a post teaser
    #[serde(default = "default_teaser_length")]
    pub teaser_length: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            popular_posts: default_block_size(),
            fresh_posts: default_block_size(),
            popular_tags: default_block_size(),
            tag_posts: default_tag_posts(),
            teaser_length: default_teaser_length(),
        }
    }
}

fn default_block_size() -> u32 {
    5
}

fn default_tag_posts() -> u32 {
    20
}

fn default_teaser_length() -> usize {
    200
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: format_yaml_error(&e),
            }
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - SENSIVE_SERVER_HOST
    /// - SENSIVE_SERVER_PORT
    /// - SENSIVE_DATABASE_DRIVER
    /// - SENSIVE_DATABASE_URL
    /// - SENSIVE_THEME_ACTIVE
    /// - SENSIVE_THEME_PATH
    /// - SENSIVE_MEDIA_URL
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SENSIVE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SENSIVE_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }

        if let Ok(driver) = std::env::var("SENSIVE_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                _ => {} // Ignore invalid values
            }
        }
        if let Ok(url) = std::env::var("SENSIVE_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(active) = std::env::var("SENSIVE_THEME_ACTIVE") {
            self.theme.active = active;
        }
        if let Ok(path) = std::env::var("SENSIVE_THEME_PATH") {
            self.theme.path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("SENSIVE_MEDIA_URL") {
            self.media.url = url;
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    if let Some(location) = e.location() {
        format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        )
    } else {
        e.to_string()
    }
}
