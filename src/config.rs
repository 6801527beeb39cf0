//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::airbnb::selectors::Selectors;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Run Chrome without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Chrome/Chromium binary; auto-detected when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Pass --no-sandbox to Chrome (containers running as root)
    #[serde(default)]
    pub no_sandbox: bool,

    /// Upper bound for navigation and selector waits, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Quiet period that counts as network idle, in milliseconds
    #[serde(default = "default_network_idle_ms")]
    pub network_idle_ms: u64,

    /// Page selectors
    #[serde(default)]
    pub selectors: Selectors,
}

fn default_headless() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_network_idle_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            headless: default_headless(),
            chrome_executable: None,
            no_sandbox: false,
            timeout_ms: default_timeout_ms(),
            network_idle_ms: default_network_idle_ms(),
            selectors: Selectors::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("listing-scraper").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(chrome) = std::env::var("LISTING_CHROME") {
            self.chrome_executable = Some(PathBuf::from(chrome));
        }

        if let Ok(headless) = std::env::var("LISTING_HEADLESS") {
            match headless.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.headless = true,
                "0" | "false" | "no" => self.headless = false,
                _ => {}
            }
        }

        if let Ok(timeout) = std::env::var("LISTING_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_ms = t;
            }
        }

        self
    }
}

/// Output format for the listing report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
