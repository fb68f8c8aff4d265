//! Configuration for remplay.
//!
//! Loads `~/.remplay/config.toml`:
//!
//! ```toml
//! # Interpreter command used when none is given on the command line
//! interpreter = "glulxe story.ulx"
//!
//! [metrics]
//! width = 70
//! height = 24
//! ```
//!
//! Every field is optional; command-line arguments override the file.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interpreter command line used when none is given on the CLI
    pub interpreter: Option<String>,
    /// Display metrics advertised to the interpreter
    pub metrics: MetricsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: None,
            metrics: MetricsConfig::default(),
        }
    }
}

/// Display metrics section
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            width: 70,
            height: 24,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    /// Get config file path
    fn config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".remplay").join("config.toml"))
    }
}

/// Get home directory
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
