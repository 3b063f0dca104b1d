//! Configuration management for askchart.
//!
//! Handles loading configuration from TOML files and environment variables.
//! CLI arguments take precedence over the config file, which takes precedence
//! over built-in defaults.

use crate::error::{AskChartError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for askchart.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// LLM provider configuration.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// LLM provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider: "groq", "ollama", or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name (e.g., "gemma2-9b-it", "llama3.2:3b").
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_model() -> String {
    "gemma2-9b-it".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "northwind.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// A missing file is not an error; defaults are returned so the tool works
    /// out of the box with CLI arguments alone.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AskChartError::config(format!("Cannot read config file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            AskChartError::config(format!("Invalid config file {}: {e}", path.display()))
        })
    }

    /// Applies environment variable overrides.
    ///
    /// `ASKCHART_LLM_PROVIDER`, `ASKCHART_LLM_MODEL`, and `ASKCHART_DB_PATH`
    /// override the corresponding file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(provider) = std::env::var("ASKCHART_LLM_PROVIDER") {
            self.llm.provider = provider;
        }
        if let Ok(model) = std::env::var("ASKCHART_LLM_MODEL") {
            self.llm.model = model;
        }
        if let Ok(path) = std::env::var("ASKCHART_DB_PATH") {
            self.database.path = path;
        }
    }
}
