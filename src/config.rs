//! TOML configuration with serde defaults so an empty file is valid.

use std::path::Path;

use serde::Deserialize;

use crate::{AppError, Result};

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// TCP port for the HTTP API.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Per-call capability timeout in seconds.
    #[serde(default = "default_capability_timeout_seconds")]
    pub capability_timeout_seconds: u64,
    /// Number of chat-history messages forwarded to the planner.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Planner endpoint settings.
    #[serde(default)]
    pub planner: PlannerConfig,
    /// Geo service endpoints for the built-in capabilities.
    #[serde(default)]
    pub geo: GeoConfig,
}

/// Planner endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Base URL of the OpenAI-compatible chat-completions API.
    #[serde(default = "default_planner_base_url")]
    pub base_url: String,
    /// Model identifier sent with each planner request.
    #[serde(default = "default_planner_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Geo service endpoints for the built-in capabilities.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeoConfig {
    /// Feature/dataproduct search endpoint.
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// WMS endpoint referenced by produced layer sources.
    #[serde(default = "default_wms_url")]
    pub wms_url: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            capability_timeout_seconds: default_capability_timeout_seconds(),
            history_limit: default_history_limit(),
            planner: PlannerConfig::default(),
            geo: GeoConfig::default(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: default_planner_base_url(),
            model: default_planner_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            wms_url: default_wms_url(),
        }
    }
}

impl GlobalConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the TOML is malformed or a value
    /// fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] when the file cannot be read or fails
    /// to parse.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| {
            AppError::Config(format!("cannot read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.capability_timeout_seconds == 0 {
            return Err(AppError::Config(
                "capability_timeout_seconds must be greater than zero".to_owned(),
            ));
        }
        if self.planner.base_url.trim().is_empty() {
            return Err(AppError::Config("planner.base_url must not be empty".to_owned()));
        }
        if self.planner.model.trim().is_empty() {
            return Err(AppError::Config("planner.model must not be empty".to_owned()));
        }
        if self.geo.search_url.trim().is_empty() {
            return Err(AppError::Config("geo.search_url must not be empty".to_owned()));
        }
        Ok(())
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_capability_timeout_seconds() -> u64 {
    30
}

fn default_history_limit() -> usize {
    50
}

fn default_planner_base_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_planner_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_owned()
}

fn default_search_url() -> String {
    "https://geo.so.ch/api/search/v2/".to_owned()
}

fn default_wms_url() -> String {
    "https://geo.so.ch/api/wms".to_owned()
}
