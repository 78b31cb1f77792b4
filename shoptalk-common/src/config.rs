//! Configuration management for Shoptalk services.
//!
//! All configuration is environment-sourced; missing variables take
//! documented defaults.
//!
//! # Environment Variable Mapping
//!
//! ## Server
//! - `SHOPTALK_HOST` → server.host (default `127.0.0.1`)
//! - `SHOPTALK_PORT` → server.port (default `8000`)
//!
//! ## Remote model (NVIDIA NIM, OpenAI-compatible)
//! - `NVIDIA_API_KEY` → llm.api_key (absent = fallback-only operation)
//! - `NVIDIA_API_BASE` → llm.endpoint
//! - `NVIDIA_MODEL` → llm.model
//! - `SHOPTALK_LLM_TIMEOUT_SECS` → llm.request_timeout_secs
//!
//! ## Database (consumed by the external provisioning tooling only)
//! - `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`,
//!   `POSTGRES_PASSWORD`, `POSTGRES_DATABASE`
//!
//! ## Observability
//! - `SHOPTALK_LOG_LEVEL` → observability.log_level (default `info`)
//! - `SHOPTALK_LOG_FORMAT` → observability.log_format (default `pretty`)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Database connection parameters
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Default: "127.0.0.1" (conservative, local only)
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port
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
    "127.0.0.1".into()
}

const fn default_port() -> u16 {
    8000
}

/// Remote model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key. `None` disables the backend entirely; the service still
    /// answers from the fallback rule table.
    #[serde(default)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Completion token cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,

    /// Per-request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_endpoint() -> String {
    "https://integrate.api.nvidia.com".into()
}

fn default_llm_model() -> String {
    "nvidia/nemotron-4-340b-instruct".into()
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_tokens() -> i64 {
    1000
}

const fn default_llm_timeout() -> u64 {
    60
}

/// Database connection parameters.
///
/// The chat core never opens a connection; these exist for the external
/// provisioning tooling and for the `/health` configuration flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_pg_port")]
    pub port: u16,

    #[serde(default = "default_pg_user")]
    pub user: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default = "default_pg_database")]
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_pg_port(),
            user: default_pg_user(),
            password: None,
            database: default_pg_database(),
        }
    }
}

const fn default_pg_port() -> u16 {
    5432
}

fn default_pg_user() -> String {
    "postgres".into()
}

fn default_pg_database() -> String {
    "shoptalk".into()
}

impl DatabaseConfig {
    /// Whether enough parameters are present to reach a database.
    pub fn is_configured(&self) -> bool {
        self.password.is_some()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = env_var("SHOPTALK_HOST") {
            config.server.host = host;
        }
        if let Some(port) = env_var("SHOPTALK_PORT") {
            config.server.port = port
                .parse()
                .with_context(|| format!("Invalid SHOPTALK_PORT: {port}"))?;
        }

        config.llm.api_key = env_var("NVIDIA_API_KEY");
        if let Some(endpoint) = env_var("NVIDIA_API_BASE") {
            config.llm.endpoint = endpoint;
        }
        if let Some(model) = env_var("NVIDIA_MODEL") {
            config.llm.model = model;
        }
        if let Some(timeout) = env_var("SHOPTALK_LLM_TIMEOUT_SECS") {
            config.llm.request_timeout_secs = timeout
                .parse()
                .with_context(|| format!("Invalid SHOPTALK_LLM_TIMEOUT_SECS: {timeout}"))?;
        }

        if let Some(host) = env_var("POSTGRES_HOST") {
            config.database.host = host;
        }
        if let Some(port) = env_var("POSTGRES_PORT") {
            config.database.port = port
                .parse()
                .with_context(|| format!("Invalid POSTGRES_PORT: {port}"))?;
        }
        if let Some(user) = env_var("POSTGRES_USER") {
            config.database.user = user;
        }
        config.database.password = env_var("POSTGRES_PASSWORD");
        if let Some(database) = env_var("POSTGRES_DATABASE") {
            config.database.database = database;
        }

        if let Some(level) = env_var("SHOPTALK_LOG_LEVEL") {
            config.observability.log_level = level;
        }
        if let Some(format) = env_var("SHOPTALK_LOG_FORMAT") {
            config.observability.log_format = format;
        }

        Ok(config)
    }

    /// Whether a remote model backend is configured.
    pub fn has_backend(&self) -> bool {
        self.llm.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
