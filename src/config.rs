//! Configuration management.
//!
//! Everything optional is resolved here, once, at process start: the
//! assistant in particular becomes an explicit `Option<Arc<dyn Assistant>>`
//! handed to the components that need it, never ambient global state.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::llm::{Assistant, OllamaAssistant};
use crate::utils::HttpClient;

/// Default config file name looked up in the working directory
const CONFIG_FILE_NAME: &str = "scholar-scout.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Language-model assistant settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Assistant (Ollama) settings; disabled by default so the crate never
/// calls localhost unless asked to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Whether an assistant is available at all
    #[serde(default)]
    pub enabled: bool,

    /// Base URL of the Ollama server
    #[serde(default = "default_assistant_url")]
    pub base_url: String,

    /// Model name to request
    #[serde(default = "default_assistant_model")]
    pub model: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_assistant_timeout")]
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_assistant_url(),
            model: default_assistant_model(),
            timeout_secs: default_assistant_timeout(),
        }
    }
}

fn default_assistant_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_assistant_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_assistant_timeout() -> u64 {
    60
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds for the search API and PDF fetches
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_http_timeout() -> u64 {
    30
}

/// Search defaults applied when a request leaves them unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Submission-date window in days
    #[serde(default = "default_days_back")]
    pub days_back: i64,

    /// Result cap
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            days_back: default_days_back(),
            max_results: default_max_results(),
        }
    }
}

fn default_days_back() -> i64 {
    crate::models::search::DEFAULT_DAYS_BACK
}

fn default_max_results() -> usize {
    crate::models::search::DEFAULT_MAX_RESULTS
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
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
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Build the shared HTTP client from this configuration
    pub fn http_client(&self) -> HttpClient {
        HttpClient::with_timeout(Duration::from_secs(self.http.timeout_secs))
    }

    /// Resolve the assistant strategy once.
    ///
    /// Returns `None` when no assistant is configured; callers degrade to
    /// their deterministic path.
    pub fn resolve_assistant(&self, client: &HttpClient) -> Option<Arc<dyn Assistant>> {
        if !self.assistant.enabled {
            tracing::info!("No assistant configured, using deterministic fallbacks");
            return None;
        }

        Some(Arc::new(OllamaAssistant::new(
            client.clone(),
            self.assistant.base_url.clone(),
            self.assistant.model.clone(),
            Duration::from_secs(self.assistant.timeout_secs),
        )))
    }
}

/// Load configuration from a file plus `SCHOLAR_SCOUT_*` environment
/// overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("SCHOLAR_SCOUT").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Load configuration from environment overrides only
pub fn load_config_from_env() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("SCHOLAR_SCOUT").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Look for the default config file in the working directory
pub fn find_config_file() -> Option<PathBuf> {
    let candidate = PathBuf::from(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}
