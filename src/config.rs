//! Configuration management for the agent service.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first, see `main.rs`):
//! - `OPENAI_API_KEY` - API key for the model provider. When unset the server
//!   still starts, but the agent is unavailable and its endpoints answer 503.
//! - `OPENAI_MODEL` - Optional. Model identifier. Defaults to `gpt-4`.
//! - `AGENT_NAME` - Optional. Agent display name. Defaults to `TaskAgent`.
//! - `AGENT_DESCRIPTION` - Optional. Description used in prompts and the info endpoint.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `8000`.
//! - `MAX_ITERATIONS` - Optional. Maximum reasoning loop iterations per task. Defaults to `5`.
//! - `LOG_LEVEL` - Optional. Log filter level. Defaults to `info`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Default description for the built-in single agent.
const DEFAULT_DESCRIPTION: &str =
    "A helpful AI agent that can calculate math problems and analyze text content";

/// Agent service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model provider API key. `None` leaves the agent unavailable.
    pub api_key: Option<String>,

    /// Model identifier for chat completions
    pub model: String,

    /// Agent display name
    pub agent_name: String,

    /// Agent description used in prompts and the info endpoint
    pub agent_description: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum reasoning loop iterations per task
    pub max_iterations: usize,

    /// Log filter level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing API key is not an error here: the agent reports it as a
    /// construction failure so the server can start degraded.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` or `MAX_ITERATIONS`
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());

        let agent_name = std::env::var("AGENT_NAME").unwrap_or_else(|_| "TaskAgent".to_string());

        let agent_description =
            std::env::var("AGENT_DESCRIPTION").unwrap_or_else(|_| DEFAULT_DESCRIPTION.to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e))
            })?;

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_key,
            model,
            agent_name,
            agent_description,
            host,
            port,
            max_iterations,
            log_level,
        })
    }

    /// Create a config with default values (useful for testing).
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            model: "gpt-4".to_string(),
            agent_name: "TaskAgent".to_string(),
            agent_description: DEFAULT_DESCRIPTION.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_iterations: 5,
            log_level: "info".to_string(),
        }
    }
}
