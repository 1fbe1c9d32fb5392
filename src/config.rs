//! Service configuration.
//!
//! All ambient configuration (secrets, endpoints, the bot handle) is read
//! once at startup into a [`Config`] value and injected into components'
//! constructors. Nothing reads the environment after startup, and there are
//! no process-wide mutable globals.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Environment variable for the webhook secret.
const ENV_WEBHOOK_SECRET: &str = "REVIEW_RELAY_WEBHOOK_SECRET";
/// Environment variable for the review backend base URL.
const ENV_BACKEND_URL: &str = "REVIEW_RELAY_BACKEND_URL";
/// Environment variable for the review backend API key.
const ENV_BACKEND_API_KEY: &str = "REVIEW_RELAY_BACKEND_API_KEY";
/// Environment variable for the GitHub token used to post pending comments.
const ENV_GITHUB_TOKEN: &str = "REVIEW_RELAY_GITHUB_TOKEN";
/// Environment variable overriding the bot mention handle.
const ENV_BOT_HANDLE: &str = "REVIEW_RELAY_BOT_HANDLE";
/// Environment variable overriding the listen address.
const ENV_BIND_ADDR: &str = "REVIEW_RELAY_BIND_ADDR";

/// Mention token recognized in review comments.
const DEFAULT_BOT_HANDLE: &str = "@codereview-ai";
/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Fixed consumer retry backoff.
const RETRY_DELAY_SECS: u64 = 60;

/// Configuration errors, reported at startup before the server binds.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    /// An environment variable is present but unusable.
    #[error("invalid value for {var}: {message}")]
    Invalid {
        /// The offending variable.
        var: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Runtime configuration for the relay.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for webhook signature verification.
    pub webhook_secret: Vec<u8>,

    /// Base URL of the review backend (the consumer POSTs to `{url}/review`).
    pub backend_url: String,

    /// Bearer token for the review backend.
    pub backend_api_key: String,

    /// GitHub token for posting pending comments. Optional; without it the
    /// pending-comment notification is skipped.
    pub github_token: Option<String>,

    /// The `@`-prefixed handle that triggers re-reviews.
    pub bot_handle: String,

    /// Address the HTTP server listens on.
    pub bind_addr: SocketAddr,

    /// Delay before a failed review job is redelivered.
    pub retry_delay: Duration,
}

impl Config {
    /// Loads configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = optional(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().map_err(|e| ConfigError::Invalid {
            var: ENV_BIND_ADDR,
            message: format!("{e}"),
        })?;

        Ok(Config {
            webhook_secret: required(ENV_WEBHOOK_SECRET)?.into_bytes(),
            backend_url: required(ENV_BACKEND_URL)?,
            backend_api_key: required(ENV_BACKEND_API_KEY)?,
            github_token: optional(ENV_GITHUB_TOKEN),
            bot_handle: optional(ENV_BOT_HANDLE).unwrap_or_else(|| DEFAULT_BOT_HANDLE.to_string()),
            bind_addr,
            retry_delay: Duration::from_secs(RETRY_DELAY_SECS),
        })
    }
}

/// Reads a required environment variable, treating empty values as missing.
fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::MissingVar(name))
}

/// Reads an optional environment variable, treating empty values as absent.
fn optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
