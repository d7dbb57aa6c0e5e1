//! InCharge client configuration

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Production API management gateway
const DEFAULT_API_BASE_URL: &str = "https://businessspecificapimanglobal.azure-api.net";

/// Production command-execution websocket endpoint
const DEFAULT_WEBSOCKET_URL: &str =
    "wss://emobility-cloud.vattenfall.com/remote-commands/command-execution";

/// Default HTTP request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default number of login polling attempts
const DEFAULT_LOGIN_MAX_ATTEMPTS: u32 = 10;

/// Default delay between login polling attempts (milliseconds)
const DEFAULT_LOGIN_RETRY_DELAY_MS: u64 = 1_000;

/// Default settle delay after the websocket handshake ack (milliseconds)
const DEFAULT_HANDSHAKE_SETTLE_MS: u64 = 1_000;

/// Default bound on the command response wait (seconds)
const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required environment variable
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid value for environment variable
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// InCharge API configuration
///
/// Endpoint URLs default to the production control plane and are
/// overridable for tests. The subscription key is the Azure API-management
/// key sent alongside the bearer token on every HTTP request.
#[derive(Debug, Clone)]
pub struct InChargeConfig {
    /// Base URL of the remote-commands HTTP API
    pub api_base_url: String,

    /// URL of the command-execution websocket endpoint
    pub websocket_url: String,

    /// Azure API-management subscription key
    pub subscription_key: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,

    /// HTTP connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum login polling attempts before giving up
    pub login_max_attempts: u32,

    /// Delay between login polling attempts
    pub login_retry_delay: Duration,

    /// Delay after the websocket handshake ack before sending the command
    pub handshake_settle_delay: Duration,

    /// Bound on the wait for a terminal command response
    pub response_timeout: Duration,
}

impl InChargeConfig {
    /// Build a configuration with production endpoints and default timing
    pub fn new(subscription_key: impl Into<String>) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            websocket_url: DEFAULT_WEBSOCKET_URL.to_string(),
            subscription_key: subscription_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            login_max_attempts: DEFAULT_LOGIN_MAX_ATTEMPTS,
            login_retry_delay: Duration::from_millis(DEFAULT_LOGIN_RETRY_DELAY_MS),
            handshake_settle_delay: Duration::from_millis(DEFAULT_HANDSHAKE_SETTLE_MS),
            response_timeout: Duration::from_secs(DEFAULT_RESPONSE_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads `INCHARGE_SUBSCRIPTION_KEY` (required), plus optional
    /// `INCHARGE_API_BASE_URL`, `INCHARGE_WEBSOCKET_URL`,
    /// `INCHARGE_TIMEOUT`, and `INCHARGE_RESPONSE_TIMEOUT` overrides.
    pub fn from_env() -> ConfigResult<Self> {
        let subscription_key = env::var("INCHARGE_SUBSCRIPTION_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("INCHARGE_SUBSCRIPTION_KEY".to_string()))?;

        let mut config = Self::new(subscription_key);
        config.api_base_url = get_env_or_default("INCHARGE_API_BASE_URL", &config.api_base_url);
        config.websocket_url = get_env_or_default("INCHARGE_WEBSOCKET_URL", &config.websocket_url);
        config.timeout_secs = parse_env("INCHARGE_TIMEOUT", config.timeout_secs)?;
        config.response_timeout = Duration::from_secs(parse_env(
            "INCHARGE_RESPONSE_TIMEOUT",
            DEFAULT_RESPONSE_TIMEOUT_SECS,
        )?);
        Ok(config)
    }

    /// Override the HTTP and websocket endpoints (useful for testing)
    pub fn with_endpoints(
        mut self,
        api_base_url: impl Into<String>,
        websocket_url: impl Into<String>,
    ) -> Self {
        self.api_base_url = api_base_url.into();
        self.websocket_url = websocket_url.into();
        self
    }

    /// Override the login polling window
    pub fn with_login_policy(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.login_max_attempts = max_attempts;
        self.login_retry_delay = retry_delay;
        self
    }

    /// Override the websocket timing (settle delay and response bound)
    pub fn with_channel_timing(
        mut self,
        handshake_settle_delay: Duration,
        response_timeout: Duration,
    ) -> Self {
        self.handshake_settle_delay = handshake_settle_delay;
        self.response_timeout = response_timeout;
        self
    }

    /// Get the full URL for the ticket endpoint
    pub fn ticket_url(&self) -> String {
        format!(
            "{}/remote-commands/editor/tickets",
            self.api_base_url.trim_end_matches('/')
        )
    }

    /// Get the full URL for the published-commands endpoint
    pub fn public_commands_url(&self) -> String {
        format!(
            "{}/remote-commands/publicCommands",
            self.api_base_url.trim_end_matches('/')
        )
    }
}

/// Helper to read an environment variable with a fallback
fn get_env_or_default(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Helper to parse an environment variable into a specific type
fn parse_env<T>(name: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}
