//! InCharge API error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::models::Command;

/// InCharge client errors
#[derive(Error, Debug)]
pub enum InChargeError {
    /// Operation called before a successful login
    #[error("not authenticated: call login() first")]
    NotAuthenticated,

    /// Login polling window expired without a bearer token materializing
    #[error("authentication failed: no bearer token after {attempts} attempts")]
    AuthenticationFailed { attempts: u32 },

    /// Ticket endpoint returned a non-success status
    #[error("ticket request failed with status {status}: {body}")]
    TicketRequest {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Command catalog endpoint returned a non-success status
    #[error("command resolution failed with status {status}: {body}")]
    CommandResolution {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The vendor does not currently publish this command for the station
    #[error("command {0:?} not published for this station")]
    CommandNotFound(Command),

    /// Websocket transport failure (connect, send, or receive)
    #[error("websocket connection error: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),

    /// Server closed the websocket before a terminal response arrived
    #[error("websocket closed before a terminal command response")]
    ConnectionClosed,

    /// No terminal response within the configured window
    #[error("timed out after {timeout_secs}s waiting for a command response")]
    ResponseTimeout { timeout_secs: u64 },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("failed to parse InCharge response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InChargeError {
    /// Check if this error is retryable (transient failure)
    ///
    /// Retries on timeouts, transport errors, and server errors (5xx).
    /// Does NOT retry on precondition violations, missing commands, or
    /// protocol rejections (those are surfaced as `Ok(false)`, not errors).
    pub fn is_retryable(&self) -> bool {
        match self {
            InChargeError::ResponseTimeout { .. } | InChargeError::ConnectionClosed => true,
            InChargeError::Http(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                matches!(e.status(), Some(status) if status.is_server_error())
            }
            InChargeError::TicketRequest { status, .. }
            | InChargeError::CommandResolution { status, .. } => status.is_server_error(),
            InChargeError::Connection(_) => true,
            _ => false,
        }
    }
}

/// Result type for InCharge operations
pub type InChargeResult<T> = Result<T, InChargeError>;
