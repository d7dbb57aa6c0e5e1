//! Command model and websocket wire types
//!
//! Websocket frames are JSON text frames discriminated by a `type` field.
//! The inbound `RESPONSE` frame is doubly encoded: its `payload` field is a
//! JSON-encoded string that itself contains a `{"status": ...}` document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A physical remote command supported by the control plane
///
/// Each variant is bound to the display name under which the vendor
/// publishes it in the per-station command catalog. The names are vendor
/// strings, typos included, and must match exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    UnlockConnector,
    StartTransaction,
    StopTransaction,
    SetLightIntensity,
    ChangeAvailability,
    Reset,
    TriggerStatusNotification,
}

impl Command {
    /// The display name used for catalog lookup
    pub const fn display_name(&self) -> &'static str {
        match self {
            Command::UnlockConnector => "UnlockConnector",
            Command::StartTransaction => "Remote start transaction",
            Command::StopTransaction => "Remote Stop Transaction",
            Command::SetLightIntensity => "Set Light intensity",
            Command::ChangeAvailability => "Change availability",
            Command::Reset => "Reset",
            Command::TriggerStatusNotification => "TriggerMessage StatusNotificat",
        }
    }
}

/// Connector availability states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Operative,
    Inoperative,
}

impl Availability {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Availability::Operative => "Operative",
            Availability::Inoperative => "Inoperative",
        }
    }
}

/// Station reset modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetMode {
    #[default]
    Soft,
    Hard,
}

impl ResetMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResetMode::Soft => "Soft",
            ResetMode::Hard => "Hard",
        }
    }
}

/// Charger light intensity steps accepted by the vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightIntensity {
    Off,
    Ten,
    TwentyFive,
    Fifty,
    SeventyFive,
    Ninety,
    Full,
}

impl LightIntensity {
    /// The wire string for the intensity (a stringified percentage)
    pub const fn as_str(&self) -> &'static str {
        match self {
            LightIntensity::Off => "0",
            LightIntensity::Ten => "10",
            LightIntensity::TwentyFive => "25",
            LightIntensity::Fifty => "50",
            LightIntensity::SeventyFive => "75",
            LightIntensity::Ninety => "90",
            LightIntensity::Full => "100",
        }
    }
}

/// One command execution, built fresh per facade call
///
/// `command_id` is the vendor-assigned identifier resolved immediately
/// before this invocation; it is not stable across calls and is never
/// persisted or reused.
#[derive(Debug, Clone)]
pub struct CommandInvocation {
    pub command_id: String,
    pub station_name: String,
    pub parameters: Map<String, Value>,
    pub expected_status: String,
}

// =============================================================================
// Catalog (HTTP) response types
// =============================================================================

/// One entry of the per-station published-commands catalog
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PublishedCommand {
    #[serde(rename = "commandId")]
    pub command_id: String,
    pub details: PublishedCommandDetails,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PublishedCommandDetails {
    pub name: String,
}

// =============================================================================
// Websocket frames
// =============================================================================

/// Frames sent from client to server
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub(crate) enum ClientFrame {
    /// First frame of every session: authenticate with a one-time ticket
    #[serde(rename = "TICKET_AUTH")]
    TicketAuth { id: String },

    /// Dispatch a resolved command to one or more stations
    #[serde(rename = "CUSTOM_COMMAND")]
    CustomCommand {
        #[serde(rename = "commandId")]
        command_id: String,
        stations: Vec<String>,
        parameters: Map<String, Value>,
    },
}

/// Frames received from the server
///
/// Frames with a `type` outside this union are not part of the contract;
/// the channel logs and skips them.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ServerFrame {
    /// Command status update; `payload` is a JSON-encoded string
    #[serde(rename = "RESPONSE")]
    Response { payload: String },

    /// Server-side protocol error, terminal for the invocation
    #[serde(rename = "ERROR")]
    Error {
        #[serde(default)]
        payload: Option<Value>,
    },

    /// Dispatch acknowledgment, carries no status
    #[serde(rename = "SENT")]
    Sent,

    /// Keepalive
    #[serde(rename = "PING")]
    Ping,
}

/// The inner document of a `RESPONSE` payload
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponsePayload {
    #[serde(default)]
    pub status: Option<String>,
}
