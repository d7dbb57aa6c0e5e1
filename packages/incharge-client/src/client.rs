//! InCharge client facade

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Map, Value};
use tracing::instrument;

use crate::channel;
use crate::config::InChargeConfig;
use crate::error::{InChargeError, InChargeResult};
use crate::models::{Availability, Command, CommandInvocation, LightIntensity, ResetMode};
use crate::resolver;
use crate::session::{AuthenticationProvider, Identity, Session};

/// Default connector number on single-connector stations
const DEFAULT_CONNECTOR_ID: u32 = 1;

/// Default transaction id for stop requests
const DEFAULT_TRANSACTION_ID: u32 = 1;

/// Client for the InCharge remote-commands control plane
///
/// Construction is cheap and unauthenticated; [`login`](Self::login) must
/// succeed before any command operation. Each command resolves its current
/// vendor command id and runs over its own websocket session, so
/// operations on a shared client are independent of one another.
pub struct InChargeClient {
    http: Client,
    config: InChargeConfig,
    identity: Identity,
    session: Option<Session>,
}

impl std::fmt::Debug for InChargeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InChargeClient")
            .field("api_base_url", &self.config.api_base_url)
            .field("identity", &self.identity)
            .field("subscription_key", &"[REDACTED]")
            .field("authenticated", &self.session.is_some())
            .finish()
    }
}

impl InChargeClient {
    /// Create a new client from configuration and account credentials
    pub fn new(config: InChargeConfig, identity: Identity) -> InChargeResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("incharge-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            identity,
            session: None,
        })
    }

    /// Log in via the external authentication collaborator
    ///
    /// Polls the provider within the configured window until a bearer
    /// token materializes; the token then backs every subsequent HTTP
    /// request and websocket handshake until a re-login replaces it.
    #[instrument(skip(self, provider))]
    pub async fn login<P: AuthenticationProvider + ?Sized>(
        &mut self,
        provider: &P,
    ) -> InChargeResult<()> {
        let session =
            crate::session::establish_session(provider, &self.identity, &self.config).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Whether a login has completed on this client
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The authenticated session, checked eagerly before any network I/O
    fn session(&self) -> InChargeResult<&Session> {
        self.session.as_ref().ok_or(InChargeError::NotAuthenticated)
    }

    /// Unlock a connector on a station
    ///
    /// The only operation whose terminal success status is not
    /// `Accepted`: the station reports `Unlocked`.
    #[instrument(skip(self))]
    pub async fn unlock_connector(
        &self,
        station_name: &str,
        connector_id: Option<u32>,
    ) -> InChargeResult<bool> {
        let connector_id = connector_id.unwrap_or(DEFAULT_CONNECTOR_ID);
        self.run(
            station_name,
            Command::UnlockConnector,
            params([("example-number-parameter", json!(connector_id))]),
            "Unlocked",
        )
        .await
    }

    /// Start a charging transaction with an RFID tag
    #[instrument(skip(self))]
    pub async fn start_transaction(
        &self,
        station_name: &str,
        rfid: &str,
        connector_id: Option<u32>,
    ) -> InChargeResult<bool> {
        let connector_id = connector_id.unwrap_or(DEFAULT_CONNECTOR_ID);
        self.run(
            station_name,
            Command::StartTransaction,
            params([
                ("connectorId", json!(connector_id)),
                ("idTag", json!(rfid)),
            ]),
            "Accepted",
        )
        .await
    }

    /// Stop a running charging transaction
    #[instrument(skip(self))]
    pub async fn stop_transaction(
        &self,
        station_name: &str,
        transaction_id: Option<u32>,
    ) -> InChargeResult<bool> {
        let transaction_id = transaction_id.unwrap_or(DEFAULT_TRANSACTION_ID);
        self.run(
            station_name,
            Command::StopTransaction,
            params([("transactionId", json!(transaction_id))]),
            "Accepted",
        )
        .await
    }

    /// Set the station's light intensity
    #[instrument(skip(self))]
    pub async fn set_light_intensity(
        &self,
        station_name: &str,
        intensity: LightIntensity,
    ) -> InChargeResult<bool> {
        self.run(
            station_name,
            Command::SetLightIntensity,
            params([("example-enum-parameter", json!(intensity.as_str()))]),
            "Accepted",
        )
        .await
    }

    /// Change a connector's availability
    #[instrument(skip(self))]
    pub async fn change_availability(
        &self,
        station_name: &str,
        availability: Availability,
        connector_id: Option<u32>,
    ) -> InChargeResult<bool> {
        let connector_id = connector_id.unwrap_or(DEFAULT_CONNECTOR_ID);
        self.run(
            station_name,
            Command::ChangeAvailability,
            params([
                ("connectorId", json!(connector_id)),
                ("availability", json!(availability.as_str())),
            ]),
            "Accepted",
        )
        .await
    }

    /// Reset the station
    #[instrument(skip(self))]
    pub async fn reset(&self, station_name: &str, mode: ResetMode) -> InChargeResult<bool> {
        self.run(
            station_name,
            Command::Reset,
            params([("typeOfReset", json!(mode.as_str()))]),
            "Accepted",
        )
        .await
    }

    /// Ask the station to emit a status notification
    #[instrument(skip(self))]
    pub async fn trigger_status_notification(
        &self,
        station_name: &str,
        connector_id: Option<u32>,
    ) -> InChargeResult<bool> {
        let connector_id = connector_id.unwrap_or(DEFAULT_CONNECTOR_ID);
        self.run(
            station_name,
            Command::TriggerStatusNotification,
            params([("connectorId", json!(connector_id))]),
            "Accepted",
        )
        .await
    }

    /// Resolve the command id and execute one websocket invocation
    async fn run(
        &self,
        station_name: &str,
        command: Command,
        parameters: Map<String, Value>,
        expected_status: &str,
    ) -> InChargeResult<bool> {
        let session = self.session()?;
        let command_id = resolver::resolve_command_id(
            &self.http,
            &self.config,
            session,
            station_name,
            command,
        )
        .await?;

        let invocation = CommandInvocation {
            command_id,
            station_name: station_name.to_string(),
            parameters,
            expected_status: expected_status.to_string(),
        };
        channel::execute(&self.http, &self.config, session, &invocation).await
    }
}

/// Build an operation-specific parameter map
fn params<const N: usize>(entries: [(&str, Value); N]) -> Map<String, Value> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
