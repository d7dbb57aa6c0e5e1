//! Mock remote-commands HTTP API
//!
//! Provides a [`MockRemoteCommandsApi`] that simulates the control plane's
//! ticket and published-commands endpoints for testing ticket acquisition
//! and command-id resolution without the real gateway.

use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server for the InCharge remote-commands HTTP endpoints
///
/// Wraps a [`wiremock::MockServer`] with convenience methods for the two
/// endpoints the client uses: `POST /remote-commands/editor/tickets` and
/// `GET /remote-commands/publicCommands`. All success mounts require the
/// subscription-key header and a bearer `Authorization` header, so a
/// request that skips authentication fails the test.
pub struct MockRemoteCommandsApi {
    server: MockServer,
    subscription_key: String,
}

impl MockRemoteCommandsApi {
    /// Start a new mock API with the default subscription key
    pub async fn start() -> Self {
        Self::start_with_subscription_key("test-subscription-key").await
    }

    /// Start a new mock API with a custom subscription key
    pub async fn start_with_subscription_key(subscription_key: &str) -> Self {
        let server = MockServer::start().await;
        Self {
            server,
            subscription_key: subscription_key.to_string(),
        }
    }

    /// Get the server URL (use as the client's API base URL)
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Get the subscription key expected by the mounted mocks
    pub fn subscription_key(&self) -> &str {
        &self.subscription_key
    }

    /// Access the underlying wiremock server for custom mounts
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Mount a ticket endpoint returning the given id as a quoted body
    pub async fn mock_ticket_success(&self, ticket_id: &str) {
        Mock::given(method("POST"))
            .and(path("/remote-commands/editor/tickets"))
            .and(header("Ocp-Apim-Subscription-Key", self.subscription_key.as_str()))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("\"{ticket_id}\"")))
            .mount(&self.server)
            .await;
    }

    /// Mount a ticket endpoint failing with the given status
    pub async fn mock_ticket_failure(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/remote-commands/editor/tickets"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a published-commands catalog for a station
    ///
    /// Entries are `(command_id, display_name)` pairs, served in order.
    pub async fn mock_public_commands(&self, station_name: &str, entries: &[(&str, &str)]) {
        let catalog: Vec<serde_json::Value> = entries
            .iter()
            .map(|(command_id, name)| {
                json!({
                    "commandId": command_id,
                    "details": {"name": name, "category": "REMOTE"},
                })
            })
            .collect();

        Mock::given(method("GET"))
            .and(path("/remote-commands/publicCommands"))
            .and(query_param("stationName", station_name))
            .and(header("Ocp-Apim-Subscription-Key", self.subscription_key.as_str()))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog))
            .mount(&self.server)
            .await;
    }

    /// Mount an empty catalog for a station
    pub async fn mock_public_commands_empty(&self, station_name: &str) {
        self.mock_public_commands(station_name, &[]).await;
    }

    /// Mount a published-commands endpoint failing with the given status
    pub async fn mock_public_commands_failure(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path("/remote-commands/publicCommands"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }
}
