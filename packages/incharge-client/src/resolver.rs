//! Command-id resolution
//!
//! The control plane assigns each station's commands opaque identifiers
//! that are not stable across invocations, so the catalog is fetched fresh
//! every time and never cached.

use reqwest::Client;
use tracing::debug;

use crate::config::InChargeConfig;
use crate::error::{InChargeError, InChargeResult};
use crate::models::{Command, PublishedCommand};
use crate::session::Session;

/// Resolve the current command id for a logical command on a station
///
/// Scans the station's published-command catalog for the first entry whose
/// `details.name` matches the command's display name; the server makes no
/// uniqueness or ordering guarantee, so first match wins.
pub(crate) async fn resolve_command_id(
    http: &Client,
    config: &InChargeConfig,
    session: &Session,
    station_name: &str,
    command: Command,
) -> InChargeResult<String> {
    let response = session
        .authorize(
            http.get(config.public_commands_url())
                .query(&[("stationName", station_name)]),
            config,
        )
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InChargeError::CommandResolution { status, body });
    }

    let catalog: Vec<PublishedCommand> = response.json().await?;
    debug!(
        station = %station_name,
        catalog_size = catalog.len(),
        command = ?command,
        "scanning published commands"
    );

    catalog
        .into_iter()
        .find(|entry| entry.details.name == command.display_name())
        .map(|entry| entry.command_id)
        .ok_or(InChargeError::CommandNotFound(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BearerToken;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_session() -> Session {
        Session::new(BearerToken::new("token-1"))
    }

    fn test_config(base_url: &str) -> InChargeConfig {
        InChargeConfig::new("sub-key").with_endpoints(base_url, "wss://unused")
    }

    async fn mount_catalog(server: &MockServer, station: &str, catalog: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/remote-commands/publicCommands"))
            .and(query_param("stationName", station))
            .respond_with(ResponseTemplate::new(200).set_body_json(catalog))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_resolves_by_display_name() {
        let server = MockServer::start().await;
        mount_catalog(
            &server,
            "station-1",
            json!([
                {"commandId": "X1", "details": {"name": "Remote start transaction"}},
            ]),
        )
        .await;

        let id = resolve_command_id(
            &Client::new(),
            &test_config(&server.uri()),
            &test_session(),
            "station-1",
            Command::StartTransaction,
        )
        .await
        .unwrap();
        assert_eq!(id, "X1");
    }

    #[tokio::test]
    async fn test_first_match_wins_on_duplicate_names() {
        let server = MockServer::start().await;
        mount_catalog(
            &server,
            "station-1",
            json!([
                {"commandId": "first", "details": {"name": "Reset"}},
                {"commandId": "second", "details": {"name": "Reset"}},
            ]),
        )
        .await;

        let id = resolve_command_id(
            &Client::new(),
            &test_config(&server.uri()),
            &test_session(),
            "station-1",
            Command::Reset,
        )
        .await
        .unwrap();
        assert_eq!(id, "first");
    }

    #[tokio::test]
    async fn test_absent_command_is_not_found() {
        let server = MockServer::start().await;
        mount_catalog(
            &server,
            "station-1",
            json!([
                {"commandId": "X1", "details": {"name": "Reset"}},
            ]),
        )
        .await;

        let result = resolve_command_id(
            &Client::new(),
            &test_config(&server.uri()),
            &test_session(),
            "station-1",
            Command::UnlockConnector,
        )
        .await;
        assert!(matches!(
            result,
            Err(InChargeError::CommandNotFound(Command::UnlockConnector))
        ));
    }

    #[tokio::test]
    async fn test_non_success_status_is_resolution_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/remote-commands/publicCommands"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let result = resolve_command_id(
            &Client::new(),
            &test_config(&server.uri()),
            &test_session(),
            "station-1",
            Command::Reset,
        )
        .await;
        assert!(matches!(
            result,
            Err(InChargeError::CommandResolution { .. })
        ));
    }
}
