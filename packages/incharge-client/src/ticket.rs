//! One-time websocket tickets
//!
//! Every websocket session must open with a `TICKET_AUTH` frame carrying a
//! ticket id, obtained here immediately beforehand. Tickets are
//! single-use; one is requested per command invocation.

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::InChargeConfig;
use crate::error::{InChargeError, InChargeResult};
use crate::session::Session;

/// Request a fresh ticket id for a websocket handshake
///
/// The endpoint returns the id as a quoted plain-text body; the quotes are
/// stripped before returning. Non-2xx responses surface as
/// `TicketRequest` with the status and body attached and no retry here.
pub(crate) async fn request_ticket(
    http: &Client,
    config: &InChargeConfig,
    session: &Session,
) -> InChargeResult<String> {
    let response = session
        .authorize(http.post(config.ticket_url()), config)
        .json(&json!({}))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InChargeError::TicketRequest { status, body });
    }

    let body = response.text().await?;
    let ticket_id = body.trim().trim_matches('"').to_string();
    debug!(ticket_id = %ticket_id, "obtained websocket ticket");
    Ok(ticket_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::BearerToken;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_session() -> Session {
        Session::new(BearerToken::new("token-1"))
    }

    fn test_config(base_url: &str) -> InChargeConfig {
        InChargeConfig::new("sub-key").with_endpoints(base_url, "wss://unused")
    }

    #[tokio::test]
    async fn test_ticket_id_quotes_are_stripped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/remote-commands/editor/tickets"))
            .and(header("Authorization", "Bearer token-1"))
            .and(header("Ocp-Apim-Subscription-Key", "sub-key"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_string("\"abc123\""))
            .mount(&server)
            .await;

        let ticket = request_ticket(&Client::new(), &test_config(&server.uri()), &test_session())
            .await
            .unwrap();
        assert_eq!(ticket, "abc123");
    }

    #[tokio::test]
    async fn test_unquoted_body_passes_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/remote-commands/editor/tickets"))
            .respond_with(ResponseTemplate::new(200).set_body_string("plain-ticket\n"))
            .mount(&server)
            .await;

        let ticket = request_ticket(&Client::new(), &test_config(&server.uri()), &test_session())
            .await
            .unwrap();
        assert_eq!(ticket, "plain-ticket");
    }

    #[tokio::test]
    async fn test_non_success_status_is_ticket_request_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/remote-commands/editor/tickets"))
            .respond_with(ResponseTemplate::new(403).set_body_string("key rejected"))
            .mount(&server)
            .await;

        let result =
            request_ticket(&Client::new(), &test_config(&server.uri()), &test_session()).await;
        match result {
            Err(InChargeError::TicketRequest { status, body }) => {
                assert_eq!(status.as_u16(), 403);
                assert_eq!(body, "key rejected");
            }
            other => panic!("expected TicketRequest, got {other:?}"),
        }
    }
}
