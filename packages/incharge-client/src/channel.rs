//! Websocket command channel
//!
//! One connection per command execution: open the socket, authenticate
//! with a one-time ticket as the first frame, dispatch the command, then
//! drive a correlation loop until a terminal status frame arrives or the
//! configured response window expires. Sockets are never reused across
//! invocations, and every exit path closes the connection.

use futures_util::{SinkExt, StreamExt};
use reqwest::Client;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::config::InChargeConfig;
use crate::error::{InChargeError, InChargeResult};
use crate::models::{ClientFrame, CommandInvocation, ResponsePayload, ServerFrame};
use crate::session::Session;
use crate::ticket;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Execute one command over a dedicated websocket session
///
/// Returns `Ok(true)` when the server reports the invocation's expected
/// status, `Ok(false)` for a protocol-level rejection or `ERROR` frame,
/// and an error for infrastructure failures (connect, transport, timeout).
/// The two failure modes stay distinguishable to callers.
pub(crate) async fn execute(
    http: &Client,
    config: &InChargeConfig,
    session: &Session,
    invocation: &CommandInvocation,
) -> InChargeResult<bool> {
    info!(
        station = %invocation.station_name,
        command_id = %invocation.command_id,
        "connecting to command-execution websocket"
    );
    let (mut ws, _) = connect_async(config.websocket_url.as_str()).await?;

    let result = drive(&mut ws, http, config, session, invocation).await;

    // One close per invocation, success or not. A transport that already
    // dropped makes this fail; the stream drop is the backstop.
    if let Err(e) = ws.close(None).await {
        debug!(error = %e, "websocket close after command returned an error");
    }

    result
}

/// Run the session protocol on an open socket
async fn drive(
    ws: &mut WsStream,
    http: &Client,
    config: &InChargeConfig,
    session: &Session,
    invocation: &CommandInvocation,
) -> InChargeResult<bool> {
    // Ticket auth must be the first frame of the session.
    let ticket_id = ticket::request_ticket(http, config, session).await?;
    send_frame(ws, &ClientFrame::TicketAuth { id: ticket_id }).await?;

    // The ack content is not part of the contract; log it and let the
    // server finish its session setup before dispatching.
    let ack = bounded(config, ws.next()).await?;
    match ack {
        Some(Ok(frame)) => info!(frame = %frame, "handshake acknowledged"),
        Some(Err(e)) => return Err(e.into()),
        None => return Err(InChargeError::ConnectionClosed),
    }
    tokio::time::sleep(config.handshake_settle_delay).await;

    send_frame(
        ws,
        &ClientFrame::CustomCommand {
            command_id: invocation.command_id.clone(),
            stations: vec![invocation.station_name.clone()],
            parameters: invocation.parameters.clone(),
        },
    )
    .await?;

    bounded(config, await_outcome(ws, &invocation.expected_status)).await?
}

/// Serialize and send an outbound frame, logging it
async fn send_frame(ws: &mut WsStream, frame: &ClientFrame) -> InChargeResult<()> {
    let text = serde_json::to_string(frame)?;
    info!(frame = %text, "sending websocket frame");
    ws.send(Message::Text(text)).await?;
    Ok(())
}

/// Bound a protocol wait by the configured response window
async fn bounded<F: std::future::Future>(
    config: &InChargeConfig,
    future: F,
) -> InChargeResult<F::Output> {
    tokio::time::timeout(config.response_timeout, future)
        .await
        .map_err(|_| InChargeError::ResponseTimeout {
            timeout_secs: config.response_timeout.as_secs(),
        })
}

/// Correlation loop: read frames until a terminal outcome
///
/// Status-progression frames whose status matches neither the expected
/// value nor `Rejected` are intermediate states and keep the loop going,
/// as do `SENT`, `PING`, and frame types outside the protocol union.
async fn await_outcome(ws: &mut WsStream, expected_status: &str) -> InChargeResult<bool> {
    loop {
        let message = match ws.next().await {
            Some(Ok(message)) => message,
            Some(Err(e)) => return Err(e.into()),
            None => return Err(InChargeError::ConnectionClosed),
        };

        let text = match message {
            Message::Text(text) => text,
            Message::Close(frame) => {
                warn!(frame = ?frame, "server closed websocket mid-command");
                return Err(InChargeError::ConnectionClosed);
            }
            other => {
                debug!(message = ?other, "ignoring non-text websocket message");
                continue;
            }
        };
        info!(frame = %text, "received websocket frame");

        let frame: ServerFrame = match serde_json::from_str(&text) {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "frame outside protocol union, skipping");
                continue;
            }
        };

        match frame {
            ServerFrame::Response { payload } => {
                let inner: ResponsePayload = serde_json::from_str(&payload)?;
                match inner.status.as_deref() {
                    Some(status) if status == expected_status => {
                        info!(status = %status, "command accepted");
                        return Ok(true);
                    }
                    Some("Rejected") => {
                        warn!("command rejected");
                        return Ok(false);
                    }
                    Some(status) => {
                        debug!(status = %status, "intermediate status, still waiting");
                    }
                    None => {
                        debug!("response frame without status, still waiting");
                    }
                }
            }
            ServerFrame::Error { payload } => {
                error!(payload = ?payload, "error frame received from websocket");
                return Ok(false);
            }
            ServerFrame::Sent | ServerFrame::Ping => {
                debug!(frame = %text, "non-response frame, still waiting");
            }
        }
    }
}
