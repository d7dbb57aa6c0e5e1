//! Scripted command-execution websocket server
//!
//! Plays the server side of one command invocation: accepts a single
//! connection, consumes the `TICKET_AUTH` frame, acknowledges it, consumes
//! the `CUSTOM_COMMAND` frame, then replays a scripted frame sequence.
//! Received frames are recorded so tests can assert on the exact envelopes
//! the client sent, and Close frames are counted so tests can verify the
//! client releases the connection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// What the server does once the command frame has arrived
enum Script {
    /// Send these frames in order, then idle until the client closes
    Respond(Vec<String>),
    /// Send nothing and idle (drives client-side timeout handling)
    Silent,
    /// Close the connection without a terminal response
    CloseAfterCommand,
}

/// One-shot scripted websocket server for command-channel tests
pub struct ScriptedCommandServer {
    url: String,
    received: Mutex<mpsc::UnboundedReceiver<String>>,
    close_frames: Arc<AtomicUsize>,
}

impl ScriptedCommandServer {
    /// Start a server that replays raw frames after the command arrives
    pub async fn start(frames: Vec<String>) -> Self {
        Self::with_script(Script::Respond(frames)).await
    }

    /// Start a server that answers with one RESPONSE frame per status
    ///
    /// Statuses are wrapped the way the control plane does: a `RESPONSE`
    /// envelope whose `payload` is a JSON-encoded `{"status": ...}`
    /// string.
    pub async fn respond_with_statuses(statuses: &[&str]) -> Self {
        let frames = statuses.iter().map(|s| response_frame(s)).collect();
        Self::start(frames).await
    }

    /// Start a server that answers the command with an ERROR frame
    pub async fn respond_with_error(message: &str) -> Self {
        let frame = json!({"type": "ERROR", "payload": message}).to_string();
        Self::start(vec![frame]).await
    }

    /// Start a server that never answers the command
    pub async fn silent() -> Self {
        Self::with_script(Script::Silent).await
    }

    /// Start a server that drops the connection after the command arrives
    pub async fn close_after_command() -> Self {
        Self::with_script(Script::CloseAfterCommand).await
    }

    /// Get the websocket URL (use as the client's websocket endpoint)
    pub fn url(&self) -> String {
        self.url.clone()
    }

    /// Drain the raw text frames received from the client so far
    ///
    /// After a command invocation completes, index 0 is the `TICKET_AUTH`
    /// frame and index 1 the `CUSTOM_COMMAND` frame.
    pub fn take_received(&self) -> Vec<String> {
        let mut rx = self.received.lock().expect("receiver lock poisoned");
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    /// Wait for the client to close the connection
    ///
    /// The client sends its Close frame after the invocation result is
    /// already decided, so a short grace window covers the in-flight
    /// frame. Returns `false` if no Close frame arrives within it.
    pub async fn close_received(&self) -> bool {
        for _ in 0..200 {
            if self.close_frames.load(Ordering::SeqCst) > 0 {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    /// Number of Close frames received from the client
    pub fn close_frame_count(&self) -> usize {
        self.close_frames.load(Ordering::SeqCst)
    }

    async fn with_script(script: Script) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind scripted websocket server");
        let url = format!("ws://{}", listener.local_addr().expect("local addr"));
        let (tx, rx) = mpsc::unbounded_channel();
        let close_frames = Arc::new(AtomicUsize::new(0));
        let close_counter = close_frames.clone();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let Ok(mut ws) = accept_async(stream).await else {
                return;
            };

            // Ticket handshake: consume TICKET_AUTH, acknowledge.
            let Some(auth) = next_text(&mut ws, &close_counter).await else {
                return;
            };
            let _ = tx.send(auth);
            let ack = json!({"type": "SENT", "payload": "session established"}).to_string();
            if ws.send(Message::Text(ack)).await.is_err() {
                return;
            }

            // Command dispatch.
            let Some(command) = next_text(&mut ws, &close_counter).await else {
                return;
            };
            let _ = tx.send(command);

            match script {
                Script::Respond(frames) => {
                    for frame in frames {
                        if ws.send(Message::Text(frame)).await.is_err() {
                            return;
                        }
                    }
                }
                Script::Silent => {}
                Script::CloseAfterCommand => {
                    let _ = ws.close(None).await;
                    return;
                }
            }

            // Idle until the client hangs up.
            while let Some(Ok(message)) = ws.next().await {
                match message {
                    Message::Text(frame) => {
                        let _ = tx.send(frame);
                    }
                    Message::Close(_) => {
                        close_counter.fetch_add(1, Ordering::SeqCst);
                    }
                    _ => {}
                }
            }
        });

        Self {
            url,
            received: Mutex::new(rx),
            close_frames,
        }
    }
}

/// Read frames until the next text frame, counting Close frames and
/// skipping other transport messages
async fn next_text<S>(
    ws: &mut tokio_tungstenite::WebSocketStream<S>,
    close_frames: &AtomicUsize,
) -> Option<String>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    while let Some(Ok(message)) = ws.next().await {
        match message {
            Message::Text(text) => return Some(text),
            Message::Close(_) => {
                close_frames.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
    }
    None
}

/// Build a RESPONSE frame with a doubly-encoded status payload
fn response_frame(status: &str) -> String {
    let payload = json!({"status": status}).to_string();
    json!({"type": "RESPONSE", "payload": payload}).to_string()
}
