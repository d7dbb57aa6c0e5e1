//! Shared test utilities for the InCharge workspace
//!
//! This crate provides mock implementations of the InCharge control plane
//! for testing without network dependencies.
//!
//! # Mock Services
//!
//! - [`MockRemoteCommandsApi`] - wiremock-backed HTTP API serving the
//!   ticket and published-commands endpoints
//! - [`ScriptedCommandServer`] - websocket server that performs the ticket
//!   handshake and replays a scripted frame sequence
//!
//! # Example
//!
//! ```rust,ignore
//! use incharge_test_utils::{MockRemoteCommandsApi, ScriptedCommandServer};
//!
//! #[tokio::test]
//! async fn test_with_mocks() {
//!     let api = MockRemoteCommandsApi::start().await;
//!     api.mock_ticket_success("ticket-1").await;
//!
//!     let ws = ScriptedCommandServer::respond_with_statuses(&["Accepted"]).await;
//!     // Point your client at api.url() and ws.url()
//! }
//! ```

mod remote_commands;
mod websocket;

pub use remote_commands::MockRemoteCommandsApi;
pub use websocket::ScriptedCommandServer;
