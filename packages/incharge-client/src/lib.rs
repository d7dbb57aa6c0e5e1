//! Client for the Vattenfall InCharge remote-commands API
//!
//! This crate remotely controls InCharge EV charging stations. Each
//! command execution acquires a one-time ticket over HTTP, resolves the
//! station's current command id (the control plane reassigns ids, so they
//! are fetched fresh every time), then runs the command over a dedicated
//! websocket session and correlates asynchronous status frames into a
//! boolean outcome.
//!
//! Portal login is browser-driven and stays outside this crate: implement
//! [`AuthenticationProvider`] to hand over the bearer token the portal
//! stores after a successful form login.
//!
//! # Example
//!
//! ```rust,no_run
//! use incharge_client::{Identity, InChargeClient, InChargeConfig, ResetMode};
//! # use incharge_client::{AuthenticationProvider, BearerToken, InChargeResult};
//! # struct PortalLogin;
//! # #[async_trait::async_trait]
//! # impl AuthenticationProvider for PortalLogin {
//! #     async fn fetch_token(
//! #         &self,
//! #         _identity: &Identity,
//! #     ) -> InChargeResult<Option<BearerToken>> {
//! #         Ok(Some(BearerToken::new("token")))
//! #     }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InChargeConfig::from_env()?;
//! let identity = Identity::new("ev@example.com", "password");
//! let mut client = InChargeClient::new(config, identity)?;
//!
//! client.login(&PortalLogin).await?;
//!
//! if client.unlock_connector("station-1", None).await? {
//!     println!("connector unlocked");
//! }
//! client.reset("station-1", ResetMode::Soft).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variables
//!
//! - `INCHARGE_SUBSCRIPTION_KEY`: Azure API-management key (required)
//! - `INCHARGE_API_BASE_URL`, `INCHARGE_WEBSOCKET_URL`: endpoint overrides
//! - `INCHARGE_TIMEOUT`, `INCHARGE_RESPONSE_TIMEOUT`: timing overrides

mod channel;
mod client;
mod config;
mod error;
mod models;
mod resolver;
mod session;
mod ticket;

pub use client::InChargeClient;
pub use config::{ConfigError, ConfigResult, InChargeConfig};
pub use error::{InChargeError, InChargeResult};
pub use models::{Availability, Command, CommandInvocation, LightIntensity, ResetMode};
pub use session::{AuthenticationProvider, BearerToken, Identity, Session};
