//! Common test infrastructure for client integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use incharge_client::{
    AuthenticationProvider, BearerToken, Identity, InChargeClient, InChargeConfig, InChargeResult,
};
use incharge_test_utils::{MockRemoteCommandsApi, ScriptedCommandServer};

pub const TEST_STATION: &str = "station-1";
pub const TEST_TOKEN: &str = "test-bearer-token";

/// Provider that yields the token on a given attempt, `None` before it
///
/// Models the portal's behavior of the token landing in session storage a
/// few polling intervals after the form submits.
pub struct TokenAfterAttempts {
    succeed_on: u32,
    calls: AtomicU32,
}

impl TokenAfterAttempts {
    pub fn new(succeed_on: u32) -> Self {
        Self {
            succeed_on,
            calls: AtomicU32::new(0),
        }
    }

    /// Provider that never produces a token
    pub fn never() -> Self {
        Self::new(u32::MAX)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthenticationProvider for TokenAfterAttempts {
    async fn fetch_token(&self, _identity: &Identity) -> InChargeResult<Option<BearerToken>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call >= self.succeed_on {
            Ok(Some(BearerToken::new(TEST_TOKEN)))
        } else {
            Ok(None)
        }
    }
}

/// Config pointing at the mocks, with test-friendly timing
pub fn test_config(api: &MockRemoteCommandsApi, websocket_url: String) -> InChargeConfig {
    InChargeConfig::new(api.subscription_key())
        .with_endpoints(api.url(), websocket_url)
        .with_login_policy(3, Duration::from_millis(5))
        .with_channel_timing(Duration::from_millis(5), Duration::from_secs(2))
}

pub fn test_identity() -> Identity {
    Identity::new("ev@example.com", "password")
}

/// Build a client against the mocks and log it in
pub async fn logged_in_client(
    api: &MockRemoteCommandsApi,
    ws: &ScriptedCommandServer,
) -> InChargeClient {
    let config = test_config(api, ws.url());
    let mut client = InChargeClient::new(config, test_identity()).expect("build client");
    client
        .login(&TokenAfterAttempts::new(1))
        .await
        .expect("login against static provider");
    client
}
