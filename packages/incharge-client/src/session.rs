//! Session establishment and the authenticated-session capability

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::InChargeConfig;
use crate::error::{InChargeError, InChargeResult};

/// Account credentials for the InCharge portal
#[derive(Clone)]
pub struct Identity {
    pub email: String,
    pub password: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Bearer token obtained out-of-band via the login collaborator
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token for an `Authorization: Bearer` header
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

/// An authenticated session
///
/// Values of this type exist only after a successful login; every protocol
/// operation takes one, which keeps unauthenticated calls out of the
/// network path entirely. The token is immutable for the session lifetime,
/// so concurrent commands share it read-only.
#[derive(Debug, Clone)]
pub struct Session {
    bearer_token: BearerToken,
}

impl Session {
    pub(crate) fn new(bearer_token: BearerToken) -> Self {
        Self { bearer_token }
    }

    pub fn bearer_token(&self) -> &BearerToken {
        &self.bearer_token
    }

    /// Attach the session's auth headers to an HTTP request
    pub(crate) fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        config: &InChargeConfig,
    ) -> reqwest::RequestBuilder {
        request
            .bearer_auth(self.bearer_token.as_str())
            .header("Ocp-Apim-Subscription-Key", &config.subscription_key)
    }
}

/// External login collaborator
///
/// The portal login itself (browser automation against the vendor's web
/// app) is out of scope for this crate; implementations of this trait
/// perform one token-retrieval attempt per call. `Ok(None)` means the
/// token has not materialized yet and polling should continue.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    async fn fetch_token(&self, identity: &Identity) -> InChargeResult<Option<BearerToken>>;
}

/// Poll the provider within the configured window until a token appears
///
/// Mirrors the portal behavior of the token landing in session storage
/// some seconds after form submission: one attempt per interval, bounded
/// by `login_max_attempts`.
pub(crate) async fn establish_session<P: AuthenticationProvider + ?Sized>(
    provider: &P,
    identity: &Identity,
    config: &InChargeConfig,
) -> InChargeResult<Session> {
    info!(email = %identity.email, "starting login to obtain bearer token");

    for attempt in 1..=config.login_max_attempts {
        if let Some(token) = provider.fetch_token(identity).await? {
            info!(attempt, "bearer token obtained");
            return Ok(Session::new(token));
        }

        debug!(
            attempt,
            max_attempts = config.login_max_attempts,
            "bearer token not available yet"
        );
        if attempt < config.login_max_attempts {
            tokio::time::sleep(config.login_retry_delay).await;
        }
    }

    Err(InChargeError::AuthenticationFailed {
        attempts: config.login_max_attempts,
    })
}
