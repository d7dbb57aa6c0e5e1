//! Login and authentication-precondition tests

mod common;

use common::{test_config, test_identity, TokenAfterAttempts, TEST_STATION};
use incharge_client::{InChargeClient, InChargeError};
use incharge_test_utils::MockRemoteCommandsApi;

#[tokio::test]
async fn operations_before_login_fail_without_network_io() {
    let api = MockRemoteCommandsApi::start().await;
    api.mock_public_commands(TEST_STATION, &[("X1", "UnlockConnector")])
        .await;

    let config = test_config(&api, "ws://127.0.0.1:1".to_string());
    let client = InChargeClient::new(config, test_identity()).expect("build client");

    let result = client.unlock_connector(TEST_STATION, None).await;
    assert!(matches!(result, Err(InChargeError::NotAuthenticated)));

    let result = client.reset(TEST_STATION, Default::default()).await;
    assert!(matches!(result, Err(InChargeError::NotAuthenticated)));

    // The precondition is checked eagerly: nothing reached the API.
    let requests = api
        .server()
        .received_requests()
        .await
        .expect("request recording enabled");
    assert!(requests.is_empty());
}

#[tokio::test]
async fn login_succeeds_when_token_appears_within_window() {
    let api = MockRemoteCommandsApi::start().await;
    let config = test_config(&api, "ws://127.0.0.1:1".to_string());
    let mut client = InChargeClient::new(config, test_identity()).expect("build client");

    let provider = TokenAfterAttempts::new(2);
    client.login(&provider).await.expect("login");

    assert!(client.is_authenticated());
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn login_fails_after_polling_window_expires() {
    let api = MockRemoteCommandsApi::start().await;
    let config = test_config(&api, "ws://127.0.0.1:1".to_string());
    let mut client = InChargeClient::new(config, test_identity()).expect("build client");

    let provider = TokenAfterAttempts::never();
    let result = client.login(&provider).await;

    assert!(matches!(
        result,
        Err(InChargeError::AuthenticationFailed { attempts: 3 })
    ));
    assert_eq!(provider.calls(), 3);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn provider_errors_abort_the_polling_loop() {
    struct FailingProvider;

    #[async_trait::async_trait]
    impl incharge_client::AuthenticationProvider for FailingProvider {
        async fn fetch_token(
            &self,
            _identity: &incharge_client::Identity,
        ) -> incharge_client::InChargeResult<Option<incharge_client::BearerToken>> {
            Err(InChargeError::ConnectionClosed)
        }
    }

    let api = MockRemoteCommandsApi::start().await;
    let config = test_config(&api, "ws://127.0.0.1:1".to_string());
    let mut client = InChargeClient::new(config, test_identity()).expect("build client");

    let result = client.login(&FailingProvider).await;
    assert!(matches!(result, Err(InChargeError::ConnectionClosed)));
    assert!(!client.is_authenticated());
}
