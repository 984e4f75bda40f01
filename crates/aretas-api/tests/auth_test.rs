#![allow(clippy::unwrap_used)]
// Integration tests for `CredentialManager` using wiremock.

use secrecy::{ExposeSecret, SecretString};
use url::Url;
use wiremock::matchers::{any, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aretas_api::{CredentialManager, Credentials, Error, TokenValidity};

// ── Helpers ─────────────────────────────────────────────────────────

fn login() -> Credentials {
    Credentials::Login {
        username: "ops".into(),
        password: SecretString::from("hunter2"),
    }
}

async fn setup(credentials: Credentials) -> (MockServer, CredentialManager) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let manager = CredentialManager::new(reqwest::Client::new(), base_url, credentials);
    (server, manager)
}

async fn mount_login(server: &MockServer, token: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path("/authentication/g"))
        .and(query_param("username", "ops"))
        .and(query_param("password", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(token))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

async fn mount_probe(server: &MockServer, token: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path("/greetings/isloggedin"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

// ── Externally supplied tokens ──────────────────────────────────────

#[tokio::test]
async fn test_supplied_token_is_returned_verbatim_without_http() {
    let (server, manager) = setup(Credentials::Token(SecretString::from("tok-123"))).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    for refresh in [false, true, true] {
        let token = manager.get_token(refresh).await.unwrap();
        assert_eq!(token.expose_secret(), "tok-123");
    }
}

#[tokio::test]
async fn test_supplied_token_refuses_refresh() {
    let (server, manager) = setup(Credentials::Token(SecretString::from("tok-123"))).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("other"))
        .expect(0)
        .mount(&server)
        .await;

    let result = manager.refresh_token().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert_eq!(manager.get_token(false).await.unwrap().expose_secret(), "tok-123");
}

// ── Self-managed tokens ─────────────────────────────────────────────

#[tokio::test]
async fn test_first_get_token_logs_in_once_then_caches() {
    let (server, manager) = setup(login()).await;

    Mock::given(method("GET"))
        .and(path("/authentication/g"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-1"))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(manager.get_token(false).await.unwrap().expose_secret(), "tok-1");
    assert_eq!(manager.get_token(false).await.unwrap().expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_get_token_returns_refreshed_token() {
    let (server, manager) = setup(login()).await;
    mount_login(&server, "tok-1", 1).await;
    mount_login(&server, "tok-2", 1).await;

    assert_eq!(manager.get_token(false).await.unwrap().expose_secret(), "tok-1");
    assert_eq!(manager.refresh_token().await.unwrap().expose_secret(), "tok-2");
    assert_eq!(manager.get_token(false).await.unwrap().expose_secret(), "tok-2");
}

#[tokio::test]
async fn test_get_token_with_probe_keeps_valid_token() {
    let (server, manager) = setup(login()).await;
    mount_login(&server, "tok-1", 1).await;
    mount_login(&server, "tok-2", 1).await;
    mount_probe(&server, "tok-1", 200).await;

    manager.get_token(false).await.unwrap();
    let token = manager.get_token(true).await.unwrap();
    assert_eq!(token.expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_get_token_with_probe_refreshes_rejected_token() {
    let (server, manager) = setup(login()).await;
    mount_login(&server, "tok-1", 1).await;
    mount_login(&server, "tok-2", 1).await;
    mount_probe(&server, "tok-1", 401).await;

    manager.get_token(false).await.unwrap();
    let token = manager.get_token(true).await.unwrap();
    assert_eq!(token.expose_secret(), "tok-2");
}

#[tokio::test]
async fn test_get_token_with_probe_keeps_token_on_server_error() {
    let (server, manager) = setup(login()).await;
    mount_login(&server, "tok-1", 1).await;
    mount_login(&server, "tok-2", 1).await;
    mount_probe(&server, "tok-1", 503).await;

    manager.get_token(false).await.unwrap();
    let token = manager.get_token(true).await.unwrap();
    assert_eq!(token.expose_secret(), "tok-1");
}

#[tokio::test]
async fn test_login_rejection_is_an_authentication_error() {
    let (server, manager) = setup(login()).await;

    Mock::given(method("GET"))
        .and(path("/authentication/g"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = manager.get_token(false).await;
    assert!(
        matches!(&result, Err(e) if e.is_auth_failure()),
        "expected Authentication error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_server_error_is_not_a_token() {
    let (server, manager) = setup(login()).await;

    Mock::given(method("GET"))
        .and(path("/authentication/g"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(manager.refresh_token().await.is_err());
}

// ── Probe ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_token_validity_states() {
    let (server, manager) = setup(login()).await;
    mount_login(&server, "tok-1", 1).await;

    assert_eq!(manager.test_token().await.unwrap(), TokenValidity::Missing);

    manager.get_token(false).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/greetings/isloggedin"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/greetings/isloggedin"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/greetings/isloggedin"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    assert_eq!(manager.test_token().await.unwrap(), TokenValidity::Valid);
    assert_eq!(manager.test_token().await.unwrap(), TokenValidity::Rejected);
    assert_eq!(
        manager.test_token().await.unwrap(),
        TokenValidity::Unknown(reqwest::StatusCode::BAD_GATEWAY)
    );
}

#[tokio::test]
async fn test_supplied_token_is_probed_as_is() {
    let (server, manager) = setup(Credentials::Token(SecretString::from("ext-9"))).await;

    Mock::given(method("GET"))
        .and(path("/greetings/isloggedin"))
        .and(header("authorization", "Bearer ext-9"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(manager.test_token().await.unwrap(), TokenValidity::Rejected);
}
