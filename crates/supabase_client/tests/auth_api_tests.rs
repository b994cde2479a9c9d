//! Integration tests for the auth endpoints against a mock server.

use std::time::{SystemTime, UNIX_EPOCH};

use supabase_client::{
    AuthChangeEvent, AuthErrorKind, SupabaseClient, SupabaseClientTrait, SupabaseError,
};
use task_core::{Config, Identity, Session};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> Config {
    Config {
        supabase_url: server.uri(),
        supabase_anon_key: "anon-key".to_string(),
    }
}

fn far_future() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
        + 3600
}

fn persisted_session(user: &str) -> Session {
    Session {
        access_token: format!("token-{user}"),
        token_type: "bearer".to_string(),
        refresh_token: None,
        expires_at: far_future(),
        user: Identity {
            id: user.to_string(),
            email: None,
        },
    }
}

#[tokio::test]
async fn sign_in_installs_session_and_notifies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "token-U1",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-U1",
            "user": {"id": "U1", "email": "u1@example.com"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));
    let mut changes = client.on_auth_state_change();

    let session = client
        .sign_in_with_password("u1@example.com", "secret")
        .await
        .expect("sign in");
    assert_eq!(session.user.id, "U1");
    assert!(session.is_usable());

    let change = changes.try_recv().expect("auth change");
    assert_eq!(change.event, AuthChangeEvent::SignedIn);
    assert_eq!(change.session.expect("session").user.id, "U1");
}

#[tokio::test]
async fn sign_in_maps_invalid_credentials() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials"
        })))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));

    match client.sign_in_with_password("u1@example.com", "wrong").await {
        Err(SupabaseError::Auth { kind, message }) => {
            assert_eq!(kind, AuthErrorKind::InvalidCredentials);
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_up_returns_identity_without_installing_session() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "U9",
            "email": "new@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));

    let identity = client
        .sign_up("new@example.com", "secret")
        .await
        .expect("sign up");
    assert_eq!(identity.id, "U9");

    // No session was installed, so authenticated calls refuse locally.
    match client.fetch_tasks("U9").await {
        Err(SupabaseError::NoSession) => {}
        other => panic!("expected NoSession, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_up_maps_duplicate_account() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
            "error_code": "user_already_exists",
            "msg": "User already registered"
        })))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));

    match client.sign_up("u1@example.com", "secret").await {
        Err(SupabaseError::Auth { kind, .. }) => {
            assert_eq!(kind, AuthErrorKind::DuplicateAccount);
        }
        other => panic!("expected auth error, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_out_clears_session_and_notifies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("Authorization", "Bearer token-U1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));
    let mut changes = client.on_auth_state_change();
    client
        .set_session(persisted_session("U1"))
        .await
        .expect("set session");

    client.sign_out().await.expect("sign out");

    let first = changes.try_recv().expect("signed-in change");
    assert_eq!(first.event, AuthChangeEvent::SignedIn);
    let second = changes.try_recv().expect("signed-out change");
    assert_eq!(second.event, AuthChangeEvent::SignedOut);
    assert!(second.session.is_none());

    match client.fetch_tasks("U1").await {
        Err(SupabaseError::NoSession) => {}
        other => panic!("expected NoSession, got {other:?}"),
    }
}

#[tokio::test]
async fn sign_out_without_session_refuses_locally() {
    let mock_server = MockServer::start().await;
    let client = SupabaseClient::new(&config_for(&mock_server));

    match client.sign_out().await {
        Err(SupabaseError::NoSession) => {}
        other => panic!("expected NoSession, got {other:?}"),
    }
}

#[tokio::test]
async fn get_session_validates_against_the_service() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("Authorization", "Bearer token-U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "U1",
            "email": "u1@example.com"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));
    client
        .set_session(persisted_session("U1"))
        .await
        .expect("set session");

    let session = client
        .get_session()
        .await
        .expect("session check")
        .expect("session present");
    assert_eq!(session.user.id, "U1");
    assert_eq!(session.user.email.as_deref(), Some("u1@example.com"));
}

#[tokio::test]
async fn get_session_drops_rejected_token() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "msg": "JWT expired"
        })))
        .mount(&mock_server)
        .await;

    let client = SupabaseClient::new(&config_for(&mock_server));
    client
        .set_session(persisted_session("U1"))
        .await
        .expect("set session");

    assert!(client.get_session().await.expect("session check").is_none());
    match client.fetch_tasks("U1").await {
        Err(SupabaseError::NoSession) => {}
        other => panic!("expected NoSession, got {other:?}"),
    }
}

#[tokio::test]
async fn get_session_without_session_is_none() {
    let mock_server = MockServer::start().await;
    let client = SupabaseClient::new(&config_for(&mock_server));

    assert!(client.get_session().await.expect("session check").is_none());
}
