/// Sessions persisted to a token file
use crate::common::{MockResponse, TestSession};
use axum::http::{Method, header};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use voyage_client::{FileTokenStore, TokenStore};

fn token_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "voyage_it_{}_{}.json",
        name,
        std::process::id()
    ))
}

#[tokio::test]
async fn test_login_recovers_from_truncated_token_file() {
    // Given a token file left half-written by a previous run
    let path = token_file("truncated");
    std::fs::write(&path, r#"{"auth_token": "ab"#).unwrap();
    let tokens = Arc::new(FileTokenStore::with_key(&path, "auth_token"));
    tokens.init().await.unwrap();
    let session = TestSession::with_token_store(tokens).await;
    session.backend.respond(
        Method::POST,
        "/auth/login",
        MockResponse::ok(json!({"token": "fresh", "user": {"Name": "Ada"}})),
    );
    session.backend.respond(
        Method::GET,
        "/auth/me",
        MockResponse::ok(json!({"user": {"Name": "Ada", "Email": "ada@x.com"}})),
    );

    // When restoring and then logging in
    session.store.hydrate().await;
    assert!(session.store.user().await.is_none());
    let result = session.store.login("ada@x.com", "secret").await;

    // Then the login succeeds and the file now holds the new token
    assert!(result.is_success(), "{result:?}");
    assert_eq!(session.store.user().await.unwrap().name, "Ada");
    assert_eq!(session.persisted_token().await.as_deref(), Some("fresh"));
    let refreshes = session.backend.requests_to("/auth/me");
    assert_eq!(refreshes[0].headers[header::AUTHORIZATION], "Bearer fresh");

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_logout_clears_truncated_token_file() {
    let path = token_file("truncated_logout");
    std::fs::write(&path, r#"{"auth_token": "ab"#).unwrap();
    let session =
        TestSession::with_token_store(Arc::new(FileTokenStore::with_key(&path, "auth_token")))
            .await;

    session.store.logout().await;

    assert!(session.persisted_token().await.is_none());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&contents).unwrap(), json!({}));

    let _ = std::fs::remove_file(&path);
}
