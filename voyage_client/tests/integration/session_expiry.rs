/// Session eviction on 401 and startup restore failures
use crate::common::{MockResponse, TEST_TOKEN, TestSession, ada_record};
use axum::http::Method;
use serde_json::json;
use std::time::Duration;
use voyage_client::SessionEvent;

async fn signed_in_session() -> TestSession {
    let session = TestSession::start().await;
    session.backend.respond(
        Method::POST,
        "/auth/login",
        MockResponse::ok(json!({"token": TEST_TOKEN, "user": ada_record()})),
    );
    session
        .backend
        .respond(Method::GET, "/auth/me", MockResponse::ok(json!({"user": ada_record()})));
    assert!(session.store.login("ada@x.com", "secret").await.is_success());
    session
}

#[tokio::test]
async fn test_unauthorized_response_evicts_session() {
    // Given a signed-in session whose token the backend no longer accepts
    let session = signed_in_session().await;
    session
        .backend
        .respond(Method::GET, "/users/wishlist", MockResponse::unauthorized());
    let mut events = session.store.subscribe();

    // When any authenticated call is made
    let result = session.gateway().wishlist().await;

    // Then the call yields the 401 sentinel and the session is gone
    assert!(matches!(result, Ok(None)));
    assert!(session.persisted_token().await.is_none());
    assert!(session.store.user().await.is_none());
    let event = events.try_recv().unwrap();
    assert_eq!(event, SessionEvent::Expired);
    assert_eq!(event.redirect_path(), "/login");
}

#[tokio::test]
async fn test_unauthorized_without_token_still_signals_expiry() {
    let session = TestSession::start().await;
    session
        .backend
        .respond(Method::GET, "/users/bookings", MockResponse::unauthorized());
    let mut events = session.store.subscribe();

    let result = session.gateway().user_bookings().await.unwrap();

    assert!(result.is_none());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_hydrate_with_rejected_token() {
    // Given a persisted token the backend rejects
    let session = TestSession::with_persisted_token("stale").await;
    session
        .backend
        .respond(Method::GET, "/auth/me", MockResponse::unauthorized());
    let mut events = session.store.subscribe();

    // When restoring at startup
    session.store.hydrate().await;

    // Then loading resolves signed out and the token is removed
    let snapshot = session.store.snapshot().await;
    assert!(!snapshot.loading);
    assert!(snapshot.user.is_none());
    assert!(session.persisted_token().await.is_none());
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);
}

#[tokio::test]
async fn test_hydrate_with_backend_error_discards_token_quietly() {
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session.backend.respond(
        Method::GET,
        "/auth/me",
        MockResponse::json(503, json!({"message": "Maintenance"})),
    );
    let mut events = session.store.subscribe();

    session.store.hydrate().await;

    assert!(!session.store.is_loading().await);
    assert!(session.store.user().await.is_none());
    assert!(session.persisted_token().await.is_none());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_hydrate_without_token_makes_no_request() {
    let session = TestSession::start().await;

    session.store.hydrate().await;

    assert!(!session.store.is_loading().await);
    assert!(session.backend.requests().is_empty());
}

#[tokio::test]
async fn test_stale_unauthorized_does_not_evict_newer_login() {
    // Given a slow request issued with an old token
    let session = TestSession::with_persisted_token("old").await;
    session.backend.respond(
        Method::GET,
        "/users/wishlist",
        MockResponse::unauthorized().delayed(Duration::from_millis(300)),
    );
    session.backend.respond(
        Method::POST,
        "/auth/login",
        MockResponse::ok(json!({"token": TEST_TOKEN, "user": ada_record()})),
    );
    session
        .backend
        .respond(Method::GET, "/auth/me", MockResponse::ok(json!({"user": ada_record()})));
    let mut events = session.store.subscribe();

    let gateway = session.gateway().clone();
    let pending = tokio::spawn(async move { gateway.wishlist().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // When the user signs in again before the old request's 401 arrives
    assert!(session.store.login("ada@x.com", "secret").await.is_success());
    let stale = pending.await.unwrap();

    // Then the late 401 leaves the new session in place
    assert!(matches!(stale, Ok(None)));
    assert_eq!(session.persisted_token().await.as_deref(), Some(TEST_TOKEN));
    assert_eq!(session.store.user().await.unwrap().name, "Ada");
    assert!(events.try_recv().is_err());

    let wishlist = session.backend.requests_to("/users/wishlist");
    assert_eq!(wishlist[0].headers["authorization"], "Bearer old");
}
