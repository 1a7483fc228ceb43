//! Session lifecycle tests: expiry, forced logout, single-flight refresh.
//!
//! Network-touching paths point at a closed local port so transport
//! failures are deterministic; no live backend is involved.

use std::sync::Arc;

use chrono::{Duration, Utc};
use million_client::auth::AuthService;
use million_client::domain::auth::Session;
use million_client::storage::{MemorySessionStore, SessionStore};

// Nothing listens here; connections are refused immediately.
const DEAD_API: &str = "http://127.0.0.1:9/api";

fn service_with(
    store: Arc<MemorySessionStore>,
    buffer_seconds: i64,
) -> AuthService {
    AuthService::new(DEAD_API, store, 2, buffer_seconds).unwrap()
}

fn session_expiring_in(minutes: i64) -> Session {
    Session {
        access_token: "access".into(),
        refresh_token: "refresh".into(),
        expires_at: Utc::now() + Duration::minutes(minutes),
        user: None,
    }
}

#[tokio::test]
async fn logout_clears_session_even_when_network_fails() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session_expiring_in(60)).unwrap();

    let auth = service_with(store.clone(), 300);
    auth.logout().await.unwrap();

    assert!(store.load().is_none());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn refresh_without_token_fails_fast() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = service_with(store, 300);

    let err = auth.refresh_access_token().await.unwrap_err();
    assert!(err.to_string().contains("No refresh token available"));
}

#[tokio::test]
async fn failed_refresh_forces_logout() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session_expiring_in(-5)).unwrap();

    let auth = service_with(store.clone(), 300);
    let result = auth.refresh_access_token().await;

    assert!(result.is_err());
    // A stale session must not linger after a failed refresh.
    assert!(store.load().is_none());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn authentication_honors_expiry_buffer() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session_expiring_in(2)).unwrap();

    // 2 minutes left is inside a 5 minute buffer, outside a zero buffer.
    let buffered = service_with(store.clone(), 300);
    assert!(!buffered.is_authenticated());
    assert!(buffered.is_token_expired());

    let unbuffered = service_with(store, 0);
    assert!(unbuffered.is_authenticated());
}

#[tokio::test]
async fn partial_session_reads_as_unauthenticated() {
    let store = Arc::new(MemorySessionStore::new());
    let mut session = session_expiring_in(60);
    session.refresh_token = String::new();
    store.save(&session).unwrap();

    let auth = service_with(store, 0);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn fresh_session_short_circuits_refresh() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session_expiring_in(60)).unwrap();

    // The base URL is unreachable, so a returned session proves no HTTP
    // refresh was attempted.
    let auth = service_with(store.clone(), 300);
    let session = auth.refresh_access_token().await.unwrap();
    assert_eq!(session.access_token, "access");
    assert!(store.load().is_some());
}

#[tokio::test]
async fn concurrent_refreshes_share_one_outcome() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session_expiring_in(60)).unwrap();

    let auth = Arc::new(service_with(store, 300));
    let (a, b) = tokio::join!(auth.refresh_access_token(), auth.refresh_access_token());

    assert!(a.is_ok());
    assert!(b.is_ok());
}

#[tokio::test]
async fn overlapping_refreshes_of_an_expired_session_share_one_attempt() {
    let store = Arc::new(MemorySessionStore::new());
    store.save(&session_expiring_in(-5)).unwrap();

    let auth = Arc::new(service_with(store.clone(), 300));
    let (a, b) = tokio::join!(auth.refresh_access_token(), auth.refresh_access_token());

    // Exactly one caller reaches the network (and fails, forcing logout);
    // the other acquires the lock afterwards and observes the cleared
    // session instead of issuing a second refresh.
    let messages = [a.unwrap_err().to_string(), b.unwrap_err().to_string()];
    let failed_fast = messages
        .iter()
        .filter(|m| m.contains("No refresh token available"))
        .count();
    assert_eq!(
        failed_fast, 1,
        "lock loser should see the cleared session: {:?}",
        messages
    );
    assert!(store.load().is_none());
}
