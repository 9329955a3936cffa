//! Session lifecycle tests
//!
//! Exercises the session manager against the in-memory backend: the
//! mount-time resolution, provider notifications, and the liveness guard
//! that keeps late async completions from resurrecting stale state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;
use uuid::Uuid;

use fairway_core::adapters::memory::{MemoryBackend, MemoryConfig};
use fairway_core::domain::result::Error;
use fairway_core::domain::{ProfileUpdate, Role, User};
use fairway_core::services::{SessionManager, SessionState};

const WAIT: Duration = Duration::from_secs(2);

fn backend_with_user(config: MemoryConfig) -> (Arc<MemoryBackend>, Uuid) {
    let backend = Arc::new(MemoryBackend::new(config));
    let user_id = backend.add_account("sam@example.com", "secret");
    backend.add_profile(User::new(
        user_id,
        "sam@example.com",
        "Sam",
        "Torrance",
        12.4,
        Role::Player,
    ));
    (backend, user_id)
}

fn start_manager(backend: &Arc<MemoryBackend>) -> Arc<SessionManager> {
    SessionManager::start(backend.clone(), backend.clone())
}

/// Wait until the state passes the predicate, or panic after the timeout
async fn wait_for<F>(rx: &mut watch::Receiver<SessionState>, predicate: F) -> SessionState
where
    F: Fn(&SessionState) -> bool,
{
    timeout(WAIT, async {
        loop {
            let current = rx.borrow().clone();
            if predicate(&current) {
                return current;
            }
            rx.changed().await.expect("session manager dropped");
        }
    })
    .await
    .expect("state never settled")
}

fn is_settled(state: &SessionState) -> bool {
    !matches!(state, SessionState::Initializing)
}

#[tokio::test]
async fn initial_resolution_without_session_is_unauthenticated() {
    let (backend, _) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);
    let mut rx = manager.watch();

    let state = wait_for(&mut rx, is_settled).await;
    assert_eq!(state, SessionState::Unauthenticated);
}

#[tokio::test]
async fn failed_session_lookup_fails_open_to_unauthenticated() {
    let (backend, _) = backend_with_user(MemoryConfig {
        fail_session_lookup: true,
        ..Default::default()
    });
    let manager = start_manager(&backend);
    let mut rx = manager.watch();

    let state = wait_for(&mut rx, is_settled).await;
    assert_eq!(state, SessionState::Unauthenticated);
}

#[tokio::test]
async fn sign_in_reaches_authenticated_with_mirrored_profile() {
    let (backend, user_id) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager.sign_in("sam@example.com", "secret").await.unwrap();

    let state = wait_for(&mut rx, |s| s.is_authenticated()).await;
    let profile = state.profile().expect("profile loaded");
    assert_eq!(profile.id, user_id);
    assert_eq!(profile.email, "sam@example.com");
    assert_eq!(profile.first_name, "Sam");
    assert_eq!(profile.handicap, 12.4);
    assert_eq!(state.session().unwrap().user_id, user_id);
}

#[tokio::test]
async fn sign_in_with_bad_credentials_surfaces_error_without_mutation() {
    let (backend, _) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    let err = manager.sign_in("sam@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, Error::Provider(_)));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(manager.current(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn sign_out_during_pending_profile_fetch_wins() {
    // Profile fetches take 150ms; the sign-out arrives while the fetch from
    // the sign-in notification is still in flight. Its late completion must
    // not resurrect the authenticated state.
    let (backend, _) = backend_with_user(MemoryConfig {
        profile_delay_ms: 150,
        ..Default::default()
    });
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager.sign_in("sam@example.com", "secret").await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    manager.sign_out().await.unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(manager.current(), SessionState::Unauthenticated);
}

#[tokio::test]
async fn profile_fetch_failure_degrades_to_no_profile() {
    let (backend, user_id) = backend_with_user(MemoryConfig {
        fail_profile_fetch: true,
        ..Default::default()
    });
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager.sign_in("sam@example.com", "secret").await.unwrap();

    let state = wait_for(&mut rx, |s| s.is_authenticated()).await;
    assert!(state.profile().is_none());
    assert_eq!(state.session().unwrap().user_id, user_id);
}

#[tokio::test]
async fn update_profile_requires_authentication() {
    let (backend, user_id) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    let patch = ProfileUpdate {
        first_name: Some("Sammy".to_string()),
        ..Default::default()
    };
    let err = manager.update_profile(&patch).await.unwrap_err();
    assert!(matches!(err, Error::NotAuthenticated));

    // The store row is untouched.
    let stored = backend.profile(user_id).unwrap();
    assert_eq!(stored.first_name, "Sam");
}

#[tokio::test]
async fn update_profile_merges_optimistically() {
    let (backend, user_id) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager.sign_in("sam@example.com", "secret").await.unwrap();
    wait_for(&mut rx, |s| s.profile().is_some()).await;

    let patch = ProfileUpdate {
        last_name: Some("Snead".to_string()),
        handicap: Some(9.8),
        ..Default::default()
    };
    let merged = manager.update_profile(&patch).await.unwrap();
    assert_eq!(merged.last_name, "Snead");
    assert_eq!(merged.handicap, 9.8);

    // Both the in-memory view and the store row carry the patch.
    let state = manager.current();
    assert_eq!(state.profile().unwrap().last_name, "Snead");
    assert_eq!(backend.profile(user_id).unwrap().handicap, 9.8);
}

#[tokio::test]
async fn update_profile_rejects_invalid_handicap() {
    let (backend, _) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager.sign_in("sam@example.com", "secret").await.unwrap();
    wait_for(&mut rx, |s| s.profile().is_some()).await;

    let patch = ProfileUpdate {
        handicap: Some(60.0),
        ..Default::default()
    };
    assert!(matches!(
        manager.update_profile(&patch).await.unwrap_err(),
        Error::Validation(_)
    ));
}

#[tokio::test]
async fn sign_up_rejects_duplicate_email() {
    let (backend, _) = backend_with_user(MemoryConfig::default());
    let manager = start_manager(&backend);

    let err = manager
        .sign_up("sam@example.com", "password", "Sam", "Torrance", 10.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyRegistered));
}

#[tokio::test]
async fn sign_up_then_sign_in_loads_player_profile() {
    let backend = Arc::new(MemoryBackend::new(MemoryConfig::default()));
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager
        .sign_up("nora@example.com", "password", "Nora", "Byrne", 21.0)
        .await
        .unwrap();
    // Signup does not open a session; the account signs in explicitly.
    assert_eq!(manager.current(), SessionState::Unauthenticated);

    manager.sign_in("nora@example.com", "password").await.unwrap();
    let state = wait_for(&mut rx, |s| s.profile().is_some()).await;

    let profile = state.profile().unwrap();
    assert_eq!(profile.role, Role::Player);
    assert_eq!(profile.first_name, "Nora");
    assert_eq!(profile.handicap, 21.0);
}

#[tokio::test]
async fn sign_up_survives_profile_insert_failure() {
    // The identity is created even when the profile row insert fails; the
    // account later surfaces as authenticated without a profile.
    let backend = Arc::new(MemoryBackend::new(MemoryConfig {
        fail_profile_insert: true,
        ..Default::default()
    }));
    let manager = start_manager(&backend);
    let mut rx = manager.watch();
    wait_for(&mut rx, is_settled).await;

    manager
        .sign_up("nora@example.com", "password", "Nora", "Byrne", 21.0)
        .await
        .unwrap();
    manager.sign_in("nora@example.com", "password").await.unwrap();

    let state = wait_for(&mut rx, |s| s.is_authenticated()).await;
    assert!(state.profile().is_none());
}

#[tokio::test]
async fn sign_up_rejects_invalid_handicap() {
    let backend = Arc::new(MemoryBackend::new(MemoryConfig::default()));
    let manager = start_manager(&backend);

    let err = manager
        .sign_up("nora@example.com", "password", "Nora", "Byrne", 55.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
