mod common;

use std::sync::Arc;

use common::{StubBackend, PASSWORD};
use cooksetu::api::ApiError;
use cooksetu::models::{Role, SignupData, User};
use cooksetu::session::SessionStore;
use cooksetu::storage::{FileStore, KeyValueStore, TOKEN_KEY, USER_KEY};
use tempfile::TempDir;

fn file_store(dir: &TempDir) -> Arc<FileStore> {
    Arc::new(FileStore::new(dir.path().join("storage.json")))
}

#[tokio::test]
async fn test_login_survives_restart() {
    let backend = StubBackend::start().await;
    let temp_dir = TempDir::new().unwrap();

    let store = SessionStore::hydrate(Arc::new(backend.client()), file_store(&temp_dir));
    assert!(!store.is_authenticated());
    let session = store.login("cook@example.com", PASSWORD).await.unwrap();
    assert_eq!(session.user.role, Role::Cook);

    // A fresh store over the same file restores without contacting the server
    let before = backend.state.request_count();
    let restored = SessionStore::hydrate(Arc::new(backend.client()), file_store(&temp_dir));
    assert_eq!(restored.current(), Some(session));
    assert_eq!(backend.state.request_count(), before);
}

#[tokio::test]
async fn test_persisted_session_matches_server_response() {
    let backend = StubBackend::start().await;
    let temp_dir = TempDir::new().unwrap();
    let storage = file_store(&temp_dir);

    let store = SessionStore::hydrate(Arc::new(backend.client()), storage.clone());
    let session = store
        .signup(&SignupData {
            name: "Meera".to_string(),
            email: "meera@example.com".to_string(),
            password: "pw".to_string(),
            phone_num: "98765 43210".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-signup"));
    let saved: User = serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved, session.user);
    assert_eq!(saved.location_string.as_deref(), Some("Unknown"));
}

#[tokio::test]
async fn test_failed_signup_keeps_storage_empty() {
    let backend = StubBackend::start().await;
    let temp_dir = TempDir::new().unwrap();
    let storage = file_store(&temp_dir);

    let store = SessionStore::hydrate(Arc::new(backend.client()), storage.clone());
    let err = store
        .signup(&SignupData {
            name: "Taken".to_string(),
            email: "taken@example.com".to_string(),
            password: "pw".to_string(),
            phone_num: "9876543210".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { .. }));
    assert_eq!(err.to_string(), "Email already registered");
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn test_logout_empties_file_storage() {
    let backend = StubBackend::start().await;
    let temp_dir = TempDir::new().unwrap();
    let storage = file_store(&temp_dir);

    let store = SessionStore::hydrate(Arc::new(backend.client()), storage.clone());
    store.login("akhil@example.com", PASSWORD).await.unwrap();
    store.logout();

    assert!(store.current().is_none());
    assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(storage.get(USER_KEY).unwrap(), None);

    let restored = SessionStore::hydrate(Arc::new(backend.client()), file_store(&temp_dir));
    assert!(!restored.is_authenticated());
}

#[tokio::test]
async fn test_login_against_unreachable_server_fails_cleanly() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = cooksetu::api::ApiClient::new(
        &format!("http://{}", addr),
        &cooksetu::config::HttpConfig::default(),
    )
    .unwrap();
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::hydrate(Arc::new(client), file_store(&temp_dir));

    let err = store.login("akhil@example.com", PASSWORD).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!store.is_authenticated());
}
