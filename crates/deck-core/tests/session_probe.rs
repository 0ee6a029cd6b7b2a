mod common;

use std::time::Duration;

use common::MockBackend;
use deck_core::session::{Session, STORAGE_KEY};
use deck_core::store::SettingsStore;

fn session(dir: &tempfile::TempDir) -> Session {
    let store = SettingsStore::new(dir.path().join("session.json"));
    Session::load(store, reqwest::Client::new(), Duration::from_millis(300))
}

#[tokio::test]
async fn probe_accepts_running_backend() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);

    assert!(s.probe(&format!("{}/", url)).await);
    assert!(s.is_connected());
    // probing does not adopt the url
    assert_eq!(s.url(), None);
}

#[tokio::test]
async fn probe_rejects_wrong_status_token() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);

    assert!(s.probe(&url).await);
    backend.with(|st| st.health_status = Some("stopped".to_string()));
    assert!(!s.probe(&url).await);
    assert!(!s.is_connected());
}

#[tokio::test]
async fn probe_rejects_error_status() {
    let backend = MockBackend::default();
    let url = backend.serve().await;
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    s.record_probe(true);

    assert!(!s.probe(&url).await);
    assert!(!s.is_connected());
}

#[tokio::test]
async fn probe_rejects_malformed_body() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);

    for body in ["<html>tunnel offline</html>", "{}"] {
        s.record_probe(true);
        backend.with(|st| st.health_body = Some(body.to_string()));
        assert!(!s.probe(&url).await, "body {:?}", body);
        assert!(!s.is_connected());
    }
}

#[tokio::test]
async fn probe_times_out() {
    let backend = MockBackend::running();
    backend.with(|st| st.health_delay = Duration::from_secs(3));
    let url = backend.serve().await;
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);

    let started = std::time::Instant::now();
    assert!(!s.probe(&url).await);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn probe_unreachable_host() {
    // bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    assert!(!s.probe(&format!("http://{}", addr)).await);
}

#[tokio::test]
async fn connect_persists_and_restore_reprobes() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let dir = tempfile::tempdir().unwrap();

    {
        let mut s = session(&dir);
        assert!(s.connect(&format!("{}/", url)).await);
        assert_eq!(s.url(), Some(url.as_str()));
    }

    let store = SettingsStore::new(dir.path().join("session.json"));
    assert_eq!(store.get(STORAGE_KEY).as_deref(), Some(url.as_str()));

    let mut restored = session(&dir);
    assert!(!restored.is_connected());
    assert!(restored.restore().await);
    assert!(restored.is_connected());

    backend.with(|st| st.health_status = None);
    assert!(!restored.restore().await);
    assert!(!restored.is_connected());
    // a failed probe never clears the saved url
    assert_eq!(restored.url(), Some(url.as_str()));
}

#[tokio::test]
async fn restore_without_saved_url_is_false() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = session(&dir);
    assert!(!s.restore().await);
}
