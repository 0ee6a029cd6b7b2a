mod common;

use std::time::Duration;

use common::{torrent_json, MockBackend};
use deck_core::api::ApiClient;
use deck_core::poller::{PollResult, Poller};
use tokio::sync::mpsc;
use tokio::time::timeout;

#[tokio::test]
async fn first_fetch_does_not_wait_for_the_period() {
    let backend = MockBackend::running();
    backend.with(|s| s.torrents = vec![torrent_json("a", "seeding", Some("h"))]);
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(8);

    let _poller = Poller::spawn(api, Duration::from_secs(60), tx, |r| r);

    let first = timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("immediate fetch")
        .unwrap();
    assert_eq!(first.unwrap()[0].name, "a");
}

#[tokio::test]
async fn keeps_fetching_every_period() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(8);

    let poller = Poller::spawn(api, Duration::from_millis(50), tx, |r| r);

    for _ in 0..3 {
        let r = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert!(r.unwrap().is_empty());
    }
    assert!(backend.with(|s| s.torrents_hits) >= 3);
    poller.stop();
}

#[tokio::test]
async fn failures_are_reported_and_polling_continues() {
    let backend = MockBackend::running();
    backend.with(|s| s.torrents_fail = true);
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(8);

    let _poller = Poller::spawn(api, Duration::from_millis(50), tx, |r| r);

    let first = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
    assert!(first.is_err());
    backend.with(|s| s.torrents_fail = false);
    loop {
        let next = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        if next.is_ok() {
            break;
        }
    }
}

#[tokio::test]
async fn stop_ends_the_task() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(8);

    let poller = Poller::spawn(api, Duration::from_millis(30), tx, |r| r);
    timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap().unwrap();
    poller.stop();

    // channel closes once the task exits and drops its sender
    let drained = timeout(Duration::from_secs(2), async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok());
}

#[tokio::test]
async fn dropping_the_handle_stops_polling() {
    let backend = MockBackend::running();
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(8);

    let poller = Poller::spawn(api, Duration::from_millis(30), tx, |r| r);
    timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap().unwrap();
    drop(poller);

    let drained = timeout(Duration::from_secs(2), async {
        while rx.recv().await.is_some() {}
    })
    .await;
    assert!(drained.is_ok());
}

#[tokio::test]
async fn a_hung_request_does_not_freeze_polling() {
    let backend = MockBackend::running();
    backend.with(|s| s.torrents_hang_on = Some(2));
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(32);

    let _poller = Poller::spawn(api, Duration::from_millis(100), tx, |r| r);

    for _ in 0..4 {
        let r = timeout(Duration::from_secs(2), rx.recv()).await.unwrap().unwrap();
        assert!(r.is_ok());
    }
    assert!(backend.with(|s| s.torrents_hits) >= 5);
}

#[tokio::test]
async fn stop_ends_a_fetch_that_never_answers() {
    let backend = MockBackend::running();
    backend.with(|s| s.torrents_hang_on = Some(1));
    let url = backend.serve().await;
    let api = ApiClient::new(reqwest::Client::new(), &url, None);
    let (tx, mut rx) = mpsc::channel::<PollResult>(8);

    let poller = Poller::spawn(api, Duration::from_secs(60), tx, |r| r);
    // wait until the hanging request reached the backend
    timeout(Duration::from_secs(2), async {
        while backend.with(|s| s.torrents_hits) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    poller.stop();

    let closed = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
    assert!(closed.is_none());
}
