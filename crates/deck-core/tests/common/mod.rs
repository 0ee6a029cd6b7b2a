//! In-process stand-in for the torrent backend, served by axum on an
//! ephemeral port. Records every request so tests can assert on traffic.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct MockState {
    /// Value of `status` in the health body. `None` answers 500.
    pub health_status: Option<String>,
    /// Delay before the health endpoint answers.
    pub health_delay: Duration,
    /// Raw health body answered with 200, bypassing `health_status`.
    pub health_body: Option<String>,
    pub torrents: Vec<Value>,
    pub torrents_fail: bool,
    pub torrents_hits: usize,
    /// Hit number (1-based) on which `/torrents` never answers.
    pub torrents_hang_on: Option<usize>,
    pub adds: Vec<String>,
    /// Links for which `/add` answers 500.
    pub add_failures: HashSet<String>,
    pub controls: Vec<(String, String)>,
    pub control_fail: bool,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn running() -> Self {
        let backend = Self::default();
        backend.with(|s| s.health_status = Some("running".to_string()));
        backend
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut guard = self.state.lock().unwrap();
        f(&mut guard)
    }

    /// Bind to 127.0.0.1:0 and serve in the background. Returns the base URL.
    pub async fn serve(&self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/", get(health))
            .route("/torrents", get(torrents))
            .route("/add", post(add))
            .route("/control", post(control))
            .with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

pub fn torrent_json(name: &str, state: &str, hash: Option<&str>) -> Value {
    let mut v = json!({
        "name": name,
        "progress": 12.5,
        "state": state,
        "download_rate": 2048,
        "upload_rate": 0,
        "total_done": 1024,
        "total_size": 8192,
        "peers": 3,
        "elapsed": 3661,
    });
    if let Some(h) = hash {
        v["info_hash"] = json!(h);
    }
    v
}

async fn health(State(mock): State<MockBackend>) -> Response {
    let (status, body, delay) =
        mock.with(|s| (s.health_status.clone(), s.health_body.clone(), s.health_delay));
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    if let Some(raw) = body {
        return (StatusCode::OK, raw).into_response();
    }
    match status {
        Some(st) => Json(json!({ "status": st })).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn torrents(State(mock): State<MockBackend>) -> Result<Json<Vec<Value>>, StatusCode> {
    let hang = mock.with(|s| {
        s.torrents_hits += 1;
        s.torrents_hang_on == Some(s.torrents_hits)
    });
    if hang {
        tokio::time::sleep(Duration::from_secs(3600)).await;
    }
    mock.with(|s| {
        if s.torrents_fail {
            Err(StatusCode::SERVICE_UNAVAILABLE)
        } else {
            Ok(Json(s.torrents.clone()))
        }
    })
}

async fn add(State(mock): State<MockBackend>, Json(body): Json<Value>) -> StatusCode {
    let link = body["link"].as_str().unwrap_or_default().to_string();
    mock.with(|s| {
        s.adds.push(link.clone());
        if s.add_failures.contains(&link) {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    })
}

async fn control(State(mock): State<MockBackend>, Json(body): Json<Value>) -> StatusCode {
    let hash = body["info_hash"].as_str().unwrap_or_default().to_string();
    let action = body["action"].as_str().unwrap_or_default().to_string();
    mock.with(|s| {
        s.controls.push((hash, action));
        if s.control_fail {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    })
}
