//! Connection manager: the backend base URL and whether it answered the
//! last probe.
//!
//! One `Session` is owned by the app and lent to whatever needs it. There is
//! no lock: the last probe to complete decides `connected`.

use std::time::Duration;

use tracing::{info, warn};

use crate::api::{self, ApiClient};
use crate::store::SettingsStore;

/// Settings key the base URL is persisted under.
pub const STORAGE_KEY: &str = "colab_api_url";

/// Strip one trailing slash.
pub fn normalize_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}

pub struct Session {
    url: Option<String>,
    connected: bool,
    store: SettingsStore,
    http: reqwest::Client,
    probe_timeout: Duration,
}

impl Session {
    /// Build a session, picking up a previously persisted URL if any.
    /// Starts disconnected; call `restore` to re-probe.
    pub fn load(store: SettingsStore, http: reqwest::Client, probe_timeout: Duration) -> Self {
        let url = store
            .get(STORAGE_KEY)
            .map(|u| normalize_url(&u))
            .filter(|u| !u.is_empty());
        if let Some(u) = &url {
            info!("loaded saved backend url {}", u);
        }
        Self {
            url,
            connected: false,
            store,
            http,
            probe_timeout,
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Normalize and remember `url`, in memory and on disk. Does not probe.
    /// The in-memory value is updated even when persisting fails.
    pub fn set_url(&mut self, url: &str) -> anyhow::Result<()> {
        let clean = normalize_url(url);
        self.url = Some(clean.clone());
        self.store.set(STORAGE_KEY, &clean)
    }

    /// Probe `url` and record the outcome in the connected flag.
    ///
    /// `probe`, `restore` and `connect` hold the session across the request.
    /// An event loop that must keep drawing runs `api::probe` in a task
    /// instead and hands the outcome to `finish_connect` or `record_probe`.
    pub async fn probe(&mut self, url: &str) -> bool {
        let reachable = api::probe(&self.http, url, self.probe_timeout).await;
        self.record_probe(reachable);
        reachable
    }

    /// Apply the result of a probe that ran elsewhere (e.g. a spawned task).
    pub fn record_probe(&mut self, reachable: bool) {
        self.connected = reachable;
    }

    /// Re-probe the persisted URL. False when nothing was persisted.
    pub async fn restore(&mut self) -> bool {
        match self.url.clone() {
            Some(url) => self.probe(&url).await,
            None => false,
        }
    }

    /// Probe `url` and adopt it on success.
    pub async fn connect(&mut self, url: &str) -> bool {
        let reachable = api::probe(&self.http, url, self.probe_timeout).await;
        self.finish_connect(url, reachable)
    }

    /// Second half of `connect` for probes run off the event loop.
    pub fn finish_connect(&mut self, url: &str, reachable: bool) -> bool {
        self.record_probe(reachable);
        if reachable {
            if let Err(e) = self.set_url(url) {
                warn!("could not persist backend url: {}", e);
            }
        }
        reachable
    }

    /// Client for the current URL, if one is set.
    pub fn api_client(&self, request_timeout: Option<Duration>) -> Option<ApiClient> {
        self.url
            .as_deref()
            .map(|u| ApiClient::new(self.http.clone(), u, request_timeout))
    }
}
