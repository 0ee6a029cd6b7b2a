//! HTTP client for the remote torrent backend.
//!
//! Errors carry enough detail for a log line. Callers never branch on the
//! variant: every failure means "operation failed".

use std::time::Duration;

use reqwest::{RequestBuilder, StatusCode};
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::protocol::{
    AddRequest, ControlAction, ControlRequest, HealthStatus, Torrent, PATH_ADD, PATH_CONTROL,
    PATH_HEALTH, PATH_TORRENTS,
};
use crate::session::normalize_url;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connect/DNS failure, timeout, or a body that would not decode.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend answered {0}")]
    Status(StatusCode),
}

/// Shared reqwest client carrying the configured user agent.
pub fn build_http_client(cfg: &ApiConfig) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(cfg.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: &str, request_timeout: Option<Duration>) -> Self {
        Self {
            http,
            base_url: normalize_url(base_url),
            request_timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_timeout(&self, req: RequestBuilder) -> RequestBuilder {
        match self.request_timeout {
            Some(t) => req.timeout(t),
            None => req,
        }
    }

    /// `GET /` bounded by `timeout`.
    pub async fn health(&self, timeout: Duration) -> Result<HealthStatus, ApiError> {
        let response = self
            .http
            .get(self.endpoint(PATH_HEALTH))
            .timeout(timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json::<HealthStatus>().await?)
    }

    /// `GET /torrents`: the complete current list.
    pub async fn torrents(&self) -> Result<Vec<Torrent>, ApiError> {
        let response = self
            .with_timeout(self.http.get(self.endpoint(PATH_TORRENTS)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.json::<Vec<Torrent>>().await?)
    }

    /// `POST /add` for a single magnet link or torrent URL.
    pub async fn add(&self, link: &str) -> Result<(), ApiError> {
        let body = AddRequest {
            link: link.to_string(),
        };
        let response = self
            .with_timeout(self.http.post(self.endpoint(PATH_ADD)).json(&body))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(())
    }

    /// `POST /control`.
    pub async fn control(&self, info_hash: &str, action: ControlAction) -> Result<(), ApiError> {
        let body = ControlRequest {
            info_hash: info_hash.to_string(),
            action,
        };
        let response = self
            .with_timeout(self.http.post(self.endpoint(PATH_CONTROL)).json(&body))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(())
    }
}

/// Reachability check: true only when `GET <url>/` answers within `timeout`
/// with `{"status": "running"}`.
pub async fn probe(http: &reqwest::Client, url: &str, timeout: Duration) -> bool {
    let client = ApiClient::new(http.clone(), url, None);
    match client.health(timeout).await {
        Ok(health) if health.is_running() => {
            debug!("probe {}: running", client.base_url());
            true
        }
        Ok(health) => {
            warn!("probe {}: unexpected status {:?}", client.base_url(), health.status);
            false
        }
        Err(e) => {
            warn!("probe {}: {}", client.base_url(), e);
            false
        }
    }
}
