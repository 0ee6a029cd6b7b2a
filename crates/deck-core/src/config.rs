use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;
use super::protocol::MAX_BATCH_LINKS;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Upper bound for the reachability probe.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Timeout for list/add/control calls. Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Links submitted per add batch; the rest are dropped.
    #[serde(default = "default_max_batch_links")]
    pub max_batch_links: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_clock_interval_ms")]
    pub clock_interval_ms: u64,
    #[serde(default = "default_true")]
    pub show_keys_bar: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            request_timeout_ms: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_batch_links: default_max_batch_links(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            clock_interval_ms: default_clock_interval_ms(),
            show_keys_bar: default_true(),
        }
    }
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_max_batch_links() -> usize {
    MAX_BATCH_LINKS
}

fn default_clock_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    format!("magnetdeck/{}", env!("CARGO_PKG_VERSION"))
}

impl ApiConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

impl PollingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.api.request_timeout(), None);
        assert_eq!(config.polling.poll_interval(), Duration::from_millis(2000));
        assert_eq!(config.polling.max_batch_links, 50);
        assert_eq!(config.ui.clock_interval_ms, 1000);
        assert!(config.api.user_agent.starts_with("magnetdeck/"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[polling]\npoll_interval_ms = 500\n").unwrap();
        assert_eq!(config.polling.poll_interval_ms, 500);
        assert_eq!(config.polling.max_batch_links, 50);
        assert_eq!(config.api.probe_timeout_ms, 5000);
        assert!(config.ui.show_keys_bar);
    }

    #[test]
    fn first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.polling.poll_interval_ms, 2000);
        let again = Config::load_from(&path).unwrap();
        assert_eq!(again.api.probe_timeout_ms, 5000);
    }
}
