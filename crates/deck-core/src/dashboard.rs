//! Dashboard operations: list reconciliation, batch add, control actions.

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::protocol::{ControlAction, Torrent};

/// What the dashboard can show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// No backend URL; go back to the connect screen.
    Unauthenticated,
    /// URL known, first fetch still outstanding.
    Loading,
    /// At least one fetch succeeded. The list may be empty.
    Ready,
}

/// The displayed torrent list.
///
/// Each successful fetch replaces it whole. A failed fetch leaves it as it
/// was, so a flaky backend shows stale data rather than an empty list.
#[derive(Debug, Default, Clone)]
pub struct TorrentBoard {
    torrents: Vec<Torrent>,
    loaded: bool,
    last_error: Option<String>,
}

impl TorrentBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn torrents(&self) -> &[Torrent] {
        &self.torrents
    }

    pub fn len(&self) -> usize {
        self.torrents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.torrents.is_empty()
    }

    /// Error text of the most recent fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn mode(&self, has_url: bool) -> ViewMode {
        if !has_url {
            ViewMode::Unauthenticated
        } else if self.loaded {
            ViewMode::Ready
        } else {
            ViewMode::Loading
        }
    }

    /// Fold a fetch result in. Returns true when the list was replaced.
    pub fn apply(&mut self, result: Result<Vec<Torrent>, ApiError>) -> bool {
        match result {
            Ok(list) => {
                self.replace(list);
                true
            }
            Err(e) => {
                warn!("poll failed: {}", e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    pub fn replace(&mut self, list: Vec<Torrent>) {
        self.torrents = list;
        self.loaded = true;
        self.last_error = None;
    }

    /// Forget everything, e.g. when switching to another backend.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Split pasted text into links: one per line, trimmed, blanks dropped,
/// at most `limit` kept.
pub fn split_links(raw: &str, limit: usize) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default)]
pub struct AddReport {
    /// Links the backend accepted.
    pub added: Vec<String>,
    /// Links whose request failed, with the error text.
    pub failed: Vec<(String, String)>,
    /// Non-blank lines beyond the batch limit, never sent.
    pub dropped: usize,
    /// Fresh list fetched after the batch; `None` if that fetch failed or
    /// nothing was sent.
    pub refreshed: Option<Vec<Torrent>>,
}

impl AddReport {
    pub fn attempted(&self) -> usize {
        self.added.len() + self.failed.len()
    }
}

/// Add every link in `raw`, one request at a time.
///
/// A failing link is logged and skipped; the rest still go out. Blank input
/// sends nothing. After the batch the list is fetched once; an error there
/// is swallowed since the next scheduled poll catches up.
pub async fn add_links(api: &ApiClient, raw: &str, limit: usize) -> AddReport {
    let total = raw.lines().filter(|l| !l.trim().is_empty()).count();
    let batch = split_links(raw, limit);
    let mut report = AddReport {
        dropped: total.saturating_sub(batch.len()),
        ..AddReport::default()
    };
    if batch.is_empty() {
        return report;
    }
    if report.dropped > 0 {
        warn!("add batch capped at {}, dropping {} links", limit, report.dropped);
    }

    for link in batch {
        match api.add(&link).await {
            Ok(()) => {
                debug!("added {}", link);
                report.added.push(link);
            }
            Err(e) => {
                warn!("failed to add {}: {}", link, e);
                report.failed.push((link, e.to_string()));
            }
        }
    }
    info!(
        "add batch done: {} added, {} failed",
        report.added.len(),
        report.failed.len()
    );

    report.refreshed = api.torrents().await.ok();
    report
}

#[derive(Debug)]
pub struct ControlReport {
    pub action: ControlAction,
    /// Error text when the control request failed.
    pub error: Option<String>,
    /// Result of the follow-up fetch, success or not.
    pub refreshed: Result<Vec<Torrent>, ApiError>,
}

/// Send one control command, then re-fetch regardless of its outcome.
/// `None` when there is no identifier to address.
pub async fn control_action(
    api: &ApiClient,
    info_hash: Option<&str>,
    action: ControlAction,
) -> Option<ControlReport> {
    let hash = info_hash.filter(|h| !h.is_empty())?;
    let error = match api.control(hash, action).await {
        Ok(()) => {
            info!("{} {}", action.as_str(), hash);
            None
        }
        Err(e) => {
            warn!("control {} {} failed: {}", action.as_str(), hash, e);
            Some(e.to_string())
        }
    };
    let refreshed = api.torrents().await;
    Some(ControlReport {
        action,
        error,
        refreshed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TorrentState;
    use reqwest::StatusCode;

    fn torrent(name: &str) -> Torrent {
        Torrent {
            name: name.to_string(),
            state: TorrentState::Downloading,
            ..Torrent::default()
        }
    }

    #[test]
    fn split_drops_blanks_and_trims() {
        assert_eq!(split_links("a\n\nb\n", 50), vec!["a", "b"]);
        assert_eq!(split_links("  a  \r\n\t\n b", 50), vec!["a", "b"]);
        assert!(split_links("\n \n", 50).is_empty());
    }

    #[test]
    fn split_caps_at_limit() {
        let raw: String = (0..75).map(|i| format!("magnet:?xt={}\n", i)).collect();
        let links = split_links(&raw, 50);
        assert_eq!(links.len(), 50);
        assert_eq!(links[0], "magnet:?xt=0");
        assert_eq!(links[49], "magnet:?xt=49");
    }

    #[test]
    fn view_mode_transitions() {
        let mut board = TorrentBoard::new();
        assert_eq!(board.mode(false), ViewMode::Unauthenticated);
        assert_eq!(board.mode(true), ViewMode::Loading);
        board.apply(Ok(vec![]));
        assert_eq!(board.mode(true), ViewMode::Ready);
        assert!(board.is_empty());
    }

    #[test]
    fn failed_poll_keeps_previous_list() {
        let mut board = TorrentBoard::new();
        assert!(board.apply(Ok(vec![torrent("one"), torrent("two")])));
        assert!(!board.apply(Err(ApiError::Status(StatusCode::BAD_GATEWAY))));
        assert_eq!(board.len(), 2);
        assert_eq!(board.torrents()[1].name, "two");
        assert!(board.last_error().is_some());
        assert_eq!(board.mode(true), ViewMode::Ready);

        board.apply(Ok(vec![torrent("three")]));
        assert_eq!(board.len(), 1);
        assert!(board.last_error().is_none());
    }

    #[test]
    fn failure_before_first_success_stays_loading() {
        let mut board = TorrentBoard::new();
        board.apply(Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        assert_eq!(board.mode(true), ViewMode::Loading);
    }
}
