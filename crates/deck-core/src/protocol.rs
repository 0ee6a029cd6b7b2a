use serde::{Deserialize, Serialize};

/// Health endpoint, answered with `{"status": "running"}` by a live backend.
pub const PATH_HEALTH: &str = "/";
pub const PATH_TORRENTS: &str = "/torrents";
pub const PATH_ADD: &str = "/add";
pub const PATH_CONTROL: &str = "/control";

/// Status token the health endpoint must report for the backend to count as up.
pub const STATUS_RUNNING: &str = "running";

/// The backend accepts at most this many links per add batch.
pub const MAX_BATCH_LINKS: usize = 50;

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_running(&self) -> bool {
        self.status == STATUS_RUNNING
    }
}

/// Body of `POST /add`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddRequest {
    pub link: String,
}

/// Body of `POST /control`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControlRequest {
    pub info_hash: String,
    pub action: ControlAction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Pause,
    Resume,
    Delete,
}

impl ControlAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Delete => "delete",
        }
    }

    /// Title-case label for hints and toasts.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Delete => "Delete",
        }
    }
}

/// Lifecycle phase reported by the backend.
///
/// The client never validates transitions; anything outside the known
/// vocabulary is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TorrentState {
    Downloading,
    Seeding,
    Paused,
    Checking,
    FetchingMetadata,
    MovingToDrive,
    Completed,
    Other(String),
}

/// Colour family a state renders with. The TUI theme maps each to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTone {
    /// downloading, seeding
    Active,
    /// moving_to_drive
    Moving,
    /// paused
    Halted,
    /// checking, fetching_metadata
    Busy,
    /// completed
    Done,
    /// anything unrecognized
    Neutral,
}

impl TorrentState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Downloading => "downloading",
            Self::Seeding => "seeding",
            Self::Paused => "paused",
            Self::Checking => "checking",
            Self::FetchingMetadata => "fetching_metadata",
            Self::MovingToDrive => "moving_to_drive",
            Self::Completed => "completed",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Badge text shown next to the torrent name.
    pub fn label(&self) -> String {
        match self {
            Self::MovingToDrive => "MOVING TO DRIVE...".to_string(),
            Self::Downloading => "DOWNLOADING".to_string(),
            Self::Seeding => "SEEDING".to_string(),
            Self::Paused => "PAUSED".to_string(),
            Self::Checking => "CHECKING".to_string(),
            Self::FetchingMetadata => "METADATA".to_string(),
            Self::Completed => "DONE".to_string(),
            Self::Other(s) => s.to_uppercase(),
        }
    }

    pub fn tone(&self) -> StateTone {
        match self {
            Self::Downloading | Self::Seeding => StateTone::Active,
            Self::MovingToDrive => StateTone::Moving,
            Self::Paused => StateTone::Halted,
            Self::Checking | Self::FetchingMetadata => StateTone::Busy,
            Self::Completed => StateTone::Done,
            Self::Other(_) => StateTone::Neutral,
        }
    }

    /// The non-destructive control offered for this state: resume while
    /// paused or checking, pause otherwise.
    pub fn primary_control(&self) -> ControlAction {
        match self {
            Self::Paused | Self::Checking => ControlAction::Resume,
            _ => ControlAction::Pause,
        }
    }

    /// Every control offered for this state. Delete is always present.
    pub fn controls(&self) -> [ControlAction; 2] {
        [self.primary_control(), ControlAction::Delete]
    }
}

impl From<String> for TorrentState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "downloading" => Self::Downloading,
            "seeding" => Self::Seeding,
            "paused" => Self::Paused,
            "checking" => Self::Checking,
            "fetching_metadata" => Self::FetchingMetadata,
            "moving_to_drive" => Self::MovingToDrive,
            "completed" => Self::Completed,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TorrentState {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<TorrentState> for String {
    fn from(state: TorrentState) -> Self {
        match state {
            TorrentState::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl Default for TorrentState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// One entry of `GET /torrents`. Read-only on this side: each poll replaces
/// the whole list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Torrent {
    #[serde(default)]
    pub name: String,
    /// 0..100
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub state: TorrentState,
    /// Bytes per second.
    #[serde(default)]
    pub download_rate: f64,
    /// Bytes per second.
    #[serde(default)]
    pub upload_rate: f64,
    #[serde(default)]
    pub total_done: f64,
    #[serde(default)]
    pub total_size: f64,
    #[serde(default)]
    pub peers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_hash: Option<String>,
    /// Seconds since the torrent was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<f64>,
}

/// Identity of a torrent across polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TorrentKey {
    Hash(String),
    /// No content identifier; only stable while the backend keeps its order.
    Position(usize),
}

impl Torrent {
    pub fn key(&self, position: usize) -> TorrentKey {
        match self.info_hash.as_deref() {
            Some(h) if !h.is_empty() => TorrentKey::Hash(h.to_string()),
            _ => TorrentKey::Position(position),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Fetching Metadata..."
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_torrent_list() {
        let json = r#"[
            {"name":"ubuntu.iso","progress":42.5,"state":"downloading","download_rate":1048576,
             "upload_rate":0,"total_done":100,"total_size":200,"peers":7,
             "info_hash":"abc","elapsed":61.4},
            {"name":"","progress":0,"state":"fetching_metadata","download_rate":0,
             "upload_rate":0,"total_done":0,"total_size":0,"peers":0}
        ]"#;
        let list: Vec<Torrent> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].state, TorrentState::Downloading);
        assert_eq!(list[0].info_hash.as_deref(), Some("abc"));
        assert_eq!(list[0].elapsed, Some(61.4));
        assert_eq!(list[1].state, TorrentState::FetchingMetadata);
        assert_eq!(list[1].info_hash, None);
        assert_eq!(list[1].display_name(), "Fetching Metadata...");
    }

    #[test]
    fn unknown_state_is_kept_verbatim() {
        let t: Torrent = serde_json::from_str(r#"{"state":"queued_for_upload"}"#).unwrap();
        assert_eq!(t.state, TorrentState::Other("queued_for_upload".to_string()));
        assert_eq!(t.state.label(), "QUEUED_FOR_UPLOAD");
        assert_eq!(t.state.tone(), StateTone::Neutral);
        let back = serde_json::to_value(&t.state).unwrap();
        assert_eq!(back, serde_json::json!("queued_for_upload"));
    }

    #[test]
    fn labels_and_tones_cover_vocabulary() {
        assert_eq!(TorrentState::MovingToDrive.label(), "MOVING TO DRIVE...");
        assert_eq!(TorrentState::FetchingMetadata.label(), "METADATA");
        assert_eq!(TorrentState::Completed.label(), "DONE");
        assert_eq!(TorrentState::Seeding.tone(), StateTone::Active);
        assert_eq!(TorrentState::Paused.tone(), StateTone::Halted);
        assert_eq!(TorrentState::Checking.tone(), StateTone::Busy);
        assert_eq!(TorrentState::Completed.tone(), StateTone::Done);
        assert_eq!(TorrentState::MovingToDrive.tone(), StateTone::Moving);
    }

    #[test]
    fn affordance_follows_state() {
        assert_eq!(
            TorrentState::Paused.controls(),
            [ControlAction::Resume, ControlAction::Delete]
        );
        assert_eq!(
            TorrentState::Checking.primary_control(),
            ControlAction::Resume
        );
        assert_eq!(
            TorrentState::Downloading.controls(),
            [ControlAction::Pause, ControlAction::Delete]
        );
        assert_eq!(
            TorrentState::from("weird").primary_control(),
            ControlAction::Pause
        );
    }

    #[test]
    fn control_request_wire_format() {
        let req = ControlRequest {
            info_hash: "abc".to_string(),
            action: ControlAction::Resume,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"info_hash": "abc", "action": "resume"})
        );
    }

    #[test]
    fn key_falls_back_to_position() {
        let mut t = Torrent::default();
        assert_eq!(t.key(3), TorrentKey::Position(3));
        t.info_hash = Some(String::new());
        assert_eq!(t.key(3), TorrentKey::Position(3));
        t.info_hash = Some("ff".to_string());
        assert_eq!(t.key(3), TorrentKey::Hash("ff".to_string()));
    }
}
