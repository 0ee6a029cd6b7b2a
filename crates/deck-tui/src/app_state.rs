//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it; the App event loop is the only
//! writer.

use chrono::{DateTime, Local};
use deck_core::dashboard::{TorrentBoard, ViewMode};
use deck_core::session::Session;

use crate::action::Screen;
use crate::widgets::status_bar::InputMode;

pub const MAX_LOG_LINES: usize = 200;

pub struct AppState {
    // ── Connection ──────────────────────────────────────────────────────────
    pub session: Session,
    /// URL of the probe in flight, if any.
    pub probing: Option<String>,
    /// Inline message under the URL field after a failed probe.
    pub connect_error: Option<String>,

    // ── Dashboard ───────────────────────────────────────────────────────────
    pub screen: Screen,
    pub board: TorrentBoard,
    /// An add batch is running.
    pub adding: bool,
    pub max_batch_links: usize,

    // ── UI ──────────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    /// Wall clock shown in the dashboard header.
    pub now: DateTime<Local>,
    /// UI tick counter, drives spinners.
    pub tick: usize,
    /// Recent log lines shown in the status row (newest last).
    pub logs: Vec<String>,
}

impl AppState {
    pub fn new(session: Session, max_batch_links: usize) -> Self {
        Self {
            session,
            probing: None,
            connect_error: None,
            screen: Screen::Connect,
            board: TorrentBoard::new(),
            adding: false,
            max_batch_links,
            input_mode: InputMode::Editing,
            now: Local::now(),
            tick: 0,
            logs: Vec::new(),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.board.mode(self.session.url().is_some())
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.last().map(String::as_str)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push(msg.into());
        if self.logs.len() > MAX_LOG_LINES {
            self.logs.remove(0);
        }
    }
}
