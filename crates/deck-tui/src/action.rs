//! Action enum: all user-initiated intents and internal events.

use deck_core::protocol::ControlAction;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    ConnectScreen,
    TorrentList,
    AddPanel,
    HelpOverlay,
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Connect,
    Dashboard,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Connection ───────────────────────────────────────────────────────────
    /// Probe this URL and open the dashboard if it answers.
    Connect(String),
    /// Back to the connect screen; the saved URL is kept.
    ChangeBackend,

    // ── Torrents ─────────────────────────────────────────────────────────────
    /// Raw textarea contents, one link per line.
    AddLinks(String),
    Control {
        info_hash: Option<String>,
        action: ControlAction,
    },
    Refresh,

    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    FocusPrev,
    FocusPane(ComponentId),
    SelectUp(usize),
    SelectDown(usize),
    SelectFirst,
    SelectLast,

    // ── UI toggles ───────────────────────────────────────────────────────────
    StartEditing,
    StopEditing,
    ToggleHelp,
    ToggleKeys,
    CopyToClipboard(String),

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
