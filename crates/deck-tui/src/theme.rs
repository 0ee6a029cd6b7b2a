//! Color palette and style constants.

use deck_core::protocol::{StateTone, TorrentState};
use ratatui::style::{Color, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(14, 14, 20);
pub const C_ACCENT: Color = Color::Rgb(120, 100, 230);
pub const C_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 230);
pub const C_INPUT_BG: Color = Color::Rgb(20, 20, 32);
pub const C_INPUT_FG: Color = Color::Rgb(230, 230, 240);
pub const C_DOWNLOAD: Color = Color::Rgb(80, 200, 120);
pub const C_UPLOAD: Color = Color::Rgb(90, 150, 235);
pub const C_BAR_TRACK: Color = Color::Rgb(34, 34, 46);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_EDIT: Color = Color::Rgb(255, 200, 80);

// State badge colours
pub const C_STATE_ACTIVE: Color = Color::Rgb(80, 200, 120); // green
pub const C_STATE_MOVING: Color = Color::Rgb(90, 150, 235); // blue
pub const C_STATE_HALTED: Color = Color::Rgb(255, 150, 60); // orange
pub const C_STATE_BUSY: Color = Color::Rgb(240, 210, 80); // yellow
pub const C_STATE_DONE: Color = Color::Rgb(180, 120, 220); // purple
pub const C_STATE_DEFAULT: Color = Color::Rgb(150, 150, 160); // grey

const SPINNER_FRAMES: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Braille spinner glyph for the given UI tick.
pub fn spinner(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

pub fn tone_color(tone: StateTone) -> Color {
    match tone {
        StateTone::Active => C_STATE_ACTIVE,
        StateTone::Moving => C_STATE_MOVING,
        StateTone::Halted => C_STATE_HALTED,
        StateTone::Busy => C_STATE_BUSY,
        StateTone::Done => C_STATE_DONE,
        StateTone::Neutral => C_STATE_DEFAULT,
    }
}

pub fn state_color(state: &TorrentState) -> Color {
    tone_color(state.tone())
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_input() -> Style {
    Style::default().fg(C_INPUT_FG).bg(C_INPUT_BG)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_state_uses_default_color() {
        assert_eq!(state_color(&TorrentState::from("frobnicating")), C_STATE_DEFAULT);
        assert_eq!(state_color(&TorrentState::Downloading), C_STATE_ACTIVE);
        assert_eq!(state_color(&TorrentState::Seeding), C_STATE_ACTIVE);
        assert_eq!(state_color(&TorrentState::Paused), C_STATE_HALTED);
        assert_eq!(state_color(&TorrentState::FetchingMetadata), C_STATE_BUSY);
        assert_eq!(state_color(&TorrentState::MovingToDrive), C_STATE_MOVING);
        assert_eq!(state_color(&TorrentState::Completed), C_STATE_DONE);
    }

    #[test]
    fn spinner_wraps() {
        assert_eq!(spinner(0), spinner(SPINNER_FRAMES.len()));
    }
}
