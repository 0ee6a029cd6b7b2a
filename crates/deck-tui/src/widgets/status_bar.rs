//! Status bar: bottom lines with connection state, mode, and keybindings.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::Screen;
use crate::theme::{C_ERROR, C_MODE_EDIT, C_MODE_NORMAL, C_MUTED, C_SECONDARY, C_STATE_ACTIVE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Editing => "EDIT",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Normal => C_MODE_NORMAL,
            Self::Editing => C_MODE_EDIT,
        }
    }
}

/// Draw the log bar: connection dot and the last log line.
pub fn draw_log_bar(frame: &mut Frame, area: Rect, last_log: Option<&str>, connected: bool) {
    let conn_span = if connected {
        Span::styled("●", Style::default().fg(C_STATE_ACTIVE))
    } else {
        Span::styled("○", Style::default().fg(C_ERROR))
    };
    let log_span = Span::styled(last_log.unwrap_or(""), Style::default().fg(C_SECONDARY));
    let line = Line::from(vec![Span::raw(" "), conn_span, Span::raw(" "), log_span]);
    frame.render_widget(Paragraph::new(line), area);
}

fn keys_for(mode: InputMode, screen: Screen) -> &'static str {
    match (mode, screen) {
        (InputMode::Editing, Screen::Connect) => {
            " type backend url  Enter connect  Esc clear  Ctrl+C quit"
        }
        (InputMode::Editing, Screen::Dashboard) => {
            " paste links  Enter new line  Ctrl+S add all  Esc done  Tab next pane"
        }
        (InputMode::Normal, Screen::Connect) => " i edit url  Enter connect  ? help  q quit",
        (InputMode::Normal, Screen::Dashboard) => {
            " ↑↓/jk select  Space pause/resume  d delete  y copy hash  a add  R refresh  c change backend  Tab panes  K keys  ? help  q quit"
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, screen: Screen) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", mode.label()),
            Style::default().fg(mode.color()).add_modifier(Modifier::BOLD),
        ),
        Span::styled(keys_for(mode, screen), Style::default().fg(C_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
