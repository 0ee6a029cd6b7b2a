//! Header: 2-row top bar of the dashboard.
//!
//! Row 1: connection dot, title, backend URL, wall clock.
//! Row 2: storage note and a STALE badge while polls are failing.
//!
//! Not focusable.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    app_state::AppState,
    theme::{C_ERROR, C_MUTED, C_PRIMARY, C_SECONDARY, C_STATE_ACTIVE, C_STATE_HALTED},
};

pub const STORAGE_NOTE: &str = "Storage: Google Drive";
pub const STORAGE_DETAIL: &str = "Auto-sync enabled";

pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let clock = state.now.format("%H:%M:%S  %a %d %b %Y").to_string();
        let left = build_title(state);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(clock.len() as u16 + 1)])
            .split(rows[0]);
        frame.render_widget(Paragraph::new(left), cols[0]);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                clock,
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )))
            .right_aligned(),
            cols[1],
        );

        if rows[1].height > 0 {
            frame.render_widget(Paragraph::new(build_storage(state)), rows[1]);
        }
    }
}

fn build_title(state: &AppState) -> Line<'_> {
    let (dot, dot_color, title) = if state.session.is_connected() {
        ("●", C_STATE_ACTIVE, "Backend Connected")
    } else {
        ("○", C_ERROR, "Backend Unreachable")
    };
    Line::from(vec![
        Span::raw(" "),
        Span::styled(dot, Style::default().fg(dot_color)),
        Span::raw(" "),
        Span::styled(
            title,
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            state.session.url().unwrap_or_default(),
            Style::default().fg(C_MUTED),
        ),
    ])
}

fn build_storage(state: &AppState) -> Line<'_> {
    let mut spans = vec![
        Span::raw("   "),
        Span::styled(STORAGE_NOTE, Style::default().fg(C_SECONDARY)),
        Span::styled(" · ", Style::default().fg(C_MUTED)),
        Span::styled(STORAGE_DETAIL, Style::default().fg(C_MUTED)),
    ];
    if let Some(err) = state.board.last_error() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            " STALE ",
            Style::default().fg(C_STATE_HALTED).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(err, Style::default().fg(C_MUTED)));
    }
    Line::from(spans)
}
