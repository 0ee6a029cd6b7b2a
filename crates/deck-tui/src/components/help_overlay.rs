//! HelpOverlay component: shortcut reference popped over the dashboard.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PANEL_BORDER, C_PRIMARY, C_SECONDARY},
};

const KEY_COLUMN: usize = 22;
const POPUP_WIDTH: u16 = 64;

/// `BATCH` in a description is replaced with the configured batch limit.
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "connect",
        &[
            ("i", "edit backend url"),
            ("enter", "probe url and open dashboard"),
        ],
    ),
    (
        "torrents",
        &[
            ("↑ / ↓  or  j / k", "move selection"),
            ("home / end  or  g / G", "jump first / last"),
            ("space / p", "pause or resume selected"),
            ("d / del", "delete selected"),
            ("y", "copy info hash"),
            ("r / R", "refresh now"),
            ("c", "change backend"),
        ],
    ),
    (
        "add panel",
        &[
            ("a / i", "focus add panel and start typing"),
            ("ctrl+s", "queue pasted links (max BATCH)"),
            ("esc", "stop editing"),
            ("x", "clear links"),
        ],
    ),
    (
        "ui",
        &[
            ("tab / shift-tab", "focus next / previous pane"),
            ("K", "toggle keys bar"),
            ("?", "toggle this help"),
            ("q / ctrl+c", "quit"),
        ],
    ),
];

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }
}

fn help_lines(max_batch: usize) -> Vec<Line<'static>> {
    let heading = Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled(" keyboard shortcuts", heading))];
    for (title, rows) in SECTIONS {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(" {}", title),
            Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
        )));
        for (key, desc) in rows.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<width$}", key, width = KEY_COLUMN), heading),
                Span::styled(
                    desc.replace("BATCH", &max_batch.to_string()),
                    Style::default().fg(C_SECONDARY),
                ),
            ]));
        }
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        " press ? or esc to close",
        Style::default().fg(C_MUTED),
    )));
    lines
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    /// Swallows every key while open; only the close keys do anything.
    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        let closing = matches!(
            key.code,
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc
        );
        if self.visible && closing && key.kind != KeyEventKind::Release {
            vec![Action::ToggleHelp]
        } else {
            vec![]
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::ToggleHelp) {
            self.toggle();
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }
        let lines = help_lines(state.max_batch_links);
        let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
        let [column] = Layout::horizontal([Constraint::Length(POPUP_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(column);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(C_PANEL_BORDER))
                    .style(Style::default().bg(Color::Rgb(18, 18, 26))),
            ),
            popup,
        );
    }
}
