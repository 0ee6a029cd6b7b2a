//! AddPanel component: batch link entry plus the info note.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{spinner, C_ACCENT, C_MUTED, C_PRIMARY, C_SECONDARY, C_STATE_HALTED},
    widgets::{
        link_input::LinkInput,
        pane_chrome::{pane_chrome, Badge},
        status_bar::InputMode,
    },
};

pub const REMOTE_FOLDER: &str = "/TorrentDownloads";

pub struct AddPanel {
    pub input: LinkInput,
}

impl AddPanel {
    pub fn new(max_batch_links: usize) -> Self {
        Self {
            input: LinkInput::new(format!(
                "Paste magnet links here (one per line, max {})...",
                max_batch_links
            )),
        }
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    fn submit(&self, state: &AppState) -> Vec<Action> {
        if state.adding || self.input.link_count() == 0 {
            return vec![];
        }
        vec![Action::AddLinks(self.input.text())]
    }
}

impl Component for AddPanel {
    fn id(&self) -> ComponentId {
        ComponentId::AddPanel
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('s')) {
            return self.submit(state);
        }
        if state.input_mode == InputMode::Editing {
            return match key.code {
                KeyCode::Esc => vec![Action::StopEditing],
                KeyCode::Tab => vec![Action::StopEditing, Action::FocusNext],
                KeyCode::BackTab => vec![Action::StopEditing, Action::FocusPrev],
                _ => {
                    self.input.handle_key(key);
                    vec![]
                }
            };
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('a') => {
                vec![Action::StartEditing]
            }
            KeyCode::Char('x') => {
                self.input.clear();
                vec![]
            }
            _ => vec![],
        }
    }

    fn handle_paste(&mut self, text: &str, state: &AppState) -> Vec<Action> {
        self.input.paste(text);
        if state.input_mode == InputMode::Normal {
            vec![Action::StartEditing]
        } else {
            vec![]
        }
    }

    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(6)])
            .split(area);

        let count = self.input.link_count();
        let count_text = format!("{} links", count);
        let over_limit = count > state.max_batch_links;
        let badge = (count > 0).then(|| Badge {
            text: &count_text,
            color: if over_limit { C_STATE_HALTED } else { C_SECONDARY },
        });
        let block = pane_chrome("Add Torrents", focused, badge);
        let inner = block.inner(rows[0]);
        frame.render_widget(block, rows[0]);

        if inner.height >= 2 {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(inner);
            self.input.draw(
                frame,
                parts[0],
                focused && state.input_mode == InputMode::Editing,
            );

            let footer = if state.adding {
                Line::from(vec![
                    Span::styled(spinner(state.tick), Style::default().fg(C_ACCENT)),
                    Span::styled(" Adding...", Style::default().fg(C_SECONDARY)),
                ])
            } else if over_limit {
                Line::from(Span::styled(
                    format!(
                        "Only the first {} links will be queued",
                        state.max_batch_links
                    ),
                    Style::default().fg(C_STATE_HALTED),
                ))
            } else {
                Line::from(vec![
                    Span::styled("[ctrl+s] ", Style::default().fg(C_ACCENT)),
                    Span::styled("Add to Queue", Style::default().fg(C_SECONDARY)),
                ])
            };
            frame.render_widget(Paragraph::new(footer), parts[1]);
        }

        let info = pane_chrome("Info", false, None);
        let info_inner = info.inner(rows[1]);
        frame.render_widget(info, rows[1]);
        let text = vec![Line::from(vec![
            Span::styled(
                "Files are downloaded directly to your Google Drive folder ",
                Style::default().fg(C_MUTED),
            ),
            Span::styled(
                REMOTE_FOLDER,
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                ". Don't close the Colab tab to ensure the backend keeps running.",
                Style::default().fg(C_MUTED),
            ),
        ])];
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }),
            info_inner,
        );
    }
}
