//! ConnectScreen component: backend URL entry shown until a probe succeeds.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{spinner, C_ACCENT, C_ERROR, C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::{
        pane_chrome::pane_chrome,
        status_bar::InputMode,
        text_input::{InputAction, TextInput},
    },
};

pub const CONNECT_FAILED: &str = "Cannot connect to Colab. Check URL or ensure Colab is running.";

pub struct ConnectScreen {
    pub input: TextInput,
}

impl ConnectScreen {
    pub fn new() -> Self {
        Self {
            input: TextInput::new("https://cool-tunnel-url.trycloudflare.com"),
        }
    }

    /// Pre-fill the field, e.g. with the saved URL.
    pub fn prefill(&mut self, url: Option<&str>) {
        match url {
            Some(u) => self.input.set_value(u),
            None => self.input.clear(),
        }
    }

    fn submit(&self, state: &AppState) -> Vec<Action> {
        let url = self.input.text().trim();
        if url.is_empty() || state.probing.is_some() {
            return vec![];
        }
        vec![Action::Connect(url.to_string())]
    }
}

impl Component for ConnectScreen {
    fn id(&self) -> ComponentId {
        ComponentId::ConnectScreen
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        if state.input_mode == InputMode::Editing {
            return match self.input.handle_key(key) {
                InputAction::Submitted(_) => self.submit(state),
                InputAction::Cancelled => vec![Action::StopEditing],
                InputAction::Changed(_) | InputAction::None => vec![],
            };
        }
        match key.code {
            KeyCode::Char('i') | KeyCode::Char('a') => vec![Action::StartEditing],
            KeyCode::Enter => self.submit(state),
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

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        if let Action::ChangeBackend = action {
            self.prefill(state.session.url());
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let width = area.width.min(72);
        let height = 11.min(area.height);
        let card = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };
        frame.render_widget(Clear, card);
        let block = pane_chrome("magnetdeck", focused, None);
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(2), // subtitle
                Constraint::Length(1), // input
                Constraint::Length(1),
                Constraint::Min(0), // status
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Connect to your torrent backend",
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
            )))
            .centered(),
            rows[0],
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Enter the public URL printed by the notebook",
                Style::default().fg(C_SECONDARY),
            )))
            .centered(),
            rows[1],
        );

        self.input.draw(
            frame,
            rows[2],
            focused && state.input_mode == InputMode::Editing,
        );

        let status = if let Some(url) = &state.probing {
            Line::from(vec![
                Span::styled(spinner(state.tick), Style::default().fg(C_ACCENT)),
                Span::styled(
                    format!(" Connecting to {}...", url),
                    Style::default().fg(C_SECONDARY),
                ),
            ])
        } else if let Some(err) = &state.connect_error {
            Line::from(Span::styled(err.as_str(), Style::default().fg(C_ERROR)))
        } else {
            Line::from(Span::styled(
                "Enter to connect",
                Style::default().fg(C_MUTED),
            ))
        };
        frame.render_widget(
            Paragraph::new(status).centered().wrap(Wrap { trim: true }),
            rows[4],
        );
    }
}
