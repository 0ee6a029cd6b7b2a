//! TextInput: single-line field backed by tui-input.

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_input::{backend::crossterm::EventHandler, Input};

use crate::theme::{style_input, C_MUTED};

pub enum InputAction {
    Changed(String),
    Submitted(String),
    Cancelled,
    None,
}

pub struct TextInput {
    input: Input,
    placeholder: String,
}

impl TextInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            input: Input::default(),
            placeholder: placeholder.into(),
        }
    }

    pub fn clear(&mut self) {
        self.input = Input::default();
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = Input::new(value.to_string());
    }

    pub fn text(&self) -> &str {
        self.input.value()
    }

    /// Enter submits the current text, Esc clears it (or cancels when
    /// already empty), everything else edits.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        match key.code {
            KeyCode::Enter => InputAction::Submitted(self.input.value().to_string()),
            KeyCode::Esc => {
                if self.input.value().is_empty() {
                    InputAction::Cancelled
                } else {
                    self.input = Input::default();
                    InputAction::Changed(String::new())
                }
            }
            _ => match self.input.handle_event(&Event::Key(key)) {
                Some(change) if change.value => {
                    InputAction::Changed(self.input.value().to_string())
                }
                _ => InputAction::None,
            },
        }
    }

    /// Insert pasted text at the cursor. Newlines are dropped.
    pub fn paste(&mut self, text: &str) {
        let cursor = self.input.cursor();
        let value = self.input.value();
        let head: String = value.chars().take(cursor).collect();
        let tail: String = value.chars().skip(cursor).collect();
        let pasted: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let new_cursor = cursor + pasted.chars().count();
        self.input = Input::new(format!("{}{}{}", head, pasted, tail)).with_cursor(new_cursor);
    }

    /// Render into a one-row `area`, placing the terminal cursor when `active`.
    pub fn draw(&self, frame: &mut Frame, area: Rect, active: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let inner_w = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(inner_w);
        let value = self.input.value();
        let span = if value.is_empty() {
            Span::styled(format!(" {}", self.placeholder), Style::default().fg(C_MUTED))
        } else {
            let visible: String = value.chars().skip(scroll).collect();
            Span::raw(format!(" {}", visible))
        };
        frame.render_widget(Paragraph::new(Line::from(span)).style(style_input()), area);

        if active {
            let cursor_x = area.x + 1 + (self.input.visual_cursor().saturating_sub(scroll)) as u16;
            frame.set_cursor_position((cursor_x.min(area.x + area.width - 1), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_submit() {
        let mut input = TextInput::new("url");
        for c in "http://h".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        match input.handle_key(key(KeyCode::Enter)) {
            InputAction::Submitted(v) => assert_eq!(v, "http://h"),
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn esc_clears_then_cancels() {
        let mut input = TextInput::new("url");
        input.set_value("abc");
        assert!(matches!(input.handle_key(key(KeyCode::Esc)), InputAction::Changed(_)));
        assert_eq!(input.text(), "");
        assert!(matches!(input.handle_key(key(KeyCode::Esc)), InputAction::Cancelled));
    }

    #[test]
    fn paste_strips_newlines() {
        let mut input = TextInput::new("url");
        input.paste("https://x.trycloudflare.com\n");
        assert_eq!(input.text(), "https://x.trycloudflare.com");
    }
}
