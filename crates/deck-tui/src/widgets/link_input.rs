//! LinkInput: multi-line text area for pasting a batch of links.
//!
//! Each row is its own `tui_input::Input`; only the row under the cursor
//! takes keystrokes. Enter splits the row, Backspace at column 0 joins it
//! with the row above.

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

pub struct LinkInput {
    rows: Vec<Input>,
    row: usize,
    scroll: usize,
    placeholder: String,
}

fn split_at_char(s: &str, idx: usize) -> (String, String) {
    let head: String = s.chars().take(idx).collect();
    let tail: String = s.chars().skip(idx).collect();
    (head, tail)
}

impl LinkInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            rows: vec![Input::default()],
            row: 0,
            scroll: 0,
            placeholder: placeholder.into(),
        }
    }

    /// Full text, rows joined with `\n`.
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|r| r.value())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|r| r.value().is_empty())
    }

    /// Number of non-blank rows.
    pub fn link_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| !r.value().trim().is_empty())
            .count()
    }

    pub fn clear(&mut self) {
        self.rows = vec![Input::default()];
        self.row = 0;
        self.scroll = 0;
    }

    /// (row, column) of the cursor, column in chars.
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.rows[self.row].cursor())
    }

    fn move_to_row(&mut self, target: usize) {
        let col = self.rows[self.row].cursor();
        self.row = target;
        let value = self.rows[target].value().to_string();
        let len = value.chars().count();
        self.rows[target] = Input::new(value).with_cursor(col.min(len));
    }

    fn split_row(&mut self) {
        let current = &self.rows[self.row];
        let (head, tail) = split_at_char(current.value(), current.cursor());
        self.rows[self.row] = Input::new(head);
        self.rows.insert(self.row + 1, Input::new(tail).with_cursor(0));
        self.row += 1;
    }

    fn join_with_previous(&mut self) {
        let current = self.rows.remove(self.row);
        self.row -= 1;
        let prev = self.rows[self.row].value().to_string();
        let col = prev.chars().count();
        self.rows[self.row] = Input::new(format!("{}{}", prev, current.value())).with_cursor(col);
    }

    fn join_with_next(&mut self) {
        let next = self.rows.remove(self.row + 1);
        let current = &self.rows[self.row];
        let col = current.cursor();
        self.rows[self.row] =
            Input::new(format!("{}{}", current.value(), next.value())).with_cursor(col);
    }

    /// Returns true when the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                self.split_row();
                true
            }
            KeyCode::Up if self.row > 0 => {
                self.move_to_row(self.row - 1);
                false
            }
            KeyCode::Down if self.row + 1 < self.rows.len() => {
                self.move_to_row(self.row + 1);
                false
            }
            KeyCode::Backspace if self.rows[self.row].cursor() == 0 && self.row > 0 => {
                self.join_with_previous();
                true
            }
            KeyCode::Delete
                if self.row + 1 < self.rows.len()
                    && self.rows[self.row].cursor()
                        == self.rows[self.row].value().chars().count() =>
            {
                self.join_with_next();
                true
            }
            _ => self.rows[self.row]
                .handle_event(&Event::Key(key))
                .is_some_and(|change| change.value),
        }
    }

    /// Insert `text` at the cursor; embedded newlines start new rows.
    pub fn paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        let current = &self.rows[self.row];
        let (head, tail) = split_at_char(current.value(), current.cursor());

        let mut pieces = normalized.split('\n');
        let first = pieces.next().unwrap_or_default();
        let mut new_rows = vec![format!("{}{}", head, first)];
        new_rows.extend(pieces.map(str::to_string));

        let last = new_rows.len() - 1;
        let col = new_rows[last].chars().count();
        new_rows[last].push_str(&tail);

        let inputs: Vec<Input> = new_rows.into_iter().map(Input::new).collect();
        self.rows.splice(self.row..=self.row, inputs);
        self.row += last;
        let value = self.rows[self.row].value().to_string();
        self.rows[self.row] = Input::new(value).with_cursor(col);
    }

    /// Render into `area`. Shows the placeholder when empty and places the
    /// terminal cursor when `active`.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, active: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let height = area.height as usize;
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + height {
            self.scroll = self.row + 1 - height;
        }

        let inner_w = area.width.saturating_sub(1) as usize;
        let h_scroll = self.rows[self.row].visual_scroll(inner_w);

        let lines: Vec<Line> = if self.is_empty() && self.rows.len() == 1 {
            vec![Line::from(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(C_MUTED),
            ))]
        } else {
            self.rows
                .iter()
                .enumerate()
                .skip(self.scroll)
                .take(height)
                .map(|(i, r)| {
                    let skip = if i == self.row { h_scroll } else { 0 };
                    Line::from(r.value().chars().skip(skip).collect::<String>())
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(lines).style(style_input()), area);

        if active {
            let visual = self.rows[self.row].visual_cursor().saturating_sub(h_scroll);
            let x = area.x + (visual as u16).min(area.width.saturating_sub(1));
            let y = area.y + (self.row - self.scroll) as u16;
            frame.set_cursor_position((x, y));
        }
    }
}
