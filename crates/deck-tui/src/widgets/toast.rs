//! Short-lived notices stacked in the top-right corner (add/control
//! outcomes, clipboard).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::theme::{C_TOAST_ERROR, C_TOAST_INFO, C_TOAST_SUCCESS, C_TOAST_WARNING};

const SHOWN: usize = 4;
const QUEUED: usize = SHOWN * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Icon, color and how long the notice stays up.
    fn look(self) -> (&'static str, Color, Duration) {
        match self {
            Self::Info => ("·", C_TOAST_INFO, Duration::from_secs(3)),
            Self::Success => ("✓", C_TOAST_SUCCESS, Duration::from_secs(3)),
            Self::Warning => ("!", C_TOAST_WARNING, Duration::from_secs(4)),
            Self::Error => ("✗", C_TOAST_ERROR, Duration::from_secs(5)),
        }
    }
}

#[derive(Default)]
pub struct ToastManager {
    queue: VecDeque<(String, Severity, Instant)>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repeated message replaces its older copy instead of stacking.
    fn show(&mut self, severity: Severity, message: String) {
        self.queue.retain(|(m, _, _)| *m != message);
        let (_, _, ttl) = severity.look();
        self.queue.push_back((message, severity, Instant::now() + ttl));
        if self.queue.len() > QUEUED {
            self.queue.drain(..self.queue.len() - QUEUED);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(Severity::Info, message.into());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(Severity::Success, message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(Severity::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(Severity::Error, message.into());
    }

    /// Drop expired notices. Called on every UI tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.queue.retain(|(_, _, until)| *until > now);
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        if area.height < 2 {
            return;
        }
        let max_width = (area.width / 2).clamp(30, 60).min(area.width);
        let rows = SHOWN.min(usize::from(area.height - 1));
        let newest_first = self.queue.iter().rev().take(rows);
        for (i, (message, severity, _)) in newest_first.enumerate() {
            let (icon, color, _) = severity.look();
            let text = format!(" {} {} ", icon, message);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX).min(max_width);
            let row = Rect {
                x: area.right().saturating_sub(width + 1),
                y: area.y + 1 + i as u16,
                width,
                height: 1,
            };
            frame.render_widget(Clear, row);
            frame.render_widget(
                Paragraph::new(text)
                    .style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
                row,
            );
        }
    }
}
