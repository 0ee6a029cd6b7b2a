//! TorrentList component: the "Active Downloads" pane.
//!
//! One bordered card per torrent:
//!   name                                   STATE
//!   1.20 GB / 4.00 GB · 00:12:31               30.0%
//!   ██████████▌
//!   ↓ 2.00 MB/s  ↑ 512 B/s  Peers 14    [space] Pause  [d] Delete

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use deck_core::dashboard::ViewMode;
use deck_core::format::{format_duration, format_progress, format_rate, format_size};
use deck_core::protocol::{ControlAction, Torrent, TorrentState};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{
        spinner, state_color, C_ACCENT, C_DOWNLOAD, C_MUTED, C_PRIMARY, C_SECONDARY,
        C_STATE_HALTED, C_UPLOAD,
    },
    widgets::{
        pane_chrome::{card_block, pane_chrome, Badge},
        progress_bar::progress_line,
        scrollable_list::ScrollableList,
    },
};

/// Rows per card, borders included.
const CARD_HEIGHT: u16 = 6;

pub struct TorrentList {
    pub list: ScrollableList<Torrent>,
}

impl TorrentList {
    pub fn new() -> Self {
        Self {
            list: ScrollableList::new(),
        }
    }

    /// Pull the latest list from the board, keeping the selection on the
    /// same torrent.
    pub fn sync(&mut self, state: &AppState) {
        self.list
            .replace_items(state.board.torrents().to_vec(), |i, t| t.key(i));
    }

    pub fn clear(&mut self) {
        self.list.clear();
    }

    fn control(&self, action: ControlAction) -> Vec<Action> {
        match self.list.selected_item() {
            Some(t) => vec![Action::Control {
                info_hash: t.info_hash.clone(),
                action,
            }],
            None => vec![],
        }
    }
}

/// Truncate `s` to at most `max` display columns, ending with "…" when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left and right spans on one line, padded apart to fill `width`.
fn spread<'a>(mut left: Vec<Span<'a>>, right: Vec<Span<'a>>, width: usize) -> Line<'a> {
    let used: usize = left.iter().chain(right.iter()).map(|s| s.width()).sum();
    left.push(Span::raw(" ".repeat(width.saturating_sub(used))));
    left.extend(right);
    Line::from(left)
}

fn state_badge(state: &TorrentState, tick: usize) -> Span<'static> {
    let text = if *state == TorrentState::MovingToDrive {
        format!("{} {}", spinner(tick), state.label())
    } else {
        state.label()
    };
    Span::styled(
        text,
        Style::default()
            .fg(state_color(state))
            .add_modifier(Modifier::BOLD),
    )
}

fn card_lines(t: &Torrent, width: usize, selected: bool, tick: usize) -> Vec<Line<'static>> {
    let badge = state_badge(&t.state, tick);
    let name_max = width.saturating_sub(badge.width() + 2);
    let name_style = if selected {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(C_SECONDARY).add_modifier(Modifier::BOLD)
    };
    let name = Span::styled(truncate(t.display_name(), name_max), name_style);
    let row1 = spread(vec![name], vec![badge], width);

    let row2 = spread(
        vec![
            Span::styled(
                format!("{} / {}", format_size(t.total_done), format_size(t.total_size)),
                Style::default().fg(C_SECONDARY),
            ),
            Span::styled(" · ", Style::default().fg(C_MUTED)),
            Span::styled(format_duration(t.elapsed), Style::default().fg(C_MUTED)),
        ],
        vec![Span::styled(
            format_progress(t.progress),
            Style::default().fg(C_PRIMARY),
        )],
        width,
    );

    let row3 = progress_line(t.progress, width);

    let [primary, delete] = t.state.controls();
    // every card carries its controls; only the selected one is lit
    let (key_style, label_style) = if selected {
        (Style::default().fg(C_ACCENT), Style::default().fg(C_SECONDARY))
    } else {
        (Style::default().fg(C_MUTED), Style::default().fg(C_MUTED))
    };
    let hints = vec![
        Span::styled("[space] ", key_style),
        Span::styled(primary.label(), label_style),
        Span::styled("  [d] ", key_style),
        Span::styled(delete.label(), label_style),
    ];
    let row4 = spread(
        vec![
            Span::styled(
                format!("↓ {}", format_rate(t.download_rate)),
                Style::default().fg(C_DOWNLOAD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("↑ {}", format_rate(t.upload_rate)),
                Style::default().fg(C_UPLOAD),
            ),
            Span::raw("  "),
            Span::styled(format!("Peers {}", t.peers), Style::default().fg(C_MUTED)),
        ],
        hints,
        width,
    );

    vec![row1, row2, row3, row4]
}

impl Component for TorrentList {
    fn id(&self) -> ComponentId {
        ComponentId::TorrentList
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if key.kind == KeyEventKind::Release {
            return vec![];
        }
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            5
        } else {
            1
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => vec![Action::SelectUp(step)],
            KeyCode::Down | KeyCode::Char('j') => vec![Action::SelectDown(step)],
            KeyCode::PageUp => vec![Action::SelectUp(5)],
            KeyCode::PageDown => vec![Action::SelectDown(5)],
            KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectFirst],
            KeyCode::End | KeyCode::Char('G') => vec![Action::SelectLast],
            KeyCode::Char(' ') | KeyCode::Char('p') => match self.list.selected_item() {
                Some(t) => self.control(t.state.primary_control()),
                None => vec![],
            },
            KeyCode::Char('d') | KeyCode::Delete => self.control(ControlAction::Delete),
            KeyCode::Char('y') => match self
                .list
                .selected_item()
                .and_then(|t| t.info_hash.clone())
                .filter(|h| !h.is_empty())
            {
                Some(hash) => vec![Action::CopyToClipboard(hash)],
                None => vec![],
            },
            KeyCode::Char('R') | KeyCode::Char('r') => vec![Action::Refresh],
            KeyCode::Char('c') => vec![Action::ChangeBackend],
            KeyCode::Char('a') | KeyCode::Char('i') => vec![
                Action::FocusPane(ComponentId::AddPanel),
                Action::StartEditing,
            ],
            _ => vec![],
        }
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        match action {
            Action::SelectUp(n) => self.list.select_up(*n),
            Action::SelectDown(n) => self.list.select_down(*n),
            Action::SelectFirst => self.list.select_first(),
            Action::SelectLast => self.list.select_last(),
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let title = format!("Active Downloads ({})", self.list.len());
        let badge = state.board.last_error().map(|_| Badge {
            text: "STALE",
            color: C_STATE_HALTED,
        });
        let block = pane_chrome(&title, focused, badge);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 || inner.width < 4 {
            return;
        }

        match state.view_mode() {
            ViewMode::Unauthenticated => return,
            ViewMode::Loading => {
                let line = Line::from(vec![
                    Span::styled(spinner(state.tick), Style::default().fg(C_ACCENT)),
                    Span::styled(" Loading torrents...", Style::default().fg(C_SECONDARY)),
                ]);
                frame.render_widget(Paragraph::new(line).centered(), centered_row(inner));
                return;
            }
            ViewMode::Ready if self.list.is_empty() => {
                let line = Line::from(Span::styled(
                    "No active downloads",
                    Style::default().fg(C_MUTED),
                ));
                frame.render_widget(Paragraph::new(line).centered(), centered_row(inner));
                return;
            }
            ViewMode::Ready => {}
        }

        let per_page = ((inner.height / CARD_HEIGHT) as usize).max(1);
        self.list.ensure_visible(per_page);
        let selected = self.list.selected;
        let mut y = inner.y;
        for (idx, torrent) in self.list.visible_items(per_page) {
            let height = CARD_HEIGHT.min((inner.y + inner.height).saturating_sub(y));
            if height < 3 {
                break;
            }
            let card = Rect {
                x: inner.x,
                y,
                width: inner.width,
                height,
            };
            let is_selected = idx == selected;
            let block = card_block(is_selected);
            let body = block.inner(card);
            frame.render_widget(block, card);
            let lines = card_lines(torrent, body.width as usize, is_selected, state.tick);
            frame.render_widget(Paragraph::new(lines), body);
            y += CARD_HEIGHT;
        }
    }
}

fn centered_row(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height / 2,
        width: area.width,
        height: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("ubuntu.iso", 20), "ubuntu.iso");
        assert_eq!(truncate("ubuntu-24.04-desktop-amd64.iso", 10), "ubuntu-24…");
        assert_eq!(truncate("anything", 0), "");
    }

    fn row_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn paused_card_offers_resume() {
        let t = Torrent {
            name: "debian".into(),
            state: TorrentState::Paused,
            info_hash: Some("abc".into()),
            ..Torrent::default()
        };
        for selected in [true, false] {
            let lines = card_lines(&t, 60, selected, 0);
            let last = row_text(&lines[3]);
            assert!(last.contains("Resume"));
            assert!(last.contains("Delete"));
        }
        let first = row_text(&card_lines(&t, 60, true, 0)[0]);
        assert!(first.starts_with("debian"));
        assert!(first.ends_with("PAUSED"));
    }

    #[test]
    fn unselected_downloading_card_offers_pause() {
        let t = Torrent {
            name: "arch".into(),
            state: TorrentState::Downloading,
            ..Torrent::default()
        };
        let lines = card_lines(&t, 60, false, 0);
        let last = row_text(&lines[3]);
        assert!(last.contains("Pause"));
        assert!(last.contains("Delete"));
        assert!(!last.contains("Resume"));
    }

    #[test]
    fn moving_state_gets_spinner() {
        let badge = state_badge(&TorrentState::MovingToDrive, 0);
        assert_eq!(badge.content, format!("{} MOVING TO DRIVE...", spinner(0)));
    }
}
