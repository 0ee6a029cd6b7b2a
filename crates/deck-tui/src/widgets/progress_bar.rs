//! Smooth Unicode progress bar widget.

use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::theme::{C_BAR_TRACK, C_DOWNLOAD};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Bar text for `percent` over `width` cells, 8 steps per cell.
///
/// The value is passed through as-is: anything above 100 just fills the
/// whole bar, anything below 0 (or NaN) leaves it empty.
pub fn bar_text(percent: f64, width: usize) -> String {
    let cells = width * 8;
    // float -> usize casts saturate, so negatives and NaN land on 0
    let eighths = ((percent / 100.0) * cells as f64) as usize;
    let eighths = eighths.min(cells);
    let full_blocks = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

pub fn progress_line(percent: f64, width: usize) -> Line<'static> {
    Line::from(Span::styled(
        bar_text(percent, width),
        Style::default().fg(C_DOWNLOAD).bg(C_BAR_TRACK),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_is_proportional() {
        assert_eq!(bar_text(0.0, 4), "    ");
        assert_eq!(bar_text(50.0, 4), "██  ");
        assert_eq!(bar_text(100.0, 4), "████");
        assert_eq!(bar_text(12.5, 4), "▌   ");
    }

    #[test]
    fn out_of_range_does_not_overflow() {
        assert_eq!(bar_text(250.0, 4), "████");
        assert_eq!(bar_text(-10.0, 4), "    ");
        assert_eq!(bar_text(f64::NAN, 3), "   ");
        assert_eq!(bar_text(50.0, 0), "");
    }
}
