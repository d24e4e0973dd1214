use std::ops::Range;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centred overlay `width_percent` wide and tall enough for `content_rows`
/// plus borders, never larger than `area`.
pub fn overlay_rect(area: Rect, width_percent: u16, content_rows: usize) -> Rect {
    let wanted = u16::try_from(content_rows.saturating_add(2)).unwrap_or(u16::MAX);
    let height = wanted.min(area.height);
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [overlay] = Layout::horizontal([Constraint::Percentage(width_percent.min(100))])
        .flex(Flex::Center)
        .areas(row);
    overlay
}

/// Single row on the bottom border of `area`, used for close hints.
pub const fn footer_row(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: if area.height == 0 { 0 } else { 1 },
    }
}

/// Rows of a list to draw so `selected` stays visible, scrolling only once
/// the selection runs past the last row.
pub fn list_window(total: usize, rows: usize, selected: usize) -> Range<usize> {
    if rows == 0 || total == 0 {
        return 0..0;
    }
    let selected = selected.min(total - 1);
    let start = (selected + 1).saturating_sub(rows);
    start..(start + rows).min(total)
}
