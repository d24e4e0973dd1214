// UI module for launch-atlas
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::Frame;

/// Screen regions of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub header: Rect,
    pub map: Rect,
    /// Map area inside its border, the canvas the markers are drawn on.
    pub map_inner: Rect,
    pub details: Rect,
    pub charts: Rect,
    pub timeline: Rect,
    pub status: Rect,
    pub shortcuts: Rect,
}

/// Splits the terminal area. The event loop calls this before drawing so the
/// app knows where the map canvas is for mouse hit-testing.
pub fn layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Map and side panel
            Constraint::Length(3), // Timeline
            Constraint::Length(1), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(area.inner(Margin::new(1, 0)));

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[1]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(14)])
        .split(body[1]);

    MainLayout {
        header: rows[0],
        map: body[0],
        map_inner: body[0].inner(Margin::new(1, 1)),
        details: side[0],
        charts: side[1],
        timeline: rows[2],
        status: rows[3],
        shortcuts: rows[4],
    }
}

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::main::render_main(app, f, &layout(f.area()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_canvas_sits_inside_the_map_border() {
        let main = layout(Rect::new(0, 0, 120, 40));
        assert_eq!(main.map_inner.x, main.map.x + 1);
        assert_eq!(main.map_inner.y, main.map.y + 1);
        assert_eq!(main.map_inner.width + 2, main.map.width);
        assert!(main.map.width > main.details.width);
        assert_eq!(main.shortcuts.y, 39);
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let main = layout(Rect::new(0, 0, 4, 3));
        assert!(main.map_inner.width <= main.map.width);
    }
}
