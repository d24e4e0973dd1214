pub mod screens;

use crate::app::state::App;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

pub fn handle_input(app: &mut App, key: KeyCode) {
    screens::dispatch_input(app, key);
}

/// Mouse hover, click-to-pin and wheel zoom on the map. Ignored while an
/// overlay is open.
pub fn handle_mouse(app: &mut App, event: MouseEvent) {
    if app.show_help || app.picker.is_some() {
        return;
    }

    match event.kind {
        MouseEventKind::Moved => app.pointer_moved(event.column, event.row),
        MouseEventKind::Down(MouseButton::Left) => app.clicked(event.column, event.row),
        MouseEventKind::ScrollUp => app.scrolled(event.column, event.row, true),
        MouseEventKind::ScrollDown => app.scrolled(event.column, event.row, false),
        _ => {}
    }
}
