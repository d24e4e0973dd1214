use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_map_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char(' ') => app.toggle_play(),
        KeyCode::Right => app.step_forward(),
        KeyCode::Left => app.step_back(),
        KeyCode::Char('r') => app.reset_timeline(),
        KeyCode::Char(']') => app.faster(),
        KeyCode::Char('[') => app.slower(),
        KeyCode::Char('m') => app.toggle_mode(),
        KeyCode::Char('+' | '=') => app.zoom_in(),
        KeyCode::Char('-') => app.zoom_out(),
        KeyCode::Char('0') => app.reset_zoom(),
        KeyCode::Char('h') => app.pan(-1.0, 0.0),
        KeyCode::Char('l') => app.pan(1.0, 0.0),
        KeyCode::Char('k') => app.pan(0.0, -1.0),
        KeyCode::Char('j') => app.pan(0.0, 1.0),
        KeyCode::Tab => app.hover_next(),
        KeyCode::BackTab => app.hover_prev(),
        KeyCode::Enter => app.pin_hovered(),
        KeyCode::Esc => app.clear_pin(),
        KeyCode::Char('s') => app.open_picker(),
        KeyCode::Backspace => app.selection_back(),
        KeyCode::Char('c') => app.next_chart(),
        _ => {}
    }
}
