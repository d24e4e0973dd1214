use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    let searching = app.picker.as_ref().is_some_and(|picker| picker.searching);
    if key == KeyCode::F(1) || (key == KeyCode::Char('?') && !searching) {
        app.toggle_help();
        return true;
    }

    if app.show_help {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return true;
    }

    false
}
