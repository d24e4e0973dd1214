use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_picker_input(app: &mut App, key: KeyCode) {
    let Some(picker) = app.picker.as_mut() else {
        return;
    };

    if picker.searching {
        match key {
            KeyCode::Esc => {
                picker.searching = false;
                picker.query.clear();
                picker.index = 0;
            }
            KeyCode::Enter => app.choose_picked(),
            KeyCode::Backspace => {
                if !picker.pop_query() {
                    picker.searching = false;
                }
            }
            KeyCode::Up => picker.previous(),
            KeyCode::Down => picker.next(),
            KeyCode::Char(ch) => picker.push_query(ch),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Esc | KeyCode::Char('s') => app.close_picker(),
        KeyCode::Up | KeyCode::Char('k') => picker.previous(),
        KeyCode::Down | KeyCode::Char('j') => picker.next(),
        KeyCode::Char('/') => picker.searching = true,
        KeyCode::Enter => app.choose_picked(),
        KeyCode::Backspace => app.selection_back(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}
