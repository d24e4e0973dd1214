use crate::app::state::App;
use crossterm::event::KeyCode;

mod help;
mod map;
mod picker;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if app.picker.is_some() {
        picker::handle_picker_input(app, key);
        return;
    }

    map::handle_map_input(app, key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::LoadedData;
    use crate::config::AppConfig;
    use launch_atlas_core::{LaunchRecord, LaunchStatus, ViewMode};
    use ratatui::layout::Rect;

    fn app() -> App {
        let mut app = App::new(AppConfig::default());
        let records = [(-80.6, 28.6, "Cape Canaveral"), (63.3, 45.9, "Baikonur")]
            .into_iter()
            .map(|(lon, lat, site)| LaunchRecord {
                name: format!("{site} launch"),
                status: LaunchStatus::Successful,
                provider: "Provider".to_string(),
                rocket: "Rocket".to_string(),
                mission: String::new(),
                site: site.to_string(),
                latitude: Some(lat),
                longitude: Some(lon),
                timestamp: String::new(),
                year: 1970,
                month: 1,
            })
            .collect();
        app.apply_loaded(LoadedData {
            records,
            ..LoadedData::default()
        });
        app.set_map_area(Rect::new(0, 0, 80, 30));
        app.refresh();
        app
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            dispatch_input(app, *key);
            app.refresh();
        }
    }

    #[test]
    fn help_swallows_other_keys() {
        let mut app = app();
        press(&mut app, &[KeyCode::F(1), KeyCode::Char('m')]);
        assert!(app.show_help);
        assert_eq!(app.mode, ViewMode::Month);
        press(&mut app, &[KeyCode::Esc]);
        assert!(!app.show_help);
    }

    #[test]
    fn keyboard_hover_and_pin() {
        let mut app = app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Enter]);
        assert_eq!(app.interaction.pinned(), Some("Cape Canaveral"));
        press(&mut app, &[KeyCode::BackTab]);
        assert_eq!(app.interaction.hovered(), Some("Baikonur"));
        assert_eq!(app.tooltip.as_ref().unwrap().key, "Cape Canaveral");
        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.interaction.pinned(), None);
    }

    #[test]
    fn quit_and_mode_keys() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('m')]);
        assert_eq!(app.mode, ViewMode::Year);
        press(&mut app, &[KeyCode::Char('q')]);
        assert!(!app.running);
    }

    #[test]
    fn zoom_keys_change_the_scale() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('+'), KeyCode::Char('+')]);
        assert!(app.zoom.k > 2.0);
        press(&mut app, &[KeyCode::Char('l'), KeyCode::Char('0')]);
        assert!((app.zoom.k - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn picker_captures_typing() {
        let mut app = app();
        press(&mut app, &[KeyCode::Char('s'), KeyCode::Char('/'), KeyCode::Char('q')]);
        assert!(app.running);
        assert_eq!(app.picker.as_ref().unwrap().query, "q");
        press(&mut app, &[KeyCode::Esc, KeyCode::Esc]);
        assert!(app.picker.is_none());
    }
}
