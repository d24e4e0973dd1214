use launch_atlas_core::dataset::visible_milestones;
use launch_atlas_core::geometry::Size;
use launch_atlas_core::land::Ring;
use launch_atlas_core::{
    build_frame, hit_test, Era, FrameInput, InteractionState, LaunchRecord, MapFrame,
    MarkerStyle, Milestone, Point, SelectionLevel, SelectionState, Timeline, Tooltip, ViewMode,
    ZoomTransform,
};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, error, info};

use crate::app::actions::LoadedData;
use crate::app::picker::Picker;
use crate::config::AppConfig;

/// Zoom step for keyboard and mouse wheel.
const ZOOM_STEP: f64 = 1.5;
/// Pan step in braille dots.
const PAN_STEP: f64 = 16.0;
const THROBBER_STEP: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTab {
    SuccessRate,
    Providers,
}

impl ChartTab {
    pub const ALL: [Self; 2] = [Self::SuccessRate, Self::Providers];

    pub const fn title(self) -> &'static str {
        match self {
            Self::SuccessRate => "Success rate",
            Self::Providers => "Providers",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::SuccessRate => 0,
            Self::Providers => 1,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::SuccessRate => Self::Providers,
            Self::Providers => Self::SuccessRate,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub load_state: LoadState,
    pub records: Vec<LaunchRecord>,
    pub milestones: Vec<Milestone>,
    pub land: Vec<Ring>,
    pub selection: SelectionState,
    pub timeline: Option<Timeline>,
    pub mode: ViewMode,
    pub interaction: InteractionState,
    pub zoom: ZoomTransform,
    pub frame: Option<MapFrame>,
    pub tooltip: Option<Tooltip>,
    pub style: MarkerStyle,
    /// Inner area of the map block on screen.
    pub map_area: Rect,
    /// Drawing surface of the map in braille dots.
    pub viewport: Size,
    pub picker: Option<Picker>,
    pub show_help: bool,
    pub chart_tab: ChartTab,
    pub status_message: String,
    pub throbber: ThrobberState,
    last_throbber: Instant,
    last_play_tick: Instant,
    dirty: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            running: true,
            mode: config.mode,
            config,
            load_state: LoadState::Loading,
            records: Vec::new(),
            milestones: Vec::new(),
            land: Vec::new(),
            selection: SelectionState::default(),
            timeline: None,
            interaction: InteractionState::default(),
            zoom: ZoomTransform::default(),
            frame: None,
            tooltip: None,
            style: MarkerStyle {
                min_radius: 1.5,
                max_radius: 7.0,
                ..MarkerStyle::default()
            },
            map_area: Rect::default(),
            viewport: Size::default(),
            picker: None,
            show_help: false,
            chart_tab: ChartTab::SuccessRate,
            status_message: String::new(),
            throbber: ThrobberState::default(),
            last_throbber: Instant::now(),
            last_play_tick: Instant::now(),
            dirty: true,
        }
    }

    pub fn apply_loaded(&mut self, data: LoadedData) {
        let unplottable = data
            .records
            .iter()
            .filter(|record| record.coordinates().is_none())
            .count();
        self.records = data.records;
        self.milestones = data.milestones;
        self.land = data.land;
        self.timeline = Timeline::from_records(&self.records);
        if let (Some(timeline), Some(year)) = (self.timeline.as_mut(), self.config.start_year) {
            timeline.jump_to_year(year);
        }
        self.load_state = LoadState::Ready;
        self.status_message = if self.timeline.is_some() {
            format!(
                "Loaded {} launches ({unplottable} without coordinates)",
                self.records.len()
            )
        } else {
            "Dataset is empty".to_string()
        };
        info!(
            records = self.records.len(),
            milestones = self.milestones.len(),
            land_rings = self.land.len(),
            "data ready"
        );
        self.dirty = true;
    }

    pub fn load_failed(&mut self, message: String) {
        error!(error = %message, "dataset load failed");
        self.status_message = format!("Error: {message}");
        self.load_state = LoadState::Failed(message);
    }

    /// Advances the spinner and the playback timer.
    pub fn update(&mut self, now: Instant) {
        if self.load_state == LoadState::Loading
            && now.duration_since(self.last_throbber) >= THROBBER_STEP
        {
            self.throbber.calc_next();
            self.last_throbber = now;
        }

        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };
        if !timeline.is_playing() {
            self.last_play_tick = now;
            return;
        }
        if now.duration_since(self.last_play_tick) >= timeline.tick_interval(self.config.play_tick)
        {
            timeline.tick();
            self.last_play_tick = now;
            self.dirty = true;
            if !timeline.is_playing() {
                self.status_message = "Reached the end of the timeline".to_string();
            }
        }
    }

    /// Records the map's screen area; a size change invalidates the frame.
    pub fn set_map_area(&mut self, area: Rect) {
        let viewport = Size::new(f64::from(area.width) * 2.0, f64::from(area.height) * 4.0);
        self.map_area = area;
        if viewport != self.viewport {
            self.viewport = viewport;
            self.zoom.pan(0.0, 0.0, viewport);
            self.dirty = true;
        }
    }

    /// Rebuilds the map frame and tooltip if anything they depend on changed.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let Some(timeline) = self.timeline.as_ref() else {
            self.frame = None;
            self.tooltip = None;
            return;
        };
        let frame = build_frame(&FrameInput {
            records: &self.records,
            selection: &self.selection,
            current: timeline.current(),
            mode: self.mode,
            viewport: self.viewport,
            zoom: self.zoom,
            style: self.style,
        });
        if let Some(hovered) = self.interaction.hovered().map(str::to_string) {
            if frame.marker(&hovered).is_none() {
                self.interaction.pointer_leave(&hovered);
            }
        }
        self.tooltip = self.interaction.tooltip(&frame);
        self.frame = Some(frame);
    }

    pub fn visible_milestones(&self) -> Vec<&Milestone> {
        self.timeline.as_ref().map_or_else(Vec::new, |timeline| {
            visible_milestones(&self.milestones, timeline.current().year())
        })
    }

    fn with_timeline(&mut self, action: impl FnOnce(&mut Timeline)) {
        if let Some(timeline) = self.timeline.as_mut() {
            action(timeline);
            self.dirty = true;
        }
    }

    pub fn toggle_play(&mut self) {
        self.with_timeline(Timeline::toggle_play);
        self.last_play_tick = Instant::now();
    }

    pub fn step_forward(&mut self) {
        self.with_timeline(|timeline| {
            timeline.pause();
            timeline.step_forward();
        });
    }

    pub fn step_back(&mut self) {
        self.with_timeline(|timeline| {
            timeline.pause();
            timeline.step_back();
        });
    }

    pub fn reset_timeline(&mut self) {
        self.with_timeline(Timeline::reset);
    }

    pub fn faster(&mut self) {
        self.with_timeline(Timeline::faster);
    }

    pub fn slower(&mut self) {
        self.with_timeline(Timeline::slower);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.status_message = format!("{} view", self.mode.label());
        self.dirty = true;
    }

    fn viewport_centre(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    pub fn zoom_in(&mut self) {
        let centre = self.viewport_centre();
        self.zoom_at(ZOOM_STEP, centre);
    }

    pub fn zoom_out(&mut self) {
        let centre = self.viewport_centre();
        self.zoom_at(1.0 / ZOOM_STEP, centre);
    }

    pub fn zoom_at(&mut self, factor: f64, focus: Point) {
        self.zoom.zoom_at(factor, focus, self.viewport);
        self.dirty = true;
    }

    /// Pans by whole steps; positive `dx` reveals more to the east.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.zoom.pan(-dx * PAN_STEP, -dy * PAN_STEP, self.viewport);
        self.dirty = true;
    }

    pub fn reset_zoom(&mut self) {
        self.zoom.reset();
        self.dirty = true;
    }

    pub fn hover_next(&mut self) {
        if let Some(frame) = self.frame.as_ref() {
            self.interaction.hover_next(frame);
            self.dirty = true;
        }
    }

    pub fn hover_prev(&mut self) {
        if let Some(frame) = self.frame.as_ref() {
            self.interaction.hover_prev(frame);
            self.dirty = true;
        }
    }

    pub fn pin_hovered(&mut self) {
        self.interaction.pin_hovered();
        self.dirty = true;
    }

    pub fn clear_pin(&mut self) {
        self.interaction.click_outside();
        self.dirty = true;
    }

    /// Converts a terminal cell to a map-space point, if it is on the map.
    pub fn map_point(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.map_area;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }
        let screen = Point::new(
            f64::from(column - area.x) * 2.0 + 1.0,
            f64::from(row - area.y) * 4.0 + 2.0,
        );
        Some(self.zoom.invert(screen))
    }

    fn marker_at(&self, column: u16, row: u16) -> Option<String> {
        let point = self.map_point(column, row)?;
        let frame = self.frame.as_ref()?;
        hit_test(point, &frame.markers).map(|marker| marker.key.clone())
    }

    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        let key = self.marker_at(column, row);
        if key.as_deref() != self.interaction.hovered() {
            self.interaction.pointer_move(key.as_deref());
            self.dirty = true;
        }
    }

    pub fn clicked(&mut self, column: u16, row: u16) {
        match self.marker_at(column, row) {
            Some(key) => self.interaction.click(&key),
            None => self.interaction.click_outside(),
        }
        self.dirty = true;
    }

    pub fn scrolled(&mut self, column: u16, row: u16, zoom_in: bool) {
        if self.map_point(column, row).is_none() {
            return;
        }
        let area = self.map_area;
        let focus = Point::new(
            f64::from(column - area.x) * 2.0,
            f64::from(row - area.y) * 4.0,
        );
        let factor = if zoom_in { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.zoom_at(factor, focus);
    }

    pub fn open_picker(&mut self) {
        let level = self.selection.next_level();
        let options = match level {
            SelectionLevel::Era => Era::ALL.iter().map(|era| era.label().to_string()).collect(),
            SelectionLevel::Provider => self.selection.providers(&self.records),
            SelectionLevel::Rocket => self.selection.rockets(&self.records),
        };
        debug!(?level, options = options.len(), "picker opened");
        self.picker = Some(Picker::new(level, options));
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Applies the highlighted picker entry and moves to the next level.
    pub fn choose_picked(&mut self) {
        let Some(picker) = self.picker.as_ref() else {
            return;
        };
        let Some(choice) = picker.selected().map(str::to_string) else {
            return;
        };
        let level = picker.level;

        let result = match level {
            SelectionLevel::Era => {
                if let Some(era) = Era::ALL.into_iter().find(|era| era.label() == choice) {
                    self.select_era(era);
                }
                Ok(())
            }
            SelectionLevel::Provider => self.selection.set_provider(choice),
            SelectionLevel::Rocket => self.selection.set_rocket(choice),
        };
        self.dirty = true;

        match result {
            Ok(()) => {
                self.status_message = self.selection.breadcrumb();
                if level == SelectionLevel::Rocket {
                    self.close_picker();
                } else {
                    self.open_picker();
                }
            }
            Err(e) => {
                self.status_message = format!("Error: {e}");
            }
        }
    }

    /// Sets the era and, if the timeline is outside it, jumps to its start.
    pub fn select_era(&mut self, era: Era) {
        self.selection.set_era(era);
        if let Some(timeline) = self.timeline.as_mut() {
            if !era.contains(timeline.current().year()) {
                timeline.jump_to_year(era.years().0);
            }
        }
        self.dirty = true;
    }

    /// Goes up one drill-down level and reopens the picker there.
    pub fn selection_back(&mut self) {
        if self.selection.back() {
            self.dirty = true;
            self.status_message = self.selection.breadcrumb();
        }
        self.open_picker();
    }

    pub fn next_chart(&mut self) {
        self.chart_tab = self.chart_tab.next();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_atlas_core::LaunchStatus;

    fn launch(site: &str, lon: f64, lat: f64, year: u32, month: u32) -> LaunchRecord {
        LaunchRecord {
            name: format!("{site} {year}"),
            status: LaunchStatus::Successful,
            provider: "NASA".to_string(),
            rocket: "Saturn V".to_string(),
            mission: String::new(),
            site: site.to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            timestamp: String::new(),
            year,
            month,
        }
    }

    fn ready_app() -> App {
        let mut app = App::new(AppConfig::default());
        app.apply_loaded(LoadedData {
            records: vec![
                launch("Cape Canaveral", -80.6, 28.6, 1969, 7),
                launch("Baikonur", 63.3, 45.9, 1975, 7),
                launch("Vandenberg", -120.6, 34.7, 1998, 2),
            ],
            ..LoadedData::default()
        });
        app.set_map_area(Rect::new(0, 0, 100, 40));
        app.refresh();
        app
    }

    #[test]
    fn loading_builds_the_first_frame() {
        let app = ready_app();
        assert_eq!(app.load_state, LoadState::Ready);
        let frame = app.frame.as_ref().unwrap();
        assert_eq!(frame.markers.len(), 1);
        assert_eq!(frame.markers[0].key, "Cape Canaveral");
    }

    #[test]
    fn playback_stops_at_the_end() {
        let mut app = ready_app();
        app.config.play_tick = Duration::from_millis(1);
        app.toggle_play();
        let mut now = Instant::now();
        for _ in 0..400 {
            now += Duration::from_millis(10);
            app.update(now);
        }
        let timeline = app.timeline.as_ref().unwrap();
        assert!(!timeline.is_playing());
        assert_eq!(timeline.current(), timeline.max());
    }

    #[test]
    fn choosing_an_era_jumps_into_it() {
        let mut app = ready_app();
        app.select_era(Era::PostSoviet);
        assert_eq!(app.timeline.as_ref().unwrap().current().year(), 1992);

        app.select_era(Era::SpaceRace);
        assert_eq!(app.timeline.as_ref().unwrap().current().year(), 1969);
    }

    #[test]
    fn picker_drills_down_and_back_up() {
        let mut app = ready_app();
        app.open_picker();
        app.choose_picked();
        assert_eq!(app.selection.era(), Some(Era::SpaceRace));
        assert_eq!(app.picker.as_ref().unwrap().level, SelectionLevel::Provider);

        app.choose_picked();
        assert_eq!(app.selection.provider(), Some("NASA"));
        app.choose_picked();
        assert_eq!(app.selection.rocket(), Some("Saturn V"));
        assert!(app.picker.is_none());

        app.selection_back();
        assert_eq!(app.selection.rocket(), None);
        assert_eq!(app.picker.as_ref().unwrap().level, SelectionLevel::Rocket);
    }

    #[test]
    fn clicking_a_marker_pins_it() {
        let mut app = ready_app();
        let marker = app.frame.as_ref().unwrap().markers[0].clone();
        let screen = app.zoom.apply(marker.position);
        let column = (screen.x / 2.0) as u16;
        let row = (screen.y / 4.0) as u16;

        app.clicked(column, row);
        app.refresh();
        assert_eq!(app.interaction.pinned(), Some("Cape Canaveral"));
        assert_eq!(app.tooltip.as_ref().unwrap().key, "Cape Canaveral");

        app.clicked(0, 39);
        app.refresh();
        assert_eq!(app.interaction.pinned(), None);
        assert!(app.tooltip.is_none());
    }

    #[test]
    fn failed_load_keeps_the_ui_running() {
        let mut app = App::new(AppConfig::default());
        app.load_failed("no such file".to_string());
        app.refresh();
        assert!(app.running);
        assert!(app.frame.is_none());
        assert!(app.status_message.starts_with("Error"));
    }

    #[test]
    fn points_off_the_map_are_ignored() {
        let mut app = ready_app();
        app.set_map_area(Rect::new(10, 5, 50, 20));
        assert!(app.map_point(5, 5).is_none());
        assert!(app.map_point(10, 5).is_some());
        assert!(app.map_point(60, 10).is_none());
    }
}
