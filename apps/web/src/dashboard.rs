use std::time::Duration;

use launch_atlas_core::dataset::{parse_launches, parse_milestones, visible_milestones};
use launch_atlas_core::{
    build_frame, hit_test, Era, FrameInput, InteractionState, LaunchRecord, MapFrame, MarkerStyle,
    Milestone, Point, SelectionState, Size, Timeline, Tooltip, ViewMode, ZoomTransform,
};

use crate::animation::PlaybackClock;

const BASE_TICK: Duration = Duration::from_millis(400);
const ZOOM_STEP: f64 = 1.5;
const PAN_STEP: f64 = 16.0;
pub const CHART_TABS: [&str; 2] = ["Success rate", "Providers"];

/// Keyboard actions understood by the dashboard.
#[derive(Debug)]
pub enum Command {
    TogglePlay,
    StepForward,
    StepBack,
    Reset,
    Faster,
    Slower,
    ToggleMode,
    NextEra,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Pan(f64, f64),
    HoverNext,
    HoverPrev,
    Pin,
    ClearPin,
    NextChart,
}

/// Map canvas position in terminal cells, recorded on every draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellArea {
    const fn contains(self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && column < self.x.saturating_add(self.width)
            && row < self.y.saturating_add(self.height)
    }
}

/// Everything the browser dashboard needs between frames.
#[derive(Debug)]
pub struct Dashboard {
    pub records: Vec<LaunchRecord>,
    pub milestones: Vec<Milestone>,
    pub timeline: Option<Timeline>,
    pub selection: SelectionState,
    pub mode: ViewMode,
    pub zoom: ZoomTransform,
    pub interaction: InteractionState,
    pub frame: Option<MapFrame>,
    pub tooltip: Option<Tooltip>,
    pub viewport: Size,
    pub chart_tab: usize,
    pub error: Option<String>,
    pub loaded: bool,
    map_cells: CellArea,
    grid: (u16, u16),
    clock: PlaybackClock,
    era_index: Option<usize>,
    dirty: bool,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            milestones: Vec::new(),
            timeline: None,
            selection: SelectionState::default(),
            mode: ViewMode::Month,
            zoom: ZoomTransform::default(),
            interaction: InteractionState::default(),
            frame: None,
            tooltip: None,
            viewport: Size::default(),
            chart_tab: 0,
            error: None,
            loaded: false,
            map_cells: CellArea::default(),
            grid: (0, 0),
            clock: PlaybackClock::default(),
            era_index: None,
            dirty: true,
        }
    }
}

impl Dashboard {
    pub fn load_launches(&mut self, json: &str) {
        match parse_launches(json) {
            Ok(records) => {
                self.timeline = Timeline::from_records(&records);
                self.records = records;
                self.loaded = true;
                self.dirty = true;
            }
            Err(error) => self.fail(format!("launches.json: {error}")),
        }
    }

    /// The milestone feed is optional; a bad file leaves it empty.
    pub fn load_milestones(&mut self, json: &str) -> Result<(), String> {
        let milestones = parse_milestones(json).map_err(|error| error.to_string())?;
        self.milestones = milestones;
        Ok(())
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
        self.loaded = true;
    }

    pub fn visible_milestones(&self) -> Vec<&Milestone> {
        self.timeline.as_ref().map_or_else(Vec::new, |timeline| {
            visible_milestones(&self.milestones, timeline.current().year())
        })
    }

    /// Advances playback from the animation-frame clock.
    pub fn tick(&mut self, now_seconds: f64) {
        let Some(timeline) = self.timeline.as_mut() else {
            return;
        };
        let interval = timeline.tick_interval(BASE_TICK).as_secs_f64();
        let ticks = self
            .clock
            .advance(now_seconds, timeline.is_playing(), interval);
        for _ in 0..ticks {
            timeline.tick();
            self.dirty = true;
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePlay => self.with_timeline(Timeline::toggle_play),
            Command::StepForward => self.with_timeline(|timeline| {
                timeline.pause();
                timeline.step_forward();
            }),
            Command::StepBack => self.with_timeline(|timeline| {
                timeline.pause();
                timeline.step_back();
            }),
            Command::Reset => self.with_timeline(Timeline::reset),
            Command::Faster => self.with_timeline(Timeline::faster),
            Command::Slower => self.with_timeline(Timeline::slower),
            Command::ToggleMode => self.mode = self.mode.toggled(),
            Command::NextEra => self.next_era(),
            Command::ZoomIn => self.zoom_centred(ZOOM_STEP),
            Command::ZoomOut => self.zoom_centred(1.0 / ZOOM_STEP),
            Command::ResetZoom => self.zoom.reset(),
            Command::Pan(dx, dy) => {
                self.zoom
                    .pan(-dx * PAN_STEP, -dy * PAN_STEP, self.viewport);
            }
            Command::HoverNext => {
                if let Some(frame) = self.frame.as_ref() {
                    self.interaction.hover_next(frame);
                }
            }
            Command::HoverPrev => {
                if let Some(frame) = self.frame.as_ref() {
                    self.interaction.hover_prev(frame);
                }
            }
            Command::Pin => self.interaction.pin_hovered(),
            Command::ClearPin => self.interaction.click_outside(),
            Command::NextChart => self.chart_tab = (self.chart_tab + 1) % CHART_TABS.len(),
        }
        self.dirty = true;
    }

    fn with_timeline(&mut self, action: impl FnOnce(&mut Timeline)) {
        if let Some(timeline) = self.timeline.as_mut() {
            action(timeline);
        }
    }

    fn zoom_centred(&mut self, factor: f64) {
        let centre = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        self.zoom.zoom_at(factor, centre, self.viewport);
    }

    /// Cycles All eras → each era → All eras.
    fn next_era(&mut self) {
        let next = self.era_index.map_or(0, |index| index + 1);
        match Era::from_index(next) {
            Some(era) => {
                self.era_index = Some(next);
                self.selection.set_era(era);
                if let Some(timeline) = self.timeline.as_mut() {
                    if !era.contains(timeline.current().year()) {
                        timeline.jump_to_year(era.years().0);
                    }
                }
            }
            None => {
                self.era_index = None;
                self.selection.clear_era();
            }
        }
    }

    /// Records where the map was drawn and how large the cell grid is, so
    /// pointer positions can be mapped back onto markers.
    pub fn set_layout(&mut self, map_cells: CellArea, columns: u16, rows: u16) {
        self.map_cells = map_cells;
        self.grid = (columns, rows);
    }

    /// Terminal cell under a pixel position on a page of `page_width` by
    /// `page_height` pixels. The DOM grid fills the page.
    pub fn cell_at(
        &self,
        x: f64,
        y: f64,
        page_width: f64,
        page_height: f64,
    ) -> Option<(u16, u16)> {
        let (columns, rows) = self.grid;
        if columns == 0 || rows == 0 || page_width <= 0.0 || page_height <= 0.0 {
            return None;
        }
        if !(0.0..page_width).contains(&x) || !(0.0..page_height).contains(&y) {
            return None;
        }
        let column = (x / page_width * f64::from(columns)).floor();
        let row = (y / page_height * f64::from(rows)).floor();
        Some((column as u16, row as u16))
    }

    /// Converts a terminal cell to a map-space point, if it is on the map.
    fn map_point(&self, column: u16, row: u16) -> Option<Point> {
        let area = self.map_cells;
        if !area.contains(column, row) {
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

    /// Wheel zoom centred on the pointer. Ignored off the map.
    pub fn scrolled(&mut self, column: u16, row: u16, zoom_in: bool) {
        if self.map_point(column, row).is_none() {
            return;
        }
        let area = self.map_cells;
        let focus = Point::new(
            f64::from(column - area.x) * 2.0,
            f64::from(row - area.y) * 4.0,
        );
        let factor = if zoom_in { ZOOM_STEP } else { 1.0 / ZOOM_STEP };
        self.zoom.zoom_at(factor, focus, self.viewport);
        self.dirty = true;
    }

    /// Rebuilds the frame for a map of `viewport` braille dots if anything
    /// changed since the last call.
    pub fn refresh(&mut self, viewport: Size) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.zoom.pan(0.0, 0.0, viewport);
            self.dirty = true;
        }
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
            viewport,
            zoom: self.zoom,
            style: MarkerStyle {
                min_radius: 1.5,
                max_radius: 7.0,
                ..MarkerStyle::default()
            },
        });
        if let Some(hovered) = self.interaction.hovered().map(str::to_string) {
            if frame.marker(&hovered).is_none() {
                self.interaction.pointer_leave(&hovered);
            }
        }
        self.tooltip = self.interaction.tooltip(&frame);
        self.frame = Some(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAUNCHES: &str = r#"[
        {"name": "Sputnik 1", "status": "Launch Successful", "provider": "OKB-1",
         "rocket": "Sputnik 8K71PS", "site": "Baikonur", "latitude": 45.9,
         "longitude": 63.3, "date": "1957-10-04T19:28:34Z"},
        {"name": "Vanguard TV3", "status": "Launch Failure", "provider": "US Navy",
         "rocket": "Vanguard", "site": "Cape Canaveral", "latitude": 28.5,
         "longitude": -80.6, "date": "1957-12-06T16:44:35Z"},
        {"name": "Falcon 1 Flight 4", "status": "Launch Successful", "provider": "SpaceX",
         "rocket": "Falcon 1", "site": "Omelek", "latitude": 9.05,
         "longitude": 167.7, "date": "2008-09-28T23:15:00Z"}
    ]"#;

    fn loaded() -> Dashboard {
        let mut dashboard = Dashboard::default();
        dashboard.load_launches(LAUNCHES);
        dashboard.refresh(Size::new(160.0, 80.0));
        dashboard
    }

    #[test]
    fn loading_starts_at_the_first_month() {
        let dashboard = loaded();
        assert!(dashboard.error.is_none());
        let frame = dashboard.frame.as_ref().unwrap();
        assert_eq!(frame.markers.len(), 1);
        assert_eq!(frame.markers[0].key, "Baikonur");
    }

    #[test]
    fn bad_json_reports_an_error() {
        let mut dashboard = Dashboard::default();
        dashboard.load_launches("{\"not\": \"an array\"}");
        assert!(dashboard.loaded);
        assert!(dashboard.error.as_deref().unwrap().starts_with("launches.json"));
        dashboard.refresh(Size::new(160.0, 80.0));
        assert!(dashboard.frame.is_none());
    }

    #[test]
    fn playback_follows_the_frame_clock() {
        let mut dashboard = loaded();
        dashboard.apply(Command::TogglePlay);
        dashboard.tick(0.0);
        dashboard.tick(0.2);
        dashboard.tick(0.41);
        let current = dashboard.timeline.as_ref().unwrap().current();
        assert_eq!(current.to_string(), "1957-11");
    }

    #[test]
    fn era_cycle_jumps_into_the_era_and_back_out() {
        let mut dashboard = loaded();
        dashboard.apply(Command::NextEra);
        assert_eq!(dashboard.selection.era(), Some(Era::SpaceRace));
        dashboard.apply(Command::NextEra);
        dashboard.apply(Command::NextEra);
        assert_eq!(dashboard.selection.era(), Some(Era::PostSoviet));
        assert_eq!(dashboard.timeline.as_ref().unwrap().current().year(), 1992);
        dashboard.apply(Command::NextEra);
        dashboard.apply(Command::NextEra);
        assert_eq!(dashboard.selection.era(), None);
    }

    #[test]
    fn keyboard_pin_shows_an_expanded_tooltip() {
        let mut dashboard = loaded();
        dashboard.apply(Command::HoverNext);
        dashboard.apply(Command::Pin);
        dashboard.refresh(Size::new(160.0, 80.0));
        let tooltip = dashboard.tooltip.as_ref().unwrap();
        assert_eq!(tooltip.key, "Baikonur");
        assert_eq!(tooltip.kind, launch_atlas_core::TooltipKind::Expanded);
    }

    fn with_map(mut dashboard: Dashboard) -> Dashboard {
        dashboard.set_layout(
            CellArea {
                x: 2,
                y: 3,
                width: 80,
                height: 20,
            },
            100,
            40,
        );
        dashboard.refresh(Size::new(160.0, 80.0));
        dashboard
    }

    fn marker_cell(dashboard: &Dashboard) -> (u16, u16) {
        let marker = &dashboard.frame.as_ref().unwrap().markers[0];
        let screen = dashboard.zoom.apply(marker.position);
        (2 + (screen.x / 2.0) as u16, 3 + (screen.y / 4.0) as u16)
    }

    #[test]
    fn pixels_map_to_grid_cells() {
        let dashboard = with_map(loaded());
        assert_eq!(dashboard.cell_at(0.0, 0.0, 1000.0, 800.0), Some((0, 0)));
        assert_eq!(dashboard.cell_at(995.0, 795.0, 1000.0, 800.0), Some((99, 39)));
        assert_eq!(dashboard.cell_at(1000.0, 10.0, 1000.0, 800.0), None);
        assert_eq!(Dashboard::default().cell_at(5.0, 5.0, 1000.0, 800.0), None);
    }

    #[test]
    fn pointer_hovers_and_clicks_pin_markers() {
        let mut dashboard = with_map(loaded());
        let (column, row) = marker_cell(&dashboard);

        dashboard.pointer_moved(column, row);
        assert_eq!(dashboard.interaction.hovered(), Some("Baikonur"));

        dashboard.clicked(column, row);
        dashboard.refresh(Size::new(160.0, 80.0));
        assert_eq!(
            dashboard.tooltip.as_ref().unwrap().kind,
            launch_atlas_core::TooltipKind::Expanded
        );

        dashboard.pointer_moved(0, 0);
        dashboard.clicked(0, 0);
        dashboard.refresh(Size::new(160.0, 80.0));
        assert!(dashboard.tooltip.is_none());
    }

    #[test]
    fn wheel_zooms_only_over_the_map() {
        let mut dashboard = with_map(loaded());
        dashboard.scrolled(0, 0, true);
        assert!((dashboard.zoom.k - 1.0).abs() < 1e-9);

        dashboard.scrolled(40, 12, true);
        assert!(dashboard.zoom.k > 1.0);
        dashboard.scrolled(40, 12, false);
        assert!((dashboard.zoom.k - 1.0).abs() < 1e-9);
    }

    #[test]
    fn chart_tabs_wrap() {
        let mut dashboard = loaded();
        dashboard.apply(Command::NextChart);
        dashboard.apply(Command::NextChart);
        assert_eq!(dashboard.chart_tab, 0);
    }
}
