//! One pass of the map pipeline: window, aggregate, project, scale, relax.
//!
//! The frame is rebuilt from scratch whenever the time window, the selection,
//! the view mode, the viewport or the zoom level changes. Nothing in it is
//! updated incrementally.

use serde::Serialize;
use tracing::{debug, trace};

use crate::aggregate::{aggregate, Launchpad, Launchpads};
use crate::domain::{LaunchRecord, LaunchStatus, ViewMode, YearMonth};
use crate::geometry::{Point, Size};
use crate::layout::{relax, LayoutNode, LayoutParams};
use crate::projection::Projection;
use crate::scale::{RadiusScale, Rgb};
use crate::selection::SelectionState;
use crate::window::active_records;
use crate::zoom::ZoomTransform;

/// Screen-space sizing of markers, independent of zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub min_radius: f64,
    pub max_radius: f64,
    pub stroke: f64,
    /// Margin between the globe and the viewport edge.
    pub padding: f64,
    pub layout: LayoutParams,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            min_radius: 3.0,
            max_radius: 14.0,
            stroke: 1.0,
            padding: 4.0,
            layout: LayoutParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub records: &'a [LaunchRecord],
    pub selection: &'a SelectionState,
    pub current: YearMonth,
    pub mode: ViewMode,
    pub viewport: Size,
    pub zoom: ZoomTransform,
    pub style: MarkerStyle,
}

/// A drawable site marker. Positions and lengths are in map space; apply the
/// zoom transform to get screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub key: String,
    pub position: Point,
    pub original: Point,
    pub radius: f64,
    pub stroke: f64,
    pub fill: Rgb,
    pub status: LaunchStatus,
    pub count: usize,
    /// Moved far enough from its true location to warrant a connector line.
    pub displaced: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    pub projection: Projection,
    pub zoom: ZoomTransform,
    pub launchpads: Launchpads,
    /// Markers in drawing order: larger first, so small ones stay clickable.
    pub markers: Vec<Marker>,
}

impl MapFrame {
    pub fn marker(&self, key: &str) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.key == key)
    }

    pub fn launchpad(&self, key: &str) -> Option<&Launchpad> {
        self.launchpads.get(key)
    }

    /// `(true location, drawn location)` for every displaced marker.
    pub fn connectors(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.markers
            .iter()
            .filter(|marker| marker.displaced)
            .map(|marker| (marker.original, marker.position))
    }

    /// Marker keys ordered west to east, for keyboard navigation.
    pub fn keys_west_to_east(&self) -> Vec<&str> {
        let mut markers: Vec<&Marker> = self.markers.iter().collect();
        markers.sort_by(|a, b| {
            a.original
                .x
                .total_cmp(&b.original.x)
                .then_with(|| a.key.cmp(&b.key))
        });
        markers.into_iter().map(|marker| marker.key.as_str()).collect()
    }
}

pub fn build_frame(input: &FrameInput<'_>) -> MapFrame {
    let active = active_records(input.records, input.selection, input.current, input.mode);
    let mut launchpads = aggregate(active, input.mode);
    let projection = Projection::fit(input.viewport, input.style.padding);
    let scale = RadiusScale::for_mode(
        input.mode,
        input.style.min_radius,
        input.style.max_radius,
    );

    let mut nodes = Vec::with_capacity(launchpads.len());
    for pad in launchpads.pads.values_mut() {
        pad.original = projection.project(pad.longitude, pad.latitude);
        match pad.original {
            Some(original) => nodes.push(LayoutNode {
                key: pad.key.clone(),
                original,
                radius: input.zoom.marker_radius(scale.radius(pad.count)),
            }),
            None => trace!(site = %pad.key, "projection yielded no position"),
        }
    }

    let mut params = input.style.layout;
    params.padding = input.zoom.marker_radius(params.padding);
    params.jitter = input.zoom.marker_radius(params.jitter);
    params.displacement_threshold = input.zoom.marker_radius(params.displacement_threshold);

    let stroke = input.zoom.stroke_width(input.style.stroke);
    let mut markers = Vec::with_capacity(nodes.len());
    for placement in relax(&nodes, &params) {
        let Some(pad) = launchpads.pads.get_mut(&placement.key) else {
            continue;
        };
        pad.position = Some(placement.position);
        markers.push(Marker {
            displaced: placement.is_displaced(params.displacement_threshold),
            key: placement.key,
            position: placement.position,
            original: placement.original,
            radius: placement.radius,
            stroke,
            fill: pad.primary_status.color(),
            status: pad.primary_status,
            count: pad.count,
        });
    }
    markers.sort_by(|a, b| b.radius.total_cmp(&a.radius).then_with(|| a.key.cmp(&b.key)));

    debug!(
        current = %input.current,
        mode = input.mode.as_str(),
        sites = markers.len(),
        unplottable = launchpads.unplottable,
        "frame built"
    );

    MapFrame {
        projection,
        zoom: input.zoom,
        launchpads,
        markers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Era;

    fn launch(site: &str, lon: f64, lat: f64, year: u32, month: u32) -> LaunchRecord {
        LaunchRecord {
            name: format!("{site} {year}-{month}"),
            status: LaunchStatus::Successful,
            provider: "NASA".to_string(),
            rocket: "Saturn V".to_string(),
            mission: String::new(),
            site: site.to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            timestamp: format!("{year:04}-{month:02}-01T00:00:00Z"),
            year,
            month,
        }
    }

    fn input<'a>(
        records: &'a [LaunchRecord],
        selection: &'a SelectionState,
        current: YearMonth,
        mode: ViewMode,
    ) -> FrameInput<'a> {
        FrameInput {
            records,
            selection,
            current,
            mode,
            viewport: Size::new(960.0, 500.0),
            zoom: ZoomTransform::default(),
            style: MarkerStyle::default(),
        }
    }

    #[test]
    fn only_the_active_window_is_drawn() {
        let records = vec![
            launch("Cape Canaveral", -80.6, 28.6, 1969, 7),
            launch("Baikonur", 63.3, 45.9, 1969, 8),
            launch("Kourou", -52.8, 5.2, 1970, 1),
        ];
        let selection = SelectionState::default();

        let month = build_frame(&input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Month));
        assert_eq!(month.markers.len(), 1);
        assert_eq!(month.markers[0].key, "Cape Canaveral");

        let year = build_frame(&input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Year));
        assert_eq!(year.markers.len(), 2);
    }

    #[test]
    fn selection_narrows_the_frame() {
        let mut records = vec![
            launch("Cape Canaveral", -80.6, 28.6, 1969, 7),
            launch("Baikonur", 63.3, 45.9, 1969, 7),
        ];
        records[1].provider = "Soviet Space Program".to_string();
        let mut selection = SelectionState::default();
        selection.set_era(Era::SpaceRace);
        selection.set_provider("NASA").unwrap();

        let frame = build_frame(&input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Month));
        assert_eq!(frame.markers.len(), 1);
        assert!(frame.launchpad("Baikonur").is_none());
    }

    #[test]
    fn neighbouring_pads_get_connectors() {
        let records = vec![
            launch("LC-39A", -80.604, 28.608, 1969, 7),
            launch("SLC-41", -80.583, 28.583, 1969, 7),
        ];
        let selection = SelectionState::default();

        let frame = build_frame(&input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Month));

        assert_eq!(frame.connectors().count(), 2);
        for marker in &frame.markers {
            let pad = frame.launchpad(&marker.key).unwrap();
            assert_eq!(pad.position, Some(marker.position));
            assert_eq!(pad.original, Some(marker.original));
        }
    }

    #[test]
    fn degenerate_viewport_yields_no_markers() {
        let records = vec![launch("Cape Canaveral", -80.6, 28.6, 1969, 7)];
        let selection = SelectionState::default();
        let mut input = input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Month);
        input.viewport = Size::new(0.0, 0.0);

        let frame = build_frame(&input);

        assert!(frame.markers.is_empty());
        assert_eq!(frame.launchpads.len(), 1);
        assert_eq!(frame.launchpad("Cape Canaveral").unwrap().original, None);
    }

    #[test]
    fn zooming_in_shrinks_map_space_radius() {
        let records = vec![launch("Cape Canaveral", -80.6, 28.6, 1969, 7)];
        let selection = SelectionState::default();
        let mut zoomed = input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Month);
        zoomed.zoom.zoom_at(4.0, Point::new(480.0, 250.0), zoomed.viewport);

        let base = build_frame(&input(&records, &selection, YearMonth::new(1969, 7), ViewMode::Month));
        let frame = build_frame(&zoomed);

        let ratio = base.markers[0].radius / frame.markers[0].radius;
        assert!((ratio - 4.0).abs() < 1e-9);
        assert!((frame.markers[0].stroke - 0.25).abs() < 1e-9);
    }
}
