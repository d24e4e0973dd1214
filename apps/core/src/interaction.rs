//! Hover, pin and tooltip state for the map.
//!
//! Hover and pin are tracked independently. The tooltip always describes the
//! pinned site when there is one, otherwise the hovered site.

use serde::Serialize;
use tracing::warn;

use crate::domain::LaunchStatus;
use crate::frame::{MapFrame, Marker};
use crate::geometry::{Point, Size};
use crate::scale::Rgb;

pub const COMPACT_LAUNCHES: usize = 3;
pub const EXPANDED_LAUNCHES: usize = 10;

/// Gap between a marker's edge and its tooltip.
const TOOLTIP_OFFSET: f64 = 2.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InteractionState {
    hovered: Option<String>,
    pinned: Option<String>,
}

impl InteractionState {
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn pinned(&self) -> Option<&str> {
        self.pinned.as_deref()
    }

    pub fn pointer_enter(&mut self, key: &str) {
        self.hovered = Some(key.to_string());
    }

    /// Clears the hover if it still belongs to `key`. A pin is left alone.
    pub fn pointer_leave(&mut self, key: &str) {
        if self.hovered.as_deref() == Some(key) {
            self.hovered = None;
        }
    }

    /// Moves the hover to whatever is under the pointer, or clears it.
    pub fn pointer_move(&mut self, key: Option<&str>) {
        match (self.hovered.clone(), key) {
            (Some(current), Some(next)) if current == next => {}
            (Some(current), next) => {
                self.pointer_leave(&current);
                if let Some(next) = next {
                    self.pointer_enter(next);
                }
            }
            (None, Some(next)) => self.pointer_enter(next),
            (None, None) => {}
        }
    }

    /// Pins `key`, or unpins it when it is already pinned.
    pub fn click(&mut self, key: &str) {
        if self.pinned.as_deref() == Some(key) {
            self.pinned = None;
        } else {
            self.pinned = Some(key.to_string());
        }
    }

    pub fn click_outside(&mut self) {
        self.pinned = None;
    }

    /// Hover the next marker west to east, wrapping around.
    pub fn hover_next(&mut self, frame: &MapFrame) {
        self.cycle_hover(frame, true);
    }

    pub fn hover_prev(&mut self, frame: &MapFrame) {
        self.cycle_hover(frame, false);
    }

    fn cycle_hover(&mut self, frame: &MapFrame, forward: bool) {
        let keys = frame.keys_west_to_east();
        if keys.is_empty() {
            self.hovered = None;
            return;
        }
        let current = self
            .hovered
            .as_deref()
            .and_then(|hovered| keys.iter().position(|key| *key == hovered));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => keys.len() - 1,
            (Some(index), true) => (index + 1) % keys.len(),
            (Some(index), false) => (index + keys.len() - 1) % keys.len(),
        };
        self.hovered = Some(keys[next].to_string());
    }

    /// Toggles the pin on the hovered marker.
    pub fn pin_hovered(&mut self) {
        if let Some(key) = self.hovered.clone() {
            self.click(&key);
        }
    }

    /// Fill to draw `marker` with: the brighter variant while it is hovered.
    pub fn fill_for(&self, marker: &Marker) -> Rgb {
        if self.hovered.as_deref() == Some(marker.key.as_str()) {
            marker.status.hover_color()
        } else {
            marker.fill
        }
    }

    /// The site the tooltip describes and whether it is expanded.
    pub fn target(&self) -> Option<(&str, TooltipKind)> {
        match (&self.pinned, &self.hovered) {
            (Some(pinned), _) => Some((pinned.as_str(), TooltipKind::Expanded)),
            (None, Some(hovered)) => Some((hovered.as_str(), TooltipKind::Compact)),
            (None, None) => None,
        }
    }

    /// Tooltip content for the current target. Logs and returns `None` when
    /// the target site is not part of `frame`.
    pub fn tooltip(&self, frame: &MapFrame) -> Option<Tooltip> {
        let (key, kind) = self.target()?;
        let (Some(pad), Some(marker)) = (frame.launchpad(key), frame.marker(key)) else {
            warn!(site = key, "tooltip target is not on the map, skipping update");
            return None;
        };

        let limit = match kind {
            TooltipKind::Compact => COMPACT_LAUNCHES,
            TooltipKind::Expanded => EXPANDED_LAUNCHES,
        };
        let launches: Vec<TooltipLaunch> = pad
            .launches
            .iter()
            .take(limit)
            .map(|record| TooltipLaunch {
                name: record.name.clone(),
                status: record.status,
                date: record.year_month().to_string(),
                provider: record.provider.clone(),
                rocket: record.rocket.clone(),
            })
            .collect();
        let breakdown = match kind {
            TooltipKind::Compact => Vec::new(),
            TooltipKind::Expanded => pad.statuses.iter().collect(),
        };

        let centre = frame.zoom.apply(marker.position);
        Some(Tooltip {
            key: pad.key.clone(),
            title: pad.name.clone(),
            kind,
            count: pad.count,
            primary_status: pad.primary_status,
            more: pad.count.saturating_sub(launches.len()),
            launches,
            breakdown,
            anchor: centre,
            anchor_radius: marker.radius * frame.zoom.k,
        })
    }
}

/// Topmost marker containing the map-space `point`. Later markers are drawn
/// on top, so the search runs back to front.
pub fn hit_test(point: Point, markers: &[Marker]) -> Option<&Marker> {
    markers
        .iter()
        .rev()
        .find(|marker| marker.position.distance(point) <= marker.radius)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TooltipKind {
    Compact,
    Expanded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TooltipLaunch {
    pub name: String,
    pub status: LaunchStatus,
    pub date: String,
    pub provider: String,
    pub rocket: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub key: String,
    pub title: String,
    pub kind: TooltipKind,
    pub count: usize,
    pub primary_status: LaunchStatus,
    pub launches: Vec<TooltipLaunch>,
    /// Launches not listed.
    pub more: usize,
    /// Full status breakdown, expanded tooltips only.
    pub breakdown: Vec<(LaunchStatus, usize)>,
    /// Marker centre in screen space.
    pub anchor: Point,
    pub anchor_radius: f64,
}

impl Tooltip {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} launch{} · mostly {}",
            self.count,
            if self.count == 1 { "" } else { "es" },
            self.primary_status
        )];
        for (status, count) in &self.breakdown {
            lines.push(format!("  {status}: {count}"));
        }
        for launch in &self.launches {
            lines.push(format!("{} {} [{}]", launch.date, launch.name, launch.status));
        }
        if self.more > 0 {
            lines.push(format!("… and {} more", self.more));
        }
        lines
    }

    /// Top-left corner for a box of `size`, next to the marker and kept
    /// inside `canvas`. Prefers the right side and flips left when it would
    /// overflow.
    pub fn placement(&self, size: Size, canvas: Size) -> Point {
        let gap = self.anchor_radius + TOOLTIP_OFFSET;
        let mut x = self.anchor.x + gap;
        if x + size.width > canvas.width {
            x = self.anchor.x - gap - size.width;
        }
        let y = self.anchor.y - size.height / 2.0;
        Point::new(
            x.clamp(0.0, (canvas.width - size.width).max(0.0)),
            y.clamp(0.0, (canvas.height - size.height).max(0.0)),
        )
    }
}
