//! Groups the records of the active time window by launch site.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::domain::{LaunchRecord, LaunchStatus, ViewMode};
use crate::geometry::Point;

/// Launch counts per status, indexed in canonical status order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts([usize; LaunchStatus::ALL.len()]);

impl StatusCounts {
    pub fn add(&mut self, status: LaunchStatus) {
        self.0[status.index()] += 1;
    }

    pub const fn get(&self, status: LaunchStatus) -> usize {
        self.0[status.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// The most frequent status. Ties go to the status that comes first in
    /// canonical order, so `Successful` beats `Failure` on equal counts.
    pub fn primary(&self) -> Option<LaunchStatus> {
        let mut best: Option<(LaunchStatus, usize)> = None;
        for status in LaunchStatus::ALL {
            let count = self.get(status);
            if count > 0 && best.map_or(true, |(_, top)| count > top) {
                best = Some((status, count));
            }
        }
        best.map(|(status, _)| status)
    }

    /// Non-zero entries in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (LaunchStatus, usize)> + '_ {
        LaunchStatus::ALL
            .into_iter()
            .map(move |status| (status, self.get(status)))
            .filter(|(_, count)| *count > 0)
    }
}

/// Per-site summary of the launches in the current window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Launchpad {
    pub key: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
    pub launches: Vec<LaunchRecord>,
    pub statuses: StatusCounts,
    pub primary_status: LaunchStatus,
    /// Where the marker is drawn after overlap resolution.
    pub position: Option<Point>,
    /// Projected true location, before any displacement.
    pub original: Option<Point>,
}

impl Launchpad {
    fn new(record: &LaunchRecord, longitude: f64, latitude: f64) -> Self {
        Self {
            key: record.site.clone(),
            name: record.site.clone(),
            latitude,
            longitude,
            count: 0,
            launches: Vec::new(),
            statuses: StatusCounts::default(),
            primary_status: LaunchStatus::Other,
            position: None,
            original: None,
        }
    }

    fn push(&mut self, record: &LaunchRecord) {
        self.count += 1;
        self.statuses.add(record.status);
        self.launches.push(record.clone());
    }

    /// Distance between the drawn and the true position, when both are known.
    pub fn displacement(&self) -> Option<f64> {
        Some(self.original?.distance(self.position?))
    }
}

/// All launch sites of one window, keyed by site name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Launchpads {
    pub mode: ViewMode,
    pub pads: BTreeMap<String, Launchpad>,
    /// Records left out because they have no coordinates.
    pub unplottable: usize,
}

impl Launchpads {
    pub fn get(&self, key: &str) -> Option<&Launchpad> {
        self.pads.get(key)
    }

    pub fn len(&self) -> usize {
        self.pads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pads.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Launchpad> {
        self.pads.values()
    }

    pub fn total_launches(&self) -> usize {
        self.pads.values().map(|pad| pad.count).sum()
    }
}

/// Builds the site aggregates for records already narrowed to the active
/// window. Records without both coordinates are excluded from every count.
pub fn aggregate<'a>(
    records: impl IntoIterator<Item = &'a LaunchRecord>,
    mode: ViewMode,
) -> Launchpads {
    let mut pads: BTreeMap<String, Launchpad> = BTreeMap::new();
    let mut unplottable = 0;

    for record in records {
        let Some((longitude, latitude)) = record.coordinates() else {
            trace!(launch = %record.name, "no coordinates, not plotted");
            unplottable += 1;
            continue;
        };
        pads.entry(record.site.clone())
            .or_insert_with(|| Launchpad::new(record, longitude, latitude))
            .push(record);
    }

    for pad in pads.values_mut() {
        pad.primary_status = pad.statuses.primary().unwrap_or(LaunchStatus::Other);
    }

    Launchpads {
        mode,
        pads,
        unplottable,
    }
}
