//! Visual encodings: marker radius from launch count, fill from status.

use std::fmt;

use serde::Serialize;

use crate::domain::{LaunchStatus, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn r(self) -> u8 {
        self.0
    }

    pub const fn g(self) -> u8 {
        self.1
    }

    pub const fn b(self) -> u8 {
        self.2
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colour used for anything without a dedicated status colour.
pub const FALLBACK_COLOR: Rgb = Rgb(0x9e, 0x9e, 0x9e);
const FALLBACK_HOVER_COLOR: Rgb = Rgb(0xe0, 0xe0, 0xe0);

impl LaunchStatus {
    pub const fn color(self) -> Rgb {
        match self {
            Self::Successful => Rgb(0x2e, 0x9d, 0x5b),
            Self::Failure => Rgb(0xc6, 0x28, 0x28),
            Self::PartialFailure => Rgb(0xe6, 0x8a, 0x00),
            Self::Planned => Rgb(0x1e, 0x78, 0xc8),
            Self::Other => FALLBACK_COLOR,
        }
    }

    /// Brighter variant shown while the marker is hovered.
    pub const fn hover_color(self) -> Rgb {
        match self {
            Self::Successful => Rgb(0x4c, 0xff, 0x8a),
            Self::Failure => Rgb(0xff, 0x4d, 0x4d),
            Self::PartialFailure => Rgb(0xff, 0xc1, 0x07),
            Self::Planned => Rgb(0x4f, 0xc3, 0xff),
            Self::Other => FALLBACK_HOVER_COLOR,
        }
    }
}

/// Fill for a raw status label, falling back to [`FALLBACK_COLOR`] for
/// anything that does not name a known status.
pub fn color_for_label(label: &str) -> Rgb {
    LaunchStatus::parse(label).color()
}

impl ViewMode {
    /// Count at which markers stop growing.
    pub const fn radius_cap(self) -> usize {
        match self {
            Self::Month => 10,
            Self::Year => 60,
        }
    }
}

/// Square-root scale from launch count to radius, so marker area grows
/// linearly with the count. Counts above the cap get the maximum radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusScale {
    cap: usize,
    min_radius: f64,
    max_radius: f64,
}

impl RadiusScale {
    pub fn new(cap: usize, min_radius: f64, max_radius: f64) -> Self {
        let min_radius = min_radius.max(0.0);
        Self {
            cap: cap.max(1),
            min_radius,
            max_radius: max_radius.max(min_radius),
        }
    }

    pub fn for_mode(mode: ViewMode, min_radius: f64, max_radius: f64) -> Self {
        Self::new(mode.radius_cap(), min_radius, max_radius)
    }

    pub const fn cap(&self) -> usize {
        self.cap
    }

    pub fn radius(&self, count: usize) -> f64 {
        let t = (count.min(self.cap) as f64 / self.cap as f64).sqrt();
        (self.max_radius - self.min_radius).mul_add(t, self.min_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_grows_monotonically_up_to_the_cap() {
        for mode in [ViewMode::Month, ViewMode::Year] {
            let scale = RadiusScale::for_mode(mode, 2.0, 12.0);
            let mut previous = scale.radius(0);
            for count in 1..=scale.cap() {
                let radius = scale.radius(count);
                assert!(radius >= previous, "{mode:?} count {count}");
                previous = radius;
            }
            assert!((scale.radius(scale.cap()) - 12.0).abs() < 1e-9);
        }
    }

    #[test]
    fn counts_above_the_cap_are_clamped() {
        let scale = RadiusScale::for_mode(ViewMode::Month, 2.0, 12.0);
        assert_eq!(scale.radius(10), scale.radius(500));
    }

    #[test]
    fn year_view_uses_a_larger_domain() {
        assert!(ViewMode::Year.radius_cap() > ViewMode::Month.radius_cap());
        let month = RadiusScale::for_mode(ViewMode::Month, 2.0, 12.0);
        let year = RadiusScale::for_mode(ViewMode::Year, 2.0, 12.0);
        assert!(year.radius(10) < month.radius(10));
    }

    #[test]
    fn area_is_proportional_to_count() {
        let scale = RadiusScale::new(100, 0.0, 10.0);
        let quarter = scale.radius(25);
        let full = scale.radius(100);
        assert!((full / quarter - 2.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_labels_get_the_fallback_colour() {
        assert_eq!(color_for_label("exploded on the pad?"), FALLBACK_COLOR);
        assert_eq!(color_for_label("Success"), LaunchStatus::Successful.color());
        for status in LaunchStatus::ALL {
            assert_ne!(status.color(), status.hover_color());
        }
        assert_eq!(Rgb(255, 0, 16).to_string(), "#ff0010");
    }
}
