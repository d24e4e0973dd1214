use serde::Serialize;

use crate::geometry::{Point, Size};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 8.0;

/// Pan/zoom state: screen = map * k + (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x.mul_add(self.k, self.x),
            point.y.mul_add(self.k, self.y),
        )
    }

    pub fn invert(&self, point: Point) -> Point {
        Point::new((point.x - self.x) / self.k, (point.y - self.y) / self.k)
    }

    /// Map-space radius that renders as `base` on screen.
    pub fn marker_radius(&self, base: f64) -> f64 {
        base / self.k
    }

    /// Map-space stroke width that renders as `base` on screen.
    pub fn stroke_width(&self, base: f64) -> f64 {
        base / self.k
    }

    /// Scales by `factor` around the screen point `focus`, which stays fixed.
    pub fn zoom_at(&mut self, factor: f64, focus: Point, viewport: Size) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let anchor = self.invert(focus);
        self.k = k;
        self.x = anchor.x.mul_add(-k, focus.x);
        self.y = anchor.y.mul_add(-k, focus.y);
        self.constrain(viewport);
    }

    pub fn pan(&mut self, dx: f64, dy: f64, viewport: Size) {
        self.x += dx;
        self.y += dy;
        self.constrain(viewport);
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Keeps the zoomed map covering the whole viewport.
    fn constrain(&mut self, viewport: Size) {
        if viewport.is_degenerate() {
            return;
        }
        let min_x = viewport.width.mul_add(-self.k, viewport.width);
        let min_y = viewport.height.mul_add(-self.k, viewport.height);
        self.x = self.x.clamp(min_x, 0.0);
        self.y = self.y.clamp(min_y, 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}, diff {diff}");
    }

    const VIEWPORT: Size = Size::new(800.0, 400.0);

    #[test]
    fn zoom_keeps_the_focus_point_fixed() {
        let mut zoom = ZoomTransform::default();
        let focus = Point::new(200.0, 100.0);
        let before = zoom.invert(focus);

        zoom.zoom_at(2.0, focus, VIEWPORT);

        let after = zoom.apply(before);
        assert_close(after.x, focus.x);
        assert_close(after.y, focus.y);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut zoom = ZoomTransform::default();
        zoom.zoom_at(100.0, Point::new(400.0, 200.0), VIEWPORT);
        assert_close(zoom.k, MAX_ZOOM);
        zoom.zoom_at(0.001, Point::new(400.0, 200.0), VIEWPORT);
        assert_close(zoom.k, MIN_ZOOM);
        assert_close(zoom.x, 0.0);
        assert_close(zoom.y, 0.0);
    }

    #[test]
    fn marker_size_is_constant_on_screen() {
        let mut zoom = ZoomTransform::default();
        zoom.zoom_at(4.0, Point::new(400.0, 200.0), VIEWPORT);
        assert_close(zoom.marker_radius(10.0) * zoom.k, 10.0);
        assert_close(zoom.stroke_width(1.5), 0.375);
    }

    #[test]
    fn panning_cannot_reveal_empty_space() {
        let mut zoom = ZoomTransform::default();
        zoom.pan(50.0, 50.0, VIEWPORT);
        assert_close(zoom.x, 0.0);

        zoom.zoom_at(2.0, Point::new(400.0, 200.0), VIEWPORT);
        zoom.pan(-10_000.0, 0.0, VIEWPORT);
        assert_close(zoom.x, -800.0);
    }
}
