//! Natural Earth projection fitted to a viewport.
//!
//! The projection is rebuilt whenever the drawing surface changes size. A
//! surface without area yields a projection that maps nothing, so callers
//! simply get no positions instead of an error.

use std::f64::consts::{FRAC_PI_2, PI};

use serde::Serialize;

use crate::geometry::{Point, Size};

/// Raw Natural Earth I projection (Šavrič et al.) on the unit sphere.
/// `lambda` and `phi` are in radians; y grows northwards.
fn natural_earth_raw(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (phi4.mul_add(
            phi4.mul_add(0.003_971f64.mul_add(phi2, -0.001_529 * phi4), -0.013_791),
            0.131_979f64.mul_add(-phi2, 0.870_7),
        ));
    let y = phi
        * phi2.mul_add(
            phi4.mul_add(
                0.028_874f64.mul_add(phi2, -0.044_475) - 0.005_916 * phi4,
                0.015_085,
            ),
            1.007_226,
        );
    (x, y)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Projection {
    scale: f64,
    translate: Point,
    size: Size,
}

impl Projection {
    /// Fits the whole globe into `size`, centred, leaving `padding` on every side.
    pub fn fit(size: Size, padding: f64) -> Self {
        if size.is_degenerate() {
            return Self::degenerate(size);
        }
        let usable_width = 2.0f64.mul_add(-padding, size.width);
        let usable_height = 2.0f64.mul_add(-padding, size.height);
        if usable_width <= 0.0 || usable_height <= 0.0 {
            return Self::degenerate(size);
        }

        let (half_width, _) = natural_earth_raw(PI, 0.0);
        let (_, half_height) = natural_earth_raw(0.0, FRAC_PI_2);
        let scale = (usable_width / (2.0 * half_width)).min(usable_height / (2.0 * half_height));

        Self {
            scale,
            translate: Point::new(size.width / 2.0, size.height / 2.0),
            size,
        }
    }

    const fn degenerate(size: Size) -> Self {
        Self {
            scale: 0.0,
            translate: Point::new(0.0, 0.0),
            size,
        }
    }

    /// A projection that maps nothing.
    pub fn is_degenerate(&self) -> bool {
        self.scale <= 0.0
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Projects `(longitude, latitude)` in degrees into plot space. Returns
    /// `None` for a degenerate projection or for coordinates off the globe.
    pub fn project(&self, longitude: f64, latitude: f64) -> Option<Point> {
        if self.is_degenerate()
            || !longitude.is_finite()
            || !latitude.is_finite()
            || latitude.abs() > 90.0
        {
            return None;
        }
        let longitude = (longitude + 180.0).rem_euclid(360.0) - 180.0;
        let (x, y) = natural_earth_raw(longitude.to_radians(), latitude.to_radians());
        let point = Point::new(
            self.scale.mul_add(x, self.translate.x),
            self.scale.mul_add(-y, self.translate.y),
        );
        point.is_finite().then_some(point)
    }

    /// Outline of the globe as a closed polyline, sampled every `step` degrees.
    pub fn outline(&self, step: f64) -> Vec<Point> {
        if self.is_degenerate() || step <= 0.0 {
            return Vec::new();
        }
        let mut points = Vec::new();
        let mut lat = -90.0;
        while lat <= 90.0 {
            points.extend(self.project(180.0 - 1e-9, lat));
            lat += step;
        }
        let mut lat = 90.0;
        while lat >= -90.0 {
            points.extend(self.project(-180.0, lat));
            lat -= step;
        }
        if let Some(first) = points.first().copied() {
            points.push(first);
        }
        points
    }

    /// Meridians and parallels every `spacing` degrees, each as a polyline.
    pub fn graticule(&self, spacing: f64) -> Vec<Vec<Point>> {
        if self.is_degenerate() || spacing <= 0.0 {
            return Vec::new();
        }
        let mut lines = Vec::new();
        let mut lon = -180.0;
        while lon <= 180.0 {
            let line: Vec<Point> = (-80..=80)
                .step_by(5)
                .filter_map(|lat| self.project(lon, f64::from(lat)))
                .collect();
            lines.push(line);
            lon += spacing;
        }
        let mut lat = -90.0 + spacing;
        while lat < 90.0 {
            let line: Vec<Point> = (-180..=180)
                .step_by(5)
                .filter_map(|lon| self.project(f64::from(lon), lat))
                .collect();
            lines.push(line);
            lat += spacing;
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-6, "expected {expected}, got {actual}, diff {diff}");
    }

    #[test]
    fn origin_maps_to_the_viewport_centre() {
        let projection = Projection::fit(Size::new(960.0, 500.0), 0.0);
        let centre = projection.project(0.0, 0.0).unwrap();
        assert_close(centre.x, 480.0);
        assert_close(centre.y, 250.0);
    }

    #[test]
    fn globe_fits_inside_the_viewport() {
        let size = Size::new(800.0, 400.0);
        let projection = Projection::fit(size, 10.0);
        for (lon, lat) in [(-180.0, 0.0), (180.0, 0.0), (0.0, 90.0), (0.0, -90.0)] {
            let point = projection.project(lon, lat).unwrap();
            assert!(point.x >= 10.0 - 1e-9 && point.x <= 790.0 + 1e-9, "{point:?}");
            assert!(point.y >= 10.0 - 1e-9 && point.y <= 390.0 + 1e-9, "{point:?}");
        }
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let projection = Projection::fit(Size::new(800.0, 400.0), 0.0);
        let baikonur = projection.project(63.3, 45.9).unwrap();
        let canaveral = projection.project(-80.6, 28.6).unwrap();
        assert!(baikonur.x > canaveral.x);
        assert!(baikonur.y < canaveral.y);
    }

    #[test]
    fn degenerate_viewport_maps_nothing() {
        for size in [Size::new(0.0, 400.0), Size::new(800.0, -1.0)] {
            let projection = Projection::fit(size, 0.0);
            assert!(projection.is_degenerate());
            assert_eq!(projection.project(0.0, 0.0), None);
            assert!(projection.outline(10.0).is_empty());
        }
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let projection = Projection::fit(Size::new(800.0, 400.0), 0.0);
        assert_eq!(projection.project(0.0, 91.0), None);
        assert_eq!(projection.project(f64::NAN, 0.0), None);
    }

    #[test]
    fn longitudes_wrap_around_the_antimeridian() {
        let projection = Projection::fit(Size::new(800.0, 400.0), 0.0);
        let east = projection.project(190.0, 10.0).unwrap();
        let west = projection.project(-170.0, 10.0).unwrap();
        assert_close(east.x, west.x);
        assert_close(east.y, west.y);
    }
}
