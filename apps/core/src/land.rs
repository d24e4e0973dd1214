//! Optional coastline backdrop decoded from GeoJSON.

use serde_json::Value;
use tracing::debug;

use crate::error::{AtlasError, Result};
use crate::geometry::Point;
use crate::projection::Projection;

/// A closed ring of `(longitude, latitude)` pairs.
pub type Ring = Vec<(f64, f64)>;

/// Collects the polygon rings of a GeoJSON `FeatureCollection`, `Feature` or
/// bare geometry. Unsupported geometries are ignored.
pub fn parse_land(json: &str) -> Result<Vec<Ring>> {
    let value: Value = serde_json::from_str(json)?;
    let mut rings = Vec::new();
    match value["type"].as_str() {
        Some("FeatureCollection") => {
            let features = value["features"]
                .as_array()
                .ok_or_else(|| AtlasError::Dataset("feature collection without features".into()))?;
            for feature in features {
                geometry_rings(&feature["geometry"], &mut rings);
            }
        }
        Some("Feature") => geometry_rings(&value["geometry"], &mut rings),
        Some(_) => geometry_rings(&value, &mut rings),
        None => return Err(AtlasError::Dataset("GeoJSON without a type".into())),
    }
    debug!(rings = rings.len(), "land outline decoded");
    Ok(rings)
}

fn geometry_rings(geometry: &Value, out: &mut Vec<Ring>) {
    match geometry["type"].as_str().unwrap_or("") {
        "Polygon" => {
            if let Some(rings) = geometry["coordinates"].as_array() {
                out.extend(rings.iter().filter_map(ring));
            }
        }
        "MultiPolygon" => {
            if let Some(polygons) = geometry["coordinates"].as_array() {
                for polygon in polygons.iter().filter_map(Value::as_array) {
                    out.extend(polygon.iter().filter_map(ring));
                }
            }
        }
        "GeometryCollection" => {
            if let Some(geometries) = geometry["geometries"].as_array() {
                for inner in geometries {
                    geometry_rings(inner, out);
                }
            }
        }
        _ => {}
    }
}

fn ring(value: &Value) -> Option<Ring> {
    let points: Ring = value
        .as_array()?
        .iter()
        .filter_map(|point| {
            let pair = point.as_array()?;
            Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
        })
        .collect();
    (points.len() >= 2).then_some(points)
}

/// Projects rings into polylines, breaking a line wherever it would jump
/// across the whole map at the antimeridian.
pub fn project_rings(projection: &Projection, rings: &[Ring]) -> Vec<Vec<Point>> {
    let max_jump = projection.size().width / 2.0;
    let mut lines = Vec::new();
    for ring in rings {
        let mut line: Vec<Point> = Vec::with_capacity(ring.len());
        for &(longitude, latitude) in ring {
            let Some(point) = projection.project(longitude, latitude) else {
                continue;
            };
            if let Some(last) = line.last() {
                if (point.x - last.x).abs() > max_jump {
                    lines.push(std::mem::take(&mut line));
                }
            }
            line.push(point);
        }
        if line.len() >= 2 {
            lines.push(line);
        }
    }
    lines.retain(|line| line.len() >= 2);
    lines
}
