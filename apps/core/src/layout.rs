//! Overlap resolution for map markers.
//!
//! Markers start at their projected position and are relaxed with a small
//! physics step: a spring pulls each one back towards where it belongs and a
//! collision force pushes apart any two circles closer than the sum of their
//! radii plus a margin. A final pass without the spring removes whatever
//! overlap the spring left behind. Everything is deterministic: the "random"
//! nudges used for coincident markers are derived from the site keys.

use std::f64::consts::TAU;

use serde::Serialize;

use crate::geometry::Point;

/// Distances below this are treated as "the same spot".
const COINCIDENT_EPSILON: f64 = 1e-6;

/// One marker to place: its identity, true position and visual radius.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub key: String,
    pub original: Point,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutParams {
    /// Pull towards the original position, in `[0, 1]`.
    pub strength: f64,
    /// Extra gap kept between two circles.
    pub padding: f64,
    /// Number of simulation steps.
    pub iterations: usize,
    /// Fraction of velocity lost per step.
    pub velocity_decay: f64,
    /// Upper bound on clean-up passes after the simulation.
    pub resolve_passes: usize,
    /// Size of the nudge given to markers that share a position.
    pub jitter: f64,
    /// Displacement above which a connector line is drawn.
    pub displacement_threshold: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            strength: 0.3,
            padding: 1.0,
            iterations: 60,
            velocity_decay: 0.4,
            resolve_passes: 300,
            jitter: 0.5,
            displacement_threshold: 1.0,
        }
    }
}

/// Final position of one marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub key: String,
    pub position: Point,
    pub original: Point,
    pub radius: f64,
}

impl Placement {
    pub fn displacement(&self) -> f64 {
        self.original.distance(self.position)
    }

    pub fn is_displaced(&self, threshold: f64) -> bool {
        self.displacement() > threshold
    }
}

#[derive(Debug, Clone)]
struct Body<'a> {
    key: &'a str,
    original: Point,
    position: Point,
    velocity: Point,
    radius: f64,
}

/// Relaxes `nodes` and returns their final positions in input order. Nodes
/// with a non-finite position or radius are skipped.
pub fn relax(nodes: &[LayoutNode], params: &LayoutParams) -> Vec<Placement> {
    let mut bodies: Vec<Body<'_>> = nodes
        .iter()
        .filter(|node| node.original.is_finite() && node.radius.is_finite() && node.radius >= 0.0)
        .map(|node| Body {
            key: &node.key,
            original: node.original,
            position: node.original,
            velocity: Point::default(),
            radius: node.radius,
        })
        .collect();

    separate_coincident(&mut bodies, params.jitter);

    let strength = params.strength.clamp(0.0, 1.0);
    let decay = 1.0 - params.velocity_decay.clamp(0.0, 1.0);
    let alpha_decay = if params.iterations == 0 {
        1.0
    } else {
        1.0 - 0.001f64.powf(1.0 / params.iterations as f64)
    };
    let mut alpha = 1.0;

    for _ in 0..params.iterations {
        alpha -= alpha * alpha_decay;
        pull(&mut bodies, strength * alpha);
        collide(&mut bodies, params.padding);
        for body in &mut bodies {
            body.velocity.x *= decay;
            body.velocity.y *= decay;
            body.position.x += body.velocity.x;
            body.position.y += body.velocity.y;
        }
    }

    for _ in 0..params.resolve_passes {
        if !resolve_overlaps(&mut bodies, params.padding) {
            break;
        }
    }

    separate_coincident(&mut bodies, params.jitter);

    bodies
        .into_iter()
        .map(|body| Placement {
            key: body.key.to_string(),
            position: body.position,
            original: body.original,
            radius: body.radius,
        })
        .collect()
}

fn pull(bodies: &mut [Body<'_>], factor: f64) {
    for body in bodies {
        body.velocity.x += (body.original.x - body.position.x) * factor;
        body.velocity.y += (body.original.y - body.position.y) * factor;
    }
}

/// Pairwise collision on the predicted positions, sharing the push in
/// proportion to the other circle's area.
fn collide(bodies: &mut [Body<'_>], padding: f64) {
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);

            let min = a.radius + b.radius + padding;
            let mut dx = (b.position.x + b.velocity.x) - (a.position.x + a.velocity.x);
            let mut dy = (b.position.y + b.velocity.y) - (a.position.y + a.velocity.y);
            let mut distance = dx.hypot(dy);
            if distance >= min {
                continue;
            }
            if distance < COINCIDENT_EPSILON {
                let nudge = hashed_direction(a.key, b.key);
                dx = nudge.x * COINCIDENT_EPSILON;
                dy = nudge.y * COINCIDENT_EPSILON;
                distance = COINCIDENT_EPSILON;
            }

            let push = (min - distance) / distance;
            let area_a = a.radius * a.radius;
            let area_b = b.radius * b.radius;
            let share_a = if area_a + area_b > 0.0 {
                area_b / (area_a + area_b)
            } else {
                0.5
            };

            a.velocity.x -= dx * push * share_a;
            a.velocity.y -= dy * push * share_a;
            b.velocity.x += dx * push * (1.0 - share_a);
            b.velocity.y += dy * push * (1.0 - share_a);
        }
    }
}

/// Moves overlapping pairs apart by half the overlap each. Returns whether
/// anything moved.
fn resolve_overlaps(bodies: &mut [Body<'_>], padding: f64) -> bool {
    let mut moved = false;
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            let (a, b) = (&mut head[i], &mut tail[0]);

            let min = a.radius + b.radius + padding;
            let mut dx = b.position.x - a.position.x;
            let mut dy = b.position.y - a.position.y;
            let mut distance = dx.hypot(dy);
            if distance >= min - 1e-9 {
                continue;
            }
            if distance < COINCIDENT_EPSILON {
                let nudge = hashed_direction(a.key, b.key);
                dx = nudge.x;
                dy = nudge.y;
                distance = 1.0;
            }

            let half = (min - distance) / 2.0;
            let (ux, uy) = (dx / distance, dy / distance);
            a.position.x -= ux * half;
            a.position.y -= uy * half;
            b.position.x += ux * half;
            b.position.y += uy * half;
            moved = true;
        }
    }
    moved
}

/// Gives every marker that shares a spot with an earlier one a small offset
/// so that each stays visible and clickable on its own.
fn separate_coincident(bodies: &mut [Body<'_>], jitter: f64) {
    for i in 1..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i);
        let body = &mut tail[0];
        let shared = head
            .iter()
            .filter(|other| other.position.distance(body.position) < COINCIDENT_EPSILON)
            .count();
        if shared == 0 {
            continue;
        }
        let direction = hashed_direction(body.key, "");
        let magnitude = jitter * shared as f64;
        body.position.x += direction.x * magnitude;
        body.position.y += direction.y * magnitude;
    }
}

/// Unit vector derived from a pair of keys.
fn hashed_direction(a: &str, b: &str) -> Point {
    let hash = a
        .bytes()
        .chain(b.bytes())
        .fold(0_u64, |acc, byte| acc.wrapping_mul(31).wrapping_add(u64::from(byte)));
    let angle = (hash % 3600) as f64 / 3600.0 * TAU;
    Point::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::projection::Projection;

    fn node(key: &str, x: f64, y: f64, radius: f64) -> LayoutNode {
        LayoutNode {
            key: key.to_string(),
            original: Point::new(x, y),
            radius,
        }
    }

    fn assert_separated(placements: &[Placement], tolerance: f64) {
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                let distance = a.position.distance(b.position);
                assert!(
                    distance >= a.radius + b.radius - tolerance,
                    "{} and {} overlap: {distance}",
                    a.key,
                    b.key
                );
            }
        }
    }

    #[test]
    fn isolated_markers_stay_put() {
        let nodes = vec![node("a", 10.0, 10.0, 3.0), node("b", 200.0, 150.0, 5.0)];
        let placements = relax(&nodes, &LayoutParams::default());
        for placement in &placements {
            assert!(placement.displacement() < 1e-9);
            assert!(!placement.is_displaced(LayoutParams::default().displacement_threshold));
        }
    }

    #[test]
    fn nearby_sites_are_pushed_apart_and_flagged() {
        let projection = Projection::fit(Size::new(960.0, 500.0), 0.0);
        let a = projection.project(-80.577, 28.561).unwrap();
        let b = projection.project(-80.576, 28.562).unwrap();
        let nodes = vec![node("LC-39A", a.x, a.y, 10.0), node("SLC-40", b.x, b.y, 10.0)];
        let params = LayoutParams::default();

        let placements = relax(&nodes, &params);

        assert_eq!(placements.len(), 2);
        let distance = placements[0].position.distance(placements[1].position);
        assert!(distance >= 20.0 - 1e-6, "distance {distance}");
        assert!(placements
            .iter()
            .all(|placement| placement.is_displaced(params.displacement_threshold)));
    }

    #[test]
    fn dense_cluster_ends_without_overlap() {
        let nodes: Vec<LayoutNode> = (0..12)
            .map(|i| {
                let offset = f64::from(i);
                node(&format!("site-{i}"), 100.0 + offset * 0.7, 80.0 + offset * 0.3, 4.0 + offset * 0.5)
            })
            .collect();

        let placements = relax(&nodes, &LayoutParams::default());

        assert_eq!(placements.len(), nodes.len());
        assert_separated(&placements, 1e-3);
    }

    #[test]
    fn coincident_markers_are_separated() {
        let nodes = vec![
            node("a", 50.0, 50.0, 2.0),
            node("b", 50.0, 50.0, 2.0),
            node("c", 50.0, 50.0, 2.0),
        ];
        let placements = relax(&nodes, &LayoutParams::default());
        assert_separated(&placements, 1e-3);
    }

    #[test]
    fn markers_stay_near_home() {
        let nodes = vec![node("a", 300.0, 200.0, 6.0), node("b", 301.0, 200.0, 6.0)];
        let placements = relax(&nodes, &LayoutParams::default());
        for placement in &placements {
            assert!(placement.displacement() < 13.0 + 1.0);
        }
    }

    #[test]
    fn relaxation_is_repeatable() {
        let nodes = vec![
            node("a", 10.0, 10.0, 5.0),
            node("b", 12.0, 11.0, 5.0),
            node("c", 11.0, 14.0, 3.0),
        ];
        let params = LayoutParams::default();
        assert_eq!(relax(&nodes, &params), relax(&nodes, &params));
    }

    #[test]
    fn undefined_positions_are_skipped() {
        let nodes = vec![
            node("ok", 10.0, 10.0, 5.0),
            node("nan", f64::NAN, 10.0, 5.0),
            node("inf", 10.0, f64::INFINITY, 5.0),
        ];
        let placements = relax(&nodes, &LayoutParams::default());
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].key, "ok");
    }
}
