//! Pure 2D geometry: points, distances, projections and canvas clipping.
//!
//! Everything here works in canvas-local pixel coordinates (x right, y down)
//! and has no state.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::consts::AXIS_EPS;

/// A position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Direction angle of the vector from `self` to `other`.
    #[must_use]
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// The point `dist` away from `self` along `angle`.
    #[must_use]
    pub fn offset_polar(self, angle: f64, dist: f64) -> Point {
        Point::new(dist.mul_add(angle.cos(), self.x), dist.mul_add(angle.sin(), self.y))
    }

    #[must_use]
    pub fn translate(self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Distance from `p` to the segment `a`–`b` (clamped projection).
#[must_use]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    p.distance(project_onto_segment(p, a, b))
}

/// Projection of `p` onto the segment `a`–`b`, clamped to its endpoints.
#[must_use]
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Point {
    let Some(t) = projection_param(p, a, b) else {
        return a;
    };
    lerp(a, b, t.clamp(0.0, 1.0))
}

/// Projection of `p` onto the infinite line through `a` and `b`.
///
/// Returns `None` when `a` and `b` coincide.
#[must_use]
pub fn project_onto_line(p: Point, a: Point, b: Point) -> Option<Point> {
    projection_param(p, a, b).map(|t| lerp(a, b, t))
}

/// Signed 2D cross product of `b - a` with `p - a`.
///
/// Positive when `p` is on the clockwise side of `a → b` in canvas
/// coordinates (y down), negative on the other side, zero on the line.
#[must_use]
pub fn cross_side(p: Point, a: Point, b: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Express `p` in a frame with origin `origin` rotated by `angle`.
#[must_use]
pub fn to_local(p: Point, origin: Point, angle: f64) -> Point {
    let dx = p.x - origin.x;
    let dy = p.y - origin.y;
    let (sin, cos) = (-angle).sin_cos();
    Point::new(dx * cos - dy * sin, dx * sin + dy * cos)
}

/// Inverse of [`to_local`].
#[must_use]
pub fn to_world(local: Point, origin: Point, angle: f64) -> Point {
    let (sin, cos) = angle.sin_cos();
    Point::new(
        origin.x + local.x * cos - local.y * sin,
        origin.y + local.x * sin + local.y * cos,
    )
}

/// Wrap an angle difference into `(-π, π]`.
#[must_use]
pub fn wrap_angle_delta(delta: f64) -> f64 {
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Intersections of the infinite line through `p1` and `p2` with the
/// rectangle `[0, w] × [0, h]`.
///
/// Returns the entry and exit points, or an empty vector when the points
/// coincide or the line misses the rectangle (or only grazes a corner).
#[must_use]
pub fn line_canvas_intersections(p1: Point, p2: Point, w: f64, h: f64) -> Vec<Point> {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;

    if dx.abs() < AXIS_EPS && dy.abs() < AXIS_EPS {
        return Vec::new();
    }
    if dx.abs() < AXIS_EPS {
        if (0.0..=w).contains(&p1.x) {
            return vec![Point::new(p1.x, 0.0), Point::new(p1.x, h)];
        }
        return Vec::new();
    }
    if dy.abs() < AXIS_EPS {
        if (0.0..=h).contains(&p1.y) {
            return vec![Point::new(0.0, p1.y), Point::new(w, p1.y)];
        }
        return Vec::new();
    }

    let m = dy / dx;
    let c = p1.y - m * p1.x;

    let mut hits: Vec<Point> = Vec::with_capacity(4);
    let mut push_unique = |p: Point| {
        if !hits.iter().any(|q| (q.x - p.x).abs() < AXIS_EPS && (q.y - p.y).abs() < AXIS_EPS) {
            hits.push(p);
        }
    };

    let x_top = -c / m;
    if (0.0..=w).contains(&x_top) {
        push_unique(Point::new(x_top, 0.0));
    }
    let x_bottom = (h - c) / m;
    if (0.0..=w).contains(&x_bottom) {
        push_unique(Point::new(x_bottom, h));
    }
    if (0.0..=h).contains(&c) {
        push_unique(Point::new(0.0, c));
    }
    let y_right = m.mul_add(w, c);
    if (0.0..=h).contains(&y_right) {
        push_unique(Point::new(w, y_right));
    }

    if hits.len() < 2 {
        return Vec::new();
    }

    // More than two hits only happens through rounding near a corner; keep
    // the farthest pair as the true entry and exit.
    let mut best = (0, 1);
    let mut best_dist = 0.0;
    for i in 0..hits.len() {
        for j in (i + 1)..hits.len() {
            let d = hits[i].distance(hits[j]);
            if d > best_dist {
                best_dist = d;
                best = (i, j);
            }
        }
    }
    vec![hits[best.0], hits[best.1]]
}

fn projection_param(p: Point, a: Point, b: Point) -> Option<f64> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return None;
    }
    Some(((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq)
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(t.mul_add(b.x - a.x, a.x), t.mul_add(b.y - a.y, a.y))
}
