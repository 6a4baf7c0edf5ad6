//! Snap resolver: nearest point, else nearest line, within a threshold.
//!
//! Points always win over lines. A line snap projects onto the infinite
//! line through the stored segment, so instruments can slide past the drawn
//! endpoints while staying aligned.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::SNAP_THRESHOLD_PX;
use crate::doc::{Shape, ShapeList};
use crate::geom::{self, Point};

/// A resolved snap target. Absence of a nearby feature is `None`, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snap {
    /// Snapped exactly onto the point shape at `index`.
    Point { position: Point, index: usize },
    /// Snapped onto the line shape at `index`.
    Line {
        /// Query position projected onto the infinite line.
        position: Point,
        /// Direction of the line, `atan2(dy, dx)` from its stored start.
        angle: f64,
        /// `+1.0` or `-1.0`: which face of the line the query came from.
        side: f64,
        index: usize,
    },
}

impl Snap {
    #[must_use]
    pub fn position(&self) -> Point {
        match *self {
            Self::Point { position, .. } | Self::Line { position, .. } => position,
        }
    }

    /// Index of the shape that was snapped to.
    #[must_use]
    pub fn index(&self) -> usize {
        match *self {
            Self::Point { index, .. } | Self::Line { index, .. } => index,
        }
    }

    #[must_use]
    pub fn is_point(&self) -> bool {
        matches!(self, Self::Point { .. })
    }
}

/// Resolve a snap with the default threshold.
#[must_use]
pub fn get_snap(pos: Point, shapes: &ShapeList) -> Option<Snap> {
    get_snap_within(pos, shapes, SNAP_THRESHOLD_PX)
}

/// Resolve a snap for `pos` against `shapes`, considering only features
/// strictly closer than `threshold`.
#[must_use]
pub fn get_snap_within(pos: Point, shapes: &ShapeList, threshold: f64) -> Option<Snap> {
    snap_to_point(pos, shapes, threshold).or_else(|| snap_to_line(pos, shapes, threshold))
}

/// Point-only variant used by the compass tips.
#[must_use]
pub fn snap_to_point(pos: Point, shapes: &ShapeList, threshold: f64) -> Option<Snap> {
    let mut best: Option<(f64, usize, Point)> = None;
    for (index, shape) in shapes.iter().enumerate() {
        let Shape::Point(p) = shape else {
            continue;
        };
        let d = pos.distance(p.pos());
        if d < threshold && best.is_none_or(|(bd, _, _)| d < bd) {
            best = Some((d, index, p.pos()));
        }
    }
    best.map(|(_, index, position)| Snap::Point { position, index })
}

fn snap_to_line(pos: Point, shapes: &ShapeList, threshold: f64) -> Option<Snap> {
    let mut best: Option<(f64, usize)> = None;
    for (index, shape) in shapes.iter().enumerate() {
        let Shape::Line(l) = shape else {
            continue;
        };
        if l.start() == l.end() {
            continue;
        }
        let d = geom::point_segment_distance(pos, l.start(), l.end());
        if d < threshold && best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, index));
        }
    }

    let (_, index) = best?;
    let Some(Shape::Line(l)) = shapes.get(index) else {
        return None;
    };
    let (a, b) = (l.start(), l.end());
    let position = geom::project_onto_line(pos, a, b)?;
    let side = if geom::cross_side(pos, a, b) < 0.0 { -1.0 } else { 1.0 };
    Some(Snap::Line { position, angle: a.angle_to(b), side, index })
}
