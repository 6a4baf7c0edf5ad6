//! Shape hit-testing for the eraser, move and mark tools.
//!
//! Both queries walk the store back to front so the topmost shape wins.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use std::f64::consts::TAU;

use crate::consts::{SHAPE_PICK_RADIUS_PX, TEXT_CHAR_WIDTH_PX, TEXT_HEIGHT_PX};
use crate::doc::{ArcShape, Shape, ShapeList, TextShape};
use crate::geom::{self, Point};

/// Index of the topmost shape of any kind under `pos`.
#[must_use]
pub fn find_shape_at(pos: Point, shapes: &ShapeList) -> Option<usize> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, shape)| shape_contains(shape, pos))
        .map(|(index, _)| index)
}

/// Index of the topmost point or text under `pos`. Lines and arcs are not
/// movable.
#[must_use]
pub fn find_movable_shape_at(pos: Point, shapes: &ShapeList) -> Option<usize> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, shape)| matches!(shape, Shape::Point(_) | Shape::Text(_)) && shape_contains(shape, pos))
        .map(|(index, _)| index)
}

/// Index of the topmost point under `pos`.
#[must_use]
pub fn find_point_at(pos: Point, shapes: &ShapeList) -> Option<usize> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, shape)| matches!(shape, Shape::Point(p) if p.pos().distance(pos) < SHAPE_PICK_RADIUS_PX))
        .map(|(index, _)| index)
}

/// Index of the topmost line under `pos`.
#[must_use]
pub fn find_line_at(pos: Point, shapes: &ShapeList) -> Option<usize> {
    shapes
        .iter()
        .enumerate()
        .rev()
        .find(|(_, shape)| {
            matches!(shape, Shape::Line(l) if geom::point_segment_distance(pos, l.start(), l.end()) < SHAPE_PICK_RADIUS_PX)
        })
        .map(|(index, _)| index)
}

/// Estimated bounding box of a text label: `(min, max)` corners.
#[must_use]
pub fn text_bounds(text: &TextShape) -> (Point, Point) {
    #[allow(clippy::cast_precision_loss)]
    let width = text.content.chars().count() as f64 * TEXT_CHAR_WIDTH_PX;
    (Point::new(text.x, text.y), Point::new(text.x + width, text.y + TEXT_HEIGHT_PX))
}

fn shape_contains(shape: &Shape, pos: Point) -> bool {
    match shape {
        Shape::Point(p) => p.pos().distance(pos) < SHAPE_PICK_RADIUS_PX,
        Shape::Line(l) => geom::point_segment_distance(pos, l.start(), l.end()) < SHAPE_PICK_RADIUS_PX,
        Shape::Arc(a) => arc_contains(a, pos),
        Shape::Text(t) => {
            let (min, max) = text_bounds(t);
            (min.x..=max.x).contains(&pos.x) && (min.y..=max.y).contains(&pos.y)
        }
    }
}

fn arc_contains(arc: &ArcShape, pos: Point) -> bool {
    let center = Point::new(arc.cx, arc.cy);
    if (center.distance(pos) - arc.radius).abs() >= SHAPE_PICK_RADIUS_PX {
        return false;
    }
    angle_in_sweep(center.angle_to(pos), arc.start_angle, arc.end_angle)
}

/// Whether `angle` lies on the sweep from `start` to `end`, in either
/// direction. Sweeps of a full turn or more cover every angle.
fn angle_in_sweep(angle: f64, start: f64, end: f64) -> bool {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    if hi - lo >= TAU {
        return true;
    }
    let offset = (angle - lo).rem_euclid(TAU);
    offset <= hi - lo
}
