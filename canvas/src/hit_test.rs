use std::f64::consts::{FRAC_PI_2, PI};

use super::*;
use crate::doc::{DEFAULT_COLOR, LineShape, LineType, PointShape};

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn point(x: f64, y: f64) -> Shape {
    Shape::Point(PointShape { x, y, name: "A".to_owned(), color: DEFAULT_COLOR.to_owned(), angle_mark: None })
}

fn segment(x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    Shape::Line(LineShape {
        x1,
        y1,
        x2,
        y2,
        color: DEFAULT_COLOR.to_owned(),
        marking: 0,
        line_type: LineType::Segment,
        defining_points: None,
    })
}

fn arc(start_angle: f64, end_angle: f64) -> Shape {
    Shape::Arc(ArcShape {
        cx: 100.0,
        cy: 100.0,
        radius: 50.0,
        start_angle,
        end_angle,
        color: DEFAULT_COLOR.to_owned(),
    })
}

fn text(x: f64, y: f64, content: &str) -> Shape {
    Shape::Text(TextShape { x, y, content: content.to_owned(), color: DEFAULT_COLOR.to_owned() })
}

// =============================================================
// find_shape_at
// =============================================================

#[test]
fn empty_store_has_no_hit() {
    assert!(find_shape_at(pt(0.0, 0.0), &ShapeList::new()).is_none());
}

#[test]
fn point_within_pick_radius_hits() {
    let list = ShapeList::from_vec(vec![point(50.0, 50.0)]);
    assert_eq!(find_shape_at(pt(57.0, 50.0), &list), Some(0));
    assert!(find_shape_at(pt(60.0, 50.0), &list).is_none());
}

#[test]
fn topmost_shape_wins() {
    let list = ShapeList::from_vec(vec![segment(0.0, 50.0, 100.0, 50.0), point(50.0, 50.0)]);
    assert_eq!(find_shape_at(pt(50.0, 52.0), &list), Some(1));
}

#[test]
fn line_hit_uses_segment_distance() {
    let list = ShapeList::from_vec(vec![segment(0.0, 0.0, 100.0, 0.0)]);
    assert_eq!(find_shape_at(pt(50.0, 9.0), &list), Some(0));
    assert!(find_shape_at(pt(115.0, 0.0), &list).is_none());
}

#[test]
fn arc_hit_requires_ring_and_sweep() {
    let list = ShapeList::from_vec(vec![arc(0.0, FRAC_PI_2)]);
    // On the ring at 45 degrees.
    let on_ring = pt(100.0 + 50.0 * (PI / 4.0).cos(), 100.0 + 50.0 * (PI / 4.0).sin());
    assert_eq!(find_shape_at(on_ring, &list), Some(0));
    // Ring but outside the sweep.
    assert!(find_shape_at(pt(50.0, 100.0), &list).is_none());
    // Inside the sweep but far from the ring.
    assert!(find_shape_at(pt(110.0, 110.0), &list).is_none());
}

#[test]
fn reversed_arc_sweep_is_hit() {
    let list = ShapeList::from_vec(vec![arc(FRAC_PI_2, -FRAC_PI_2)]);
    assert_eq!(find_shape_at(pt(150.0, 100.0), &list), Some(0));
    assert!(find_shape_at(pt(50.0, 100.0), &list).is_none());
}

#[test]
fn arc_past_a_full_turn_covers_the_circle() {
    let list = ShapeList::from_vec(vec![arc(0.0, 7.0)]);
    assert_eq!(find_shape_at(pt(50.0, 100.0), &list), Some(0));
}

#[test]
fn text_hit_uses_estimated_bounds() {
    let list = ShapeList::from_vec(vec![text(10.0, 10.0, "abcd")]);
    assert_eq!(find_shape_at(pt(45.0, 25.0), &list), Some(0));
    assert!(find_shape_at(pt(47.0, 20.0), &list).is_none());
    assert!(find_shape_at(pt(20.0, 27.0), &list).is_none());
}

// =============================================================
// Filtered queries
// =============================================================

#[test]
fn movable_skips_lines_and_arcs() {
    let list = ShapeList::from_vec(vec![point(50.0, 50.0), segment(0.0, 50.0, 100.0, 50.0)]);
    assert_eq!(find_movable_shape_at(pt(50.0, 51.0), &list), Some(0));
    assert!(find_movable_shape_at(pt(80.0, 50.0), &list).is_none());
}

#[test]
fn point_and_line_queries_filter_by_kind() {
    let list = ShapeList::from_vec(vec![point(50.0, 50.0), segment(0.0, 50.0, 100.0, 50.0)]);
    assert_eq!(find_point_at(pt(50.0, 51.0), &list), Some(0));
    assert_eq!(find_line_at(pt(50.0, 51.0), &list), Some(1));
}

#[test]
fn text_bounds_scale_with_length() {
    let (min, max) = text_bounds(&TextShape {
        x: 0.0,
        y: 0.0,
        content: "hello".to_owned(),
        color: DEFAULT_COLOR.to_owned(),
    });
    assert_eq!(min, pt(0.0, 0.0));
    assert_eq!(max, pt(45.0, 16.0));
}
