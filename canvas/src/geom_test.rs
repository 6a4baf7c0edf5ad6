#![allow(clippy::float_cmp)]

use std::f64::consts::{FRAC_PI_2, PI};

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn approx_pt(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

// =============================================================
// Point
// =============================================================

#[test]
fn distance_is_euclidean() {
    assert_eq!(pt(0.0, 0.0).distance(pt(3.0, 4.0)), 5.0);
}

#[test]
fn angle_to_follows_atan2() {
    assert!(approx(pt(0.0, 0.0).angle_to(pt(0.0, 10.0)), FRAC_PI_2));
    assert!(approx(pt(0.0, 0.0).angle_to(pt(-1.0, 0.0)), PI));
}

#[test]
fn offset_polar_moves_along_angle() {
    assert!(approx_pt(pt(10.0, 10.0).offset_polar(FRAC_PI_2, 5.0), pt(10.0, 15.0)));
}

// =============================================================
// Segment distance / projection
// =============================================================

#[test]
fn segment_distance_perpendicular_inside() {
    assert_eq!(point_segment_distance(pt(5.0, 3.0), pt(0.0, 0.0), pt(10.0, 0.0)), 3.0);
}

#[test]
fn segment_distance_clamps_past_endpoint() {
    assert_eq!(point_segment_distance(pt(13.0, 4.0), pt(0.0, 0.0), pt(10.0, 0.0)), 5.0);
}

#[test]
fn segment_distance_degenerate_segment_is_point_distance() {
    assert_eq!(point_segment_distance(pt(3.0, 4.0), pt(0.0, 0.0), pt(0.0, 0.0)), 5.0);
}

#[test]
fn project_onto_line_does_not_clamp() {
    let p = project_onto_line(pt(15.0, 7.0), pt(0.0, 0.0), pt(10.0, 0.0)).expect("line");
    assert!(approx_pt(p, pt(15.0, 0.0)));
}

#[test]
fn project_onto_line_degenerate_is_none() {
    assert!(project_onto_line(pt(1.0, 1.0), pt(2.0, 2.0), pt(2.0, 2.0)).is_none());
}

#[test]
fn project_onto_segment_clamps() {
    assert!(approx_pt(project_onto_segment(pt(-5.0, 2.0), pt(0.0, 0.0), pt(10.0, 0.0)), pt(0.0, 0.0)));
}

#[test]
fn cross_side_sign_flips_across_line() {
    let a = pt(0.0, 0.0);
    let b = pt(10.0, 0.0);
    assert!(cross_side(pt(5.0, 3.0), a, b) > 0.0);
    assert!(cross_side(pt(5.0, -3.0), a, b) < 0.0);
    assert_eq!(cross_side(pt(5.0, 0.0), a, b), 0.0);
}

// =============================================================
// Frames
// =============================================================

#[test]
fn local_world_round_trip() {
    let origin = pt(100.0, 50.0);
    let p = pt(130.0, 90.0);
    let local = to_local(p, origin, 0.7);
    assert!(approx_pt(to_world(local, origin, 0.7), p));
}

#[test]
fn to_local_quarter_turn() {
    // A point straight below the origin lies on the local x axis after a
    // quarter turn.
    let local = to_local(pt(0.0, 10.0), pt(0.0, 0.0), FRAC_PI_2);
    assert!(approx_pt(local, pt(10.0, 0.0)));
}

#[test]
fn wrap_angle_delta_stays_in_half_open_range() {
    assert!(approx(wrap_angle_delta(1.9 * PI), -0.1 * PI));
    assert!(approx(wrap_angle_delta(-1.9 * PI), 0.1 * PI));
    assert!(approx(wrap_angle_delta(PI), PI));
    assert!(approx(wrap_angle_delta(-PI), PI));
    assert!(approx(wrap_angle_delta(0.3), 0.3));
}

// =============================================================
// Canvas intersections
// =============================================================

#[test]
fn horizontal_line_spans_canvas_width() {
    let hits = line_canvas_intersections(pt(100.0, 100.0), pt(200.0, 100.0), 800.0, 600.0);
    assert_eq!(hits, vec![pt(0.0, 100.0), pt(800.0, 100.0)]);
}

#[test]
fn vertical_line_spans_canvas_height() {
    let hits = line_canvas_intersections(pt(50.0, 10.0), pt(50.0, 20.0), 800.0, 600.0);
    assert_eq!(hits, vec![pt(50.0, 0.0), pt(50.0, 600.0)]);
}

#[test]
fn diagonal_line_hits_two_edges() {
    let hits = line_canvas_intersections(pt(100.0, 100.0), pt(200.0, 200.0), 800.0, 600.0);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|p| approx_pt(*p, pt(0.0, 0.0))));
    assert!(hits.iter().any(|p| approx_pt(*p, pt(600.0, 600.0))));
}

#[test]
fn coincident_points_have_no_intersections() {
    assert!(line_canvas_intersections(pt(5.0, 5.0), pt(5.0, 5.0), 800.0, 600.0).is_empty());
}

#[test]
fn line_outside_canvas_has_no_intersections() {
    assert!(line_canvas_intersections(pt(-10.0, 0.0), pt(-10.0, 5.0), 800.0, 600.0).is_empty());
    assert!(line_canvas_intersections(pt(900.0, 0.0), pt(1000.0, 100.0), 800.0, 600.0).is_empty());
}

#[test]
fn line_through_corner_returns_far_pair() {
    let hits = line_canvas_intersections(pt(0.0, 600.0), pt(100.0, 500.0), 800.0, 600.0);
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().any(|p| approx_pt(*p, pt(0.0, 600.0))));
    assert!(hits.iter().any(|p| approx_pt(*p, pt(600.0, 0.0))));
}
