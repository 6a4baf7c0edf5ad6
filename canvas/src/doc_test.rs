#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn point(name: &str, x: f64, y: f64) -> Shape {
    Shape::Point(PointShape { x, y, name: name.to_owned(), color: DEFAULT_COLOR.to_owned(), angle_mark: None })
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

fn full_line(a: &str, b: &str, p1: Point, p2: Point) -> Shape {
    Shape::Line(LineShape {
        x1: p1.x,
        y1: p1.y,
        x2: p2.x,
        y2: p2.y,
        color: DEFAULT_COLOR.to_owned(),
        marking: 0,
        line_type: LineType::Line,
        defining_points: Some([a.to_owned(), b.to_owned()]),
    })
}

fn text(x: f64, y: f64, content: &str) -> Shape {
    Shape::Text(TextShape { x, y, content: content.to_owned(), color: DEFAULT_COLOR.to_owned() })
}

fn line_at(list: &ShapeList, index: usize) -> &LineShape {
    match list.get(index) {
        Some(Shape::Line(l)) => l,
        other => panic!("expected line at {index}, got {other:?}"),
    }
}

fn point_at(list: &ShapeList, index: usize) -> &PointShape {
    match list.get(index) {
        Some(Shape::Point(p)) => p,
        other => panic!("expected point at {index}, got {other:?}"),
    }
}

// =============================================================
// Point names
// =============================================================

#[test]
fn point_names_follow_letters_then_primes() {
    assert_eq!(point_name(1), "A");
    assert_eq!(point_name(26), "Z");
    assert_eq!(point_name(27), "A'");
    assert_eq!(point_name(52), "Z'");
    assert_eq!(point_name(53), "A''");
}

#[test]
fn point_name_zero_is_empty() {
    assert_eq!(point_name(0), "");
}

#[test]
fn point_numbers_invert_names() {
    assert_eq!(point_number("A"), 1);
    assert_eq!(point_number("Z"), 26);
    assert_eq!(point_number("A'"), 27);
    assert_eq!(point_number("Z'"), 52);
    for n in 1..200 {
        assert_eq!(point_number(&point_name(n)), n);
    }
}

#[test]
fn point_number_rejects_foreign_names() {
    assert_eq!(point_number(""), 0);
    assert_eq!(point_number("a"), 0);
    assert_eq!(point_number("AB"), 0);
}

// =============================================================
// Serde
// =============================================================

#[test]
fn shape_serializes_with_type_tag() {
    let value = serde_json::to_value(point("A", 1.0, 2.0)).expect("encode");
    assert_eq!(value["type"], "point");
    assert_eq!(value["name"], "A");
    assert!(value.get("angleMark").is_none());
}

#[test]
fn line_serializes_camel_case_fields() {
    let value = serde_json::to_value(full_line("A", "B", Point::new(0.0, 1.0), Point::new(2.0, 3.0))).expect("encode");
    assert_eq!(value["type"], "line");
    assert_eq!(value["lineType"], "line");
    assert_eq!(value["definingPoints"], json!(["A", "B"]));
    assert_eq!(value["marking"], 0);
}

#[test]
fn legacy_line_defaults_to_segment() {
    let shape: Shape =
        serde_json::from_value(json!({"type": "line", "x1": 0, "y1": 0, "x2": 5, "y2": 5})).expect("decode");
    let Shape::Line(l) = shape else {
        panic!("expected line");
    };
    assert_eq!(l.line_type, LineType::Segment);
    assert_eq!(l.marking, 0);
    assert_eq!(l.color, DEFAULT_COLOR);
    assert!(l.defining_points.is_none());
}

#[test]
fn angle_mark_accepts_name_object_and_none() {
    let cases = [
        (json!("double"), Some(AngleMark::Double)),
        (json!({"type": "right"}), Some(AngleMark::Right)),
        (json!("none"), None),
        (json!(null), None),
    ];
    for (mark, expected) in cases {
        let shape: Shape =
            serde_json::from_value(json!({"type": "point", "x": 0, "y": 0, "name": "A", "angleMark": mark}))
                .expect("decode");
        let Shape::Point(p) = shape else {
            panic!("expected point");
        };
        assert_eq!(p.angle_mark, expected);
    }
}

#[test]
fn angle_mark_rejects_unknown_name() {
    let res: Result<Shape, _> =
        serde_json::from_value(json!({"type": "point", "x": 0, "y": 0, "angleMark": "triple"}));
    assert!(res.is_err());
}

#[test]
fn arc_and_text_decode() {
    let arc: Shape = serde_json::from_value(
        json!({"type": "arc", "cx": 1, "cy": 2, "radius": 3, "startAngle": 0.5, "endAngle": 1.5, "color": "#808080"}),
    )
    .expect("decode arc");
    assert!(matches!(arc, Shape::Arc(ArcShape { radius, .. }) if radius == 3.0));

    let t: Shape = serde_json::from_value(json!({"type": "text", "x": 4, "y": 5, "content": "hi"})).expect("decode text");
    assert!(matches!(t, Shape::Text(TextShape { ref content, .. }) if content == "hi"));
}

// =============================================================
// Marking cycles
// =============================================================

#[test]
fn angle_mark_cycle_returns_to_none_after_four_steps() {
    let mut mark = None;
    let mut seen = Vec::new();
    for _ in 0..4 {
        mark = AngleMark::cycle(mark);
        seen.push(mark);
    }
    assert_eq!(seen, vec![Some(AngleMark::Single), Some(AngleMark::Double), Some(AngleMark::Right), None]);
}

#[test]
fn cycle_angle_mark_requires_two_incident_lines() {
    let mut list = ShapeList::new();
    let p = list.push(point("A", 100.0, 100.0));
    list.push(segment(100.0, 100.0, 200.0, 100.0));
    assert!(!list.cycle_angle_mark(p));

    list.push(segment(100.0, 100.0, 100.0, 200.0));
    assert!(list.cycle_angle_mark(p));
    assert_eq!(point_at(&list, p).angle_mark, Some(AngleMark::Single));

    list.push(segment(100.5, 100.0, 50.0, 50.0));
    assert!(!list.cycle_angle_mark(p));
}

#[test]
fn cycle_line_marking_wraps_after_three() {
    let mut list = ShapeList::new();
    let l = list.push(segment(0.0, 0.0, 10.0, 0.0));
    for expected in [1, 2, 3, 0] {
        assert!(list.cycle_line_marking(l));
        assert_eq!(line_at(&list, l).marking, expected);
    }
}

#[test]
fn cycle_line_marking_ignores_non_lines() {
    let mut list = ShapeList::new();
    let p = list.push(point("A", 0.0, 0.0));
    assert!(!list.cycle_line_marking(p));
}

// =============================================================
// Incidence and cascade delete
// =============================================================

#[test]
fn incidence_uses_one_pixel_tolerance() {
    let l = LineShape {
        x1: 0.0,
        y1: 0.0,
        x2: 10.0,
        y2: 0.0,
        color: DEFAULT_COLOR.to_owned(),
        marking: 0,
        line_type: LineType::Segment,
        defining_points: None,
    };
    assert!(l.is_incident_to(Point::new(0.5, 0.5)));
    assert!(!l.is_incident_to(Point::new(1.0, 0.0)));
    assert_eq!(l.far_end_from(Point::new(10.0, 0.2)), Point::new(0.0, 0.0));
}

#[test]
fn removing_point_cascades_to_incident_lines() {
    let mut list = ShapeList::new();
    list.push(point("A", 100.0, 100.0));
    list.push(point("B", 300.0, 300.0));
    list.push(segment(100.0, 100.0, 200.0, 100.0));
    list.push(segment(50.0, 50.0, 100.4, 100.0));
    list.push(segment(300.0, 300.0, 400.0, 300.0));
    list.push(text(10.0, 10.0, "note"));

    let removed = list.remove_cascade(0);
    assert_eq!(removed.len(), 3);
    assert!(matches!(removed[0], Shape::Point(ref p) if p.name == "A"));
    assert_eq!(list.len(), 3);
    assert!(list.point_named("B").is_some());
    assert_eq!(list.lines().count(), 1);
}

#[test]
fn removing_line_leaves_points() {
    let mut list = ShapeList::new();
    list.push(point("A", 0.0, 0.0));
    let l = list.push(segment(0.0, 0.0, 10.0, 0.0));
    assert_eq!(list.remove_cascade(l).len(), 1);
    assert_eq!(list.len(), 1);
}

#[test]
fn remove_out_of_range_is_noop() {
    let mut list = ShapeList::new();
    assert!(list.remove_cascade(3).is_empty());
}

#[test]
fn max_point_number_tracks_names() {
    let mut list = ShapeList::new();
    assert_eq!(list.max_point_number(), 0);
    list.push(point("C", 0.0, 0.0));
    list.push(point("A'", 0.0, 0.0));
    list.push(point("B", 0.0, 0.0));
    assert_eq!(list.max_point_number(), 27);
}

// =============================================================
// Moving
// =============================================================

#[test]
fn moving_point_drags_attached_segment_endpoints() {
    let mut list = ShapeList::new();
    let a = list.push(point("A", 100.0, 100.0));
    let s = list.push(segment(100.0, 100.0, 200.0, 100.0));
    let other = list.push(segment(300.0, 300.0, 400.0, 300.0));

    assert!(list.move_shape(a, Point::new(120.0, 140.0), 800.0, 600.0));
    assert_eq!(point_at(&list, a).pos(), Point::new(120.0, 140.0));
    assert_eq!(line_at(&list, s).start(), Point::new(120.0, 140.0));
    assert_eq!(line_at(&list, s).end(), Point::new(200.0, 100.0));
    assert_eq!(line_at(&list, other).start(), Point::new(300.0, 300.0));
}

#[test]
fn moving_point_reprojects_full_lines_it_defines() {
    let mut list = ShapeList::new();
    let a = list.push(point("A", 100.0, 100.0));
    list.push(point("B", 200.0, 100.0));
    let l = list.push(full_line("A", "B", Point::new(0.0, 100.0), Point::new(800.0, 100.0)));

    assert!(list.move_shape(a, Point::new(100.0, 200.0), 800.0, 600.0));
    let line = line_at(&list, l);
    let expected = geom::line_canvas_intersections(Point::new(100.0, 200.0), Point::new(200.0, 100.0), 800.0, 600.0);
    assert_eq!(vec![line.start(), line.end()], expected);
}

#[test]
fn degenerate_reprojection_keeps_previous_coordinates() {
    let mut list = ShapeList::new();
    let a = list.push(point("A", 100.0, 100.0));
    list.push(point("B", 200.0, 100.0));
    let l = list.push(full_line("A", "B", Point::new(0.0, 100.0), Point::new(800.0, 100.0)));

    assert!(list.move_shape(a, Point::new(200.0, 100.0), 800.0, 600.0));
    let line = line_at(&list, l);
    assert_eq!(line.start(), Point::new(0.0, 100.0));
    assert_eq!(line.end(), Point::new(800.0, 100.0));
}

#[test]
fn moving_text_relocates_anchor() {
    let mut list = ShapeList::new();
    let t = list.push(text(10.0, 10.0, "hello"));
    assert!(list.move_shape(t, Point::new(50.0, 60.0), 800.0, 600.0));
    assert!(matches!(list.get(t), Some(Shape::Text(TextShape { x, y, .. })) if *x == 50.0 && *y == 60.0));
}

#[test]
fn lines_and_arcs_are_not_movable() {
    let mut list = ShapeList::new();
    let l = list.push(segment(0.0, 0.0, 10.0, 0.0));
    assert!(!list.move_shape(l, Point::new(5.0, 5.0), 800.0, 600.0));
}
