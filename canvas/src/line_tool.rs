//! Two-click segment/line construction and the draw-along-an-edge gesture.
//!
//! Each click resolves an endpoint: an existing point when the click snaps
//! to one, otherwise a freshly named point appended at once so it shows
//! before the line is finished.

#[cfg(test)]
#[path = "line_tool_test.rs"]
mod line_tool_test;

use crate::config::EditorConfig;
use crate::consts::POINT_COINCIDENCE_EPS;
use crate::doc::{LineShape, LineType, PointShape, Shape, ShapeList, point_name};
use crate::geom::{self, Point};
use crate::instruments::DrawingEdge;
use crate::snap::{self, Snap};

/// Construction state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LineTool {
    #[default]
    Idle,
    AwaitingSecond {
        start: Point,
        start_name: String,
    },
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClick {
    /// First endpoint resolved; waiting for the second.
    Started,
    /// Line appended at this index.
    Committed(usize),
    /// The two endpoints were too close, or a full line missed the canvas.
    Degenerate,
}

impl LineTool {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::AwaitingSecond { .. })
    }

    /// Start point of the pending construction.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        match self {
            Self::Idle => None,
            Self::AwaitingSecond { start, .. } => Some(*start),
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Handle a click at `pos` with the tool in `mode`.
    pub fn click(
        &mut self,
        pos: Point,
        mode: LineType,
        shapes: &mut ShapeList,
        counter: &mut u32,
        color: &str,
        config: &EditorConfig,
    ) -> LineClick {
        let (end, end_name) = resolve_endpoint(pos, shapes, counter, color, config.snap_threshold_px);
        match std::mem::take(self) {
            Self::Idle => {
                *self = Self::AwaitingSecond { start: end, start_name: end_name };
                LineClick::Started
            }
            Self::AwaitingSecond { start, start_name } => {
                match build_line(start, end, [start_name, end_name], mode, color, config) {
                    Some(line) => LineClick::Committed(shapes.push(Shape::Line(line))),
                    None => LineClick::Degenerate,
                }
            }
        }
    }
}

/// Reuse the point `pos` snaps to, or append a new named point there.
pub fn resolve_endpoint(
    pos: Point,
    shapes: &mut ShapeList,
    counter: &mut u32,
    color: &str,
    threshold: f64,
) -> (Point, String) {
    if let Some(Snap::Point { position, index }) = snap::snap_to_point(pos, shapes, threshold) {
        if let Some(Shape::Point(p)) = shapes.get(index) {
            return (position, p.name.clone());
        }
    }
    let name = create_point(pos, shapes, counter, color);
    (pos, name)
}

/// Append a point named after the next counter value and return its name.
pub fn create_point(pos: Point, shapes: &mut ShapeList, counter: &mut u32, color: &str) -> String {
    *counter = counter.saturating_add(1);
    let name = point_name(*counter);
    shapes.push(Shape::Point(PointShape {
        x: pos.x,
        y: pos.y,
        name: name.clone(),
        color: color.to_owned(),
        angle_mark: None,
    }));
    name
}

/// Build the line through `a` and `b`. `None` when they coincide or, for a
/// full line, when the canvas clip is degenerate.
#[must_use]
pub fn build_line(
    a: Point,
    b: Point,
    names: [String; 2],
    mode: LineType,
    color: &str,
    config: &EditorConfig,
) -> Option<LineShape> {
    if a.distance(b) <= POINT_COINCIDENCE_EPS {
        return None;
    }
    let (p1, p2) = match mode {
        LineType::Segment => (a, b),
        LineType::Line => clip_to_canvas(a, b, config)?,
    };
    Some(LineShape {
        x1: p1.x,
        y1: p1.y,
        x2: p2.x,
        y2: p2.y,
        color: color.to_owned(),
        marking: 0,
        line_type: mode,
        defining_points: Some(names),
    })
}

/// Dashed preview from `start` toward the live pointer.
#[must_use]
pub fn preview(start: Point, pointer: Point, mode: LineType, config: &EditorConfig) -> Option<(Point, Point)> {
    match mode {
        LineType::Segment => Some((start, pointer)),
        LineType::Line => clip_to_canvas(start, pointer, config),
    }
}

fn clip_to_canvas(a: Point, b: Point, config: &EditorConfig) -> Option<(Point, Point)> {
    match geom::line_canvas_intersections(a, b, config.canvas_width, config.canvas_height).as_slice() {
        [p1, p2] => Some((*p1, *p2)),
        _ => None,
    }
}

// =============================================================
// Edge draw
// =============================================================

/// A segment being drawn along an instrument edge. The start is clamped to
/// the physical edge; the end may run past it along the edge's extension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDraw {
    pub edge: DrawingEdge,
    pub start: Point,
}

impl EdgeDraw {
    #[must_use]
    pub fn begin(edge: DrawingEdge, pos: Point) -> Self {
        Self { edge, start: edge.clamp(pos) }
    }

    /// End point for the pointer at `pos`.
    #[must_use]
    pub fn end_for(&self, pos: Point) -> Point {
        self.edge.extend(pos)
    }

    /// The finished segment, if it has any length.
    #[must_use]
    pub fn finish(&self, pos: Point, color: &str) -> Option<LineShape> {
        let end = self.end_for(pos);
        if self.start.distance(end) <= POINT_COINCIDENCE_EPS {
            return None;
        }
        Some(LineShape {
            x1: self.start.x,
            y1: self.start.y,
            x2: end.x,
            y2: end.y,
            color: color.to_owned(),
            marking: 0,
            line_type: LineType::Segment,
            defining_points: None,
        })
    }
}
