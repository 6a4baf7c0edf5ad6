//! Set-square: a right isosceles triangle with the right angle at `corner`.
//!
//! Local frame: origin at the corner, the first leg along +x, the second
//! along +y, the hypotenuse on `x + y = size`.

#[cfg(test)]
#[path = "set_square_test.rs"]
mod set_square_test;

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

use serde::{Deserialize, Serialize};

use super::{DrawingEdge, RotationDrag};
use crate::consts::{BODY_TOLERANCE_PX, DRAWING_EDGE_PX, EDGE_ZONE_GAP_PX, HYPOTENUSE_ZONE_PX, ROTATE_ZONE_PX};
use crate::doc::{Shape, ShapeList};
use crate::geom::{self, Point};
use crate::snap::{self, Snap};

/// Interaction zones, in hit-test priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetSquareZone {
    /// Strip along the first leg.
    DrawingEdgeH,
    /// Strip along the second leg.
    DrawingEdgeV,
    Rotating,
    /// Slide along a captured line without turning.
    HorizontalMoving,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetSquareState {
    pub visible: bool,
    pub corner_x: f64,
    pub corner_y: f64,
    /// Leg length in pixels.
    pub size: f64,
    pub angle: f64,
}

impl Default for SetSquareState {
    fn default() -> Self {
        Self { visible: false, corner_x: 200.0, corner_y: 150.0, size: 300.0, angle: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetSquareDrag {
    Moving {
        grab_offset: Point,
    },
    HorizontalMoving {
        grab_offset: Point,
        /// Line the corner was snapped onto at the press, if any.
        line: Option<(Point, Point)>,
        /// Corner position once the press has been resolved.
        origin: Point,
    },
    Rotating(RotationDrag),
}

impl SetSquareState {
    #[must_use]
    pub fn corner(&self) -> Point {
        Point::new(self.corner_x, self.corner_y)
    }

    /// The three vertices: corner, end of the first leg, end of the second.
    #[must_use]
    pub fn vertices(&self) -> [Point; 3] {
        let corner = self.corner();
        [corner, corner.offset_polar(self.angle, self.size), corner.offset_polar(self.angle + FRAC_PI_2, self.size)]
    }

    /// The leg a drawing-edge zone draws along.
    #[must_use]
    pub fn drawing_edge(&self, zone: SetSquareZone) -> Option<DrawingEdge> {
        let [corner, h_end, v_end] = self.vertices();
        match zone {
            SetSquareZone::DrawingEdgeH => Some(DrawingEdge { start: corner, end: h_end }),
            SetSquareZone::DrawingEdgeV => Some(DrawingEdge { start: corner, end: v_end }),
            _ => None,
        }
    }

    /// Zone under `pos`, or `None` when hidden or missed.
    #[must_use]
    pub fn hit(&self, pos: Point) -> Option<SetSquareZone> {
        if !self.visible {
            return None;
        }
        let size = self.size;
        let local = geom::to_local(pos, self.corner(), self.angle);
        let in_body =
            local.x >= -BODY_TOLERANCE_PX && local.y >= -BODY_TOLERANCE_PX && local.x + local.y <= size + BODY_TOLERANCE_PX;
        if !in_body {
            return None;
        }

        let strip = (ROTATE_ZONE_PX + EDGE_ZONE_GAP_PX)..(size - ROTATE_ZONE_PX - EDGE_ZONE_GAP_PX);
        if local.y < DRAWING_EDGE_PX && strip.contains(&local.x) {
            return Some(SetSquareZone::DrawingEdgeH);
        }
        if local.x < DRAWING_EDGE_PX && strip.contains(&local.y) {
            return Some(SetSquareZone::DrawingEdgeV);
        }

        let near_vertex = [Point::new(0.0, 0.0), Point::new(size, 0.0), Point::new(0.0, size)]
            .iter()
            .any(|v| v.distance(local) < ROTATE_ZONE_PX);
        if near_vertex {
            return Some(SetSquareZone::Rotating);
        }
        if (local.x + local.y - size).abs() / SQRT_2 < HYPOTENUSE_ZONE_PX {
            return Some(SetSquareZone::HorizontalMoving);
        }
        Some(SetSquareZone::Moving)
    }

    /// Begin dragging `zone`. A hypotenuse press captures the line the
    /// corner currently snaps to and seats the corner on it.
    pub fn begin_drag(
        &mut self,
        zone: SetSquareZone,
        pos: Point,
        shapes: &ShapeList,
        threshold: f64,
    ) -> Option<SetSquareDrag> {
        let grab_offset = Point::new(pos.x - self.corner_x, pos.y - self.corner_y);
        match zone {
            SetSquareZone::Moving => Some(SetSquareDrag::Moving { grab_offset }),
            SetSquareZone::Rotating => Some(SetSquareDrag::Rotating(RotationDrag::new(self.corner(), self.angle, pos))),
            SetSquareZone::HorizontalMoving => {
                let mut line = None;
                if let Some(Snap::Line { position, index, .. }) = snap::get_snap_within(self.corner(), shapes, threshold) {
                    if let Some(Shape::Line(l)) = shapes.get(index) {
                        line = Some((l.start(), l.end()));
                        self.corner_x = position.x;
                        self.corner_y = position.y;
                    }
                }
                Some(SetSquareDrag::HorizontalMoving { grab_offset, line, origin: self.corner() })
            }
            SetSquareZone::DrawingEdgeH | SetSquareZone::DrawingEdgeV => None,
        }
    }

    /// Advance `drag` to the pointer at `pos`.
    pub fn drag(&mut self, drag: &SetSquareDrag, pos: Point, shapes: &ShapeList, threshold: f64) -> Option<Snap> {
        match *drag {
            SetSquareDrag::Moving { grab_offset } => {
                let candidate = pos.translate(-grab_offset.x, -grab_offset.y);
                let snapped = snap::get_snap_within(candidate, shapes, threshold);
                let corner = match snapped {
                    Some(Snap::Line { position, angle, side, .. }) => {
                        self.angle = if side >= 0.0 { angle } else { angle + PI };
                        position
                    }
                    Some(Snap::Point { position, .. }) => position,
                    None => candidate,
                };
                self.corner_x = corner.x;
                self.corner_y = corner.y;
                snapped
            }
            SetSquareDrag::HorizontalMoving { grab_offset, line, origin } => {
                let candidate = pos.translate(-grab_offset.x, -grab_offset.y);
                let corner = match line {
                    Some((a, b)) => geom::project_onto_line(candidate, a, b).unwrap_or(origin),
                    None => {
                        let leg = origin.offset_polar(self.angle, 1.0);
                        geom::project_onto_line(candidate, origin, leg).unwrap_or(origin)
                    }
                };
                self.corner_x = corner.x;
                self.corner_y = corner.y;
                None
            }
            SetSquareDrag::Rotating(rotation) => {
                self.angle = rotation.angle_at(pos);
                None
            }
        }
    }
}
