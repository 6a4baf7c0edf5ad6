//! Ruler: a graduated rectangle anchored at its "0" mark.
//!
//! Local frame: origin at the zero mark, +x along the graduated edge, +y
//! across the body. The graduated edge is the local segment `y = 0`,
//! `0 ≤ x ≤ length`.

#[cfg(test)]
#[path = "ruler_test.rs"]
mod ruler_test;

use serde::{Deserialize, Serialize};

use super::{DrawingEdge, RotationDrag};
use crate::consts::{BODY_TOLERANCE_PX, DRAWING_EDGE_PX, ROTATE_ZONE_PX};
use crate::doc::ShapeList;
use crate::geom::{self, Point};
use crate::snap::{self, Snap};

/// Interaction zones, in hit-test priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulerZone {
    Rotating,
    DrawingEdge,
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulerState {
    pub visible: bool,
    pub zero_x: f64,
    pub zero_y: f64,
    pub max_length_cm: f64,
    pub height: f64,
    /// Rotation of the graduated edge from the +x axis, radians.
    pub angle: f64,
}

impl Default for RulerState {
    fn default() -> Self {
        Self { visible: false, zero_x: 100.0, zero_y: 300.0, max_length_cm: 15.0, height: 60.0, angle: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RulerDrag {
    Moving { grab_offset: Point },
    Rotating(RotationDrag),
}

impl RulerState {
    #[must_use]
    pub fn zero(&self) -> Point {
        Point::new(self.zero_x, self.zero_y)
    }

    #[must_use]
    pub fn length_px(&self, pixels_per_cm: f64) -> f64 {
        self.max_length_cm * pixels_per_cm
    }

    /// The graduated edge in canvas coordinates.
    #[must_use]
    pub fn drawing_edge(&self, pixels_per_cm: f64) -> DrawingEdge {
        let start = self.zero();
        DrawingEdge { start, end: start.offset_polar(self.angle, self.length_px(pixels_per_cm)) }
    }

    /// Zone under `pos`, or `None` when hidden or missed.
    #[must_use]
    pub fn hit(&self, pos: Point, pixels_per_cm: f64) -> Option<RulerZone> {
        if !self.visible {
            return None;
        }
        let length = self.length_px(pixels_per_cm);
        let local = geom::to_local(pos, self.zero(), self.angle);
        let in_body = (-BODY_TOLERANCE_PX..=length + BODY_TOLERANCE_PX).contains(&local.x)
            && (-BODY_TOLERANCE_PX..=self.height).contains(&local.y);
        if !in_body {
            return None;
        }
        if local.x > length - ROTATE_ZONE_PX {
            Some(RulerZone::Rotating)
        } else if local.y < DRAWING_EDGE_PX {
            Some(RulerZone::DrawingEdge)
        } else {
            Some(RulerZone::Moving)
        }
    }

    /// Begin dragging `zone`. Drawing-edge presses do not move the ruler.
    #[must_use]
    pub fn begin_drag(&self, zone: RulerZone, pos: Point) -> Option<RulerDrag> {
        match zone {
            RulerZone::Moving => {
                Some(RulerDrag::Moving { grab_offset: Point::new(pos.x - self.zero_x, pos.y - self.zero_y) })
            }
            RulerZone::Rotating => Some(RulerDrag::Rotating(RotationDrag::new(self.zero(), self.angle, pos))),
            RulerZone::DrawingEdge => None,
        }
    }

    /// Advance `drag` to the pointer at `pos`.
    ///
    /// While moving, the zero mark snaps to points (angle kept) or lines
    /// (zero projected onto the line and the ruler turned to its angle).
    pub fn drag(&mut self, drag: &RulerDrag, pos: Point, shapes: &ShapeList, threshold: f64) -> Option<Snap> {
        match *drag {
            RulerDrag::Moving { grab_offset } => {
                let candidate = pos.translate(-grab_offset.x, -grab_offset.y);
                let snapped = snap::get_snap_within(candidate, shapes, threshold);
                let zero = match snapped {
                    Some(Snap::Line { position, angle, .. }) => {
                        self.angle = angle;
                        position
                    }
                    Some(Snap::Point { position, .. }) => position,
                    None => candidate,
                };
                self.zero_x = zero.x;
                self.zero_y = zero.y;
                snapped
            }
            RulerDrag::Rotating(rotation) => {
                self.angle = rotation.angle_at(pos);
                None
            }
        }
    }

    /// Set the graduated length. Non-positive or non-finite values are
    /// ignored; returns whether the length changed.
    pub fn set_length_cm(&mut self, cm: f64) -> bool {
        if !(cm.is_finite() && cm > 0.0) || cm == self.max_length_cm {
            return false;
        }
        self.max_length_cm = cm;
        true
    }
}
