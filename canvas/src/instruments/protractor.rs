//! Protractor: a semicircle whose flat edge passes through its center.
//!
//! The body lies on the local `y ≤ 0` side of the center.

#[cfg(test)]
#[path = "protractor_test.rs"]
mod protractor_test;

use serde::{Deserialize, Serialize};

use super::RotationDrag;
use crate::consts::PROTRACTOR_MOVE_RATIO;
use crate::geom::{self, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtractorZone {
    Moving,
    Rotating,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtractorState {
    pub visible: bool,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub angle: f64,
}

impl Default for ProtractorState {
    fn default() -> Self {
        Self { visible: false, center_x: 400.0, center_y: 350.0, radius: 150.0, angle: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProtractorDrag {
    Moving { grab_offset: Point },
    Rotating(RotationDrag),
}

impl ProtractorState {
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// The inner disc moves the protractor, the outer ring turns it.
    #[must_use]
    pub fn hit(&self, pos: Point) -> Option<ProtractorZone> {
        if !self.visible {
            return None;
        }
        let local = geom::to_local(pos, self.center(), self.angle);
        let dist = local.x.hypot(local.y);
        if dist > self.radius || local.y > 0.0 {
            return None;
        }
        if dist < self.radius * PROTRACTOR_MOVE_RATIO {
            Some(ProtractorZone::Moving)
        } else {
            Some(ProtractorZone::Rotating)
        }
    }

    #[must_use]
    pub fn begin_drag(&self, zone: ProtractorZone, pos: Point) -> ProtractorDrag {
        match zone {
            ProtractorZone::Moving => {
                ProtractorDrag::Moving { grab_offset: Point::new(pos.x - self.center_x, pos.y - self.center_y) }
            }
            ProtractorZone::Rotating => ProtractorDrag::Rotating(RotationDrag::new(self.center(), self.angle, pos)),
        }
    }

    /// Advance `drag`. The protractor never snaps.
    pub fn drag(&mut self, drag: &ProtractorDrag, pos: Point) {
        match *drag {
            ProtractorDrag::Moving { grab_offset } => {
                self.center_x = pos.x - grab_offset.x;
                self.center_y = pos.y - grab_offset.y;
            }
            ProtractorDrag::Rotating(rotation) => self.angle = rotation.angle_at(pos),
        }
    }
}
