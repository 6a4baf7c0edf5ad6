//! Compass: a needle tip (`center`), a pencil tip and a derived hinge.
//!
//! The hinge is not part of the state. It is constructed perpendicular to
//! the center–pencil midpoint and only matters for rendering and for the
//! rotate zone.

#[cfg(test)]
#[path = "compass_test.rs"]
mod compass_test;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::consts::{
    COMPASS_CLOSED_HINGE_OFFSET_PX, COMPASS_HANDLE_RADIUS_PX, COMPASS_HINGE_HEIGHT_RATIO,
    COMPASS_HINGE_MIN_HEIGHT_PX, COMPASS_LEG_RADIUS_PX, COMPASS_MIN_SWEEP_RAD,
};
use crate::doc::{ArcShape, DEFAULT_COLOR, ShapeList};
use crate::geom::{self, Point};
use crate::snap::{self, Snap};

/// Interaction zones, in hit-test priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassZone {
    Rotating,
    Resizing,
    Moving,
}

/// Compass placement. Both tips are `None` until the first placement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompassState {
    pub center: Option<Point>,
    pub pencil: Option<Point>,
    /// Always `|pencil - center|` after a mutation.
    pub radius: f64,
}

/// Context for one compass drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassDrag {
    pub zone: CompassZone,
    /// Pointer minus center at the press.
    grab_offset: Point,
    /// Radius captured at the press; held fixed while rotating.
    radius: f64,
    /// Pencil angle at the press.
    pub start_angle: f64,
    /// Unwrapped pencil angle so far.
    pub end_angle: f64,
    /// `end_angle` wrapped to the pointer's last angle around the center.
    last_angle: f64,
}

impl CompassDrag {
    fn new(zone: CompassZone, state: &CompassState, center: Point, pencil: Point, pointer: Point) -> Self {
        let start_angle = center.angle_to(pencil);
        Self {
            zone,
            grab_offset: Point::new(pointer.x - center.x, pointer.y - center.y),
            radius: state.radius,
            start_angle,
            end_angle: start_angle,
            last_angle: start_angle,
        }
    }

    /// Radius captured when the drag began.
    #[must_use]
    pub fn start_radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

impl CompassState {
    #[must_use]
    pub fn is_placed(&self) -> bool {
        self.center.is_some() && self.pencil.is_some()
    }

    /// The constructed hinge point, if the compass is placed.
    #[must_use]
    pub fn hinge(&self) -> Option<Point> {
        let (center, pencil) = (self.center?, self.pencil?);
        let radius = center.distance(pencil);
        if radius < 1.0 {
            return Some(center.translate(0.0, -COMPASS_CLOSED_HINGE_OFFSET_PX));
        }
        let mid = Point::new((center.x + pencil.x) * 0.5, (center.y + pencil.y) * 0.5);
        let (perp_x, perp_y) = (-(pencil.y - center.y) / radius, (pencil.x - center.x) / radius);
        let height = (radius * COMPASS_HINGE_HEIGHT_RATIO).max(COMPASS_HINGE_MIN_HEIGHT_PX);
        Some(mid.translate(perp_x * height, perp_y * height))
    }

    /// Zone under `pos`: the three handles first, then the two legs.
    #[must_use]
    pub fn hit(&self, pos: Point) -> Option<CompassZone> {
        let (center, pencil, hinge) = (self.center?, self.pencil?, self.hinge()?);
        if pos.distance(hinge) < COMPASS_HANDLE_RADIUS_PX {
            return Some(CompassZone::Rotating);
        }
        if pos.distance(pencil) < COMPASS_HANDLE_RADIUS_PX {
            return Some(CompassZone::Resizing);
        }
        if pos.distance(center) < COMPASS_HANDLE_RADIUS_PX {
            return Some(CompassZone::Moving);
        }
        if geom::point_segment_distance(pos, center, hinge) < COMPASS_LEG_RADIUS_PX {
            return Some(CompassZone::Moving);
        }
        if geom::point_segment_distance(pos, pencil, hinge) < COMPASS_LEG_RADIUS_PX {
            return Some(CompassZone::Resizing);
        }
        None
    }

    /// First placement: both tips at `pos`, radius 0, and a resize drag so
    /// the user can open the compass in the same gesture.
    pub fn place(&mut self, pos: Point) -> CompassDrag {
        self.center = Some(pos);
        self.pencil = Some(pos);
        self.radius = 0.0;
        CompassDrag::new(CompassZone::Resizing, self, pos, pos, pos)
    }

    /// Begin dragging `zone`. Returns `None` if the compass is not placed.
    #[must_use]
    pub fn begin_drag(&self, zone: CompassZone, pos: Point) -> Option<CompassDrag> {
        let (center, pencil) = (self.center?, self.pencil?);
        Some(CompassDrag::new(zone, self, center, pencil, pos))
    }

    /// Advance `drag` to the pointer at `pos`. Tips snap to points only.
    pub fn drag(&mut self, drag: &mut CompassDrag, pos: Point, shapes: &ShapeList, threshold: f64) -> Option<Snap> {
        let (Some(center), Some(pencil)) = (self.center, self.pencil) else {
            return None;
        };
        let snapped = match drag.zone {
            CompassZone::Moving => {
                let candidate = pos.translate(-drag.grab_offset.x, -drag.grab_offset.y);
                let snapped = snap::snap_to_point(candidate, shapes, threshold);
                let new_center = snapped.map_or(candidate, |s| s.position());
                self.center = Some(new_center);
                self.pencil = Some(pencil.translate(new_center.x - center.x, new_center.y - center.y));
                snapped
            }
            CompassZone::Resizing => {
                let snapped = snap::snap_to_point(pos, shapes, threshold);
                self.pencil = Some(snapped.map_or(pos, |s| s.position()));
                snapped
            }
            CompassZone::Rotating => {
                // The pencil lands on the pointer's own angle; only the
                // accumulated sweep is unwrapped.
                let pointer_angle = center.angle_to(pos);
                drag.end_angle += geom::wrap_angle_delta(pointer_angle - drag.last_angle);
                drag.last_angle = pointer_angle;
                self.pencil = Some(center.offset_polar(drag.end_angle, drag.radius));
                None
            }
        };
        self.sync_radius();
        snapped
    }

    /// Finish `drag`. A rotation with a real sweep yields the traced arc; a
    /// resize that never opened the compass springs it to the default radius.
    pub fn end_drag(&mut self, drag: &CompassDrag, color: &str, config: &EditorConfig) -> Option<ArcShape> {
        let center = self.center?;
        match drag.zone {
            CompassZone::Rotating if drag.sweep().abs() > COMPASS_MIN_SWEEP_RAD => Some(ArcShape {
                cx: center.x,
                cy: center.y,
                radius: drag.radius,
                start_angle: drag.start_angle,
                end_angle: drag.end_angle,
                color: arc_color(color, config),
            }),
            CompassZone::Resizing if self.radius < config.compass_min_radius => {
                self.pencil = Some(center.translate(config.default_compass_radius, 0.0));
                self.sync_radius();
                None
            }
            _ => None,
        }
    }

    /// Remove the compass from the canvas.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn sync_radius(&mut self) {
        self.radius = match (self.center, self.pencil) {
            (Some(c), Some(p)) => c.distance(p),
            _ => 0.0,
        };
    }
}

fn arc_color(color: &str, config: &EditorConfig) -> String {
    if color.eq_ignore_ascii_case(DEFAULT_COLOR) {
        config.compass_black_ink_fallback.clone()
    } else {
        color.to_owned()
    }
}
