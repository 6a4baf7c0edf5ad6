//! Virtual drafting instruments.
//!
//! Each instrument owns a small state record (persisted in history and in
//! session files), a hit-test mapping a pointer position to a named zone,
//! and drag handlers that advance that zone under pointer movement. Drag
//! context lives in a per-instrument `*Drag` value held by the gesture state
//! machine between pointer-down and pointer-up.
//!
//! Rendering lives in [`crate::render`].

pub mod compass;
pub mod protractor;
pub mod ruler;
pub mod set_square;


use crate::geom::{self, Point};

pub use compass::{CompassDrag, CompassState, CompassZone};
pub use protractor::{ProtractorDrag, ProtractorState, ProtractorZone};
pub use ruler::{RulerDrag, RulerState, RulerZone};
pub use set_square::{SetSquareDrag, SetSquareState, SetSquareZone};

/// Which instrument a gesture engaged. Also the dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instrument {
    Ruler,
    Compass,
    Protractor,
    SetSquare,
}

/// A straight instrument edge that can be drawn along.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingEdge {
    pub start: Point,
    pub end: Point,
}

impl DrawingEdge {
    /// Project `p` onto the physical edge, clamped to its extent.
    #[must_use]
    pub fn clamp(&self, p: Point) -> Point {
        geom::project_onto_segment(p, self.start, self.end)
    }

    /// Project `p` onto the infinite extension of the edge.
    #[must_use]
    pub fn extend(&self, p: Point) -> Point {
        geom::project_onto_line(p, self.start, self.end).unwrap_or(self.start)
    }

    #[must_use]
    pub fn angle(&self) -> f64 {
        self.start.angle_to(self.end)
    }
}

/// Delta-based rotation around a fixed pivot: the instrument turns by as
/// much as the pointer's angle around the pivot has changed since the press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationDrag {
    pivot: Point,
    start_angle: f64,
    start_pointer_angle: f64,
}

impl RotationDrag {
    #[must_use]
    pub fn new(pivot: Point, angle: f64, pointer: Point) -> Self {
        Self { pivot, start_angle: angle, start_pointer_angle: pivot.angle_to(pointer) }
    }

    /// Instrument angle for the pointer at `pointer`.
    #[must_use]
    pub fn angle_at(&self, pointer: Point) -> f64 {
        self.start_angle + (self.pivot.angle_to(pointer) - self.start_pointer_angle)
    }
}
