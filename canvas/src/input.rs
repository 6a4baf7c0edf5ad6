//! Input model: tools, modifier keys, mouse buttons, UI state and the
//! gesture state machine.
//!
//! `Tool` is the user's selected intent. Instruments are not tools: they are
//! visibility toggles that intercept presses on themselves whatever tool is
//! selected. `InputState` is the gesture tracked between pointer-down and
//! pointer-up, carrying the drag context of whichever instrument or shape
//! was engaged.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::instruments::{CompassDrag, Instrument, ProtractorDrag, RulerDrag, SetSquareDrag};
use crate::line_tool::EdgeDraw;
use crate::snap::Snap;

/// Which tool is currently active. "No tool" is `Option::<Tool>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Place a named point.
    Point,
    /// Ask the host for a text label.
    Text,
    /// Drag a point or a text label.
    Move,
    /// Delete the topmost shape under the pointer.
    Eraser,
    /// Two-click bounded segment.
    Segment,
    /// Two-click full line clipped to the canvas.
    Line,
    /// Place the compass.
    Compass,
    /// Cycle angle and length codings.
    Mark,
}

impl Tool {
    pub const ALL: [Tool; 8] =
        [Self::Point, Self::Text, Self::Move, Self::Eraser, Self::Segment, Self::Line, Self::Compass, Self::Mark];

    /// Toolbar name, as used in recordings.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Text => "text",
            Self::Move => "move",
            Self::Eraser => "eraser",
            Self::Segment => "segment",
            Self::Line => "line",
            Self::Compass => "compass",
            Self::Mark => "mark",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Whether this tool runs the two-click line construction.
    #[must_use]
    pub fn is_line_construction(self) -> bool {
        matches!(self, Self::Segment | Self::Line)
    }
}

/// Background grid drawn under the construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    #[default]
    None,
    /// Centimeter squares.
    Cm,
    /// Centered axes with centimeter ticks.
    Orthonormal,
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on Windows/Linux, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"z"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Option<Tool>,
    /// Drawing color, `#RRGGBB`.
    pub color: String,
    pub grid: GridMode,
    /// Last known pointer position.
    pub pointer: Option<Point>,
    /// Feature the active gesture is snapped to, for highlighting.
    pub snap: Option<Snap>,
    pub cursor: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: None,
            color: crate::doc::DEFAULT_COLOR.to_owned(),
            grid: GridMode::None,
            pointer: None,
            snap: None,
            cursor: "default".to_owned(),
        }
    }
}

/// Transient geometry drawn on top of the construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview {
    /// Dashed segment or clipped line of a pending construction, or an
    /// edge draw in progress.
    Dashed { from: Point, to: Point },
    /// Arc being traced by a compass rotation.
    Arc { center: Point, radius: f64, start_angle: f64, end_angle: f64 },
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    Ruler {
        drag: RulerDrag,
    },
    Compass {
        drag: CompassDrag,
    },
    Protractor {
        drag: ProtractorDrag,
    },
    SetSquare {
        drag: SetSquareDrag,
    },
    /// Drawing a segment along a ruler or set-square edge.
    EdgeDraw {
        instrument: Instrument,
        draw: EdgeDraw,
    },
    /// Dragging a point or text label with the move tool.
    MovingShape {
        index: usize,
        /// Pointer minus shape anchor at the press.
        grab_offset: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Instrument engaged by the gesture, if any.
    #[must_use]
    pub fn instrument(&self) -> Option<Instrument> {
        match self {
            Self::Ruler { .. } => Some(Instrument::Ruler),
            Self::Compass { .. } => Some(Instrument::Compass),
            Self::Protractor { .. } => Some(Instrument::Protractor),
            Self::SetSquare { .. } => Some(Instrument::SetSquare),
            Self::EdgeDraw { instrument, .. } => Some(*instrument),
            Self::Idle | Self::MovingShape { .. } => None,
        }
    }
}
