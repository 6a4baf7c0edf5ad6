//! Shared numeric constants for the canvas crate.

// ── Incidence ───────────────────────────────────────────────────

/// Two positions closer than this are the same point. This is the only
/// mechanism deciding whether a line is attached to a point.
pub const POINT_COINCIDENCE_EPS: f64 = 1.0;

/// Below this magnitude a direction component counts as zero when clipping
/// infinite lines to the canvas.
pub const AXIS_EPS: f64 = 0.001;

// ── Snapping ────────────────────────────────────────────────────

/// Default snap radius in pixels (`T_snap`).
pub const SNAP_THRESHOLD_PX: f64 = 20.0;

// ── Shape hit-testing ───────────────────────────────────────────

/// Pick radius for points, lines and arcs (eraser, move and mark tools).
pub const SHAPE_PICK_RADIUS_PX: f64 = 10.0;

/// Estimated advance width of one text glyph at the 16px text font.
pub const TEXT_CHAR_WIDTH_PX: f64 = 9.0;

/// Line height of the 16px text font.
pub const TEXT_HEIGHT_PX: f64 = 16.0;

// ── Compass ─────────────────────────────────────────────────────

/// Hit radius around the hinge, pencil and needle tips.
pub const COMPASS_HANDLE_RADIUS_PX: f64 = 25.0;

/// Hit distance from either compass leg.
pub const COMPASS_LEG_RADIUS_PX: f64 = 10.0;

/// Ratio of hinge height to radius.
pub const COMPASS_HINGE_HEIGHT_RATIO: f64 = 0.5;

/// Minimum hinge height above the center–pencil midpoint.
pub const COMPASS_HINGE_MIN_HEIGHT_PX: f64 = 15.0;

/// Hinge offset above the needle while the compass is closed.
pub const COMPASS_CLOSED_HINGE_OFFSET_PX: f64 = 30.0;

/// Smallest unwrapped sweep that commits an arc.
pub const COMPASS_MIN_SWEEP_RAD: f64 = 0.01;

// ── Ruler / set-square ──────────────────────────────────────────

/// Length of the rotation zone at the far end of the ruler and around each
/// set-square vertex.
pub const ROTATE_ZONE_PX: f64 = 40.0;

/// Width of the drawing strip along a graduated edge.
pub const DRAWING_EDGE_PX: f64 = 12.0;

/// Tolerance outside the instrument body that still counts as a hit.
pub const BODY_TOLERANCE_PX: f64 = 5.0;

/// Gap between a set-square drawing strip and the rotation zones.
pub const EDGE_ZONE_GAP_PX: f64 = 5.0;

/// Thickness of the set-square hypotenuse slide zone.
pub const HYPOTENUSE_ZONE_PX: f64 = 25.0;

// ── Protractor ──────────────────────────────────────────────────

/// Inner-to-outer radius ratio separating the move and rotate zones.
pub const PROTRACTOR_MOVE_RATIO: f64 = 0.8;
