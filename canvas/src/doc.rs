//! Document model: construction shapes, point naming, and the ordered store.
//!
//! This module defines what is on the canvas (`Shape` and its four variants)
//! and the runtime store that owns them (`ShapeList`). Insertion order is
//! z-order: the renderer walks the list front to back, hit-testing walks it
//! back to front.
//!
//! Lines are attached to points only through coincidence: a line is incident
//! to a point when one of its endpoints lies within
//! [`POINT_COINCIDENCE_EPS`] of it. `line`-typed entries additionally carry
//! the names of their two defining points so they can be re-clipped to the
//! canvas when either point moves.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Deserializer, Serialize};

use crate::consts::POINT_COINCIDENCE_EPS;
use crate::geom::{self, Point};

/// Ink used when a stored shape carries no color.
pub const DEFAULT_COLOR: &str = "#000000";

/// Highest length-marking tick count.
pub const MAX_LINE_MARKING: u8 = 3;

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

// =============================================================
// Shapes
// =============================================================

/// A construction shape as stored in the document and in session files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Point(PointShape),
    Line(LineShape),
    Arc(ArcShape),
    Text(TextShape),
}

/// Angle coding drawn at a point between its two incident lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleMark {
    Single,
    Double,
    Right,
}

impl AngleMark {
    /// Next state of the marking cycle: none → single → double → right → none.
    #[must_use]
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(Self::Single),
            Some(Self::Single) => Some(Self::Double),
            Some(Self::Double) => Some(Self::Right),
            Some(Self::Right) => None,
        }
    }
}

/// A named point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointShape {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default, deserialize_with = "deserialize_angle_mark", skip_serializing_if = "Option::is_none")]
    pub angle_mark: Option<AngleMark>,
}

impl PointShape {
    #[must_use]
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Whether a line entry is a bounded segment or a canvas-clipped full line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    #[default]
    Segment,
    Line,
}

/// A segment, or a full line stored as its two canvas-boundary intersections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default = "default_color")]
    pub color: String,
    /// Equal-length coding ticks, 0 to [`MAX_LINE_MARKING`].
    #[serde(default)]
    pub marking: u8,
    #[serde(default)]
    pub line_type: LineType,
    /// Names of the two points the line was constructed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defining_points: Option<[String; 2]>,
}

impl LineShape {
    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[must_use]
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Whether either endpoint coincides with `p`.
    #[must_use]
    pub fn is_incident_to(&self, p: Point) -> bool {
        self.start().distance(p) < POINT_COINCIDENCE_EPS || self.end().distance(p) < POINT_COINCIDENCE_EPS
    }

    /// The endpoint opposite the one coinciding with `p`.
    #[must_use]
    pub fn far_end_from(&self, p: Point) -> Point {
        if self.start().distance(p) < POINT_COINCIDENCE_EPS {
            self.end()
        } else {
            self.start()
        }
    }

    /// Whether `name` is one of the defining points.
    #[must_use]
    pub fn is_defined_by(&self, name: &str) -> bool {
        self.defining_points
            .as_ref()
            .is_some_and(|names| names.iter().any(|n| n == name))
    }
}

/// A circular arc traced by the compass. Angles are radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcShape {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    #[serde(default = "default_color")]
    pub color: String,
}

/// A free text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextShape {
    pub x: f64,
    pub y: f64,
    pub content: String,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Accepts `null`, a mark name (`"none"` included) or the older
/// `{"type": "<name>"}` object form.
fn deserialize_angle_mark<'de, D>(deserializer: D) -> Result<Option<AngleMark>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Name(String),
        Tagged {
            #[serde(rename = "type")]
            kind: String,
        },
    }

    let name = match Option::<Repr>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Repr::Name(name) | Repr::Tagged { kind: name }) => name,
    };
    match name.as_str() {
        "none" => Ok(None),
        "single" => Ok(Some(AngleMark::Single)),
        "double" => Ok(Some(AngleMark::Double)),
        "right" => Ok(Some(AngleMark::Right)),
        other => Err(serde::de::Error::unknown_variant(other, &["none", "single", "double", "right"])),
    }
}

// =============================================================
// Point names
// =============================================================

/// Name of the `n`th point: `A`…`Z`, then `A'`…`Z'`, `A''`… Empty for 0.
#[must_use]
pub fn point_name(n: u32) -> String {
    if n == 0 {
        return String::new();
    }
    let primes = (n - 1) / 26;
    let letter = char::from(b'A' + u8::try_from((n - 1) % 26).unwrap_or(0));
    let mut name = String::with_capacity(1 + primes as usize);
    name.push(letter);
    for _ in 0..primes {
        name.push('\'');
    }
    name
}

/// Inverse of [`point_name`]. Returns 0 for names that are not of that form.
#[must_use]
pub fn point_number(name: &str) -> u32 {
    let mut chars = name.chars();
    let Some(letter) = chars.next() else {
        return 0;
    };
    if !letter.is_ascii_uppercase() {
        return 0;
    }
    let mut primes: u32 = 0;
    for c in chars {
        if c != '\'' {
            return 0;
        }
        let Some(next) = primes.checked_add(1) else {
            return 0;
        };
        primes = next;
    }
    primes
        .checked_mul(26)
        .and_then(|n| n.checked_add(u32::from(letter) - u32::from('A') + 1))
        .unwrap_or(0)
}

// =============================================================
// Store
// =============================================================

/// Ordered store of shapes. Index order is z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeList {
    shapes: Vec<Shape>,
}

impl ShapeList {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    #[must_use]
    pub fn from_vec(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Append a shape on top of the z-order and return its index.
    pub fn push(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> + ExactSizeIterator {
        self.shapes.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// All point shapes in z-order.
    pub fn points(&self) -> impl Iterator<Item = &PointShape> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Point(p) => Some(p),
            _ => None,
        })
    }

    /// All line shapes in z-order.
    pub fn lines(&self) -> impl Iterator<Item = &LineShape> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Line(l) => Some(l),
            _ => None,
        })
    }

    /// Look up a point by name.
    #[must_use]
    pub fn point_named(&self, name: &str) -> Option<&PointShape> {
        self.points().find(|p| p.name == name)
    }

    /// Lines with an endpoint coinciding with `p`, in z-order.
    #[must_use]
    pub fn incident_lines(&self, p: Point) -> Vec<&LineShape> {
        self.lines().filter(|l| l.is_incident_to(p)).collect()
    }

    /// Highest [`point_number`] among named points, 0 when there are none.
    #[must_use]
    pub fn max_point_number(&self) -> u32 {
        self.points().map(|p| point_number(&p.name)).max().unwrap_or(0)
    }

    /// Whether every line's marking is within the tick cycle.
    #[must_use]
    pub fn markings_in_range(&self) -> bool {
        self.lines().all(|l| l.marking <= MAX_LINE_MARKING)
    }

    /// Remove the shape at `index`. Removing a point also removes every line
    /// incident to it. Returns the removed shapes, the target first.
    pub fn remove_cascade(&mut self, index: usize) -> Vec<Shape> {
        if index >= self.shapes.len() {
            return Vec::new();
        }
        let target = self.shapes.remove(index);
        let point_pos = match &target {
            Shape::Point(p) => Some(p.pos()),
            _ => None,
        };
        let mut removed = vec![target];
        if let Some(pos) = point_pos {
            let (gone, kept): (Vec<Shape>, Vec<Shape>) = std::mem::take(&mut self.shapes)
                .into_iter()
                .partition(|s| matches!(s, Shape::Line(l) if l.is_incident_to(pos)));
            self.shapes = kept;
            removed.extend(gone);
        }
        removed
    }

    /// Move the shape at `index` to `to`.
    ///
    /// Points drag along the endpoints of every segment attached to them and
    /// re-clip every full line they define against the `w × h` canvas. Text
    /// simply relocates. Returns `false` if there is no movable shape there.
    pub fn move_shape(&mut self, index: usize, to: Point, w: f64, h: f64) -> bool {
        match self.shapes.get_mut(index) {
            Some(Shape::Point(p)) => {
                let from = p.pos();
                p.x = to.x;
                p.y = to.y;
                let name = p.name.clone();
                self.follow_point(from, to);
                if !name.is_empty() {
                    self.reproject_lines_defined_by(&name, w, h);
                }
                true
            }
            Some(Shape::Text(t)) => {
                t.x = to.x;
                t.y = to.y;
                true
            }
            _ => false,
        }
    }

    /// Re-clip every `line`-typed entry defined by `name` against the
    /// canvas. Entries whose recomputation yields fewer than two
    /// intersections keep their previous coordinates.
    pub fn reproject_lines_defined_by(&mut self, name: &str, w: f64, h: f64) {
        let positions: Vec<(usize, Point, Point)> = self
            .shapes
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Shape::Line(l) if l.line_type == LineType::Line && l.is_defined_by(name) => {
                    let [a, b] = l.defining_points.as_ref()?;
                    Some((i, self.point_named(a)?.pos(), self.point_named(b)?.pos()))
                }
                _ => None,
            })
            .collect();

        for (i, a, b) in positions {
            let hits = geom::line_canvas_intersections(a, b, w, h);
            if let ([p1, p2], Some(Shape::Line(l))) = (hits.as_slice(), self.shapes.get_mut(i)) {
                l.x1 = p1.x;
                l.y1 = p1.y;
                l.x2 = p2.x;
                l.y2 = p2.y;
            }
        }
    }

    /// Advance the angle marking of the point at `index`. Only points with
    /// exactly two incident lines can be marked; returns whether it changed.
    pub fn cycle_angle_mark(&mut self, index: usize) -> bool {
        let Some(Shape::Point(p)) = self.shapes.get(index) else {
            return false;
        };
        if self.incident_lines(p.pos()).len() != 2 {
            return false;
        }
        if let Some(Shape::Point(p)) = self.shapes.get_mut(index) {
            p.angle_mark = AngleMark::cycle(p.angle_mark);
            return true;
        }
        false
    }

    /// Advance the length coding of the line at `index` (0 → 1 → 2 → 3 → 0).
    pub fn cycle_line_marking(&mut self, index: usize) -> bool {
        let Some(Shape::Line(l)) = self.shapes.get_mut(index) else {
            return false;
        };
        l.marking = if l.marking >= MAX_LINE_MARKING { 0 } else { l.marking + 1 };
        true
    }

    fn follow_point(&mut self, from: Point, to: Point) {
        for shape in &mut self.shapes {
            let Shape::Line(l) = shape else {
                continue;
            };
            if l.line_type != LineType::Segment {
                continue;
            }
            if l.start().distance(from) < POINT_COINCIDENCE_EPS {
                l.x1 = to.x;
                l.y1 = to.y;
            }
            if l.end().distance(from) < POINT_COINCIDENCE_EPS {
                l.x2 = to.x;
                l.y2 = to.y;
            }
        }
    }
}
