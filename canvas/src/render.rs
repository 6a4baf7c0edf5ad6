//! Rendering: draws the construction, instruments and transient overlays.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads engine state and produces pixels; it never mutates anything.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::doc::{AngleMark, ArcShape, LineShape, PointShape, Shape, ShapeList, TextShape};
use crate::engine::EngineCore;
use crate::geom::Point;
use crate::input::{GridMode, Preview};
use crate::instruments::{CompassState, ProtractorState, RulerState, SetSquareState};
use crate::snap::Snap;

/// Half-size of the cross drawn for a point.
const POINT_CROSS_PX: f64 = 6.0;
/// Radius of the arc coding an angle; the double coding adds a second arc outside it.
const ANGLE_MARK_RADIUS_PX: f64 = 25.0;
const ANGLE_MARK_GAP_PX: f64 = 4.0;
/// Leg length of the right-angle square.
const RIGHT_ANGLE_PX: f64 = 15.0;
/// Length-marking tick geometry.
const MARKING_TICK_PX: f64 = 10.0;
const MARKING_SPACING_PX: f64 = 4.0;
const SNAP_HIGHLIGHT_PX: f64 = 8.0;
const AXIS_TICK_PX: f64 = 5.0;
const PREVIEW_DASH_PX: f64 = 6.0;

/// Draw the full scene: grid, shapes, instruments, then overlays.
///
/// `dpr` is the device pixel ratio; everything else is in CSS pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, core: &EngineCore, dpr: f64) -> Result<(), JsValue> {
    let width = core.config.canvas_width;
    let height = core.config.canvas_height;
    let ppcm = core.config.pixels_per_cm;

    // Layer 1: clear and set up the device-pixel transform.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, width, height);

    // Layer 2: background grid.
    match core.ui.grid {
        GridMode::None => {}
        GridMode::Cm => draw_cm_grid(ctx, width, height, ppcm),
        GridMode::Orthonormal => draw_orthonormal_grid(ctx, width, height, ppcm)?,
    }

    // Layer 3: shapes in z-order (bottom first).
    for shape in core.shapes.iter() {
        draw_shape(ctx, shape, &core.shapes)?;
    }

    // Layer 4: instruments.
    if core.ruler.visible {
        draw_ruler(ctx, &core.ruler, ppcm)?;
    }
    if core.protractor.visible {
        draw_protractor(ctx, &core.protractor)?;
    }
    if core.set_square.visible {
        draw_set_square(ctx, &core.set_square, ppcm)?;
    }
    draw_compass(ctx, &core.compass)?;

    // Layer 5: overlays.
    if let Some(preview) = core.preview() {
        draw_preview(ctx, preview, &core.ui.color)?;
    }
    if let Some(snap) = core.ui.snap {
        draw_snap_highlight(ctx, snap)?;
    }
    Ok(())
}

// =============================================================
// Grid
// =============================================================

fn draw_cm_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, ppcm: f64) {
    ctx.begin_path();
    ctx.set_stroke_style_str("#e0e0e0");
    ctx.set_line_width(0.5);
    grid_lines(ctx, 0.0, width, height, ppcm, true);
    grid_lines(ctx, 0.0, height, width, ppcm, false);
    ctx.stroke();
}

fn draw_orthonormal_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, ppcm: f64) -> Result<(), JsValue> {
    let origin = Point::new(width / 2.0, height / 2.0);

    ctx.begin_path();
    ctx.set_stroke_style_str("#f0f0f0");
    ctx.set_line_width(0.5);
    grid_lines(ctx, origin.x, width, height, ppcm, true);
    grid_lines(ctx, origin.y, height, width, ppcm, false);
    ctx.stroke();

    ctx.begin_path();
    ctx.set_stroke_style_str("#999999");
    ctx.set_line_width(1.5);
    ctx.move_to(0.0, origin.y);
    ctx.line_to(width, origin.y);
    ctx.move_to(origin.x, 0.0);
    ctx.line_to(origin.x, height);
    ctx.stroke();

    ctx.set_fill_style_str("#666666");
    ctx.set_font("12px sans-serif");

    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    let mut i = 1_i32;
    loop {
        let offset = f64::from(i) * ppcm;
        let right = origin.x + offset < width;
        let left = origin.x - offset > 0.0;
        if !(right || left) {
            break;
        }
        if right {
            ctx.fill_text(&i.to_string(), origin.x + offset, origin.y + AXIS_TICK_PX + 2.0)?;
        }
        if left {
            ctx.fill_text(&(-i).to_string(), origin.x - offset, origin.y + AXIS_TICK_PX + 2.0)?;
        }
        i += 1;
    }

    // Canvas y grows downward; the axis labels count upward.
    ctx.set_text_align("right");
    ctx.set_text_baseline("middle");
    let mut i = 1_i32;
    loop {
        let offset = f64::from(i) * ppcm;
        let up = origin.y - offset > 0.0;
        let down = origin.y + offset < height;
        if !(up || down) {
            break;
        }
        if up {
            ctx.fill_text(&i.to_string(), origin.x - AXIS_TICK_PX - 2.0, origin.y - offset)?;
        }
        if down {
            ctx.fill_text(&(-i).to_string(), origin.x - AXIS_TICK_PX - 2.0, origin.y + offset)?;
        }
        i += 1;
    }

    ctx.set_text_baseline("top");
    ctx.fill_text("0", origin.x - AXIS_TICK_PX, origin.y + AXIS_TICK_PX)?;
    Ok(())
}

/// Add grid lines through `origin` every `step` along one axis, spanning
/// `extent` along that axis and `across` perpendicular to it.
fn grid_lines(ctx: &CanvasRenderingContext2d, origin: f64, extent: f64, across: f64, step: f64, vertical: bool) {
    if step <= 0.0 {
        return;
    }
    let first = origin - (origin / step).floor() * step;
    let mut at = first;
    while at < extent {
        if vertical {
            ctx.move_to(at, 0.0);
            ctx.line_to(at, across);
        } else {
            ctx.move_to(0.0, at);
            ctx.line_to(across, at);
        }
        at += step;
    }
}

// =============================================================
// Shapes
// =============================================================

fn draw_shape(ctx: &CanvasRenderingContext2d, shape: &Shape, shapes: &ShapeList) -> Result<(), JsValue> {
    match shape {
        Shape::Point(p) => draw_point(ctx, p, shapes),
        Shape::Line(l) => {
            draw_line(ctx, l);
            Ok(())
        }
        Shape::Arc(a) => draw_arc(ctx, a),
        Shape::Text(t) => draw_text(ctx, t),
    }
}

fn draw_point(ctx: &CanvasRenderingContext2d, point: &PointShape, shapes: &ShapeList) -> Result<(), JsValue> {
    let (x, y) = (point.x, point.y);
    ctx.save();
    ctx.begin_path();
    ctx.move_to(x - POINT_CROSS_PX, y - POINT_CROSS_PX);
    ctx.line_to(x + POINT_CROSS_PX, y + POINT_CROSS_PX);
    ctx.move_to(x + POINT_CROSS_PX, y - POINT_CROSS_PX);
    ctx.line_to(x - POINT_CROSS_PX, y + POINT_CROSS_PX);
    ctx.set_stroke_style_str(&point.color);
    ctx.set_line_width(2.0);
    ctx.stroke();

    ctx.set_fill_style_str(&point.color);
    ctx.set_font("14px sans-serif");
    ctx.set_text_align("left");
    ctx.set_text_baseline("bottom");
    ctx.fill_text(&point.name, x + POINT_CROSS_PX + 3.0, y - POINT_CROSS_PX)?;

    if let Some(mark) = point.angle_mark {
        draw_angle_mark(ctx, point, mark, shapes)?;
    }
    ctx.restore();
    Ok(())
}

/// Angle coding between the two lines incident to `point`. Drawn only when
/// exactly two lines meet there.
fn draw_angle_mark(
    ctx: &CanvasRenderingContext2d,
    point: &PointShape,
    mark: AngleMark,
    shapes: &ShapeList,
) -> Result<(), JsValue> {
    let at = point.pos();
    let incident = shapes.incident_lines(at);
    let [first, second] = incident[..] else {
        return Ok(());
    };
    let a1 = at.angle_to(first.far_end_from(at));
    let a2 = at.angle_to(second.far_end_from(at));

    ctx.set_line_width(1.5);
    if mark == AngleMark::Right {
        let p1 = at.offset_polar(a1, RIGHT_ANGLE_PX);
        let p3 = at.offset_polar(a2, RIGHT_ANGLE_PX);
        let p2 = Point::new(p1.x + p3.x - at.x, p1.y + p3.y - at.y);
        ctx.begin_path();
        ctx.move_to(p1.x, p1.y);
        ctx.line_to(p2.x, p2.y);
        ctx.line_to(p3.x, p3.y);
        ctx.stroke();
        return Ok(());
    }

    // Always code the interior (shorter) angle.
    let (start, end) = if (a2 - a1).rem_euclid(TAU) > PI { (a2, a1) } else { (a1, a2) };
    ctx.begin_path();
    ctx.arc(at.x, at.y, ANGLE_MARK_RADIUS_PX, start, end)?;
    ctx.stroke();
    if mark == AngleMark::Double {
        ctx.begin_path();
        ctx.arc(at.x, at.y, ANGLE_MARK_RADIUS_PX + ANGLE_MARK_GAP_PX, start, end)?;
        ctx.stroke();
    }
    Ok(())
}

fn draw_line(ctx: &CanvasRenderingContext2d, line: &LineShape) {
    ctx.save();
    ctx.set_stroke_style_str(&line.color);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(line.x1, line.y1);
    ctx.line_to(line.x2, line.y2);
    ctx.stroke();

    let (start, end) = (line.start(), line.end());
    let length = start.distance(end);
    if line.marking > 0 && length > 0.0 {
        let (ux, uy) = ((end.x - start.x) / length, (end.y - start.y) / length);
        let mid = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        let half = MARKING_TICK_PX / 2.0;
        let first = -f64::from(line.marking - 1) * MARKING_SPACING_PX / 2.0;
        for i in 0..line.marking {
            let offset = first + f64::from(i) * MARKING_SPACING_PX;
            let c = mid.translate(ux * offset, uy * offset);
            ctx.begin_path();
            ctx.move_to(c.x - uy * half, c.y + ux * half);
            ctx.line_to(c.x + uy * half, c.y - ux * half);
            ctx.stroke();
        }
    }
    ctx.restore();
}

fn draw_arc(ctx: &CanvasRenderingContext2d, arc: &ArcShape) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(&arc.color);
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.arc_with_anticlockwise(
        arc.cx,
        arc.cy,
        arc.radius,
        arc.start_angle,
        arc.end_angle,
        arc.end_angle < arc.start_angle,
    )?;
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_text(ctx: &CanvasRenderingContext2d, text: &TextShape) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_fill_style_str(&text.color);
    ctx.set_font("16px sans-serif");
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
    ctx.fill_text(&text.content, text.x, text.y)?;
    ctx.restore();
    Ok(())
}

// =============================================================
// Instruments
// =============================================================

fn draw_ruler(ctx: &CanvasRenderingContext2d, ruler: &RulerState, ppcm: f64) -> Result<(), JsValue> {
    let length = ruler.length_px(ppcm);
    ctx.save();
    ctx.translate(ruler.zero_x, ruler.zero_y)?;
    ctx.rotate(ruler.angle)?;

    ctx.set_fill_style_str("rgba(255, 236, 153, 0.75)");
    ctx.fill_rect(0.0, 0.0, length, ruler.height);
    ctx.set_stroke_style_str("#8a7a3a");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(0.0, 0.0, length, ruler.height);

    ctx.set_fill_style_str("#333");
    ctx.set_font("11px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    let mm = ppcm / 10.0;
    let mut i = 0_u32;
    loop {
        let x = f64::from(i) * mm;
        if x > length + 1e-6 {
            break;
        }
        let tick = if i % 10 == 0 {
            15.0
        } else if i % 5 == 0 {
            10.0
        } else {
            5.0
        };
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, tick);
        ctx.stroke();
        if i % 10 == 0 {
            ctx.fill_text(&(i / 10).to_string(), x, 18.0)?;
        }
        i += 1;
    }
    ctx.restore();
    Ok(())
}

fn draw_protractor(ctx: &CanvasRenderingContext2d, protractor: &ProtractorState) -> Result<(), JsValue> {
    let r = protractor.radius;
    ctx.save();
    ctx.translate(protractor.center_x, protractor.center_y)?;
    ctx.rotate(protractor.angle)?;

    ctx.set_fill_style_str("rgba(173, 216, 230, 0.55)");
    ctx.set_stroke_style_str("#2a5d8a");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.arc(0.0, 0.0, r, PI, TAU)?;
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    ctx.set_fill_style_str("#1c3d5a");
    ctx.set_font("10px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for deg in 0..=180_u32 {
        let a = PI + f64::from(deg).to_radians();
        let tick = if deg % 10 == 0 {
            12.0
        } else if deg % 5 == 0 {
            8.0
        } else {
            4.0
        };
        let (sin, cos) = a.sin_cos();
        ctx.begin_path();
        ctx.move_to(r * cos, r * sin);
        ctx.line_to((r - tick) * cos, (r - tick) * sin);
        ctx.stroke();
        if deg % 10 == 0 {
            ctx.fill_text(&deg.to_string(), (r - 22.0) * cos, (r - 22.0) * sin)?;
        }
    }

    ctx.begin_path();
    ctx.arc(0.0, 0.0, 3.0, 0.0, TAU)?;
    ctx.fill();
    ctx.restore();
    Ok(())
}

fn draw_set_square(ctx: &CanvasRenderingContext2d, square: &SetSquareState, ppcm: f64) -> Result<(), JsValue> {
    let size = square.size;
    ctx.save();
    ctx.translate(square.corner_x, square.corner_y)?;
    ctx.rotate(square.angle)?;

    ctx.set_fill_style_str("rgba(200, 230, 201, 0.6)");
    ctx.set_stroke_style_str("#2e6b30");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(size, 0.0);
    ctx.line_to(0.0, size);
    ctx.close_path();
    ctx.fill();
    ctx.stroke();

    // Centimeter graduations along both legs, inside the triangle.
    let mut i = 1_u32;
    loop {
        let d = f64::from(i) * ppcm;
        if d >= size || ppcm <= 0.0 {
            break;
        }
        ctx.begin_path();
        ctx.move_to(d, 0.0);
        ctx.line_to(d, 8.0);
        ctx.move_to(0.0, d);
        ctx.line_to(8.0, d);
        ctx.stroke();
        i += 1;
    }

    // Right-angle coding at the corner.
    ctx.stroke_rect(0.0, 0.0, 12.0, 12.0);
    ctx.restore();
    Ok(())
}

fn draw_compass(ctx: &CanvasRenderingContext2d, compass: &CompassState) -> Result<(), JsValue> {
    let (Some(center), Some(pencil), Some(hinge)) = (compass.center, compass.pencil, compass.hinge()) else {
        return Ok(());
    };
    ctx.save();
    ctx.set_stroke_style_str("#555");
    ctx.set_line_width(4.0);
    ctx.set_line_cap("round");
    ctx.begin_path();
    ctx.move_to(center.x, center.y);
    ctx.line_to(hinge.x, hinge.y);
    ctx.line_to(pencil.x, pencil.y);
    ctx.stroke();

    // Handle above the hinge, pointing away from the legs.
    let away = if center.distance(pencil) < 1.0 {
        -FRAC_PI_2
    } else {
        let mid = Point::new((center.x + pencil.x) / 2.0, (center.y + pencil.y) / 2.0);
        mid.angle_to(hinge)
    };
    let grip = hinge.offset_polar(away, 14.0);
    ctx.begin_path();
    ctx.move_to(hinge.x, hinge.y);
    ctx.line_to(grip.x, grip.y);
    ctx.stroke();

    ctx.set_fill_style_str("#333");
    ctx.begin_path();
    ctx.arc(hinge.x, hinge.y, 5.0, 0.0, TAU)?;
    ctx.fill();

    ctx.set_fill_style_str("#c0392b");
    ctx.begin_path();
    ctx.arc(center.x, center.y, 3.0, 0.0, TAU)?;
    ctx.fill();
    ctx.set_fill_style_str("#2c3e50");
    ctx.begin_path();
    ctx.arc(pencil.x, pencil.y, 3.0, 0.0, TAU)?;
    ctx.fill();
    ctx.restore();
    Ok(())
}

// =============================================================
// Overlays
// =============================================================

fn draw_preview(ctx: &CanvasRenderingContext2d, preview: Preview, color: &str) -> Result<(), JsValue> {
    ctx.save();
    let dash_array = js_sys::Array::new();
    dash_array.push(&PREVIEW_DASH_PX.into());
    dash_array.push(&(PREVIEW_DASH_PX * 0.66).into());
    ctx.set_line_dash(&dash_array)?;
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    match preview {
        Preview::Dashed { from, to } => {
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
        }
        Preview::Arc { center, radius, start_angle, end_angle } => {
            ctx.arc_with_anticlockwise(center.x, center.y, radius, start_angle, end_angle, end_angle < start_angle)?;
        }
    }
    ctx.stroke();
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

fn draw_snap_highlight(ctx: &CanvasRenderingContext2d, snap: Snap) -> Result<(), JsValue> {
    let at = snap.position();
    ctx.save();
    ctx.set_stroke_style_str(if snap.is_point() { "#1E90FF" } else { "#FF8C00" });
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.arc(at.x, at.y, SNAP_HIGHLIGHT_PX, 0.0, TAU)?;
    ctx.stroke();
    ctx.restore();
    Ok(())
}
