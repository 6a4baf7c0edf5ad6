#![allow(clippy::float_cmp)]

use recording::{EventKind, RecordedEvent};
use serde_json::json;

use super::*;
use crate::input::Button;

fn event(kind: EventKind, data: Value) -> RecordedEvent {
    RecordedEvent { kind, data, timestamp: 0.0 }
}

// =============================================================
// Payload builders
// =============================================================

#[test]
fn pointer_payload_nests_position() {
    assert_eq!(pointer_payload(Point::new(3.5, -2.0)), json!({ "pos": { "x": 3.5, "y": -2.0 } }));
}

#[test]
fn tool_payload_uses_tool_name_or_null() {
    assert_eq!(tool_payload(Some(Tool::Segment)), json!({ "tool": "segment" }));
    assert_eq!(tool_payload(None), json!({ "tool": null }));
}

#[test]
fn grid_payload_uses_lowercase_mode() {
    assert_eq!(grid_payload(GridMode::Cm), json!({ "grid": "cm" }));
}

// =============================================================
// apply_event
// =============================================================

#[test]
fn tool_select_event_sets_tool() {
    let mut core = EngineCore::new();
    let result = apply_event(&mut core, &event(EventKind::ToolSelect, tool_payload(Some(Tool::Eraser))));
    assert!(result.is_ok());
    assert_eq!(core.ui.tool, Some(Tool::Eraser));
}

#[test]
fn pointer_events_drive_point_tool() {
    let mut core = EngineCore::new();
    core.set_tool(Some(Tool::Point));
    let pos = Point::new(120.0, 80.0);
    for kind in [EventKind::Mousedown, EventKind::Mouseup] {
        assert!(apply_event(&mut core, &event(kind, pointer_payload(pos))).is_ok());
    }
    assert_eq!(core.shapes.len(), 1);
    assert!(core.history.can_undo());
}

#[test]
fn color_event_applies_valid_color_only() {
    let mut core = EngineCore::new();
    assert!(apply_event(&mut core, &event(EventKind::ColorChange, color_payload("#336699"))).is_ok());
    assert_eq!(core.ui.color, "#336699");
    assert!(apply_event(&mut core, &event(EventKind::ColorChange, color_payload("blue"))).is_ok());
    assert_eq!(core.ui.color, "#336699");
}

#[test]
fn grid_and_ruler_events_apply() {
    let mut core = EngineCore::new();
    assert!(apply_event(&mut core, &event(EventKind::GridChange, grid_payload(GridMode::Orthonormal))).is_ok());
    assert!(apply_event(&mut core, &event(EventKind::RulerLengthChange, ruler_length_payload(25.0))).is_ok());
    assert_eq!(core.ui.grid, GridMode::Orthonormal);
    assert_eq!(core.ruler.max_length_cm, 25.0_f64);
}

#[test]
fn missing_fields_are_rejected() {
    let mut core = EngineCore::new();
    let err = apply_event(&mut core, &event(EventKind::Mousemove, json!({ "x": 1.0 })));
    assert!(matches!(err, Err(ReplayError::Payload { kind: EventKind::Mousemove, .. })));
}

#[test]
fn unknown_tool_name_is_rejected() {
    let mut core = EngineCore::new();
    let err = apply_event(&mut core, &event(EventKind::ToolSelect, json!({ "tool": "lasso" })));
    assert!(err.is_err());
    assert!(core.ui.tool.is_none());
}

#[test]
fn replayed_events_match_live_handlers() {
    let mut live = EngineCore::new();
    live.set_tool(Some(Tool::Segment));
    for (x, y) in [(100.0, 100.0), (250.0, 180.0)] {
        live.on_pointer_down(Point::new(x, y), Button::Primary, crate::input::Modifiers::default());
        live.on_pointer_up(Point::new(x, y), Button::Primary, crate::input::Modifiers::default());
    }

    let mut replayed = EngineCore::new();
    let mut events = vec![event(EventKind::ToolSelect, tool_payload(Some(Tool::Segment)))];
    for (x, y) in [(100.0, 100.0), (250.0, 180.0)] {
        events.push(event(EventKind::Mousedown, pointer_payload(Point::new(x, y))));
        events.push(event(EventKind::Mouseup, pointer_payload(Point::new(x, y))));
    }
    for e in &events {
        assert!(apply_event(&mut replayed, e).is_ok());
    }
    assert_eq!(replayed.snapshot(), live.snapshot());
}
