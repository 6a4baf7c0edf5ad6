//! Bridge between recorded events and the dispatcher.
//!
//! Payload builders here are used while recording; [`apply_event`] decodes
//! the same payloads and re-invokes the handler that produced them.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use recording::{EventKind, RecordedEvent};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::engine::{Action, EngineCore};
use crate::geom::Point;
use crate::input::{GridMode, Tool};

/// Error returned when a recorded event cannot be re-driven.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("invalid {kind:?} payload: {source}")]
    Payload {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct PointerPayload {
    pos: Point,
}

#[derive(Deserialize)]
struct ToolPayload {
    tool: Option<Tool>,
}

#[derive(Deserialize)]
struct ColorPayload {
    color: String,
}

#[derive(Deserialize)]
struct GridPayload {
    grid: GridMode,
}

#[derive(Deserialize)]
struct RulerLengthPayload {
    length_cm: f64,
}

#[must_use]
pub fn pointer_payload(pos: Point) -> Value {
    json!({ "pos": { "x": pos.x, "y": pos.y } })
}

#[must_use]
pub fn tool_payload(tool: Option<Tool>) -> Value {
    json!({ "tool": tool.map(Tool::name) })
}

#[must_use]
pub fn color_payload(color: &str) -> Value {
    json!({ "color": color })
}

#[must_use]
pub fn grid_payload(grid: GridMode) -> Value {
    json!({ "grid": grid })
}

#[must_use]
pub fn ruler_length_payload(length_cm: f64) -> Value {
    json!({ "length_cm": length_cm })
}

/// Re-drive one recorded event through the dispatcher.
///
/// # Errors
///
/// Returns [`ReplayError::Payload`] if the event's `data` does not carry
/// the fields its type needs. The engine is left untouched in that case.
pub fn apply_event(core: &mut EngineCore, event: &RecordedEvent) -> Result<Vec<Action>, ReplayError> {
    let actions = match event.kind {
        EventKind::ToolSelect => {
            let p: ToolPayload = decode(event)?;
            core.apply_tool(p.tool)
        }
        EventKind::Mousedown => {
            let p: PointerPayload = decode(event)?;
            core.handle_pointer_down(p.pos)
        }
        EventKind::Mousemove => {
            let p: PointerPayload = decode(event)?;
            core.handle_pointer_move(p.pos)
        }
        EventKind::Mouseup => {
            let p: PointerPayload = decode(event)?;
            core.handle_pointer_up(p.pos)
        }
        EventKind::ColorChange => {
            let p: ColorPayload = decode(event)?;
            core.apply_color(&p.color)
        }
        EventKind::GridChange => {
            let p: GridPayload = decode(event)?;
            core.apply_grid(p.grid)
        }
        EventKind::RulerLengthChange => {
            let p: RulerLengthPayload = decode(event)?;
            core.apply_ruler_length_cm(p.length_cm)
        }
    };
    Ok(actions)
}

fn decode<T: DeserializeOwned>(event: &RecordedEvent) -> Result<T, ReplayError> {
    T::deserialize(&event.data).map_err(|source| ReplayError::Payload { kind: event.kind, source })
}
