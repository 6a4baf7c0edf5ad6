//! Session files: `{currentState, history}`, or a legacy bare shape array.
//!
//! Decoding is all-or-nothing. The caller only touches editor state after a
//! whole [`SessionFile`] has been produced.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::doc::ShapeList;
use crate::history::EditorSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session must be a shape array or an object with a well-formed `currentState`")]
    InvalidStructure,
}

/// A decoded session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    pub current_state: EditorSnapshot,
    /// Undo checkpoints, oldest first.
    #[serde(default)]
    pub history: Vec<EditorSnapshot>,
}

/// Serialize a session as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`SessionError::Json`] if serialization fails.
pub fn encode_session(session: &SessionFile) -> Result<String, SessionError> {
    Ok(serde_json::to_string_pretty(session)?)
}

/// Parse a session file in either format.
///
/// A bare array loads as the shape list with default instruments, an empty
/// history and the name counter set to the highest existing point number.
///
/// # Errors
///
/// Returns [`SessionError::Json`] for malformed JSON or shapes and
/// [`SessionError::InvalidStructure`] for any other top-level value, a line
/// marking above [`crate::doc::MAX_LINE_MARKING`], or a name counter that cannot advance.
pub fn decode_session(text: &str) -> Result<SessionFile, SessionError> {
    let value: Value = serde_json::from_str(text)?;
    let file = if value.is_array() {
        let shapes: ShapeList = serde_json::from_value(value)?;
        let point_name_counter = shapes.max_point_number();
        SessionFile {
            current_state: EditorSnapshot { shapes, point_name_counter, ..EditorSnapshot::default() },
            history: Vec::new(),
        }
    } else if value.get("currentState").is_some() {
        serde_json::from_value(value)?
    } else {
        return Err(SessionError::InvalidStructure);
    };
    if !std::iter::once(&file.current_state).chain(&file.history).all(snapshot_in_range) {
        return Err(SessionError::InvalidStructure);
    }
    Ok(file)
}

fn snapshot_in_range(snapshot: &EditorSnapshot) -> bool {
    snapshot.point_name_counter < u32::MAX && snapshot.shapes.markings_in_range()
}
