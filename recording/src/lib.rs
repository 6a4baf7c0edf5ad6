//! Recorded input events and their JSON codec.
//!
//! This crate owns the on-disk representation of an input recording: an
//! ordered array of `{type, data, timestamp}` records. Payloads stay flexible
//! (`serde_json::Value`) so the engine decides what each event type carries;
//! this crate only guarantees the envelope and the timing.
//!
//! [`Recorder`] stamps events relative to the moment recording started.
//! [`Replay`] releases them again with the same inter-event delays.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error returned by [`decode_recording`] and [`encode_recording`].
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    /// The text is not valid JSON, or an event does not match the envelope.
    #[error("failed to parse recording: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level JSON value is not an array.
    #[error("recording is not an array of events")]
    NotAnArray,
    /// An event timestamp is negative, NaN or infinite.
    #[error("event {index} has an invalid timestamp")]
    InvalidTimestamp { index: usize },
    /// An event timestamp is earlier than the one before it.
    #[error("event {index} is earlier than the event before it")]
    OutOfOrder { index: usize },
}

/// Which handler a recorded event re-drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A tool was selected (`data.tool`).
    ToolSelect,
    /// Pointer pressed (`data.pos`).
    Mousedown,
    /// Pointer moved (`data.pos`).
    Mousemove,
    /// Pointer released (`data.pos`).
    Mouseup,
    /// Drawing color changed (`data.color`).
    ColorChange,
    /// Background grid changed (`data.grid`).
    GridChange,
    /// Ruler length changed (`data.length_cm`).
    RulerLengthChange,
}

/// A single recorded input event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Handler this event re-drives.
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Minimal payload needed to re-invoke the handler.
    #[serde(default)]
    pub data: Value,
    /// Milliseconds since the recording started.
    pub timestamp: f64,
}

/// Encode events as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`RecordingError::Json`] if serialization fails.
pub fn encode_recording(events: &[RecordedEvent]) -> Result<String, RecordingError> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Decode and validate a recording.
///
/// The whole input is validated before anything is returned, so callers never
/// see a partially decoded recording.
///
/// # Errors
///
/// Returns [`RecordingError::Json`] for malformed JSON or events,
/// [`RecordingError::NotAnArray`] when the top level is not an array, and
/// [`RecordingError::InvalidTimestamp`] / [`RecordingError::OutOfOrder`] for
/// bad timing.
pub fn decode_recording(text: &str) -> Result<Vec<RecordedEvent>, RecordingError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_array() {
        return Err(RecordingError::NotAnArray);
    }
    let events: Vec<RecordedEvent> = serde_json::from_value(value)?;

    let mut previous = 0.0_f64;
    for (index, event) in events.iter().enumerate() {
        if !event.timestamp.is_finite() || event.timestamp < 0.0 {
            return Err(RecordingError::InvalidTimestamp { index });
        }
        if event.timestamp < previous {
            return Err(RecordingError::OutOfOrder { index });
        }
        previous = event.timestamp;
    }
    Ok(events)
}

/// Accumulates events while a recording is active.
#[derive(Debug, Clone)]
pub struct Recorder {
    started_at_ms: f64,
    events: Vec<RecordedEvent>,
}

impl Recorder {
    /// Begin a recording at host time `now_ms`.
    #[must_use]
    pub fn start(now_ms: f64) -> Self {
        Self { started_at_ms: now_ms, events: Vec::new() }
    }

    /// Append an event observed at host time `now_ms`.
    ///
    /// Timestamps never run backwards even if the host clock does.
    pub fn record(&mut self, kind: EventKind, data: Value, now_ms: f64) {
        let floor = self.events.last().map_or(0.0, |e| e.timestamp);
        let timestamp = (now_ms - self.started_at_ms).max(floor);
        self.events.push(RecordedEvent { kind, data, timestamp });
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Stop recording and take the events.
    #[must_use]
    pub fn finish(self) -> Vec<RecordedEvent> {
        self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Releases recorded events in order, preserving their relative delays.
///
/// The first event is due immediately; every later event is due once the
/// same amount of time has elapsed since replay start as separated it from
/// the first event in the recording.
#[derive(Debug, Clone)]
pub struct Replay {
    pending: VecDeque<RecordedEvent>,
    started_at_ms: f64,
    origin_ts: f64,
}

impl Replay {
    /// Start replaying `events` at host time `now_ms`.
    #[must_use]
    pub fn new(events: Vec<RecordedEvent>, now_ms: f64) -> Self {
        let origin_ts = events.first().map_or(0.0, |e| e.timestamp);
        Self { pending: events.into(), started_at_ms: now_ms, origin_ts }
    }

    /// Pop every event that is due at host time `now_ms`.
    pub fn due(&mut self, now_ms: f64) -> Vec<RecordedEvent> {
        let elapsed = now_ms - self.started_at_ms;
        let mut out = Vec::new();
        while self
            .pending
            .front()
            .is_some_and(|e| e.timestamp - self.origin_ts <= elapsed)
        {
            if let Some(event) = self.pending.pop_front() {
                out.push(event);
            }
        }
        out
    }

    /// Milliseconds from `now_ms` until the next event is due, if any remain.
    #[must_use]
    pub fn next_delay_ms(&self, now_ms: f64) -> Option<f64> {
        let next = self.pending.front()?;
        let due_at = self.started_at_ms + (next.timestamp - self.origin_ts);
        Some((due_at - now_ms).max(0.0))
    }

    /// Number of events not yet released.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
