use recording::{EventKind, RecordedEvent, Recorder, Replay};
use tracing::{debug, info, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::{EditorConfig, is_hex_color};
use crate::doc::{LineType, Shape, ShapeList, TextShape};
use crate::geom::Point;
use crate::history::{EditorSnapshot, History};
use crate::input::{Button, GridMode, InputState, Key, Modifiers, Preview, Tool, UiState};
use crate::instruments::{
    CompassState, CompassZone, Instrument, ProtractorState, ProtractorZone, RulerState, RulerZone, SetSquareState,
    SetSquareZone,
};
use crate::line_tool::{self, EdgeDraw, LineClick, LineTool};
use crate::session::{self, SessionError, SessionFile};
use crate::{hit, render, replay, snap};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A shape was appended to the construction.
    ShapeCreated(Shape),
    /// Shapes removed by the eraser, the target first.
    ShapesErased(Vec<Shape>),
    /// The host should prompt for text and call `commit_text` with it.
    TextRequested { pos: Point },
    /// Undo/redo availability, for toolbar buttons.
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// A user-visible error, e.g. a rejected file.
    Alert(String),
    /// Replay consumed its last event and live input is back.
    ReplayFinished,
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub config: EditorConfig,
    pub shapes: ShapeList,
    /// Number of the last point name handed out.
    pub point_name_counter: u32,
    pub compass: CompassState,
    pub ruler: RulerState,
    pub protractor: ProtractorState,
    pub set_square: SetSquareState,
    pub history: History,
    pub ui: UiState,
    pub input: InputState,
    pub line_tool: LineTool,
    /// State captured at pointer-down, recorded on pointer-up if it changed.
    checkpoint: Option<EditorSnapshot>,
    recorder: Option<Recorder>,
    replay: Option<Replay>,
    /// Host clock in milliseconds, used to stamp recorded events.
    clock_ms: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let history = History::new(config.history_limit);
        Self {
            config,
            shapes: ShapeList::new(),
            point_name_counter: 0,
            compass: CompassState::default(),
            ruler: RulerState::default(),
            protractor: ProtractorState::default(),
            set_square: SetSquareState::default(),
            history,
            ui: UiState::default(),
            input: InputState::default(),
            line_tool: LineTool::default(),
            checkpoint: None,
            recorder: None,
            replay: None,
            clock_ms: 0.0,
        }
    }

    // --- Snapshots ---

    /// Capture everything undo restores.
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            shapes: self.shapes.clone(),
            point_name_counter: self.point_name_counter,
            compass_state: self.compass,
            ruler_state: self.ruler,
            protractor_state: self.protractor,
            set_square_state: self.set_square,
        }
    }

    fn restore(&mut self, snapshot: EditorSnapshot) {
        self.shapes = snapshot.shapes;
        self.point_name_counter = snapshot.point_name_counter;
        self.compass = snapshot.compass_state;
        self.ruler = snapshot.ruler_state;
        self.protractor = snapshot.protractor_state;
        self.set_square = snapshot.set_square_state;
    }

    /// Run `mutate` and record an undo checkpoint if it changed anything.
    fn mutate<F>(&mut self, f: F) -> Vec<Action>
    where
        F: FnOnce(&mut Self) -> Vec<Action>,
    {
        let before = self.snapshot();
        let mut actions = f(self);
        let after = self.snapshot();
        if self.history.save_if_changed(before, &after) {
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    /// Drop any gesture and pending construction. A gesture that already
    /// changed the state still gets its checkpoint.
    fn cancel_gestures(&mut self) -> Vec<Action> {
        self.line_tool.cancel();
        self.input = InputState::Idle;
        self.ui.snap = None;
        self.finish_checkpoint()
    }

    fn finish_checkpoint(&mut self) -> Vec<Action> {
        let Some(before) = self.checkpoint.take() else {
            return Vec::new();
        };
        let after = self.snapshot();
        if self.history.save_if_changed(before, &after) {
            vec![self.history_changed()]
        } else {
            Vec::new()
        }
    }

    // --- Clock / recording ---

    /// Advance the host clock used to stamp recorded events.
    pub fn set_clock(&mut self, now_ms: f64) {
        self.clock_ms = now_ms;
    }

    pub fn start_recording(&mut self) {
        info!(at_ms = self.clock_ms, "recording started");
        self.recorder = Some(Recorder::start(self.clock_ms));
    }

    /// Stop recording and hand back the captured events.
    pub fn stop_recording(&mut self) -> Vec<RecordedEvent> {
        let events = self.recorder.take().map(Recorder::finish).unwrap_or_default();
        info!(events = events.len(), "recording stopped");
        events
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    fn record(&mut self, kind: EventKind, data: serde_json::Value) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(kind, data, self.clock_ms);
        }
    }

    // --- Replay ---

    /// Reset the editor and start re-driving `events`. Live input is ignored
    /// until the replay finishes.
    pub fn start_replay(&mut self, events: Vec<RecordedEvent>, now_ms: f64) -> Vec<Action> {
        info!(events = events.len(), "replay started");
        self.recorder = None;
        self.reset();
        self.replay = Some(Replay::new(events, now_ms));
        let mut actions = vec![self.history_changed(), Action::RenderNeeded];
        actions.extend(self.replay_tick(now_ms));
        actions
    }

    /// Decode a recording and replay it. A malformed recording is reported
    /// and leaves the editor untouched.
    pub fn load_replay(&mut self, text: &str, now_ms: f64) -> Vec<Action> {
        match recording::decode_recording(text) {
            Ok(events) => self.start_replay(events, now_ms),
            Err(e) => {
                warn!(error = %e, "rejected recording");
                vec![Action::Alert(format!("Could not read recording: {e}"))]
            }
        }
    }

    /// Apply every event due at `now_ms`.
    pub fn replay_tick(&mut self, now_ms: f64) -> Vec<Action> {
        let Some(pending) = self.replay.as_mut() else {
            return Vec::new();
        };
        let due = pending.due(now_ms);
        let finished = pending.is_finished();

        let mut actions = Vec::new();
        for event in &due {
            match replay::apply_event(self, event) {
                Ok(a) => actions.extend(a),
                Err(e) => {
                    warn!(error = %e, "replay aborted");
                    self.replay = None;
                    actions.push(Action::Alert(format!("Replay stopped: {e}")));
                    return actions;
                }
            }
        }
        debug!(applied = due.len(), "replay tick");
        if finished {
            info!("replay finished");
            self.replay = None;
            actions.push(Action::ReplayFinished);
        }
        actions
    }

    /// Milliseconds until the next replayed event is due.
    #[must_use]
    pub fn replay_delay_ms(&self, now_ms: f64) -> Option<f64> {
        self.replay.as_ref().and_then(|r| r.next_delay_ms(now_ms))
    }

    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    fn reset(&mut self) {
        self.restore(EditorSnapshot::default());
        self.history.clear();
        self.ui = UiState::default();
        self.input = InputState::Idle;
        self.line_tool.cancel();
        self.checkpoint = None;
    }

    // --- Tool / settings ---

    /// Select the active tool. Cancels any construction or gesture.
    pub fn set_tool(&mut self, tool: Option<Tool>) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.record(EventKind::ToolSelect, replay::tool_payload(tool));
        self.apply_tool(tool)
    }

    pub(crate) fn apply_tool(&mut self, tool: Option<Tool>) -> Vec<Action> {
        let mut actions = self.cancel_gestures();
        info!(tool = tool.map_or("none", Tool::name), "tool selected");
        self.ui.tool = tool;
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Set the drawing color. Anything but `#RRGGBB` is ignored.
    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        if self.replay.is_some() || !is_hex_color(color) {
            return Vec::new();
        }
        self.record(EventKind::ColorChange, replay::color_payload(color));
        self.apply_color(color)
    }

    pub(crate) fn apply_color(&mut self, color: &str) -> Vec<Action> {
        if !is_hex_color(color) {
            return Vec::new();
        }
        self.ui.color = color.to_owned();
        Vec::new()
    }

    pub fn set_grid(&mut self, grid: GridMode) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.record(EventKind::GridChange, replay::grid_payload(grid));
        self.apply_grid(grid)
    }

    pub(crate) fn apply_grid(&mut self, grid: GridMode) -> Vec<Action> {
        self.ui.grid = grid;
        vec![Action::RenderNeeded]
    }

    /// Set the ruler length in centimeters. Non-positive values are ignored.
    pub fn set_ruler_length_cm(&mut self, cm: f64) -> Vec<Action> {
        if self.replay.is_some() || !(cm.is_finite() && cm > 0.0) {
            return Vec::new();
        }
        self.record(EventKind::RulerLengthChange, replay::ruler_length_payload(cm));
        self.apply_ruler_length_cm(cm)
    }

    pub(crate) fn apply_ruler_length_cm(&mut self, cm: f64) -> Vec<Action> {
        self.mutate(|core| {
            core.ruler.set_length_cm(cm);
            Vec::new()
        })
    }

    /// Canvas size in CSS pixels; full lines are clipped to it.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.config.canvas_width = width;
            self.config.canvas_height = height;
        }
    }

    // --- Instruments ---

    pub fn toggle_ruler(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.mutate(|core| {
            core.ruler.visible = !core.ruler.visible;
            info!(visible = core.ruler.visible, "ruler toggled");
            Vec::new()
        })
    }

    pub fn toggle_protractor(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.mutate(|core| {
            core.protractor.visible = !core.protractor.visible;
            info!(visible = core.protractor.visible, "protractor toggled");
            Vec::new()
        })
    }

    pub fn toggle_set_square(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.mutate(|core| {
            core.set_square.visible = !core.set_square.visible;
            info!(visible = core.set_square.visible, "set-square toggled");
            Vec::new()
        })
    }

    pub fn remove_compass(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.mutate(|core| {
            core.compass.clear();
            Vec::new()
        })
    }

    // --- Document ---

    /// Remove every shape, reset naming, clear the compass and hide the
    /// other instruments.
    pub fn clear_all(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        let mut actions = self.cancel_gestures();
        actions.extend(self.mutate(|core| {
            core.restore(EditorSnapshot {
                ruler_state: RulerState { visible: false, ..core.ruler },
                protractor_state: ProtractorState { visible: false, ..core.protractor },
                set_square_state: SetSquareState { visible: false, ..core.set_square },
                ..EditorSnapshot::default()
            });
            info!("canvas cleared");
            Vec::new()
        }));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Commit the text the host collected after `TextRequested`.
    pub fn commit_text(&mut self, pos: Point, content: &str) -> Vec<Action> {
        if self.replay.is_some() || content.is_empty() {
            return Vec::new();
        }
        let color = self.ui.color.clone();
        self.mutate(|core| {
            let shape = Shape::Text(TextShape { x: pos.x, y: pos.y, content: content.to_owned(), color });
            core.shapes.push(shape.clone());
            vec![Action::ShapeCreated(shape)]
        })
    }

    pub fn undo(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        let mut actions = self.cancel_gestures();
        let current = self.snapshot();
        if let Some(previous) = self.history.undo(current) {
            self.restore(previous);
            debug!(undo = self.history.undo_depth(), redo = self.history.redo_depth(), "undo");
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn redo(&mut self) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        let mut actions = self.cancel_gestures();
        let current = self.snapshot();
        if let Some(next) = self.history.redo(current) {
            self.restore(next);
            debug!(undo = self.history.undo_depth(), redo = self.history.redo_depth(), "redo");
            actions.push(self.history_changed());
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Sessions ---

    /// Serialize the current state and its undo history.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if serialization fails.
    pub fn save_session(&self) -> Result<String, SessionError> {
        let file = SessionFile { current_state: self.snapshot(), history: self.history.entries().cloned().collect() };
        let text = session::encode_session(&file)?;
        info!(shapes = self.shapes.len(), history = file.history.len(), "session saved");
        Ok(text)
    }

    /// Replace the editor state with a session file. On failure the state is
    /// unchanged and an alert is returned.
    pub fn load_session(&mut self, text: &str) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        let file = match session::decode_session(text) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "rejected session");
                return vec![Action::Alert(format!("Could not load session: {e}"))];
            }
        };
        let mut actions = self.cancel_gestures();
        self.checkpoint = None;
        info!(shapes = file.current_state.shapes.len(), history = file.history.len(), "session loaded");
        self.restore(file.current_state);
        self.history = History::from_entries(file.history, self.config.history_limit);
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pos: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.replay.is_some() || button != Button::Primary {
            return Vec::new();
        }
        self.record(EventKind::Mousedown, replay::pointer_payload(pos));
        self.handle_pointer_down(pos)
    }

    pub fn on_pointer_move(&mut self, pos: Point, _modifiers: Modifiers) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        self.record(EventKind::Mousemove, replay::pointer_payload(pos));
        self.handle_pointer_move(pos)
    }

    pub fn on_pointer_up(&mut self, pos: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if self.replay.is_some() || button != Button::Primary {
            return Vec::new();
        }
        self.record(EventKind::Mouseup, replay::pointer_payload(pos));
        self.handle_pointer_up(pos)
    }

    /// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Y redoes, Escape cancels the construction.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if self.replay.is_some() {
            return Vec::new();
        }
        match key.0.as_str() {
            "z" | "Z" if modifiers.command() => self.undo(),
            "y" | "Y" if modifiers.command() => self.redo(),
            "Escape" => {
                let mut actions = self.cancel_gestures();
                actions.push(Action::RenderNeeded);
                actions
            }
            _ => Vec::new(),
        }
    }

    /// Pointer-down with the strict priority ruler, compass, protractor,
    /// set-square, then the active tool.
    pub(crate) fn handle_pointer_down(&mut self, pos: Point) -> Vec<Action> {
        self.ui.pointer = Some(pos);
        if !self.input.is_idle() {
            return Vec::new();
        }

        if let Some(zone) = self.ruler.hit(pos, self.config.pixels_per_cm) {
            return self.begin_ruler(zone, pos);
        }
        if let Some(zone) = self.compass.hit(pos) {
            return self.begin_compass(zone, pos);
        }
        if let Some(zone) = self.protractor.hit(pos) {
            return self.begin_protractor(zone, pos);
        }
        if let Some(zone) = self.set_square.hit(pos) {
            return self.begin_set_square(zone, pos);
        }
        self.tool_action(pos)
    }

    fn engage(&mut self, input: InputState) -> Vec<Action> {
        self.line_tool.cancel();
        debug!(instrument = ?input.instrument(), "gesture started");
        self.input = input;
        vec![Action::RenderNeeded]
    }

    fn begin_ruler(&mut self, zone: RulerZone, pos: Point) -> Vec<Action> {
        self.checkpoint = Some(self.snapshot());
        match self.ruler.begin_drag(zone, pos) {
            Some(drag) => self.engage(InputState::Ruler { drag }),
            None => {
                let draw = EdgeDraw::begin(self.ruler.drawing_edge(self.config.pixels_per_cm), pos);
                self.engage(InputState::EdgeDraw { instrument: Instrument::Ruler, draw })
            }
        }
    }

    fn begin_compass(&mut self, zone: CompassZone, pos: Point) -> Vec<Action> {
        let Some(drag) = self.compass.begin_drag(zone, pos) else {
            return Vec::new();
        };
        self.checkpoint = Some(self.snapshot());
        self.engage(InputState::Compass { drag })
    }

    fn begin_protractor(&mut self, zone: ProtractorZone, pos: Point) -> Vec<Action> {
        self.checkpoint = Some(self.snapshot());
        let drag = self.protractor.begin_drag(zone, pos);
        self.engage(InputState::Protractor { drag })
    }

    fn begin_set_square(&mut self, zone: SetSquareZone, pos: Point) -> Vec<Action> {
        self.checkpoint = Some(self.snapshot());
        if let Some(edge) = self.set_square.drawing_edge(zone) {
            let draw = EdgeDraw::begin(edge, pos);
            return self.engage(InputState::EdgeDraw { instrument: Instrument::SetSquare, draw });
        }
        match self.set_square.begin_drag(zone, pos, &self.shapes, self.config.snap_threshold_px) {
            Some(drag) => self.engage(InputState::SetSquare { drag }),
            None => {
                self.checkpoint = None;
                Vec::new()
            }
        }
    }

    fn tool_action(&mut self, pos: Point) -> Vec<Action> {
        match self.ui.tool {
            None => Vec::new(),
            Some(Tool::Point) => self.mutate(|core| {
                let color = core.ui.color.clone();
                let name = line_tool::create_point(pos, &mut core.shapes, &mut core.point_name_counter, &color);
                debug!(%name, "point placed");
                created_last(&core.shapes)
            }),
            Some(Tool::Text) => vec![Action::TextRequested { pos }],
            Some(Tool::Move) => {
                let Some(index) = hit::find_movable_shape_at(pos, &self.shapes) else {
                    return Vec::new();
                };
                let Some(anchor) = shape_anchor(self.shapes.get(index)) else {
                    return Vec::new();
                };
                self.checkpoint = Some(self.snapshot());
                let grab_offset = Point::new(pos.x - anchor.x, pos.y - anchor.y);
                self.engage(InputState::MovingShape { index, grab_offset })
            }
            Some(Tool::Eraser) => self.mutate(|core| {
                let Some(index) = hit::find_point_at(pos, &core.shapes).or_else(|| hit::find_shape_at(pos, &core.shapes))
                else {
                    return Vec::new();
                };
                let removed = core.shapes.remove_cascade(index);
                debug!(count = removed.len(), "shapes erased");
                vec![Action::ShapesErased(removed)]
            }),
            Some(tool @ (Tool::Segment | Tool::Line)) => {
                let mode = if tool == Tool::Line { LineType::Line } else { LineType::Segment };
                self.mutate(|core| {
                    let color = core.ui.color.clone();
                    let click = core.line_tool.click(
                        pos,
                        mode,
                        &mut core.shapes,
                        &mut core.point_name_counter,
                        &color,
                        &core.config,
                    );
                    debug!(?click, "line tool click");
                    match click {
                        LineClick::Committed(index) => {
                            core.shapes.get(index).cloned().map(Action::ShapeCreated).into_iter().collect()
                        }
                        LineClick::Started | LineClick::Degenerate => vec![Action::RenderNeeded],
                    }
                })
            }
            Some(Tool::Compass) => {
                if self.compass.is_placed() {
                    return Vec::new();
                }
                self.checkpoint = Some(self.snapshot());
                let drag = self.compass.place(pos);
                self.engage(InputState::Compass { drag })
            }
            Some(Tool::Mark) => self.mutate(|core| {
                let marked_point = hit::find_point_at(pos, &core.shapes).is_some_and(|i| core.shapes.cycle_angle_mark(i));
                if !marked_point {
                    if let Some(i) = hit::find_line_at(pos, &core.shapes) {
                        core.shapes.cycle_line_marking(i);
                    }
                }
                Vec::new()
            }),
        }
    }

    pub(crate) fn handle_pointer_move(&mut self, pos: Point) -> Vec<Action> {
        self.ui.pointer = Some(pos);
        let threshold = self.config.snap_threshold_px;
        match &mut self.input {
            InputState::Idle => {
                if self.line_tool.is_pending() {
                    self.ui.snap = snap::snap_to_point(pos, &self.shapes, threshold);
                    return vec![Action::RenderNeeded];
                }
                return self.update_cursor(pos);
            }
            InputState::Ruler { drag } => {
                self.ui.snap = self.ruler.drag(drag, pos, &self.shapes, threshold);
            }
            InputState::Compass { drag } => {
                self.ui.snap = self.compass.drag(drag, pos, &self.shapes, threshold);
            }
            InputState::Protractor { drag } => self.protractor.drag(drag, pos),
            InputState::SetSquare { drag } => {
                self.ui.snap = self.set_square.drag(drag, pos, &self.shapes, threshold);
            }
            InputState::EdgeDraw { .. } => {}
            InputState::MovingShape { index, grab_offset } => {
                let to = Point::new(pos.x - grab_offset.x, pos.y - grab_offset.y);
                self.shapes.move_shape(*index, to, self.config.canvas_width, self.config.canvas_height);
            }
        }
        vec![Action::RenderNeeded]
    }

    pub(crate) fn handle_pointer_up(&mut self, pos: Point) -> Vec<Action> {
        self.ui.pointer = Some(pos);
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::Compass { drag } => {
                if let Some(arc) = self.compass.end_drag(&drag, &self.ui.color, &self.config) {
                    info!(radius = arc.radius, sweep = drag.sweep(), "arc traced");
                    let shape = Shape::Arc(arc);
                    self.shapes.push(shape.clone());
                    actions.push(Action::ShapeCreated(shape));
                }
            }
            InputState::EdgeDraw { instrument, draw } => {
                if let Some(line) = draw.finish(pos, &self.ui.color) {
                    debug!(?instrument, "segment drawn along edge");
                    let shape = Shape::Line(line);
                    self.shapes.push(shape.clone());
                    actions.push(Action::ShapeCreated(shape));
                }
            }
            InputState::Ruler { .. }
            | InputState::Protractor { .. }
            | InputState::SetSquare { .. }
            | InputState::MovingShape { .. } => {}
        }
        self.ui.snap = None;
        actions.extend(self.finish_checkpoint());
        actions.push(Action::RenderNeeded);
        actions
    }

    fn update_cursor(&mut self, pos: Point) -> Vec<Action> {
        let cursor = self.hover_cursor(pos);
        if cursor == self.ui.cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor.to_owned();
        vec![Action::SetCursor(cursor.to_owned())]
    }

    fn hover_cursor(&self, pos: Point) -> &'static str {
        if let Some(zone) = self.ruler.hit(pos, self.config.pixels_per_cm) {
            return match zone {
                RulerZone::Rotating => "grab",
                RulerZone::DrawingEdge => "crosshair",
                RulerZone::Moving => "move",
            };
        }
        if let Some(zone) = self.compass.hit(pos) {
            return match zone {
                CompassZone::Rotating => "grab",
                CompassZone::Resizing => "ew-resize",
                CompassZone::Moving => "move",
            };
        }
        if let Some(zone) = self.protractor.hit(pos) {
            return match zone {
                ProtractorZone::Rotating => "grab",
                ProtractorZone::Moving => "move",
            };
        }
        if let Some(zone) = self.set_square.hit(pos) {
            return match zone {
                SetSquareZone::DrawingEdgeH | SetSquareZone::DrawingEdgeV => "crosshair",
                SetSquareZone::Rotating => "grab",
                SetSquareZone::HorizontalMoving => "ew-resize",
                SetSquareZone::Moving => "move",
            };
        }
        match self.ui.tool {
            Some(Tool::Move) => "pointer",
            Some(Tool::Text) => "text",
            Some(_) => "crosshair",
            None => "default",
        }
    }

    // --- Queries ---

    /// Transient geometry for the renderer.
    #[must_use]
    pub fn preview(&self) -> Option<Preview> {
        let pointer = self.ui.pointer?;
        match &self.input {
            InputState::Idle => {
                let start = self.line_tool.start()?;
                let mode = match self.ui.tool {
                    Some(Tool::Line) => LineType::Line,
                    _ => LineType::Segment,
                };
                let (from, to) = line_tool::preview(start, pointer, mode, &self.config)?;
                Some(Preview::Dashed { from, to })
            }
            InputState::EdgeDraw { draw, .. } => Some(Preview::Dashed { from: draw.start, to: draw.end_for(pointer) }),
            InputState::Compass { drag } if drag.zone == CompassZone::Rotating => Some(Preview::Arc {
                center: self.compass.center?,
                radius: drag.start_radius(),
                start_angle: drag.start_angle,
                end_angle: drag.end_angle,
            }),
            _ => None,
        }
    }
}

/// Anchor a move-tool drag is measured from.
fn shape_anchor(shape: Option<&Shape>) -> Option<Point> {
    match shape? {
        Shape::Point(p) => Some(p.pos()),
        Shape::Text(t) => Some(Point::new(t.x, t.y)),
        Shape::Line(_) | Shape::Arc(_) => None,
    }
}

fn created_last(shapes: &ShapeList) -> Vec<Action> {
    shapes.iter().next_back().cloned().map(Action::ShapeCreated).into_iter().collect()
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
    dpr: f64,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EditorConfig) -> Self {
        let mut core = EngineCore::with_config(config);
        core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
        Self { canvas, core, dpr: 1.0 }
    }

    /// Update viewport dimensions and device pixel ratio.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        self.canvas.set_width((width_css * self.dpr).round() as u32);
        self.canvas.set_height((height_css * self.dpr).round() as u32);
        self.core.set_viewport(width_css, height_css);
    }

    fn tick_clock(&mut self) {
        self.core.set_clock(js_sys::Date::now());
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, pos: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.tick_clock();
        self.core.on_pointer_down(pos, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, pos: Point, modifiers: Modifiers) -> Vec<Action> {
        self.tick_clock();
        self.core.on_pointer_move(pos, modifiers)
    }

    pub fn on_pointer_up(&mut self, pos: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.tick_clock();
        self.core.on_pointer_up(pos, button, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn set_tool(&mut self, tool: Option<Tool>) -> Vec<Action> {
        self.tick_clock();
        self.core.set_tool(tool)
    }

    pub fn set_color(&mut self, color: &str) -> Vec<Action> {
        self.tick_clock();
        self.core.set_color(color)
    }

    pub fn set_grid(&mut self, grid: GridMode) -> Vec<Action> {
        self.tick_clock();
        self.core.set_grid(grid)
    }

    pub fn set_ruler_length_cm(&mut self, cm: f64) -> Vec<Action> {
        self.tick_clock();
        self.core.set_ruler_length_cm(cm)
    }

    // --- Recording ---

    pub fn start_recording(&mut self) {
        self.tick_clock();
        self.core.start_recording();
    }

    /// Stop recording and encode the events as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`recording::RecordingError`] if encoding fails.
    pub fn stop_recording(&mut self) -> Result<String, recording::RecordingError> {
        recording::encode_recording(&self.core.stop_recording())
    }

    pub fn load_replay(&mut self, text: &str) -> Vec<Action> {
        self.core.load_replay(text, js_sys::Date::now())
    }

    /// Drive the replay; the host calls this again after `replay_delay_ms`.
    pub fn replay_tick(&mut self) -> Vec<Action> {
        self.core.replay_tick(js_sys::Date::now())
    }

    #[must_use]
    pub fn replay_delay_ms(&self) -> Option<f64> {
        self.core.replay_delay_ms(js_sys::Date::now())
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a drawing call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(&ctx, &self.core, self.dpr)
    }
}
