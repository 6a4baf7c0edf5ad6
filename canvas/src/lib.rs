//! Geometry-construction canvas engine.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! construction (points, lines, arcs, text), the four virtual drawing
//! instruments, undo/redo, session files and event replay. The host
//! JavaScript layer wires DOM events and toolbar buttons to the engine and
//! acts on the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] dispatcher |
//! | [`doc`] | Shape model, point naming and shape-list operations |
//! | [`geom`] | Pure 2D geometry helpers |
//! | [`snap`] | Snapping to points and lines |
//! | [`hit`] | Hit-testing shapes under the pointer |
//! | [`instruments`] | Ruler, compass, protractor and set-square |
//! | [`line_tool`] | Two-click segment/line construction and edge drawing |
//! | [`history`] | Bounded undo/redo of editor snapshots |
//! | [`session`] | Session file save/load |
//! | [`replay`] | Re-driving recorded events through the engine |
//! | [`input`] | Tools, modifiers and the gesture state machine |
//! | [`render`] | Canvas 2D drawing |
//! | [`config`] | Editor configuration and validation |
//! | [`consts`] | Shared numeric constants (tolerances, zone sizes) |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod instruments;
pub mod line_tool;
pub mod render;
pub mod replay;
pub mod session;
pub mod snap;
