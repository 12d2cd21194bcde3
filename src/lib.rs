//! Social Canvas
//!
//! Core library for the AI-assisted Social Lean Canvas editor: the canvas
//! state model (sections, impact causality chain, venture profile), the
//! dependency/ordering validation rules that gate writes, the tool protocol
//! an external AI agent drives, the agent session state machine with its
//! snapshot broadcast, and the client-side undo/redo history.
//!
//! The UI shell, LLM provider integration, and embedding/vector search are
//! external collaborators; this crate exposes the read/write API they
//! consume and the contracts they implement.

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;
