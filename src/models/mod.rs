//! Data Models
//!
//! Serializable types for the canvas, impact chain, venture profile,
//! undo/redo history, and application settings.

pub mod canvas;
pub mod history;
pub mod impact_chain;
pub mod settings;
pub mod venture;
