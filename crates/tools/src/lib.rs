//! Social Canvas Tools
//!
//! Portable tool-execution types. The full tool registry and executor live
//! in the main crate (they need the canvas services); this crate holds the
//! result and request types that the LLM-facing layer exchanges with them.

pub mod executor;

pub use executor::{ToolCallRequest, ToolResult};
