//! Integration Tests Module
//!
//! End-to-end scenarios over the canvas core: dependency gating and the
//! impact chain, the tool protocol with its broadcast coupling, the agent
//! session lifecycle, and the undo/redo history.

// Canvas validation flow tests
mod canvas_flow_test;

// Undo/redo history tests
mod history_test;

// Tool execution and broadcast coupling tests
mod tool_broadcast_test;
