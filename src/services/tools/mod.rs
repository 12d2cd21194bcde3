//! Tool Protocol
//!
//! The fixed, schema-validated operation set an external AI agent may
//! invoke against the canvas: trait + registry, the definition catalog,
//! the executor enforcing the validate→execute→broadcast contract, and
//! the tool implementations.

pub mod definitions;
pub mod executor;
pub mod impls;
pub mod trait_def;

pub use executor::ToolExecutor;
pub use trait_def::{CanvasTool, ToolExecutionContext, ToolRegistry};
