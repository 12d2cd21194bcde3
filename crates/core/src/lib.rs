//! Social Canvas Core
//!
//! Foundation crate for the Social Canvas workspace. Contains the error
//! taxonomy, the tool-call context, the parameter schema used by the tool
//! protocol, and the agent status state machine. These types are
//! dependency-light (serde + thiserror only) so that schema-only consumers
//! (LLM prompt builders, transport layers) can depend on them without
//! pulling in storage or runtime infrastructure.

pub mod context;
pub mod error;
pub mod schema;
pub mod status;

pub use context::{EditSource, ToolCallContext};
pub use error::{CoreError, CoreResult};
pub use schema::{ParameterSchema, SchemaViolation, ToolDefinition};
pub use status::{AgentStatus, StatusUpdate};
