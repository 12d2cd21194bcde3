//! Tool Call Context
//!
//! Identity carried with every tool invocation: which conversation issued
//! the call, which canvas it targets, and whether a human or the agent is
//! behind it. Tools receive this context read-only; they cannot mutate
//! session state or control execution flow through it.

use serde::{Deserialize, Serialize};

/// Who authored an edit: a human typing into the canvas, or the AI agent
/// writing through a tool call. History batching and broadcast payloads
/// both key off this distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditSource {
    User,
    Agent,
}

/// Context for a single tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallContext {
    /// Conversation this tool call belongs to
    pub conversation_id: String,
    /// Canvas the call operates on
    pub canvas_id: String,
    /// Unique identifier for this specific tool call
    pub tool_call_id: String,
    /// Actor behind the call
    pub source: EditSource,
}

impl ToolCallContext {
    /// Create a new tool call context.
    pub fn new(
        conversation_id: impl Into<String>,
        canvas_id: impl Into<String>,
        tool_call_id: impl Into<String>,
        source: EditSource,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            canvas_id: canvas_id.into(),
            tool_call_id: tool_call_id.into(),
            source,
        }
    }

    /// Context for an agent-issued call.
    pub fn agent(
        conversation_id: impl Into<String>,
        canvas_id: impl Into<String>,
        tool_call_id: impl Into<String>,
    ) -> Self {
        Self::new(conversation_id, canvas_id, tool_call_id, EditSource::Agent)
    }
}
