//! Tool Executor Core Types
//!
//! Types for tool call requests and execution results. Independent of the
//! full tool executor implementation (which lives in the main crate) so
//! that transport layers can parse provider output and narrate results
//! without depending on canvas services.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use social_canvas_core::CoreError;

/// A tool call as issued by the external agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back in the tool result
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// Raw JSON arguments, validated against the tool's schema before execution
    pub arguments: Value,
}

impl ToolCallRequest {
    /// Create a tool call request.
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Parse a request from a raw provider JSON string.
    ///
    /// Invalid JSON is rejected here, before the executor ever sees the
    /// call.
    pub fn from_raw(
        id: impl Into<String>,
        name: impl Into<String>,
        raw_arguments: &str,
    ) -> Result<Self, CoreError> {
        let arguments: Value = serde_json::from_str(raw_arguments)
            .map_err(|e| CoreError::validation(format!("invalid tool arguments JSON: {}", e)))?;
        Ok(Self::new(id, name, arguments))
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Human/LLM-readable output (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Structured payload for callers that want more than prose
    /// (e.g. the full canvas snapshot from a read tool)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            data: None,
            error: None,
        }
    }

    /// Create a successful result with a structured payload
    pub fn ok_with_data(output: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            data: Some(data),
            error: None,
        }
    }

    /// Create an error result
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Convert to string for LLM consumption.
    ///
    /// Failures are narrated rather than thrown so the model can explain
    /// them to the user in natural language.
    pub fn to_content(&self) -> String {
        if self.success {
            self.output.clone().unwrap_or_default()
        } else {
            format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            )
        }
    }
}
