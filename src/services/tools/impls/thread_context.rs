//! Thread Context Tool
//!
//! Read-only access to sibling conversations. Cross-conversation context
//! sharing is an explicit RPC to a named thread, never shared mutable
//! state.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use social_canvas_core::{CoreResult, ToolDefinition};
use social_canvas_tools::ToolResult;

use crate::services::tools::definitions;
use crate::services::tools::trait_def::{CanvasTool, ToolExecutionContext};

/// Snapshot of what a sibling conversation has been working on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadContextSummary {
    pub thread_id: String,
    /// Short prose summary of the conversation so far
    pub summary: String,
    /// Canvas the sibling conversation is attached to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<String>,
    /// Last activity timestamp (RFC 3339)
    pub updated_at: String,
}

/// Provider of sibling-conversation context.
pub trait ThreadContextProvider: Send + Sync {
    /// Fetch a thread's context summary; None for unknown threads.
    fn get_context(&self, thread_id: &str) -> CoreResult<Option<ThreadContextSummary>>;
}

/// In-memory provider backing tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryThreadContexts {
    contexts: RwLock<HashMap<String, ThreadContextSummary>>,
}

impl InMemoryThreadContexts {
    /// Register or replace a thread's context summary.
    pub fn insert(&self, summary: ThreadContextSummary) {
        let mut contexts = self.contexts.write().unwrap_or_else(|e| e.into_inner());
        contexts.insert(summary.thread_id.clone(), summary);
    }
}

impl ThreadContextProvider for InMemoryThreadContexts {
    fn get_context(&self, thread_id: &str) -> CoreResult<Option<ThreadContextSummary>> {
        let contexts = self.contexts.read().unwrap_or_else(|e| e.into_inner());
        Ok(contexts.get(thread_id).cloned())
    }
}

/// Reads a sibling conversation's context summary.
pub struct GetThreadContextTool;

#[async_trait]
impl CanvasTool for GetThreadContextTool {
    fn definition(&self) -> ToolDefinition {
        definitions::get_thread_context()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let thread_id = args
            .get("thread_id")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        match ctx.threads.get_context(thread_id) {
            Ok(Some(summary)) => {
                let text = format!(
                    "Context from thread {} (last active {}):\n{}",
                    summary.thread_id, summary.updated_at, summary.summary
                );
                let data = serde_json::to_value(&summary).unwrap_or(Value::Null);
                ToolResult::ok_with_data(text, data)
            }
            Ok(None) => ToolResult::err(format!("Thread not found: {}", thread_id)),
            Err(e) => ToolResult::err(format!("Failed to read thread context: {}", e)),
        }
    }
}
