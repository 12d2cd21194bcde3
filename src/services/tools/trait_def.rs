//! Tool Trait and Registry
//!
//! Defines the unified `CanvasTool` trait interface and `ToolRegistry`
//! for registration, lookup, and dispatch. Whether a tool mutates canvas
//! state is read off its single definition; there is no second
//! hand-maintained set of mutating tool names to drift out of sync.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use social_canvas_core::ToolDefinition;
use social_canvas_tools::ToolResult;

use crate::services::agent::events::StatusSink;
use crate::services::canvas::CanvasAggregate;
use crate::services::knowledge::KnowledgeSearch;
use crate::services::tools::impls::thread_context::ThreadContextProvider;
use crate::services::venture::VentureProfileService;

/// Context provided to each tool during execution.
///
/// Carries every handle a tool may need: the canvas aggregate, the
/// venture profile service, the knowledge-search collaborator, the status
/// sink, and the sibling-conversation context provider. Tools receive
/// everything through context and hold no state of their own.
#[derive(Clone)]
pub struct ToolExecutionContext {
    /// Conversation this execution belongs to
    pub conversation_id: String,
    /// The canvas all mutating tools write through
    pub canvas: Arc<CanvasAggregate>,
    /// Venture profile reads/writes
    pub venture: Arc<VentureProfileService>,
    /// External knowledge-search capability
    pub knowledge: Arc<dyn KnowledgeSearch>,
    /// Status setter; tools flip searching/updating through this
    pub status: StatusSink,
    /// Read-only context from sibling conversations
    pub threads: Arc<dyn ThreadContextProvider>,
    /// Cooperative cancellation for the in-flight turn
    pub cancellation: CancellationToken,
}

/// Unified tool interface.
///
/// Each tool provides its definition (identity, schema, mutating flag)
/// and its execution logic. Tools are registered in a `ToolRegistry` and
/// dispatched dynamically by name.
#[async_trait]
pub trait CanvasTool: Send + Sync {
    /// The tool's definition: name, description, input schema, and
    /// whether a successful execution mutates canvas state.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with validated arguments.
    ///
    /// Failures are returned as `ToolResult::err` so the LLM can narrate
    /// them; only infrastructure problems should panic or escape.
    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult;
}

/// Registry of available tools.
///
/// Provides O(1) lookup by name, deterministic iteration in registration
/// order, and bulk definition export for the LLM layer.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn CanvasTool>>,
    /// Insertion order for deterministic iteration
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Registry with every built-in tool registered.
    pub fn with_builtin_tools() -> Self {
        let mut registry = Self::new();
        for tool in crate::services::tools::impls::builtin_tools() {
            registry.register(tool);
        }
        registry
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn CanvasTool>) {
        let name = tool.definition().name;
        if !self.tools.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.tools.insert(name, tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CanvasTool>> {
        self.tools.get(name).cloned()
    }

    /// Whether a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All tool names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.order.clone()
    }

    /// All tool definitions in registration order, suitable for sending
    /// to the LLM layer.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition())
            .collect()
    }

    /// Whether the named tool mutates canvas state. None if unknown.
    pub fn modifies_canvas(&self, name: &str) -> Option<bool> {
        self.tools.get(name).map(|t| t.definition().modifies_canvas)
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
