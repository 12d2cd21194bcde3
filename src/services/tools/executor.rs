//! Tool Executor
//!
//! One choke point for every operation the external agent invokes:
//! look up the tool, validate the raw input against its schema, run the
//! handler, and broadcast a fresh canvas snapshot after every successful
//! mutating execution. Unknown names and schema violations are rejected
//! before any handler runs, and nothing is broadcast for failures or
//! read-only tools.

use std::sync::Arc;

use serde_json::Value;

use social_canvas_core::AgentStatus;
use social_canvas_tools::ToolResult;

use crate::services::agent::events::CanvasPublisher;
use crate::services::tools::trait_def::{ToolExecutionContext, ToolRegistry};
use crate::utils::error::AppResult;

/// Executes tools against a registry, broadcasting canvas snapshots after
/// mutations.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    publisher: CanvasPublisher,
}

impl ToolExecutor {
    /// Create an executor over a registry and snapshot publisher.
    pub fn new(registry: Arc<ToolRegistry>, publisher: CanvasPublisher) -> Self {
        Self {
            registry,
            publisher,
        }
    }

    /// The registry this executor dispatches into.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Execute a tool by name with the full contract: lookup, schema
    /// validation, handler invocation, and, for mutating tools that
    /// succeed, exactly one canvas snapshot broadcast.
    ///
    /// Validation failures come back as error results (never invoking the
    /// handler) so the LLM can narrate them. `Err` is reserved for
    /// infrastructure failures.
    pub async fn execute(
        &self,
        ctx: &ToolExecutionContext,
        name: &str,
        args: Value,
    ) -> AppResult<ToolResult> {
        let result = self.execute_without_broadcast(ctx, name, args).await;

        if result.success && self.registry.modifies_canvas(name) == Some(true) {
            let canvas = ctx.canvas.get_full_canvas()?;
            self.publisher.publish(canvas);
        }

        Ok(result)
    }

    /// Steps 1–3 of the contract, with no broadcast. Used by `execute`
    /// and available for callers that manage broadcasting themselves.
    pub async fn execute_without_broadcast(
        &self,
        ctx: &ToolExecutionContext,
        name: &str,
        args: Value,
    ) -> ToolResult {
        let tool = match self.registry.get(name) {
            Some(tool) => tool,
            None => {
                tracing::warn!(tool = name, "unknown tool requested");
                return ToolResult::err(format!("Unknown tool: {}", name));
            }
        };

        let definition = tool.definition();
        if let Err(violations) = definition.input_schema.validate(&args) {
            let detail = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return ToolResult::err(format!("Invalid input for {}: {}", name, detail));
        }

        if ctx.cancellation.is_cancelled() {
            return ToolResult::err(format!("Tool call cancelled before execution: {}", name));
        }

        if definition.modifies_canvas {
            ctx.status.set_default(AgentStatus::Updating);
        }

        tracing::debug!(tool = name, conversation_id = %ctx.conversation_id, "executing tool");
        tool.execute(ctx, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    use crate::services::agent::events::{
        SessionBroadcaster, SessionEvent, StatusSink,
    };
    use crate::services::canvas::CanvasAggregate;
    use crate::services::knowledge::InMemoryKnowledgeSearch;
    use crate::services::tools::impls::thread_context::InMemoryThreadContexts;
    use crate::services::venture::VentureProfileService;
    use crate::storage::Database;

    fn setup() -> (ToolExecutor, ToolExecutionContext, SessionBroadcaster) {
        let db = Database::new_in_memory().unwrap();
        db.create_canvas("c1", "Test").unwrap();

        let broadcaster = SessionBroadcaster::default();
        let publisher = CanvasPublisher::new(broadcaster.clone());
        let registry = Arc::new(ToolRegistry::with_builtin_tools());
        let executor = ToolExecutor::new(registry, publisher);

        let ctx = ToolExecutionContext {
            conversation_id: "conv-1".to_string(),
            canvas: Arc::new(CanvasAggregate::open(db.clone(), "c1").unwrap()),
            venture: Arc::new(VentureProfileService::new(db, "c1")),
            knowledge: Arc::new(InMemoryKnowledgeSearch::default()),
            status: StatusSink::new(broadcaster.clone()),
            threads: Arc::new(InMemoryThreadContexts::default()),
            cancellation: CancellationToken::new(),
        };
        (executor, ctx, broadcaster)
    }

    fn drain_canvas_events(
        rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>,
    ) -> usize {
        let mut count = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, SessionEvent::Canvas(_)) {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    async fn test_unknown_tool_is_hard_error_without_broadcast() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();

        let result = executor.execute(&ctx, "explode_canvas", json!({})).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Unknown tool"));
        assert_eq!(drain_canvas_events(&mut rx), 0);
    }

    #[tokio::test]
    async fn test_schema_violation_rejected_before_handler() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();

        let result = executor
            .execute(&ctx, "update_purpose", json!({"wrong_field": 1}))
            .await
            .unwrap();
        assert!(!result.success);
        let error = result.error.unwrap();
        assert!(error.contains("Invalid input for update_purpose"));
        assert!(error.contains("content"));

        // Handler never ran: canvas untouched, nothing broadcast
        let canvas = ctx.canvas.get_full_canvas().unwrap();
        assert_eq!(canvas.completion_percentage, 0);
        assert_eq!(drain_canvas_events(&mut rx), 0);
    }

    #[tokio::test]
    async fn test_mutating_tool_broadcasts_exactly_once() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();

        let result = executor
            .execute(
                &ctx,
                "update_purpose",
                json!({"content": "We exist to help under-banked artisans reach global buyers"}),
            )
            .await
            .unwrap();
        assert!(result.success, "{:?}", result.error);
        assert_eq!(drain_canvas_events(&mut rx), 1);
    }

    #[tokio::test]
    async fn test_broadcast_snapshot_reflects_written_value() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();

        executor
            .execute(
                &ctx,
                "update_purpose",
                json!({"content": "We exist to help under-banked artisans reach global buyers"}),
            )
            .await
            .unwrap();

        let mut snapshot = None;
        while let Ok(event) = rx.try_recv() {
            if let SessionEvent::Canvas(e) = event {
                snapshot = Some(e);
            }
        }
        let snapshot = snapshot.expect("canvas broadcast");
        let purpose = snapshot
            .canvas
            .sections
            .iter()
            .find(|s| s.key.as_str() == "purpose")
            .unwrap();
        assert!(purpose.content.contains("under-banked artisans"));
        assert!(purpose.is_complete);
    }

    #[tokio::test]
    async fn test_failed_validation_in_handler_does_not_broadcast() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();

        // Schema-valid but rejected by the chain rules
        let result = executor
            .execute(
                &ctx,
                "update_impact_field",
                json!({"field": "impact", "content": "Sustainable artisan livelihoods"}),
            )
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(drain_canvas_events(&mut rx), 0);
    }

    #[tokio::test]
    async fn test_read_only_tool_never_broadcasts() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();

        let result = executor.execute(&ctx, "get_canvas", json!({})).await.unwrap();
        assert!(result.success);
        assert_eq!(drain_canvas_events(&mut rx), 0);
    }

    #[tokio::test]
    async fn test_mutating_tool_sets_updating_status() {
        let (executor, ctx, _broadcaster) = setup();
        executor
            .execute(
                &ctx,
                "update_purpose",
                json!({"content": "We exist to help under-banked artisans reach global buyers"}),
            )
            .await
            .unwrap();
        assert_eq!(ctx.status.current().status, AgentStatus::Updating);
    }

    #[tokio::test]
    async fn test_cancelled_turn_skips_execution() {
        let (executor, ctx, broadcaster) = setup();
        let mut rx = broadcaster.subscribe();
        ctx.cancellation.cancel();

        let result = executor
            .execute(
                &ctx,
                "update_purpose",
                json!({"content": "We exist to help under-banked artisans reach global buyers"}),
            )
            .await
            .unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("cancelled"));
        assert_eq!(drain_canvas_events(&mut rx), 0);

        let canvas = ctx.canvas.get_full_canvas().unwrap();
        assert_eq!(canvas.completion_percentage, 0);
    }
}
