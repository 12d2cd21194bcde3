//! Agent Session
//!
//! Orchestrates one conversation: owns the status state machine, the
//! authoritative last-broadcast canvas snapshot, and the tool executor.
//! One turn is in flight at a time; a second inbound message is queued
//! and handed back to the caller when the current turn completes, so the
//! broadcast-after-mutation ordering is never interleaved.
//!
//! Cancellation is not transactional: aborting a turn stops further tool
//! execution, but tool effects already persisted stay in place.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use social_canvas_core::{AgentStatus, StatusUpdate};
use social_canvas_tools::ToolResult;

use crate::services::agent::events::{
    CanvasPublisher, SessionBroadcaster, SessionEvent, StatusSink,
};
use crate::services::canvas::CanvasAggregate;
use crate::services::knowledge::KnowledgeSearch;
use crate::services::tools::impls::thread_context::ThreadContextProvider;
use crate::services::tools::trait_def::{ToolExecutionContext, ToolRegistry};
use crate::services::tools::ToolExecutor;
use crate::services::venture::VentureProfileService;
use crate::utils::error::{AppError, AppResult};

/// Outcome of presenting a new inbound message to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnDecision {
    /// The turn started; the caller should drive the LLM round trip now.
    Started,
    /// A turn is already in flight; the message was queued.
    Queued,
}

struct Turn {
    cancellation: CancellationToken,
}

/// One conversation's agent session.
pub struct AgentSession {
    conversation_id: String,
    canvas: Arc<CanvasAggregate>,
    venture: Arc<VentureProfileService>,
    knowledge: Arc<dyn KnowledgeSearch>,
    threads: Arc<dyn ThreadContextProvider>,
    executor: ToolExecutor,
    broadcaster: SessionBroadcaster,
    publisher: CanvasPublisher,
    status: StatusSink,
    turn: Mutex<Option<Turn>>,
    queue: Mutex<VecDeque<String>>,
}

impl AgentSession {
    /// Create a session over an open canvas.
    pub fn new(
        conversation_id: impl Into<String>,
        canvas: Arc<CanvasAggregate>,
        venture: Arc<VentureProfileService>,
        knowledge: Arc<dyn KnowledgeSearch>,
        threads: Arc<dyn ThreadContextProvider>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        let broadcaster = SessionBroadcaster::default();
        let publisher = CanvasPublisher::new(broadcaster.clone());
        let status = StatusSink::new(broadcaster.clone());
        let executor = ToolExecutor::new(registry, publisher.clone());

        Self {
            conversation_id: conversation_id.into(),
            canvas,
            venture,
            knowledge,
            threads,
            executor,
            broadcaster,
            publisher,
            status,
            turn: Mutex::new(None),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// The conversation identifier.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Subscribe a client to status and canvas events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.broadcaster.subscribe()
    }

    /// The current status.
    pub fn status(&self) -> StatusUpdate {
        self.status.current()
    }

    /// Whether a turn is in flight.
    pub fn is_busy(&self) -> bool {
        self.turn.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Bring a newly connected client up to date: current status plus the
    /// latest canvas snapshot.
    pub fn on_client_connected(&self) -> AppResult<()> {
        self.broadcaster.emit_status(self.status.current());
        if !self.publisher.republish_last() {
            let canvas = self.canvas.get_full_canvas()?;
            self.publisher.publish(canvas);
        }
        Ok(())
    }

    // ── Turn lifecycle ───────────────────────────────────────────────

    /// Present a new inbound message. Starts a turn if the session is
    /// idle, otherwise queues the message for after the current turn.
    pub fn begin_turn(&self, message: impl Into<String>) -> TurnDecision {
        let mut turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
        if turn.is_some() {
            let message = message.into();
            tracing::warn!(
                conversation_id = %self.conversation_id,
                "turn in flight, queueing inbound message"
            );
            self.queue
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push_back(message);
            return TurnDecision::Queued;
        }

        *turn = Some(Turn {
            cancellation: CancellationToken::new(),
        });
        self.status.set_default(AgentStatus::Thinking);
        TurnDecision::Started
    }

    /// The turn is assembling context (knowledge retrieval, profile reads).
    pub fn begin_context_assembly(&self) {
        self.status.set_default(AgentStatus::Searching);
    }

    /// Execute one LLM-issued tool call within the active turn.
    ///
    /// Mutating tools broadcast a fresh snapshot through the executor; the
    /// per-call ordering is the caller's issue order, never parallel.
    pub async fn execute_tool(&self, name: &str, args: Value) -> AppResult<ToolResult> {
        let cancellation = {
            let turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
            match turn.as_ref() {
                Some(t) => t.cancellation.clone(),
                None => {
                    return Err(AppError::validation(
                        "no turn in flight; tool calls happen within a turn",
                    ));
                }
            }
        };

        let ctx = ToolExecutionContext {
            conversation_id: self.conversation_id.clone(),
            canvas: Arc::clone(&self.canvas),
            venture: Arc::clone(&self.venture),
            knowledge: Arc::clone(&self.knowledge),
            status: self.status.clone(),
            threads: Arc::clone(&self.threads),
            cancellation,
        };
        let tool_call_id = Uuid::new_v4().to_string();
        tracing::debug!(
            conversation_id = %self.conversation_id,
            tool = name,
            tool_call_id = %tool_call_id,
            "session executing tool"
        );
        self.executor.execute(&ctx, name, args).await
    }

    /// The LLM round trip (or a tool) failed. Any state is allowed to
    /// transition here; a mutating call must never proceed on partial
    /// upstream state.
    pub fn fail_turn(&self, message: impl Into<String>) {
        let mut turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
        *turn = None;
        self.status.set(AgentStatus::Error, message);
    }

    /// Stream completion: reset to idle and surface the next queued
    /// message, if any, for the caller to feed back into `begin_turn`.
    pub fn complete_turn(&self) -> Option<String> {
        {
            let mut turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
            *turn = None;
        }
        self.status.set_default(AgentStatus::Idle);
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
    }

    /// Abort the in-flight turn. Tool calls already persisted remain in
    /// effect; only further execution stops.
    pub fn abort_turn(&self) {
        let mut turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(t) = turn.take() {
            t.cancellation.cancel();
            self.status.set(AgentStatus::Idle, "turn aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::services::knowledge::InMemoryKnowledgeSearch;
    use crate::services::tools::impls::thread_context::InMemoryThreadContexts;
    use crate::storage::Database;

    fn session() -> AgentSession {
        let db = Database::new_in_memory().unwrap();
        db.create_canvas("c1", "Test").unwrap();
        AgentSession::new(
            "conv-1",
            Arc::new(CanvasAggregate::open(db.clone(), "c1").unwrap()),
            Arc::new(VentureProfileService::new(db, "c1")),
            Arc::new(InMemoryKnowledgeSearch::default()),
            Arc::new(InMemoryThreadContexts::default()),
            Arc::new(ToolRegistry::with_builtin_tools()),
        )
    }

    fn drain(
        rx: &mut tokio::sync::broadcast::Receiver<SessionEvent>,
    ) -> (Vec<StatusUpdate>, usize) {
        let mut statuses = Vec::new();
        let mut canvases = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                SessionEvent::Status(update) => statuses.push(update),
                SessionEvent::Canvas(_) => canvases += 1,
            }
        }
        (statuses, canvases)
    }

    #[test]
    fn test_initial_state_idle() {
        let session = session();
        assert_eq!(session.status().status, AgentStatus::Idle);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_turn_lifecycle_statuses() {
        let session = session();
        assert_eq!(session.begin_turn("fill my canvas"), TurnDecision::Started);
        assert_eq!(session.status().status, AgentStatus::Thinking);
        assert!(session.is_busy());

        session.begin_context_assembly();
        assert_eq!(session.status().status, AgentStatus::Searching);

        assert!(session.complete_turn().is_none());
        assert_eq!(session.status().status, AgentStatus::Idle);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_second_message_queued_and_drained() {
        let session = session();
        assert_eq!(session.begin_turn("first"), TurnDecision::Started);
        assert_eq!(session.begin_turn("second"), TurnDecision::Queued);
        assert_eq!(session.begin_turn("third"), TurnDecision::Queued);

        // still one turn in flight
        assert!(session.is_busy());

        assert_eq!(session.complete_turn().as_deref(), Some("second"));
        assert_eq!(session.begin_turn("second"), TurnDecision::Started);
        assert_eq!(session.complete_turn().as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn test_tool_outside_turn_rejected() {
        let session = session();
        let err = session
            .execute_tool("get_canvas", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mutating_tool_broadcasts_through_session() {
        let session = session();
        let mut rx = session.subscribe();
        session.begin_turn("set the purpose");

        let result = session
            .execute_tool(
                "update_purpose",
                json!({"content": "We exist to help under-banked artisans reach global buyers"}),
            )
            .await
            .unwrap();
        assert!(result.success);
        session.complete_turn();

        let (statuses, canvases) = drain(&mut rx);
        assert_eq!(canvases, 1);
        let sequence: Vec<AgentStatus> = statuses.iter().map(|s| s.status).collect();
        assert_eq!(
            sequence,
            vec![AgentStatus::Thinking, AgentStatus::Updating, AgentStatus::Idle]
        );
    }

    #[tokio::test]
    async fn test_fail_turn_sets_error_status() {
        let session = session();
        session.begin_turn("hello");
        session.fail_turn("LLM round trip failed: connection reset");
        assert_eq!(session.status().status, AgentStatus::Error);
        assert!(session.status().message.contains("connection reset"));
        assert!(!session.is_busy());

        // a new turn recovers from error
        assert_eq!(session.begin_turn("retry"), TurnDecision::Started);
        assert_eq!(session.status().status, AgentStatus::Thinking);
    }

    #[tokio::test]
    async fn test_abort_keeps_persisted_effects() {
        let session = session();
        session.begin_turn("work");
        session
            .execute_tool(
                "update_purpose",
                json!({"content": "We exist to help under-banked artisans reach global buyers"}),
            )
            .await
            .unwrap();

        session.abort_turn();
        assert!(!session.is_busy());
        assert_eq!(session.status().status, AgentStatus::Idle);

        // the persisted write survives the abort
        let canvas = session.canvas.get_full_canvas().unwrap();
        assert!(canvas
            .section(crate::models::canvas::SectionKey::Purpose)
            .unwrap()
            .is_complete);
    }

    #[tokio::test]
    async fn test_client_connection_pushes_snapshot_and_status() {
        let session = session();
        let mut rx = session.subscribe();
        session.on_client_connected().unwrap();

        let (statuses, canvases) = drain(&mut rx);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].status, AgentStatus::Idle);
        assert_eq!(canvases, 1);
    }
}
