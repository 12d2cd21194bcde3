//! Session Event Broadcasting
//!
//! Real-time event push from the agent session to connected clients over
//! a tokio broadcast channel. Events are namespaced for client-side
//! filtering. Emission never fails the caller: a channel with no
//! subscribers is a normal state, and lagging receivers are logged.
//!
//! Clients treat `canvas_updated_at` as a monotonically non-decreasing
//! change token and skip re-rendering when it is unchanged, so an
//! in-progress local edit is never clobbered by a redundant push.

use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::sync::broadcast;

use social_canvas_core::{AgentStatus, StatusUpdate};

use crate::models::canvas::FullCanvas;

/// Event channel names
pub mod channels {
    /// Agent status changes
    pub const STATUS: &str = "canvas:status";
    /// Canvas snapshot pushes
    pub const CANVAS: &str = "canvas:state";
}

/// Canvas snapshot push payload.
#[derive(Debug, Clone, Serialize)]
pub struct CanvasStateEvent {
    pub canvas: FullCanvas,
    /// Monotonically non-decreasing change token (RFC 3339)
    pub canvas_updated_at: String,
}

/// One event on the session channel, tagged with its channel name.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "channel")]
pub enum SessionEvent {
    #[serde(rename = "canvas:status")]
    Status(StatusUpdate),
    #[serde(rename = "canvas:state")]
    Canvas(CanvasStateEvent),
}

/// Typed event emitter for one conversation's clients.
#[derive(Clone)]
pub struct SessionBroadcaster {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionBroadcaster {
    /// Create a broadcaster with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe a new client.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }

    /// Number of currently connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Emit a status update.
    pub fn emit_status(&self, update: StatusUpdate) {
        tracing::debug!(status = %update.status, "emit status");
        // Err means no receivers are connected, which is fine.
        let _ = self.tx.send(SessionEvent::Status(update));
    }

    /// Emit a canvas snapshot push.
    pub fn emit_canvas(&self, event: CanvasStateEvent) {
        tracing::info!(
            canvas_id = %event.canvas.canvas_id,
            canvas_updated_at = %event.canvas_updated_at,
            "broadcast canvas snapshot"
        );
        let _ = self.tx.send(SessionEvent::Canvas(event));
    }
}

impl Default for SessionBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Cloneable handle through which tools and the executor flip the
/// session's status. Holds the session's authoritative status value and
/// emits every change.
#[derive(Clone)]
pub struct StatusSink {
    current: Arc<RwLock<StatusUpdate>>,
    broadcaster: SessionBroadcaster,
}

impl StatusSink {
    /// Create a sink starting at idle.
    pub fn new(broadcaster: SessionBroadcaster) -> Self {
        Self {
            current: Arc::new(RwLock::new(StatusUpdate::idle())),
            broadcaster,
        }
    }

    /// The current status.
    pub fn current(&self) -> StatusUpdate {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Set the status with an explicit message and emit the change.
    pub fn set(&self, status: AgentStatus, message: impl Into<String>) {
        let update = StatusUpdate::new(status, message);
        {
            let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
            if !current.status.can_transition_to(status) {
                tracing::warn!(
                    from = %current.status,
                    to = %status,
                    "unusual status transition"
                );
            }
            *current = update.clone();
        }
        self.broadcaster.emit_status(update);
    }

    /// Set the status with its default message.
    pub fn set_default(&self, status: AgentStatus) {
        self.set(status, status.default_message());
    }
}

/// Publishes canvas snapshots with a monotonically non-decreasing change
/// token, remembering the last push so newly connected clients can be
/// brought up to date immediately.
#[derive(Clone)]
pub struct CanvasPublisher {
    broadcaster: SessionBroadcaster,
    last: Arc<RwLock<Option<CanvasStateEvent>>>,
}

impl CanvasPublisher {
    pub fn new(broadcaster: SessionBroadcaster) -> Self {
        Self {
            broadcaster,
            last: Arc::new(RwLock::new(None)),
        }
    }

    /// Publish a fresh snapshot. The change token never moves backwards,
    /// even if a store timestamp does.
    pub fn publish(&self, canvas: FullCanvas) {
        let mut last = self.last.write().unwrap_or_else(|e| e.into_inner());
        let token = match last.as_ref() {
            Some(prev) if prev.canvas_updated_at > canvas.updated_at => {
                prev.canvas_updated_at.clone()
            }
            _ => canvas.updated_at.clone(),
        };
        let event = CanvasStateEvent {
            canvas,
            canvas_updated_at: token,
        };
        *last = Some(event.clone());
        self.broadcaster.emit_canvas(event);
    }

    /// The most recently published snapshot, if any.
    pub fn last(&self) -> Option<CanvasStateEvent> {
        self.last
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Re-send the last snapshot (used when a client connects).
    pub fn republish_last(&self) -> bool {
        match self.last() {
            Some(event) => {
                self.broadcaster.emit_canvas(event);
                true
            }
            None => false,
        }
    }
}
