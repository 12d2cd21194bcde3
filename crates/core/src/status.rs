//! Agent Status
//!
//! The conversation-level status state machine. One value per agent
//! session, surfaced to clients while they wait: the agent is idle,
//! thinking about a reply, searching the knowledge base, or updating the
//! canvas. `Error` is reachable from every state; stream completion resets
//! to `Idle`.

use serde::{Deserialize, Serialize};

/// Current activity of an agent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Thinking,
    Searching,
    Updating,
    Error,
}

impl AgentStatus {
    /// Whether a transition from `self` to `next` is part of the normal
    /// lifecycle. `Error` is reachable from anywhere, and `Idle` is always
    /// a legal reset target.
    pub fn can_transition_to(self, next: AgentStatus) -> bool {
        use AgentStatus::*;
        match (self, next) {
            (_, Error) | (_, Idle) => true,
            (Idle, Thinking) => true,
            (Thinking, Searching) | (Thinking, Updating) => true,
            (Searching, Updating) | (Searching, Searching) => true,
            (Updating, Updating) | (Updating, Searching) => true,
            (Error, Thinking) => true,
            _ => false,
        }
    }

    /// Default human-readable message for a non-idle status.
    pub fn default_message(self) -> &'static str {
        match self {
            AgentStatus::Idle => "",
            AgentStatus::Thinking => "Thinking about your canvas...",
            AgentStatus::Searching => "Searching the knowledge base...",
            AgentStatus::Updating => "Updating the canvas...",
            AgentStatus::Error => "Something went wrong",
        }
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Thinking => "thinking",
            AgentStatus::Searching => "searching",
            AgentStatus::Updating => "updating",
            AgentStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A status change paired with its display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AgentStatus,
    pub message: String,
}

impl StatusUpdate {
    /// Create a status update with an explicit message.
    pub fn new(status: AgentStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Create a status update carrying the status's default message.
    pub fn with_default_message(status: AgentStatus) -> Self {
        Self {
            status,
            message: status.default_message().to_string(),
        }
    }

    /// The idle state with an empty message.
    pub fn idle() -> Self {
        Self::with_default_message(AgentStatus::Idle)
    }
}
