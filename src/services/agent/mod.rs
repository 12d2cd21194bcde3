//! Agent Session
//!
//! The per-conversation status state machine and the snapshot broadcast
//! channel feeding connected clients.

pub mod events;
pub mod session;

pub use events::{channels, CanvasPublisher, CanvasStateEvent, SessionBroadcaster, SessionEvent, StatusSink};
pub use session::{AgentSession, TurnDecision};
