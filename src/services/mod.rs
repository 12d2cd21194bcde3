//! Service Layer
//!
//! Business rules over the stores: canvas model managers and aggregate,
//! venture profile, knowledge-search contract, tool protocol, agent
//! session, and the client-side history.

pub mod agent;
pub mod canvas;
pub mod history;
pub mod knowledge;
pub mod tools;
pub mod venture;
