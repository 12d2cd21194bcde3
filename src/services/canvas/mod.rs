//! Canvas Services
//!
//! Validation rules, the three model managers, the canvas aggregate, and
//! export.

pub mod aggregate;
pub mod export;
pub mod model_manager;
pub mod rules;

pub use aggregate::CanvasAggregate;
pub use export::ExportFormat;
pub use model_manager::ModelManager;
