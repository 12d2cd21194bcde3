//! Tool Implementations
//!
//! One module per tool family: canvas writes, canvas reads, knowledge
//! search, and sibling-thread context.

pub mod canvas_read;
pub mod canvas_write;
pub mod knowledge;
pub mod thread_context;

use std::sync::Arc;

use crate::services::tools::trait_def::CanvasTool;

/// Every built-in tool, in catalog order.
pub fn builtin_tools() -> Vec<Arc<dyn CanvasTool>> {
    vec![
        Arc::new(canvas_write::UpdatePurposeTool),
        Arc::new(canvas_write::UpdateCustomerSectionTool),
        Arc::new(canvas_write::UpdateEconomicSectionTool),
        Arc::new(canvas_write::UpdateImpactFieldTool),
        Arc::new(canvas_write::UpdateKeyMetricsTool),
        Arc::new(canvas_read::GetCanvasTool),
        Arc::new(canvas_read::GetVentureProfileTool),
        Arc::new(canvas_read::GetCompletionStatusTool),
        Arc::new(knowledge::SearchMethodologyTool),
        Arc::new(knowledge::SearchExamplesTool),
        Arc::new(knowledge::SearchKnowledgeBaseTool),
        Arc::new(thread_context::GetThreadContextTool),
    ]
}
