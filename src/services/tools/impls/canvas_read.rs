//! Canvas Read Tools
//!
//! Read-only views over the aggregate and venture profile. Each result
//! carries a prose summary for the LLM plus the structured payload.

use async_trait::async_trait;
use serde_json::Value;

use social_canvas_core::ToolDefinition;
use social_canvas_tools::ToolResult;

use crate::services::tools::definitions;
use crate::services::tools::trait_def::{CanvasTool, ToolExecutionContext};

/// Reads the full canvas.
pub struct GetCanvasTool;

#[async_trait]
impl CanvasTool for GetCanvasTool {
    fn definition(&self) -> ToolDefinition {
        definitions::get_canvas()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, _args: Value) -> ToolResult {
        let canvas = match ctx.canvas.get_full_canvas() {
            Ok(canvas) => canvas,
            Err(e) => return ToolResult::err(e.to_string()),
        };

        let mut summary = format!(
            "Canvas is {}% complete.\n",
            canvas.completion_percentage
        );
        for section in &canvas.sections {
            let state = if section.is_complete {
                "complete"
            } else if section.content.trim().is_empty() {
                "empty"
            } else {
                "in progress"
            };
            summary.push_str(&format!("- {}: {}\n", section.key, state));
        }
        summary.push_str(&format!(
            "- impact chain: {} of 8 fields complete\n",
            canvas.impact_chain.completed_fields().len()
        ));

        let data = serde_json::to_value(&canvas).unwrap_or(Value::Null);
        ToolResult::ok_with_data(summary, data)
    }
}

/// Reads the venture classification profile.
pub struct GetVentureProfileTool;

#[async_trait]
impl CanvasTool for GetVentureProfileTool {
    fn definition(&self) -> ToolDefinition {
        definitions::get_venture_profile()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, _args: Value) -> ToolResult {
        let profile = match ctx.venture.get_profile() {
            Ok(profile) => profile,
            Err(e) => return ToolResult::err(e.to_string()),
        };

        let summary = if profile.dimensions.is_empty() {
            "The venture has not been classified yet.".to_string()
        } else {
            let mut lines = vec!["Venture profile:".to_string()];
            for (dimension, assessment) in profile.reliable_dimensions() {
                lines.push(format!(
                    "- {}: {} (confidence {:.2}{})",
                    dimension,
                    assessment.value.values().join(", "),
                    assessment.confidence,
                    if assessment.confirmed { ", confirmed" } else { "" },
                ));
            }
            if lines.len() == 1 {
                lines.push("- no dimension is reliable enough to use yet".to_string());
            }
            lines.join("\n")
        };

        let data = serde_json::to_value(&profile).unwrap_or(Value::Null);
        ToolResult::ok_with_data(summary, data)
    }
}

/// Reads the whole-canvas completion summary.
pub struct GetCompletionStatusTool;

#[async_trait]
impl CanvasTool for GetCompletionStatusTool {
    fn definition(&self) -> ToolDefinition {
        definitions::get_completion_status()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, _args: Value) -> ToolResult {
        let completion = match ctx.canvas.get_completion() {
            Ok(completion) => completion,
            Err(e) => return ToolResult::err(e.to_string()),
        };

        let mut summary = format!(
            "Canvas is {}% complete. Missing: {}.",
            completion.percentage,
            if completion.missing_sections.is_empty() {
                "nothing".to_string()
            } else {
                completion.missing_sections.join(", ")
            }
        );
        if !completion.suggestions.is_empty() {
            summary.push_str("\nSuggested next questions:\n");
            for suggestion in &completion.suggestions {
                summary.push_str(&format!("- {}\n", suggestion));
            }
        }

        let data = serde_json::to_value(&completion).unwrap_or(Value::Null);
        ToolResult::ok_with_data(summary, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    use crate::services::agent::events::{SessionBroadcaster, StatusSink};
    use crate::services::canvas::CanvasAggregate;
    use crate::services::knowledge::InMemoryKnowledgeSearch;
    use crate::services::tools::impls::thread_context::InMemoryThreadContexts;
    use crate::services::venture::VentureProfileService;
    use crate::storage::Database;

    fn ctx() -> ToolExecutionContext {
        let db = Database::new_in_memory().unwrap();
        db.create_canvas("c1", "Test").unwrap();
        let broadcaster = SessionBroadcaster::default();
        ToolExecutionContext {
            conversation_id: "conv-1".to_string(),
            canvas: Arc::new(CanvasAggregate::open(db.clone(), "c1").unwrap()),
            venture: Arc::new(VentureProfileService::new(db, "c1")),
            knowledge: Arc::new(InMemoryKnowledgeSearch::default()),
            status: StatusSink::new(broadcaster),
            threads: Arc::new(InMemoryThreadContexts::default()),
            cancellation: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn test_get_canvas_summary_and_data() {
        let ctx = ctx();
        ctx.canvas
            .update_section("purpose", "We exist to help artisans reach global buyers")
            .unwrap();

        let result = GetCanvasTool.execute(&ctx, Value::Null).await;
        assert!(result.success);
        let output = result.output.unwrap();
        assert!(output.contains("- purpose: complete"));
        assert!(output.contains("- customers: empty"));
        assert!(output.contains("impact chain: 0 of 8"));

        let data = result.data.unwrap();
        assert_eq!(data["completion_percentage"], 9);
    }

    #[tokio::test]
    async fn test_get_venture_profile_unclassified() {
        let ctx = ctx();
        let result = GetVentureProfileTool.execute(&ctx, Value::Null).await;
        assert!(result.success);
        assert!(result.output.unwrap().contains("not been classified"));
    }

    #[tokio::test]
    async fn test_get_completion_status_lists_suggestions() {
        let ctx = ctx();
        let result = GetCompletionStatusTool.execute(&ctx, Value::Null).await;
        assert!(result.success);
        let output = result.output.unwrap();
        assert!(output.contains("0% complete"));
        assert!(output.contains("Suggested next questions"));
        assert!(output.contains("Why does this venture exist"));
    }
}
