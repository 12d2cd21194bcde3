//! Canvas Write Tools
//!
//! The five mutating tools. Each maps to exactly one aggregate write;
//! validation failures come back as narrated error results so the LLM can
//! explain them to the user.

use async_trait::async_trait;
use serde_json::Value;

use social_canvas_core::ToolDefinition;
use social_canvas_tools::ToolResult;

use crate::models::canvas::UpdateResult;
use crate::services::tools::definitions;
use crate::services::tools::trait_def::{CanvasTool, ToolExecutionContext};

/// Render an update outcome for the LLM: success narrates the new
/// completion (plus any advisory warnings), failure narrates every error.
fn render_update(field: &str, result: UpdateResult) -> ToolResult {
    if result.success {
        let mut message = format!(
            "{} updated. The canvas is now {}% complete.",
            field, result.completion.percentage
        );
        for warning in &result.warnings {
            message.push_str(&format!(" Note: {}.", warning.message));
        }
        let data = serde_json::to_value(&result).unwrap_or(Value::Null);
        ToolResult::ok_with_data(message, data)
    } else {
        let detail = result
            .errors
            .iter()
            .map(|e| e.message.clone())
            .collect::<Vec<_>>()
            .join("; ");
        ToolResult::err(detail)
    }
}

fn str_arg<'a>(args: &'a Value, key: &str) -> &'a str {
    args.get(key).and_then(|v| v.as_str()).unwrap_or_default()
}

/// Updates the standalone purpose section.
pub struct UpdatePurposeTool;

#[async_trait]
impl CanvasTool for UpdatePurposeTool {
    fn definition(&self) -> ToolDefinition {
        definitions::update_purpose()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let content = str_arg(&args, "content");
        match ctx.canvas.update_section("purpose", content) {
            Ok(result) => render_update("purpose", result),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

/// Updates one Customer model section, subject to the dependency chain.
pub struct UpdateCustomerSectionTool;

#[async_trait]
impl CanvasTool for UpdateCustomerSectionTool {
    fn definition(&self) -> ToolDefinition {
        definitions::update_customer_section()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let section = str_arg(&args, "section");
        let content = str_arg(&args, "content");
        match ctx.canvas.update_section(section, content) {
            Ok(result) => render_update(section, result),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

/// Updates one Economic model section; any order permitted.
pub struct UpdateEconomicSectionTool;

#[async_trait]
impl CanvasTool for UpdateEconomicSectionTool {
    fn definition(&self) -> ToolDefinition {
        definitions::update_economic_section()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let section = str_arg(&args, "section");
        let content = str_arg(&args, "content");
        match ctx.canvas.update_section(section, content) {
            Ok(result) => render_update(section, result),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

/// Updates one impact chain field, strictly in chain order.
pub struct UpdateImpactFieldTool;

#[async_trait]
impl CanvasTool for UpdateImpactFieldTool {
    fn definition(&self) -> ToolDefinition {
        definitions::update_impact_field()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let field = str_arg(&args, "field");
        let content = str_arg(&args, "content");
        match ctx.canvas.update_impact_field(field, content) {
            Ok(result) => render_update(field, result),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

/// Updates the standalone key metrics section.
pub struct UpdateKeyMetricsTool;

#[async_trait]
impl CanvasTool for UpdateKeyMetricsTool {
    fn definition(&self) -> ToolDefinition {
        definitions::update_key_metrics()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let content = str_arg(&args, "content");
        match ctx.canvas.update_section("key_metrics", content) {
            Ok(result) => render_update("key_metrics", result),
            Err(e) => ToolResult::err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canvas::{CompletionStatus, ValidationIssue};

    #[test]
    fn test_render_success_mentions_completion() {
        let completion = CompletionStatus {
            percentage: 18,
            ..Default::default()
        };
        let result = render_update("purpose", UpdateResult::ok("purpose", completion));
        assert!(result.success);
        assert!(result.output.unwrap().contains("18% complete"));
        assert!(result.data.is_some());
    }

    #[test]
    fn test_render_success_appends_warnings() {
        let result = UpdateResult::ok("advantage", CompletionStatus::default()).with_warnings(
            vec![ValidationIssue::advisory("advantage", "revenue is still empty")],
        );
        let rendered = render_update("advantage", result);
        assert!(rendered.success);
        assert!(rendered.output.unwrap().contains("revenue is still empty"));
    }

    #[test]
    fn test_render_failure_joins_errors() {
        let result = UpdateResult::rejected(
            vec![ValidationIssue::dependency_unmet("impact", "participants")],
            CompletionStatus::default(),
        );
        let rendered = render_update("impact", result);
        assert!(!rendered.success);
        assert!(rendered
            .error
            .unwrap()
            .contains("Complete participants before impact"));
    }
}
