//! Knowledge Search Tools
//!
//! Route to the external KnowledgeSearch collaborator. These tools never
//! touch canvas state; they set the searching status and filter results
//! by the venture profile's reliable dimensions.

use async_trait::async_trait;
use serde_json::Value;

use social_canvas_core::{AgentStatus, ToolDefinition};
use social_canvas_tools::ToolResult;

use crate::services::knowledge::{ContentType, SearchFilters, SearchHit, SearchRequest};
use crate::services::tools::definitions;
use crate::services::tools::trait_def::{CanvasTool, ToolExecutionContext};

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;

/// Format hits into a readable markdown block for the LLM.
fn format_search_results(hits: &[SearchHit], total_found: usize) -> String {
    let mut output = format!(
        "Found {} results{}:\n\n",
        hits.len(),
        if total_found > hits.len() {
            format!(" (of {} matches)", total_found)
        } else {
            String::new()
        }
    );
    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!("### Result {} (relevance: {:.2})\n\n", i + 1, hit.score));
        output.push_str(&hit.content);
        output.push_str("\n\n---\n\n");
    }
    output
}

async fn run_search(
    ctx: &ToolExecutionContext,
    args: &Value,
    content_type: Option<ContentType>,
) -> ToolResult {
    let query = match args.get("query").and_then(|v| v.as_str()) {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return ToolResult::err("Missing required parameter: query"),
    };
    let limit = args
        .get("limit")
        .and_then(|v| v.as_u64())
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_LIMIT)
        .clamp(1, MAX_LIMIT);

    ctx.status.set_default(AgentStatus::Searching);

    // Filters come from the profile's reliable dimensions only.
    let filters = match ctx.venture.get_profile() {
        Ok(profile) => SearchFilters::from_profile(&profile),
        Err(e) => {
            tracing::warn!(error = %e, "venture profile unavailable, searching unfiltered");
            SearchFilters::default()
        }
    };

    let mut request = SearchRequest::new(query.clone(), limit).with_filters(filters);
    if let Some(ct) = content_type {
        request = request.with_content_type(ct);
    }

    match ctx.knowledge.search(request).await {
        Ok(response) => {
            if response.results.is_empty() {
                return ToolResult::ok(format!(
                    "No relevant results found for query: {}",
                    query
                ));
            }
            let mut output = format_search_results(&response.results, response.total_found);
            if let Some(warning) = response.warning {
                output.push_str(&format!("Warning: {}\n", warning));
            }
            ToolResult::ok(output)
        }
        Err(e) => ToolResult::err(format!("Knowledge search failed: {}", e)),
    }
}

/// Searches methodology guides.
pub struct SearchMethodologyTool;

#[async_trait]
impl CanvasTool for SearchMethodologyTool {
    fn definition(&self) -> ToolDefinition {
        definitions::search_methodology()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        run_search(ctx, &args, Some(ContentType::Methodology)).await
    }
}

/// Searches worked examples.
pub struct SearchExamplesTool;

#[async_trait]
impl CanvasTool for SearchExamplesTool {
    fn definition(&self) -> ToolDefinition {
        definitions::search_examples()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        run_search(ctx, &args, Some(ContentType::Examples)).await
    }
}

/// Searches the whole knowledge base, optionally restricted by content type.
pub struct SearchKnowledgeBaseTool;

#[async_trait]
impl CanvasTool for SearchKnowledgeBaseTool {
    fn definition(&self) -> ToolDefinition {
        definitions::search_knowledge_base()
    }

    async fn execute(&self, ctx: &ToolExecutionContext, args: Value) -> ToolResult {
        let content_type = match args.get("content_type").and_then(|v| v.as_str()) {
            Some("methodology") => Some(ContentType::Methodology),
            Some("examples") => Some(ContentType::Examples),
            _ => None,
        };
        run_search(ctx, &args, content_type).await
    }
}
