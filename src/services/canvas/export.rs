//! Canvas Export
//!
//! Markdown and JSON rendering of models and the full canvas.

use serde_json::json;

use crate::models::canvas::FullCanvas;
use crate::models::impact_chain::ImpactField;
use crate::utils::error::{AppError, AppResult};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    /// Parse a format identifier ("json" or "md"/"markdown").
    pub fn parse(s: &str) -> Option<ExportFormat> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "md" | "markdown" => Some(ExportFormat::Markdown),
            _ => None,
        }
    }
}

/// Turn a snake_case field identifier into a display heading
/// ("jobs_to_be_done" → "Jobs To Be Done").
pub fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the full canvas in the requested format.
pub fn export_canvas(canvas: &FullCanvas, format: ExportFormat) -> AppResult<String> {
    match format {
        ExportFormat::Json => {
            let value = json!({
                "canvas_id": canvas.canvas_id,
                "completion_percentage": canvas.completion_percentage,
                "updated_at": canvas.updated_at,
                "sections": canvas.sections.iter().map(|s| {
                    json!({
                        "key": s.key.as_str(),
                        "content": s.content,
                        "is_complete": s.is_complete,
                    })
                }).collect::<Vec<_>>(),
                "impact_chain": ImpactField::CHAIN_ORDER.iter().map(|f| {
                    json!({
                        "field": f.as_str(),
                        "content": canvas.impact_chain.get(*f),
                        "is_complete": canvas.impact_chain.is_field_complete(*f),
                    })
                }).collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&value).map_err(AppError::from)
        }
        ExportFormat::Markdown => {
            let mut out = format!(
                "# Social Lean Canvas\n\n_{}% complete_\n",
                canvas.completion_percentage
            );
            for section in &canvas.sections {
                out.push_str(&format!("\n## {}\n\n", title_case(section.key.as_str())));
                if section.content.trim().is_empty() {
                    out.push_str("_Not yet completed._\n");
                } else {
                    out.push_str(&section.content);
                    out.push('\n');
                }
            }
            out.push_str("\n## Impact Chain\n");
            for field in ImpactField::CHAIN_ORDER {
                out.push_str(&format!("\n### {}\n\n", title_case(field.as_str())));
                let content = canvas.impact_chain.get(field);
                if content.trim().is_empty() {
                    out.push_str("_Not yet completed._\n");
                } else {
                    out.push_str(content);
                    out.push('\n');
                }
            }
            Ok(out)
        }
    }
}
