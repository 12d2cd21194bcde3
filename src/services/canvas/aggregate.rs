//! Canvas Aggregate
//!
//! Single point of truth for "what does this canvas look like right now"
//! and single router for all section writes. Standalone sections
//! (`purpose`, `key_metrics`) are validated here; everything else is
//! delegated to the owning model manager via a static key→model lookup.
//! The `impact` grid cell routes to the impact manager's final chain
//! field, so writing it is subject to the full chain precondition.
//!
//! The full-canvas read model is computed fresh on every read; there is no
//! cached derived state to go stale.

use uuid::Uuid;

use crate::models::canvas::{
    CanvasSection, CompletionStatus, FullCanvas, SectionGroup, SectionKey, UpdateResult,
    ValidationIssue,
};
use crate::models::impact_chain::ImpactChain;
use crate::services::canvas::export::{export_canvas, ExportFormat};
use crate::services::canvas::model_manager::ModelManager;
use crate::services::canvas::rules::{find_rule, STANDALONE_FIELDS};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

/// Number of completion units: ten sections plus the impact chain as a whole.
const COMPLETION_UNITS: usize = 11;

/// The full canvas behind one canvas id.
#[derive(Clone)]
pub struct CanvasAggregate {
    db: Database,
    canvas_id: String,
    customer: ModelManager,
    economic: ModelManager,
    impact: ModelManager,
}

impl std::fmt::Debug for CanvasAggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasAggregate")
            .field("canvas_id", &self.canvas_id)
            .finish_non_exhaustive()
    }
}

impl CanvasAggregate {
    /// Open an existing canvas. Unknown ids are a hard not-found error.
    pub fn open(db: Database, canvas_id: impl Into<String>) -> AppResult<Self> {
        let canvas_id = canvas_id.into();
        if !db.canvas_exists(&canvas_id)? {
            return Err(AppError::not_found(format!("canvas {}", canvas_id)));
        }
        Ok(Self {
            customer: ModelManager::customer(db.clone(), canvas_id.clone()),
            economic: ModelManager::economic(db.clone(), canvas_id.clone()),
            impact: ModelManager::impact(db.clone(), canvas_id.clone()),
            db,
            canvas_id,
        })
    }

    /// Create a new canvas with every field empty and open it.
    pub fn create(db: Database, name: &str) -> AppResult<Self> {
        let canvas_id = Uuid::new_v4().to_string();
        db.create_canvas(&canvas_id, name)?;
        Self::open(db, canvas_id)
    }

    /// The canvas identifier.
    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    /// The customer model manager.
    pub fn customer(&self) -> &ModelManager {
        &self.customer
    }

    /// The economic model manager.
    pub fn economic(&self) -> &ModelManager {
        &self.economic
    }

    /// The impact model manager.
    pub fn impact(&self) -> &ModelManager {
        &self.impact
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Route a section write to the owning validator and persist it.
    ///
    /// Accepts the ten section keys plus `impact` (the grid cell backed by
    /// the impact chain's final field). Every result carries the fresh
    /// whole-canvas completion summary.
    pub fn update_section(&self, key: &str, content: &str) -> AppResult<UpdateResult> {
        if key == "impact" {
            let result = self.impact.update_section("impact", content)?;
            return self.with_overall_completion(result);
        }

        let section_key = match SectionKey::parse(key) {
            Some(k) => k,
            None => {
                return Ok(UpdateResult::rejected(
                    vec![ValidationIssue::unknown_section(key)],
                    self.get_completion()?,
                ));
            }
        };

        let result = match section_key.group() {
            SectionGroup::Standalone => self.update_standalone(section_key, content)?,
            SectionGroup::Customer => self.customer.update_section(key, content)?,
            SectionGroup::Economic => self.economic.update_section(key, content)?,
        };
        self.with_overall_completion(result)
    }

    /// Write a chain field through the impact manager's ordering rules.
    pub fn update_impact_field(&self, field: &str, content: &str) -> AppResult<UpdateResult> {
        let result = self.impact.update_section(field, content)?;
        self.with_overall_completion(result)
    }

    /// Standalone sections have the flat 20-char minimum and no dependencies.
    fn update_standalone(&self, key: SectionKey, content: &str) -> AppResult<UpdateResult> {
        let rule = find_rule(STANDALONE_FIELDS, key.as_str())
            .ok_or_else(|| AppError::internal(format!("{} is not standalone", key)))?;

        if content.trim().len() < rule.min_length {
            return Ok(UpdateResult::rejected(
                vec![ValidationIssue::too_short(key.as_str(), rule.min_length)],
                CompletionStatus::default(),
            ));
        }

        self.db.upsert_section(&self.canvas_id, key, content)?;
        tracing::info!(canvas_id = %self.canvas_id, section = key.as_str(), "section updated");
        Ok(UpdateResult::ok(key.as_str(), CompletionStatus::default()))
    }

    fn with_overall_completion(&self, mut result: UpdateResult) -> AppResult<UpdateResult> {
        result.completion = self.get_completion()?;
        Ok(result)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Assemble the full canvas read model, computed fresh.
    pub fn get_full_canvas(&self) -> AppResult<FullCanvas> {
        let row = self
            .db
            .get_canvas(&self.canvas_id)?
            .ok_or_else(|| AppError::not_found(format!("canvas {}", self.canvas_id)))?;
        let section_rows = self.db.get_sections(&self.canvas_id)?;
        let impact_chain = self
            .db
            .get_impact_chain(&self.canvas_id)?
            .unwrap_or_else(ImpactChain::default);

        let sections = SectionKey::ALL
            .iter()
            .map(|key| match section_rows.get(key.as_str()) {
                Some(r) => CanvasSection::new(*key, r.content.clone(), r.updated_at.clone()),
                None => CanvasSection::empty(*key),
            })
            .collect::<Vec<_>>();

        let completed = sections.iter().filter(|s| s.is_complete).count()
            + usize::from(impact_chain.is_complete());
        let completion_percentage =
            ((completed as f64 / COMPLETION_UNITS as f64) * 100.0).round() as u8;

        Ok(FullCanvas {
            canvas_id: self.canvas_id.clone(),
            sections,
            impact_chain,
            completion_percentage,
            updated_at: row.updated_at,
        })
    }

    /// Whole-canvas completion summary with the next guided prompt.
    pub fn get_completion(&self) -> AppResult<CompletionStatus> {
        let canvas = self.get_full_canvas()?;

        let mut completed = Vec::new();
        let mut missing = Vec::new();
        for section in &canvas.sections {
            if section.is_complete {
                completed.push(section.key.as_str().to_string());
            } else {
                missing.push(section.key.as_str().to_string());
            }
        }
        if canvas.impact_chain.is_complete() {
            completed.push("impact_chain".to_string());
        } else {
            missing.push("impact_chain".to_string());
        }

        let suggestions = self.suggestions(&canvas)?;

        Ok(CompletionStatus {
            percentage: canvas.completion_percentage,
            completed_sections: completed,
            missing_sections: missing,
            suggestions,
        })
    }

    /// The next field worth working on, walking purpose → customer →
    /// economic → key metrics → impact chain.
    fn suggestions(&self, canvas: &FullCanvas) -> AppResult<Vec<String>> {
        let standalone_questions = |name: &str| -> Vec<String> {
            find_rule(STANDALONE_FIELDS, name)
                .map(|r| r.guiding_questions.iter().map(|q| q.to_string()).collect())
                .unwrap_or_default()
        };

        let purpose = canvas.section(SectionKey::Purpose);
        if !purpose.map(|s| s.is_complete).unwrap_or(false) {
            return Ok(standalone_questions("purpose"));
        }

        for manager in [&self.customer, &self.economic] {
            let completion = manager.get_completion()?;
            if !completion.missing_sections.is_empty() {
                return Ok(completion.suggestions);
            }
        }

        let key_metrics = canvas.section(SectionKey::KeyMetrics);
        if !key_metrics.map(|s| s.is_complete).unwrap_or(false) {
            return Ok(standalone_questions("key_metrics"));
        }

        if !canvas.impact_chain.is_complete() {
            return Ok(self.impact.get_completion()?.suggestions);
        }

        Ok(vec!["The canvas is complete.".to_string()])
    }

    /// Render the whole canvas as markdown or JSON.
    pub fn export(&self, format: ExportFormat) -> AppResult<String> {
        let canvas = self.get_full_canvas()?;
        export_canvas(&canvas, format)
    }
}
