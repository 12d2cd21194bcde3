//! Model Managers
//!
//! Business-rule layer over the stores for the three canvas sub-models
//! (Customer, Economic, Impact). All three share one implementation: a
//! chained-field validator parameterized by the per-field rule tables in
//! `rules.rs`. The models differ only in their tables and in where their
//! fields persist (section rows vs. the impact-chain row).

use crate::models::canvas::{
    CompletionStatus, SectionKey, UpdateResult, ValidationIssue, ValidationReport,
};
use crate::models::impact_chain::ImpactField;
use crate::services::canvas::export::{title_case, ExportFormat};
use crate::services::canvas::rules::{
    find_rule, FieldRule, CUSTOMER_FIELDS, ECONOMIC_FIELDS, IMPACT_FIELDS,
};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

/// Where a model's fields persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldBackend {
    /// One row per field in `canvas_sections`
    Sections,
    /// One column per field in the canvas's `impact_chains` row
    ImpactChain,
}

/// Business-rule layer for one canvas sub-model.
#[derive(Clone)]
pub struct ModelManager {
    db: Database,
    canvas_id: String,
    model_name: &'static str,
    fields: &'static [FieldRule],
    backend: FieldBackend,
}

impl ModelManager {
    /// Customer model: customers → jobs_to_be_done → value_proposition →
    /// solution, gated by the explicit edge list.
    pub fn customer(db: Database, canvas_id: impl Into<String>) -> Self {
        Self {
            db,
            canvas_id: canvas_id.into(),
            model_name: "customer",
            fields: CUSTOMER_FIELDS,
            backend: FieldBackend::Sections,
        }
    }

    /// Economic model: channels, revenue, costs, advantage in any order.
    pub fn economic(db: Database, canvas_id: impl Into<String>) -> Self {
        Self {
            db,
            canvas_id: canvas_id.into(),
            model_name: "economic",
            fields: ECONOMIC_FIELDS,
            backend: FieldBackend::Sections,
        }
    }

    /// Impact model: the eight-field causality chain, strictly in order.
    pub fn impact(db: Database, canvas_id: impl Into<String>) -> Self {
        Self {
            db,
            canvas_id: canvas_id.into(),
            model_name: "impact",
            fields: IMPACT_FIELDS,
            backend: FieldBackend::ImpactChain,
        }
    }

    /// Name of this model ("customer", "economic", "impact").
    pub fn model_name(&self) -> &'static str {
        self.model_name
    }

    /// The field names this model owns, in declared order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|r| r.name).collect()
    }

    // ── Field access ─────────────────────────────────────────────────

    /// Current field → content pairs in declared order.
    pub fn get_model(&self) -> AppResult<Vec<(String, String)>> {
        let contents = self.read_all()?;
        Ok(self
            .fields
            .iter()
            .zip(contents)
            .map(|(rule, content)| (rule.name.to_string(), content))
            .collect())
    }

    fn read_all(&self) -> AppResult<Vec<String>> {
        match self.backend {
            FieldBackend::Sections => {
                let rows = self.db.get_sections(&self.canvas_id)?;
                Ok(self
                    .fields
                    .iter()
                    .map(|rule| {
                        rows.get(rule.name)
                            .map(|r| r.content.clone())
                            .unwrap_or_default()
                    })
                    .collect())
            }
            FieldBackend::ImpactChain => {
                let chain = self
                    .db
                    .get_impact_chain(&self.canvas_id)?
                    .unwrap_or_default();
                Ok(self
                    .fields
                    .iter()
                    .map(|rule| {
                        ImpactField::parse(rule.name)
                            .map(|f| chain.get(f).to_string())
                            .unwrap_or_default()
                    })
                    .collect())
            }
        }
    }

    fn write_field(&self, name: &str, content: &str) -> AppResult<()> {
        match self.backend {
            FieldBackend::Sections => {
                let key = SectionKey::parse(name).ok_or_else(|| {
                    AppError::internal(format!("rule table names unknown section {}", name))
                })?;
                self.db.upsert_section(&self.canvas_id, key, content)?;
            }
            FieldBackend::ImpactChain => {
                let field = ImpactField::parse(name).ok_or_else(|| {
                    AppError::internal(format!("rule table names unknown impact field {}", name))
                })?;
                self.db.upsert_impact_field(&self.canvas_id, field, content)?;
            }
        }
        Ok(())
    }

    fn is_complete(rule: &FieldRule, content: &str) -> bool {
        content.trim().len() >= rule.min_length
    }

    // ── Updates ──────────────────────────────────────────────────────

    /// Validate and persist one field write.
    ///
    /// 1. Unknown key → error, no mutation.
    /// 2. Every directly-depended-on field must hold content meeting its
    ///    own minimum length; the first unmet dependency aborts the write.
    /// 3. Content below this field's minimum length is rejected.
    /// 4. Otherwise persist with a fresh timestamp and return the field
    ///    written plus a fresh completion summary.
    pub fn update_section(&self, key: &str, content: &str) -> AppResult<UpdateResult> {
        let rule = match find_rule(self.fields, key) {
            Some(rule) => rule,
            None => {
                return Ok(UpdateResult::rejected(
                    vec![ValidationIssue::unknown_section(key)],
                    self.get_completion()?,
                ));
            }
        };

        let contents = self.read_all()?;

        for dep_name in rule.dependencies {
            let dep_rule = match find_rule(self.fields, dep_name) {
                Some(r) => r,
                None => continue,
            };
            let dep_content = &contents[self.index_of(dep_name)];
            if !Self::is_complete(dep_rule, dep_content) {
                return Ok(UpdateResult::rejected(
                    vec![ValidationIssue::dependency_unmet(key, dep_name)],
                    self.get_completion()?,
                ));
            }
        }

        if !Self::is_complete(rule, content) {
            return Ok(UpdateResult::rejected(
                vec![ValidationIssue::too_short(key, rule.min_length)],
                self.get_completion()?,
            ));
        }

        self.write_field(key, content)?;
        tracing::info!(
            canvas_id = %self.canvas_id,
            model = self.model_name,
            field = key,
            "section updated"
        );

        let warnings = self.advisory_warnings()?;
        Ok(UpdateResult::ok(key, self.get_completion()?).with_warnings(warnings))
    }

    fn index_of(&self, name: &str) -> usize {
        self.fields
            .iter()
            .position(|r| r.name == name)
            .expect("dependency names a field in the same table")
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Validate the model without writing anything.
    ///
    /// Incomplete fields whose dependencies are satisfied are blocking
    /// errors (they are actionable now); incomplete fields still gated by
    /// a dependency are warnings. A field holding content while one of its
    /// dependencies is incomplete is flagged as completed out of order,
    /// a state reachable only through paths that bypass `update_section`.
    pub fn validate(&self) -> AppResult<ValidationReport> {
        let contents = self.read_all()?;
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (rule, content) in self.fields.iter().zip(&contents) {
            let unmet_dep = rule.dependencies.iter().copied().find(|dep| {
                find_rule(self.fields, dep)
                    .map(|dep_rule| !Self::is_complete(dep_rule, &contents[self.index_of(dep)]))
                    .unwrap_or(false)
            });

            if Self::is_complete(rule, content) {
                if let Some(dep) = unmet_dep {
                    errors.push(ValidationIssue::completed_out_of_order(rule.name, dep));
                }
            } else if unmet_dep.is_some() {
                warnings.push(ValidationIssue::advisory(
                    rule.name,
                    format!("{} will need completion", rule.name),
                ));
            } else {
                errors.push(ValidationIssue::too_short(rule.name, rule.min_length));
            }
        }

        warnings.extend(self.advisory_warnings_from(&contents));
        Ok(ValidationReport::new(errors, warnings))
    }

    /// Model-specific non-blocking warnings against current store state.
    fn advisory_warnings(&self) -> AppResult<Vec<ValidationIssue>> {
        let contents = self.read_all()?;
        Ok(self.advisory_warnings_from(&contents))
    }

    fn advisory_warnings_from(&self, contents: &[String]) -> Vec<ValidationIssue> {
        let mut warnings = Vec::new();
        if self.model_name == "economic" {
            if let (Some(advantage_rule), Some(revenue_rule)) = (
                find_rule(self.fields, "advantage"),
                find_rule(self.fields, "revenue"),
            ) {
                let advantage = &contents[self.index_of("advantage")];
                let revenue = &contents[self.index_of("revenue")];
                if Self::is_complete(advantage_rule, advantage)
                    && !Self::is_complete(revenue_rule, revenue)
                {
                    warnings.push(ValidationIssue::advisory(
                        "advantage",
                        "advantage is described but revenue is still empty; an advantage usually protects a revenue stream",
                    ));
                }
            }
        }
        warnings
    }

    // ── Completion ───────────────────────────────────────────────────

    /// Fresh completion summary with guided-prompt suggestions.
    pub fn get_completion(&self) -> AppResult<CompletionStatus> {
        let contents = self.read_all()?;
        let mut completed = Vec::new();
        let mut missing = Vec::new();

        for (rule, content) in self.fields.iter().zip(&contents) {
            if Self::is_complete(rule, content) {
                completed.push(rule.name.to_string());
            } else {
                missing.push(rule.name.to_string());
            }
        }

        let total = self.fields.len();
        let percentage = ((completed.len() as f64 / total as f64) * 100.0).round() as u8;
        let suggestions = self.suggestions_from(&contents);

        Ok(CompletionStatus {
            percentage,
            completed_sections: completed,
            missing_sections: missing,
            suggestions,
        })
    }

    /// Guiding questions for the first field, in declared order, whose
    /// dependencies are satisfied but which is itself still incomplete.
    fn suggestions_from(&self, contents: &[String]) -> Vec<String> {
        for (rule, content) in self.fields.iter().zip(contents) {
            if Self::is_complete(rule, content) {
                continue;
            }
            let deps_met = rule.dependencies.iter().all(|dep| {
                find_rule(self.fields, dep)
                    .map(|dep_rule| Self::is_complete(dep_rule, &contents[self.index_of(dep)]))
                    .unwrap_or(true)
            });
            if deps_met {
                return rule
                    .guiding_questions
                    .iter()
                    .map(|q| q.to_string())
                    .collect();
            }
        }
        vec![format!("The {} model is complete.", self.model_name)]
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Export the model's fields as markdown or JSON.
    pub fn export(&self, format: ExportFormat) -> AppResult<String> {
        let model = self.get_model()?;
        match format {
            ExportFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = model
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                Ok(serde_json::to_string_pretty(&map)?)
            }
            ExportFormat::Markdown => {
                let mut out = format!("## {} Model\n", title_case(self.model_name));
                for (name, content) in model {
                    out.push_str(&format!("\n### {}\n\n", title_case(&name)));
                    if content.trim().is_empty() {
                        out.push_str("_Not yet completed._\n");
                    } else {
                        out.push_str(&content);
                        out.push('\n');
                    }
                }
                Ok(out)
            }
        }
    }
}
