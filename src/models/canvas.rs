//! Canvas Models
//!
//! The ten standalone canvas sections, the validation issue taxonomy, and
//! the result/completion types every write path returns. Validation
//! failures are data, not errors: callers receive an `UpdateResult` with
//! `success == false` and the issue list, so the tool executor and any
//! transport layer can forward them uniformly.

use serde::{Deserialize, Serialize};

use crate::models::impact_chain::ImpactChain;

/// Minimum content length for a standalone/customer/economic section.
pub const SECTION_MIN_LENGTH: usize = 20;

/// The ten fixed canvas sections shown in the main grid (the eleventh grid
/// cell, `impact`, mirrors the impact chain's final field and is not a
/// standalone section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKey {
    Purpose,
    Customers,
    JobsToBeDone,
    ValueProposition,
    Solution,
    Channels,
    Revenue,
    Costs,
    KeyMetrics,
    Advantage,
}

/// Which validation group a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionGroup {
    /// No dependencies, validated by the aggregate directly
    Standalone,
    /// Customer model: strict per-field dependency edges
    Customer,
    /// Economic model: any order
    Economic,
}

impl SectionKey {
    /// All section keys in grid order.
    pub const ALL: [SectionKey; 10] = [
        SectionKey::Purpose,
        SectionKey::Customers,
        SectionKey::JobsToBeDone,
        SectionKey::ValueProposition,
        SectionKey::Solution,
        SectionKey::Channels,
        SectionKey::Revenue,
        SectionKey::Costs,
        SectionKey::KeyMetrics,
        SectionKey::Advantage,
    ];

    /// Stable string identifier used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Purpose => "purpose",
            SectionKey::Customers => "customers",
            SectionKey::JobsToBeDone => "jobs_to_be_done",
            SectionKey::ValueProposition => "value_proposition",
            SectionKey::Solution => "solution",
            SectionKey::Channels => "channels",
            SectionKey::Revenue => "revenue",
            SectionKey::Costs => "costs",
            SectionKey::KeyMetrics => "key_metrics",
            SectionKey::Advantage => "advantage",
        }
    }

    /// Parse a key from its stable string identifier.
    pub fn parse(s: &str) -> Option<SectionKey> {
        SectionKey::ALL.iter().copied().find(|k| k.as_str() == s)
    }

    /// Minimum content length for this section to count as complete.
    pub fn min_length(&self) -> usize {
        SECTION_MIN_LENGTH
    }

    /// Which validation group owns writes to this section.
    pub fn group(&self) -> SectionGroup {
        match self {
            SectionKey::Purpose | SectionKey::KeyMetrics => SectionGroup::Standalone,
            SectionKey::Customers
            | SectionKey::JobsToBeDone
            | SectionKey::ValueProposition
            | SectionKey::Solution => SectionGroup::Customer,
            SectionKey::Channels
            | SectionKey::Revenue
            | SectionKey::Costs
            | SectionKey::Advantage => SectionGroup::Economic,
        }
    }
}

impl std::fmt::Display for SectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One canvas section as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSection {
    /// Section identifier
    pub key: SectionKey,
    /// Current content (empty string when untouched)
    pub content: String,
    /// Derived: content meets the section's minimum length
    pub is_complete: bool,
    /// Last write timestamp (RFC 3339), empty for never-written sections
    pub updated_at: String,
}

impl CanvasSection {
    /// Build a section, deriving `is_complete` from the content length.
    pub fn new(key: SectionKey, content: impl Into<String>, updated_at: impl Into<String>) -> Self {
        let content = content.into();
        let is_complete = content.trim().len() >= key.min_length();
        Self {
            key,
            content,
            is_complete,
            updated_at: updated_at.into(),
        }
    }

    /// An empty, never-written section.
    pub fn empty(key: SectionKey) -> Self {
        Self::new(key, "", "")
    }
}

/// Classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Key does not name any known section/field
    UnknownSection,
    /// A declared dependency is not yet complete
    DependencyUnmet,
    /// Content below the field's minimum length
    ContentTooShort,
    /// A chain field holds content while an earlier field is still empty.
    /// Unreachable through the normal update path; representable so that
    /// imported or legacy data can be reported instead of silently read.
    CompletedOutOfOrder,
}

/// One validation problem, blocking or advisory depending on where it
/// appears (`errors` vs `warnings`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// Section or chain field the issue is about
    pub section: String,
    /// Human-readable message, surfaced verbatim to the user and the LLM
    pub message: String,
    /// For dependency issues: the prerequisite that must be completed first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<String>,
    /// For length issues: the required minimum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_length: Option<usize>,
}

impl ValidationIssue {
    /// Unknown section/field key.
    pub fn unknown_section(key: &str) -> Self {
        Self {
            kind: IssueKind::UnknownSection,
            section: key.to_string(),
            message: format!("Unknown section: {}", key),
            prerequisite: None,
            required_length: None,
        }
    }

    /// A declared dependency is not complete yet.
    pub fn dependency_unmet(section: &str, prerequisite: &str) -> Self {
        Self {
            kind: IssueKind::DependencyUnmet,
            section: section.to_string(),
            message: format!("Complete {} before {}", prerequisite, section),
            prerequisite: Some(prerequisite.to_string()),
            required_length: None,
        }
    }

    /// Content below the minimum length.
    pub fn too_short(section: &str, required: usize) -> Self {
        Self {
            kind: IssueKind::ContentTooShort,
            section: section.to_string(),
            message: format!(
                "{} needs more detail (minimum {} characters)",
                section, required
            ),
            prerequisite: None,
            required_length: Some(required),
        }
    }

    /// A later chain field is filled while an earlier one is empty.
    pub fn completed_out_of_order(section: &str, unfilled_predecessor: &str) -> Self {
        Self {
            kind: IssueKind::CompletedOutOfOrder,
            section: section.to_string(),
            message: format!(
                "{} was completed out of order: {} is still incomplete",
                section, unfilled_predecessor
            ),
            prerequisite: Some(unfilled_predecessor.to_string()),
            required_length: None,
        }
    }

    /// Advisory issue with a free-form message (non-blocking warnings).
    pub fn advisory(section: &str, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::DependencyUnmet,
            section: section.to_string(),
            message: message.into(),
            prerequisite: None,
            required_length: None,
        }
    }
}

/// Completion summary for a model or the whole canvas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionStatus {
    /// Rounded percentage of completed fields
    pub percentage: u8,
    /// Fields that meet their minimum length
    pub completed_sections: Vec<String>,
    /// Fields still below their minimum length
    pub missing_sections: Vec<String>,
    /// Guiding questions for the next field worth working on
    pub suggestions: Vec<String>,
}

/// Outcome of a single section/field write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResult {
    /// Whether the write was persisted
    pub success: bool,
    /// The field that was written (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_section: Option<String>,
    /// Blocking problems (empty on success)
    pub errors: Vec<ValidationIssue>,
    /// Advisory problems; never block the write
    pub warnings: Vec<ValidationIssue>,
    /// Fresh completion summary, returned on success and failure alike
    pub completion: CompletionStatus,
}

impl UpdateResult {
    /// A persisted write.
    pub fn ok(section: impl Into<String>, completion: CompletionStatus) -> Self {
        Self {
            success: true,
            updated_section: Some(section.into()),
            errors: Vec::new(),
            warnings: Vec::new(),
            completion,
        }
    }

    /// A rejected write. No mutation happened.
    pub fn rejected(errors: Vec<ValidationIssue>, completion: CompletionStatus) -> Self {
        Self {
            success: false,
            updated_section: None,
            errors,
            warnings: Vec::new(),
            completion,
        }
    }

    /// Attach advisory warnings.
    pub fn with_warnings(mut self, warnings: Vec<ValidationIssue>) -> Self {
        self.warnings = warnings;
        self
    }
}

/// Result of validating a whole model without writing anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Build a report; `valid` is derived from the error list.
    pub fn new(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

/// The full canvas read model: every section plus the impact chain, with
/// the aggregate completion percentage. Assembled fresh on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullCanvas {
    /// Canvas identifier
    pub canvas_id: String,
    /// The ten grid sections in grid order
    pub sections: Vec<CanvasSection>,
    /// The impact causality chain (its `impact` field is the grid's
    /// impact cell)
    pub impact_chain: ImpactChain,
    /// round(100 * completed / 11): ten sections + the chain as a whole
    pub completion_percentage: u8,
    /// Last write to any child (RFC 3339)
    pub updated_at: String,
}

impl FullCanvas {
    /// Look up a section by key.
    pub fn section(&self, key: SectionKey) -> Option<&CanvasSection> {
        self.sections.iter().find(|s| s.key == key)
    }
}
