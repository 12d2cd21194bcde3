//! Impact Chain Model
//!
//! The eight-field causality chain from issue to impact. Fields complete
//! strictly in order: a field may only be written once every earlier field
//! meets the minimum length. The final `impact` field is the single source
//! of truth for the impact cell shown in the main canvas grid.

use serde::{Deserialize, Serialize};

/// Minimum content length for an impact chain field.
pub const IMPACT_FIELD_MIN_LENGTH: usize = 10;

/// The eight chain fields in causal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactField {
    Issue,
    Participants,
    Activities,
    Outputs,
    ShortTermOutcomes,
    MediumTermOutcomes,
    LongTermOutcomes,
    Impact,
}

impl ImpactField {
    /// Chain order, first to last.
    pub const CHAIN_ORDER: [ImpactField; 8] = [
        ImpactField::Issue,
        ImpactField::Participants,
        ImpactField::Activities,
        ImpactField::Outputs,
        ImpactField::ShortTermOutcomes,
        ImpactField::MediumTermOutcomes,
        ImpactField::LongTermOutcomes,
        ImpactField::Impact,
    ];

    /// Stable string identifier used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactField::Issue => "issue",
            ImpactField::Participants => "participants",
            ImpactField::Activities => "activities",
            ImpactField::Outputs => "outputs",
            ImpactField::ShortTermOutcomes => "short_term_outcomes",
            ImpactField::MediumTermOutcomes => "medium_term_outcomes",
            ImpactField::LongTermOutcomes => "long_term_outcomes",
            ImpactField::Impact => "impact",
        }
    }

    /// Parse a field from its stable string identifier.
    pub fn parse(s: &str) -> Option<ImpactField> {
        ImpactField::CHAIN_ORDER
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
    }

    /// Zero-based position in the chain.
    pub fn position(&self) -> usize {
        ImpactField::CHAIN_ORDER
            .iter()
            .position(|f| f == self)
            .expect("field is in CHAIN_ORDER")
    }

    /// All fields strictly before this one in chain order.
    pub fn predecessors(&self) -> &'static [ImpactField] {
        &ImpactField::CHAIN_ORDER[..self.position()]
    }
}

impl std::fmt::Display for ImpactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One canvas's impact chain record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactChain {
    pub issue: String,
    pub participants: String,
    pub activities: String,
    pub outputs: String,
    pub short_term_outcomes: String,
    pub medium_term_outcomes: String,
    pub long_term_outcomes: String,
    pub impact: String,
    /// Last write timestamp (RFC 3339), empty for a never-written chain
    pub updated_at: String,
}

impl ImpactChain {
    /// Read a field's content.
    pub fn get(&self, field: ImpactField) -> &str {
        match field {
            ImpactField::Issue => &self.issue,
            ImpactField::Participants => &self.participants,
            ImpactField::Activities => &self.activities,
            ImpactField::Outputs => &self.outputs,
            ImpactField::ShortTermOutcomes => &self.short_term_outcomes,
            ImpactField::MediumTermOutcomes => &self.medium_term_outcomes,
            ImpactField::LongTermOutcomes => &self.long_term_outcomes,
            ImpactField::Impact => &self.impact,
        }
    }

    /// Overwrite a field's content.
    pub fn set(&mut self, field: ImpactField, content: impl Into<String>) {
        let content = content.into();
        match field {
            ImpactField::Issue => self.issue = content,
            ImpactField::Participants => self.participants = content,
            ImpactField::Activities => self.activities = content,
            ImpactField::Outputs => self.outputs = content,
            ImpactField::ShortTermOutcomes => self.short_term_outcomes = content,
            ImpactField::MediumTermOutcomes => self.medium_term_outcomes = content,
            ImpactField::LongTermOutcomes => self.long_term_outcomes = content,
            ImpactField::Impact => self.impact = content,
        }
    }

    /// Whether a field meets the chain minimum length.
    pub fn is_field_complete(&self, field: ImpactField) -> bool {
        self.get(field).trim().len() >= IMPACT_FIELD_MIN_LENGTH
    }

    /// The first field in chain order that is still incomplete.
    pub fn first_incomplete(&self) -> Option<ImpactField> {
        ImpactField::CHAIN_ORDER
            .iter()
            .copied()
            .find(|f| !self.is_field_complete(*f))
    }

    /// Whether every field in the chain is complete.
    pub fn is_complete(&self) -> bool {
        self.first_incomplete().is_none()
    }

    /// Fields currently complete, in chain order.
    pub fn completed_fields(&self) -> Vec<ImpactField> {
        ImpactField::CHAIN_ORDER
            .iter()
            .copied()
            .filter(|f| self.is_field_complete(*f))
            .collect()
    }
}
