//! Venture Profile Model
//!
//! Classification metadata about the venture, separate from canvas
//! content. Seven dimensions, each carrying a confidence score and an
//! explicit-confirmation flag. A dimension feeds downstream knowledge-base
//! filtering only when it is reliable: confidence >= 0.7 or confirmed by
//! the user.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Confidence threshold above which an unconfirmed dimension is usable.
pub const RELIABLE_CONFIDENCE: f64 = 0.7;

/// The seven classification dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VentureDimension {
    VentureStage,
    ImpactAreas,
    ImpactMechanisms,
    RevenueSources,
    FundingSources,
    Industries,
    LegalStructure,
}

impl VentureDimension {
    /// All dimensions in display order.
    pub const ALL: [VentureDimension; 7] = [
        VentureDimension::VentureStage,
        VentureDimension::ImpactAreas,
        VentureDimension::ImpactMechanisms,
        VentureDimension::RevenueSources,
        VentureDimension::FundingSources,
        VentureDimension::Industries,
        VentureDimension::LegalStructure,
    ];

    /// Stable string identifier used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            VentureDimension::VentureStage => "venture_stage",
            VentureDimension::ImpactAreas => "impact_areas",
            VentureDimension::ImpactMechanisms => "impact_mechanisms",
            VentureDimension::RevenueSources => "revenue_sources",
            VentureDimension::FundingSources => "funding_sources",
            VentureDimension::Industries => "industries",
            VentureDimension::LegalStructure => "legal_structure",
        }
    }

    /// Parse a dimension from its stable string identifier.
    pub fn parse(s: &str) -> Option<VentureDimension> {
        VentureDimension::ALL.iter().copied().find(|d| d.as_str() == s)
    }

    /// Whether this dimension holds a set of values rather than one.
    pub fn is_multi_select(&self) -> bool {
        !matches!(
            self,
            VentureDimension::VentureStage | VentureDimension::LegalStructure
        )
    }
}

impl std::fmt::Display for VentureDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dimension's value: single-select or multi-select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Single(String),
    Multi(Vec<String>),
}

impl DimensionValue {
    /// Whether the value shape matches the dimension's select mode.
    pub fn matches(&self, dimension: VentureDimension) -> bool {
        match self {
            DimensionValue::Single(_) => !dimension.is_multi_select(),
            DimensionValue::Multi(_) => dimension.is_multi_select(),
        }
    }

    /// The value(s) as a flat list, for filter construction.
    pub fn values(&self) -> Vec<String> {
        match self {
            DimensionValue::Single(v) => vec![v.clone()],
            DimensionValue::Multi(vs) => vs.clone(),
        }
    }
}

/// One assessed dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionAssessment {
    pub value: DimensionValue,
    /// Confidence in [0, 1]; clamped on write
    pub confidence: f64,
    /// User explicitly confirmed this classification
    pub confirmed: bool,
    /// Last write timestamp (RFC 3339)
    pub updated_at: String,
}

impl DimensionAssessment {
    /// Create an assessment, clamping confidence into [0, 1].
    pub fn new(value: DimensionValue, confidence: f64, confirmed: bool) -> Self {
        Self {
            value,
            confidence: confidence.clamp(0.0, 1.0),
            confirmed,
            updated_at: String::new(),
        }
    }

    /// Eligible for downstream filtering: high confidence or confirmed.
    pub fn is_reliable(&self) -> bool {
        self.confidence >= RELIABLE_CONFIDENCE || self.confirmed
    }
}

/// One canvas's venture profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VentureProfile {
    pub canvas_id: String,
    /// Assessed dimensions; absent keys have not been classified yet
    pub dimensions: HashMap<VentureDimension, DimensionAssessment>,
}

impl VentureProfile {
    /// Empty profile for a canvas.
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            dimensions: HashMap::new(),
        }
    }

    /// Dimensions reliable enough for downstream filtering.
    pub fn reliable_dimensions(&self) -> Vec<(VentureDimension, &DimensionAssessment)> {
        VentureDimension::ALL
            .iter()
            .filter_map(|d| self.dimensions.get(d).map(|a| (*d, a)))
            .filter(|(_, a)| a.is_reliable())
            .collect()
    }
}
