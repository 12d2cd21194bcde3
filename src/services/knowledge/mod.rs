//! Knowledge Search
//!
//! Contract for the external knowledge-base collaborator: metadata-filtered
//! semantic search over methodology guides and worked examples. The core
//! only consumes this interface; embedding and ranking internals live
//! elsewhere. An in-memory keyword implementation backs tests and local
//! development.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use social_canvas_core::{CoreError, CoreResult};

use crate::models::venture::{VentureDimension, VentureProfile};

/// Kind of knowledge-base content to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Canvas methodology guides
    Methodology,
    /// Worked examples from comparable ventures
    Examples,
}

impl ContentType {
    /// Stable string identifier used in document metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Methodology => "methodology",
            ContentType::Examples => "examples",
        }
    }
}

/// Metadata filters derived from the venture profile.
///
/// Only reliable dimensions (confidence >= 0.7 or confirmed) contribute;
/// a half-guessed classification must not narrow search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venture_stage: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub impact_areas: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub industries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_structure: Option<String>,
}

impl SearchFilters {
    /// Build filters from a profile's reliable dimensions.
    pub fn from_profile(profile: &VentureProfile) -> Self {
        let mut filters = SearchFilters::default();
        for (dimension, assessment) in profile.reliable_dimensions() {
            match dimension {
                VentureDimension::VentureStage => {
                    filters.venture_stage = assessment.value.values().into_iter().next();
                }
                VentureDimension::ImpactAreas => {
                    filters.impact_areas = assessment.value.values();
                }
                VentureDimension::Industries => {
                    filters.industries = assessment.value.values();
                }
                VentureDimension::LegalStructure => {
                    filters.legal_structure = assessment.value.values().into_iter().next();
                }
                // Mechanisms and funding/revenue sources are not indexed
                // as document metadata.
                _ => {}
            }
        }
        filters
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        self.venture_stage.is_none()
            && self.impact_areas.is_empty()
            && self.industries.is_empty()
            && self.legal_structure.is_none()
    }
}

/// One knowledge-base search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Restrict to one content type; None searches everything
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default)]
    pub filters: SearchFilters,
    pub limit: usize,
}

impl SearchRequest {
    /// Unfiltered search over all content.
    pub fn new(query: impl Into<String>, limit: usize) -> Self {
        Self {
            query: query.into(),
            content_type: None,
            filters: SearchFilters::default(),
            limit,
        }
    }

    /// Restrict to a content type.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Apply metadata filters.
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }
}

/// One matching document chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub content: String,
    pub metadata: HashMap<String, Value>,
    pub score: f64,
}

/// Search results plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    /// Matches before the limit was applied
    pub total_found: usize,
    /// Non-fatal condition the caller may surface (e.g. filters ignored)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The external knowledge-search capability.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    async fn search(&self, request: SearchRequest) -> CoreResult<SearchResponse>;
}

// ── In-memory implementation ─────────────────────────────────────────

/// A document seeded into the in-memory index.
#[derive(Debug, Clone)]
pub struct SeedDocument {
    pub content: String,
    pub metadata: HashMap<String, Value>,
}

impl SeedDocument {
    /// Build a document with `content_type` metadata.
    pub fn new(content: impl Into<String>, content_type: ContentType) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(
            "content_type".to_string(),
            Value::String(content_type.as_str().to_string()),
        );
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Attach a metadata value.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Keyword-overlap search over seeded documents, honoring content-type and
/// metadata filters. Stands in for the real vector index in tests and
/// local development.
#[derive(Default)]
pub struct InMemoryKnowledgeSearch {
    documents: Vec<SeedDocument>,
}

impl InMemoryKnowledgeSearch {
    pub fn new(documents: Vec<SeedDocument>) -> Self {
        Self { documents }
    }

    fn score(query: &str, content: &str) -> f64 {
        let content_lower = content.to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();
        if terms.is_empty() {
            return 0.0;
        }
        let hits = terms
            .iter()
            .filter(|t| content_lower.contains(&t.to_lowercase()))
            .count();
        hits as f64 / terms.len() as f64
    }

    fn metadata_matches(filters: &SearchFilters, metadata: &HashMap<String, Value>) -> bool {
        let list_overlaps = |wanted: &[String], key: &str| -> bool {
            if wanted.is_empty() {
                return true;
            }
            match metadata.get(key).and_then(|v| v.as_array()) {
                Some(values) => values
                    .iter()
                    .filter_map(|v| v.as_str())
                    .any(|v| wanted.iter().any(|w| w == v)),
                // Documents without the key are not excluded by the filter.
                None => true,
            }
        };
        let single_matches = |wanted: &Option<String>, key: &str| -> bool {
            match (wanted, metadata.get(key).and_then(|v| v.as_str())) {
                (Some(w), Some(v)) => w == v,
                _ => true,
            }
        };

        single_matches(&filters.venture_stage, "venture_stage")
            && single_matches(&filters.legal_structure, "legal_structure")
            && list_overlaps(&filters.impact_areas, "impact_areas")
            && list_overlaps(&filters.industries, "industries")
    }
}

#[async_trait]
impl KnowledgeSearch for InMemoryKnowledgeSearch {
    async fn search(&self, request: SearchRequest) -> CoreResult<SearchResponse> {
        if request.query.trim().is_empty() {
            return Err(CoreError::validation("search query must not be empty"));
        }

        let mut hits: Vec<SearchHit> = self
            .documents
            .iter()
            .filter(|doc| match request.content_type {
                Some(ct) => {
                    doc.metadata.get("content_type").and_then(|v| v.as_str())
                        == Some(ct.as_str())
                }
                None => true,
            })
            .filter(|doc| Self::metadata_matches(&request.filters, &doc.metadata))
            .map(|doc| SearchHit {
                content: doc.content.clone(),
                metadata: doc.metadata.clone(),
                score: Self::score(&request.query, &doc.content),
            })
            .filter(|hit| hit.score > 0.0)
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let total_found = hits.len();
        hits.truncate(request.limit);

        Ok(SearchResponse {
            results: hits,
            total_found,
            warning: None,
        })
    }
}
