//! Venture Profile Service
//!
//! Maintains the seven classification dimensions for a canvas. A
//! dimension becomes usable for knowledge-base filtering once it is
//! reliable (confidence >= 0.7 or explicitly confirmed).

use crate::models::venture::{
    DimensionAssessment, DimensionValue, VentureDimension, VentureProfile,
};
use crate::storage::Database;
use crate::utils::error::{AppError, AppResult};

/// Business-rule layer over the venture profile store.
#[derive(Clone)]
pub struct VentureProfileService {
    db: Database,
    canvas_id: String,
}

impl VentureProfileService {
    /// Service for one canvas's profile.
    pub fn new(db: Database, canvas_id: impl Into<String>) -> Self {
        Self {
            db,
            canvas_id: canvas_id.into(),
        }
    }

    /// The current profile (empty when nothing has been classified yet).
    pub fn get_profile(&self) -> AppResult<VentureProfile> {
        self.db.get_venture_profile(&self.canvas_id)
    }

    /// Upsert one dimension assessment.
    ///
    /// The value shape must match the dimension's select mode, confidence
    /// is clamped into [0, 1], and omitted confidence/confirmed default to
    /// 0.5/false for a fresh assessment or keep the stored values on
    /// re-classification.
    pub fn update_dimension(
        &self,
        dimension: &str,
        value: DimensionValue,
        confidence: Option<f64>,
        confirmed: Option<bool>,
    ) -> AppResult<VentureProfile> {
        let dim = VentureDimension::parse(dimension).ok_or_else(|| {
            AppError::validation(format!("unknown venture dimension: {}", dimension))
        })?;

        if !value.matches(dim) {
            let expected = if dim.is_multi_select() {
                "a list of values"
            } else {
                "a single value"
            };
            return Err(AppError::validation(format!(
                "{} expects {}",
                dim, expected
            )));
        }

        let existing = self.get_profile()?.dimensions.remove(&dim);
        let confidence = confidence
            .or(existing.as_ref().map(|a| a.confidence))
            .unwrap_or(0.5);
        let confirmed = confirmed
            .or(existing.as_ref().map(|a| a.confirmed))
            .unwrap_or(false);

        let assessment = DimensionAssessment::new(value, confidence, confirmed);
        self.db
            .upsert_venture_dimension(&self.canvas_id, dim, &assessment)?;
        tracing::debug!(
            canvas_id = %self.canvas_id,
            dimension = dim.as_str(),
            confidence,
            confirmed,
            "venture dimension updated"
        );

        self.get_profile()
    }

    /// Mark a dimension as explicitly confirmed by the user.
    pub fn confirm_dimension(&self, dimension: &str) -> AppResult<VentureProfile> {
        let dim = VentureDimension::parse(dimension).ok_or_else(|| {
            AppError::validation(format!("unknown venture dimension: {}", dimension))
        })?;
        let profile = self.get_profile()?;
        let assessment = profile.dimensions.get(&dim).ok_or_else(|| {
            AppError::not_found(format!("dimension {} has not been classified", dim))
        })?;

        let confirmed =
            DimensionAssessment::new(assessment.value.clone(), assessment.confidence, true);
        self.db
            .upsert_venture_dimension(&self.canvas_id, dim, &confirmed)?;
        self.get_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> VentureProfileService {
        let db = Database::new_in_memory().unwrap();
        db.create_canvas("c1", "Test").unwrap();
        VentureProfileService::new(db, "c1")
    }

    #[test]
    fn test_update_single_select() {
        let svc = service();
        let profile = svc
            .update_dimension(
                "venture_stage",
                DimensionValue::Single("seed".to_string()),
                Some(0.8),
                None,
            )
            .unwrap();
        let assessment = profile
            .dimensions
            .get(&VentureDimension::VentureStage)
            .unwrap();
        assert_eq!(assessment.confidence, 0.8);
        assert!(assessment.is_reliable());
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let svc = service();
        let err = svc
            .update_dimension(
                "venture_stage",
                DimensionValue::Multi(vec!["seed".to_string()]),
                None,
                None,
            )
            .unwrap_err();
        assert!(err.to_string().contains("single value"));

        let err = svc
            .update_dimension(
                "industries",
                DimensionValue::Single("crafts".to_string()),
                None,
                None,
            )
            .unwrap_err();
        assert!(err.to_string().contains("list of values"));
    }

    #[test]
    fn test_unknown_dimension_rejected() {
        let svc = service();
        let err = svc
            .update_dimension("bogus", DimensionValue::Single("x".to_string()), None, None)
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_omitted_confidence_defaults_then_sticks() {
        let svc = service();
        svc.update_dimension(
            "legal_structure",
            DimensionValue::Single("nonprofit".to_string()),
            None,
            None,
        )
        .unwrap();
        let profile = svc.get_profile().unwrap();
        assert_eq!(
            profile.dimensions[&VentureDimension::LegalStructure].confidence,
            0.5
        );

        // Re-classifying without confidence keeps the stored score
        svc.update_dimension(
            "legal_structure",
            DimensionValue::Single("cooperative".to_string()),
            Some(0.9),
            None,
        )
        .unwrap();
        svc.update_dimension(
            "legal_structure",
            DimensionValue::Single("co-op".to_string()),
            None,
            None,
        )
        .unwrap();
        let profile = svc.get_profile().unwrap();
        assert_eq!(
            profile.dimensions[&VentureDimension::LegalStructure].confidence,
            0.9
        );
    }

    #[test]
    fn test_confirm_dimension() {
        let svc = service();
        svc.update_dimension(
            "impact_areas",
            DimensionValue::Multi(vec!["economic inclusion".to_string()]),
            Some(0.3),
            None,
        )
        .unwrap();

        let profile = svc.get_profile().unwrap();
        assert!(!profile.dimensions[&VentureDimension::ImpactAreas].is_reliable());

        let profile = svc.confirm_dimension("impact_areas").unwrap();
        let assessment = &profile.dimensions[&VentureDimension::ImpactAreas];
        assert!(assessment.confirmed);
        assert!(assessment.is_reliable());
        assert_eq!(assessment.confidence, 0.3);
    }

    #[test]
    fn test_confirm_unclassified_dimension_is_not_found() {
        let svc = service();
        let err = svc.confirm_dimension("industries").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
