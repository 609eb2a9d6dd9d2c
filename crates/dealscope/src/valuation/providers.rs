use serde::{Deserialize, Serialize};

use crate::listings::RawListingRecord;

use super::domain::{ConditionSummary, Coordinates, RepairClass, SubjectProperty};
use super::search::SearchWindow;

/// Failure modes shared by the external collaborators. Retry, backoff,
/// and rate limiting are the collaborator's contract; the engine only sees
/// the final outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider returned invalid data: {0}")]
    InvalidResponse(String),
    #[error("provider rate limit exhausted: {0}")]
    RateLimited(String),
}

/// Normalized geocoding result used to classify the subject's area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedAddress {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub place_types: Vec<String>,
}

impl GeocodedAddress {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Address normalization and classification collaborator.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, address: &str) -> Result<GeocodedAddress, ProviderError>;
}

/// Raw comp acquisition collaborator. Returns untrusted candidate records;
/// the engine re-derives distance, sold status, and eligibility itself.
pub trait CompSource: Send + Sync {
    fn search(
        &self,
        subject: &SubjectProperty,
        window: &SearchWindow,
    ) -> Result<Vec<RawListingRecord>, ProviderError>;
}

/// Photo-driven condition assessment for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionAssessment {
    /// 1 (poor) through 5 (excellent).
    pub rating: u8,
    pub renovation_indicators: Vec<String>,
    pub damage_flags: Vec<String>,
    /// 1–10 aggregate condition score.
    pub overall_score: f64,
    pub repair_class: RepairClass,
    pub photo_count: u32,
}

impl From<ConditionAssessment> for ConditionSummary {
    fn from(assessment: ConditionAssessment) -> Self {
        Self {
            rating: assessment.rating,
            renovation_indicators: assessment.renovation_indicators,
            damage_flags: assessment.damage_flags,
            overall_score: Some(assessment.overall_score),
            repair_class: Some(assessment.repair_class),
            photo_count: assessment.photo_count,
        }
    }
}

/// Per-image condition assessment collaborator. `Ok(None)` means no photos
/// were available to assess; the engine substitutes neutral defaults.
pub trait ConditionAssessor: Send + Sync {
    fn assess(
        &self,
        address: &str,
        image_urls: &[String],
    ) -> Result<Option<ConditionAssessment>, ProviderError>;
}

/// Neighborhood-quality lookup outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodRating {
    /// 0–100 quality score.
    Score(f64),
    /// The collaborator has no data for this location; the engine falls
    /// back to its area-type proxy.
    Unavailable,
}

impl NeighborhoodRating {
    pub fn score(self) -> Option<f64> {
        match self {
            NeighborhoodRating::Score(value) => Some(value),
            NeighborhoodRating::Unavailable => None,
        }
    }
}

/// Neighborhood-quality collaborator.
pub trait NeighborhoodSource: Send + Sync {
    fn rating(&self, coordinates: &Coordinates) -> Result<NeighborhoodRating, ProviderError>;
}
