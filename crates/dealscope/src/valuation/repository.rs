use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::arv::ArvMethod;
use super::deal::DealScoreBreakdown;
use super::mao::MaoBreakdown;
use super::recommendation::RecommendationView;
use super::scoring::ScoredComp;
use super::domain::{PropertyId, SubjectProperty};

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// The engine's full output for one subject property. At most one
/// authoritative record exists per subject; recomputation replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub subject_id: PropertyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arv_method: Option<ArvMethod>,
    pub comps: Vec<ScoredComp>,
    /// True when the matching filter eliminated every candidate and the
    /// unfiltered pool was kept as a low-quality fallback.
    pub comps_filtered_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mao: Option<MaoBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_score: Option<DealScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<RecommendationView>,
    pub confidence: f64,
    pub analyzed_on: NaiveDate,
}

impl AnalysisResult {
    pub fn summary_view(&self) -> AnalysisSummaryView {
        AnalysisSummaryView {
            subject_id: self.subject_id.clone(),
            arv: self.arv,
            mao: self.mao.as_ref().map(|breakdown| breakdown.mao),
            suggested_offer: self
                .mao
                .as_ref()
                .map(|breakdown| breakdown.suggested_offer),
            deal_score: self.deal_score.as_ref().map(|deal| deal.composite),
            recommendation: self
                .recommendation
                .as_ref()
                .map(|view| view.category.label()),
            comp_count: self.comps.len(),
            comps_filtered_out: self.comps_filtered_out,
            confidence: self.confidence,
        }
    }
}

/// Flattened representation for reports and machine output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummaryView {
    pub subject_id: PropertyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mao: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_offer: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
    pub comp_count: usize,
    pub comps_filtered_out: bool,
    pub confidence: f64,
}

/// Subject-property storage keyed by address-derived identity.
pub trait PropertyRepository: Send + Sync {
    fn upsert_subject(&self, subject: SubjectProperty) -> Result<(), RepositoryError>;
    fn fetch_subject(&self, id: &PropertyId) -> Result<Option<SubjectProperty>, RepositoryError>;
}

/// Scored-comp storage. A re-search supersedes the previous set for the
/// subject; individual comps are keyed by `(subject, data_source,
/// source_id)` so duplicates collapse.
pub trait CompRepository: Send + Sync {
    fn replace_for_subject(
        &self,
        subject_id: &PropertyId,
        comps: &[ScoredComp],
    ) -> Result<(), RepositoryError>;
    fn fetch_for_subject(&self, subject_id: &PropertyId)
        -> Result<Vec<ScoredComp>, RepositoryError>;
}

/// Analysis-result storage with upsert-per-subject semantics. The
/// implementation must serialize writes per subject key; the engine itself
/// does not order concurrent recomputations of the same subject.
pub trait AnalysisRepository: Send + Sync {
    fn upsert_analysis(&self, result: AnalysisResult) -> Result<AnalysisResult, RepositoryError>;
    fn fetch_analysis(
        &self,
        subject_id: &PropertyId,
    ) -> Result<Option<AnalysisResult>, RepositoryError>;
}
