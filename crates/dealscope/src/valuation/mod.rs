//! Comparable-sales valuation engine.
//!
//! The pipeline turns a subject property plus a pool of candidate
//! comparable sales into a filtered and ranked comp set, an after-repair
//! value, a maximum allowable offer, and a composite deal score with a
//! categorical recommendation. Every component is a pure function over
//! explicit inputs; the service module wires them to the external
//! collaborators and persistence.

pub mod arv;
pub mod deal;
pub mod domain;
mod geo;
pub mod mao;
pub mod matching;
pub mod providers;
pub mod recommendation;
pub mod repository;
pub mod scoring;
pub mod search;
pub mod service;

#[cfg(test)]
mod tests;

pub use arv::{estimate_arv, estimate_confidence, ArvEstimate, ArvMethod, CompContribution};
pub use deal::{compose_deal_score, DealContext, DealScoreBreakdown};
pub use domain::{
    AreaType, ComparableSale, ConditionSummary, Coordinates, ListingStatus, PropertyCategory,
    PropertyId, RepairClass, SubjectProperty, DEFAULT_CONDITION_RATING, DEFAULT_DAYS_ON_MARKET,
};
pub use geo::haversine_miles;
pub use mao::{
    calculate_mao, MaoBreakdown, MaoRule, ValidationError, ValuationInputs, CUSTOM_PERCENT_MAX,
    CUSTOM_PERCENT_MIN, MONETARY_INPUT_MAX,
};
pub use matching::{filter_eligible, is_eligible, FilterOutcome};
pub use providers::{
    CompSource, ConditionAssessment, ConditionAssessor, GeocodedAddress, Geocoder,
    NeighborhoodRating, NeighborhoodSource, ProviderError,
};
pub use recommendation::{recommend, Recommendation, RecommendationView};
pub use repository::{
    AnalysisRepository, AnalysisResult, AnalysisSummaryView, CompRepository, PropertyRepository,
    RepositoryError,
};
pub use scoring::{score_comps, CompScoreBreakdown, ScoreWeights, ScoredComp};
pub use search::{build_search_params, MatchingCriteria, SearchLadder, SearchParams, SearchWindow};
pub use service::{AnalysisError, AnalysisService, AnalysisStore, ContractViolation};
