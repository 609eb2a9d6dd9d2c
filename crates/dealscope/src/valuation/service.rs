use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::EngineSettings;
use crate::listings::adapter;

use super::arv::{estimate_arv, estimate_confidence};
use super::deal::{compose_deal_score, DealContext};
use super::domain::{AreaType, ComparableSale, ConditionSummary, SubjectProperty};
use super::mao::{calculate_mao, ValidationError, ValuationInputs};
use super::matching::filter_eligible;
use super::providers::{CompSource, ConditionAssessor, Geocoder, NeighborhoodSource, ProviderError};
use super::recommendation::{recommend, RecommendationView};
use super::repository::{
    AnalysisRepository, AnalysisResult, CompRepository, PropertyRepository, RepositoryError,
};
use super::scoring::{score_comps, zero_scores, ScoredComp};
use super::search::{build_search_params, SearchLadder, SearchParams};

/// Caller bugs caught before the pipeline runs. Data sparsity is never a
/// contract violation.
#[derive(Debug, thiserror::Error)]
pub enum ContractViolation {
    #[error("subject square footage must be positive")]
    ZeroSquareFootage,
    #[error("subject asking price must be finite and non-negative (found {found})")]
    InvalidAskingPrice { found: f64 },
    #[error("subject coordinates are out of range")]
    InvalidCoordinates,
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("comp acquisition failed: {0}")]
    Acquisition(#[source] ProviderError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Unified persistence seam for the service: subject, comp, and analysis
/// storage backed by one implementation.
pub trait AnalysisStore: PropertyRepository + CompRepository + AnalysisRepository {}

impl<T: PropertyRepository + CompRepository + AnalysisRepository> AnalysisStore for T {}

/// How many comps the ARV estimator is fed; more dilute the evidence.
const ARV_COMP_LIMIT: usize = 5;

/// Service composing the collaborators into the full valuation pipeline.
/// Every invocation is a pure recomputation; results upsert over any prior
/// analysis of the same subject.
pub struct AnalysisService<G, S, A, N, R> {
    geocoder: Arc<G>,
    comp_source: Arc<S>,
    assessor: Arc<A>,
    neighborhoods: Arc<N>,
    store: Arc<R>,
    settings: EngineSettings,
}

impl<G, S, A, N, R> AnalysisService<G, S, A, N, R>
where
    G: Geocoder + 'static,
    S: CompSource + 'static,
    A: ConditionAssessor + 'static,
    N: NeighborhoodSource + 'static,
    R: AnalysisStore + 'static,
{
    pub fn new(
        geocoder: Arc<G>,
        comp_source: Arc<S>,
        assessor: Arc<A>,
        neighborhoods: Arc<N>,
        store: Arc<R>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            geocoder,
            comp_source,
            assessor,
            neighborhoods,
            store,
            settings,
        }
    }

    /// Run the full pipeline for one subject property and persist the
    /// outcome. A subject that yields no usable ARV still produces a
    /// result carrying the scored comp set for manual review.
    pub fn analyze(
        &self,
        subject: &SubjectProperty,
        inputs: &ValuationInputs,
        as_of: NaiveDate,
    ) -> Result<AnalysisResult, AnalysisError> {
        validate_subject(subject)?;
        inputs.validate()?;

        let area = self.classify_area(subject);
        let params = build_search_params(area, subject.sqft);

        let pool = self.acquire_comps(subject, &params, as_of)?;
        info!(
            subject = %subject.id.0,
            area = area.label(),
            pool = pool.len(),
            "comp acquisition complete"
        );

        let outcome = filter_eligible(subject, pool, &params.criteria);
        let filtered_out = outcome.filtered_out;

        let mut scored = score_comps(subject, &outcome.comps, as_of);
        if filtered_out {
            scored = zero_scores(scored);
        }

        let inputs = self.with_estimated_repairs(subject, inputs);

        let used: Vec<ScoredComp> = scored.iter().take(ARV_COMP_LIMIT).cloned().collect();
        let estimate = estimate_arv(subject, &used);

        let mao = calculate_mao(
            estimate.as_ref().map(|estimate| estimate.arv),
            &inputs,
        )?;

        let (deal_score, recommendation) = match &estimate {
            Some(estimate) => {
                let rating = self.neighborhood_rating(subject);
                let ctx = DealContext::for_subject(
                    subject,
                    estimate.arv,
                    inputs.estimated_repairs,
                    area,
                    rating,
                    as_of,
                );
                let breakdown = compose_deal_score(&ctx, &scored);
                let view = RecommendationView::from(recommend(breakdown.composite));
                (Some(breakdown), Some(view))
            }
            None => (None, None),
        };

        let confidence = estimate
            .as_ref()
            .map(|estimate| estimate_confidence(&scored, estimate))
            .unwrap_or(0.0);

        let result = AnalysisResult {
            subject_id: subject.id.clone(),
            arv: estimate.as_ref().map(|estimate| estimate.arv),
            arv_method: estimate.as_ref().map(|estimate| estimate.method),
            comps: scored,
            comps_filtered_out: filtered_out,
            mao,
            deal_score,
            recommendation,
            confidence,
            analyzed_on: as_of,
        };

        self.store.upsert_subject(subject.clone())?;
        self.store
            .replace_for_subject(&subject.id, &result.comps)?;
        let stored = self.store.upsert_analysis(result)?;

        Ok(stored)
    }

    /// Classify the subject's area from geocoder place types; a geocoding
    /// failure degrades to suburban rather than aborting the analysis.
    fn classify_area(&self, subject: &SubjectProperty) -> AreaType {
        match self.geocoder.geocode(&subject.address) {
            Ok(geocoded) => AreaType::from_place_types(&geocoded.place_types),
            Err(err) => {
                warn!(error = %err, "geocoding failed; defaulting area type to suburban");
                AreaType::Suburban
            }
        }
    }

    /// Acquire candidate records through the bounded search ladder,
    /// normalize them, and keep deduplicated sold comps inside the current
    /// window.
    fn acquire_comps(
        &self,
        subject: &SubjectProperty,
        params: &SearchParams,
        as_of: NaiveDate,
    ) -> Result<Vec<ComparableSale>, AnalysisError> {
        let mut ladder = SearchLadder::new(params, self.settings.max_search_expansions);
        let mut pool: BTreeMap<(String, String), ComparableSale> = BTreeMap::new();

        loop {
            let window = ladder.current();
            let records = self
                .comp_source
                .search(subject, &window)
                .map_err(AnalysisError::Acquisition)?;

            for record in &records {
                let Some(mut comp) = adapter::normalize_record(subject, record) else {
                    continue;
                };

                if !comp.listing_status.is_sold() {
                    continue;
                }
                if comp.distance_miles > window.radius_miles {
                    continue;
                }
                match comp.months_since_sale(as_of) {
                    Some(months) if months <= f64::from(window.window_months) => {}
                    _ => continue,
                }

                if comp.condition.is_none() && !record.image_urls.is_empty() {
                    comp.condition = self.assess_condition(&comp.address, &record.image_urls);
                }

                pool.entry((comp.data_source.clone(), comp.source_id.clone()))
                    .or_insert(comp);
            }

            if pool.len() >= self.settings.comp_pool_target {
                break;
            }
            if ladder.expand().is_none() {
                debug!(
                    found = pool.len(),
                    steps = ladder.steps_taken(),
                    "search ladder exhausted; keeping what was found"
                );
                break;
            }
        }

        Ok(pool.into_values().collect())
    }

    fn assess_condition(
        &self,
        address: &str,
        image_urls: &[String],
    ) -> Option<ConditionSummary> {
        match self.assessor.assess(address, image_urls) {
            Ok(assessment) => assessment.map(Into::into),
            Err(err) => {
                warn!(error = %err, "condition assessment failed; using neutral defaults");
                None
            }
        }
    }

    /// Substitute a repair estimate from the subject's condition class
    /// when the caller supplied none.
    fn with_estimated_repairs(
        &self,
        subject: &SubjectProperty,
        inputs: &ValuationInputs,
    ) -> ValuationInputs {
        if inputs.estimated_repairs > 0.0 {
            return inputs.clone();
        }

        let repair_class = subject
            .condition
            .as_ref()
            .and_then(|summary| summary.repair_class);

        match repair_class {
            Some(class) => {
                let estimated = class.repair_rate_per_sqft() * f64::from(subject.sqft);
                info!(
                    repair_class = class.label(),
                    estimated, "auto-estimated repairs from condition assessment"
                );
                ValuationInputs {
                    estimated_repairs: estimated,
                    ..inputs.clone()
                }
            }
            None => inputs.clone(),
        }
    }

    fn neighborhood_rating(&self, subject: &SubjectProperty) -> Option<f64> {
        match self.neighborhoods.rating(&subject.coordinates) {
            Ok(rating) => rating.score(),
            Err(err) => {
                warn!(error = %err, "neighborhood rating lookup failed; using area proxy");
                None
            }
        }
    }
}

fn validate_subject(subject: &SubjectProperty) -> Result<(), ContractViolation> {
    if subject.sqft == 0 {
        return Err(ContractViolation::ZeroSquareFootage);
    }
    if !subject.asking_price.is_finite() || subject.asking_price < 0.0 {
        return Err(ContractViolation::InvalidAskingPrice {
            found: subject.asking_price,
        });
    }
    if !subject.coordinates.is_valid() {
        return Err(ContractViolation::InvalidCoordinates);
    }
    Ok(())
}
