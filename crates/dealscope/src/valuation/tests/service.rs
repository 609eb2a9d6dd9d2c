use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::common::*;
use crate::config::EngineSettings;
use crate::listings::RawListingRecord;
use crate::valuation::domain::{
    ConditionSummary, Coordinates, PropertyId, RepairClass, SubjectProperty,
};
use crate::valuation::mao::{MaoRule, ValuationInputs};
use crate::valuation::providers::{
    CompSource, ConditionAssessment, ConditionAssessor, GeocodedAddress, Geocoder,
    NeighborhoodRating, NeighborhoodSource, ProviderError,
};
use crate::valuation::repository::{
    AnalysisRepository, AnalysisResult, CompRepository, PropertyRepository, RepositoryError,
};
use crate::valuation::scoring::ScoredComp;
use crate::valuation::search::SearchWindow;
use crate::valuation::service::{AnalysisError, AnalysisService};

struct StaticGeocoder;

impl Geocoder for StaticGeocoder {
    fn geocode(&self, address: &str) -> Result<GeocodedAddress, ProviderError> {
        Ok(GeocodedAddress {
            formatted_address: address.to_string(),
            latitude: 41.5868,
            longitude: -93.625,
            place_types: vec!["locality".to_string(), "political".to_string()],
        })
    }
}

struct StaticCompSource {
    records: Vec<RawListingRecord>,
}

impl CompSource for StaticCompSource {
    fn search(
        &self,
        _subject: &SubjectProperty,
        _window: &SearchWindow,
    ) -> Result<Vec<RawListingRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}

struct FailingCompSource;

impl CompSource for FailingCompSource {
    fn search(
        &self,
        _subject: &SubjectProperty,
        _window: &SearchWindow,
    ) -> Result<Vec<RawListingRecord>, ProviderError> {
        Err(ProviderError::Unavailable("listing feed offline".to_string()))
    }
}

struct NoopAssessor;

impl ConditionAssessor for NoopAssessor {
    fn assess(
        &self,
        _address: &str,
        _image_urls: &[String],
    ) -> Result<Option<ConditionAssessment>, ProviderError> {
        Ok(None)
    }
}

struct StaticNeighborhood(Option<f64>);

impl NeighborhoodSource for StaticNeighborhood {
    fn rating(&self, _coordinates: &Coordinates) -> Result<NeighborhoodRating, ProviderError> {
        Ok(match self.0 {
            Some(score) => NeighborhoodRating::Score(score),
            None => NeighborhoodRating::Unavailable,
        })
    }
}

#[derive(Default)]
struct InMemoryStore {
    subjects: Mutex<HashMap<PropertyId, SubjectProperty>>,
    comps: Mutex<HashMap<PropertyId, Vec<ScoredComp>>>,
    analyses: Mutex<HashMap<PropertyId, AnalysisResult>>,
}

impl InMemoryStore {
    fn analysis_count(&self) -> usize {
        self.analyses.lock().expect("analysis mutex poisoned").len()
    }
}

impl PropertyRepository for InMemoryStore {
    fn upsert_subject(&self, subject: SubjectProperty) -> Result<(), RepositoryError> {
        self.subjects
            .lock()
            .expect("subject mutex poisoned")
            .insert(subject.id.clone(), subject);
        Ok(())
    }

    fn fetch_subject(&self, id: &PropertyId) -> Result<Option<SubjectProperty>, RepositoryError> {
        Ok(self
            .subjects
            .lock()
            .expect("subject mutex poisoned")
            .get(id)
            .cloned())
    }
}

impl CompRepository for InMemoryStore {
    fn replace_for_subject(
        &self,
        subject_id: &PropertyId,
        comps: &[ScoredComp],
    ) -> Result<(), RepositoryError> {
        self.comps
            .lock()
            .expect("comp mutex poisoned")
            .insert(subject_id.clone(), comps.to_vec());
        Ok(())
    }

    fn fetch_for_subject(
        &self,
        subject_id: &PropertyId,
    ) -> Result<Vec<ScoredComp>, RepositoryError> {
        Ok(self
            .comps
            .lock()
            .expect("comp mutex poisoned")
            .get(subject_id)
            .cloned()
            .unwrap_or_default())
    }
}

impl AnalysisRepository for InMemoryStore {
    fn upsert_analysis(&self, result: AnalysisResult) -> Result<AnalysisResult, RepositoryError> {
        self.analyses
            .lock()
            .expect("analysis mutex poisoned")
            .insert(result.subject_id.clone(), result.clone());
        Ok(result)
    }

    fn fetch_analysis(
        &self,
        subject_id: &PropertyId,
    ) -> Result<Option<AnalysisResult>, RepositoryError> {
        Ok(self
            .analyses
            .lock()
            .expect("analysis mutex poisoned")
            .get(subject_id)
            .cloned())
    }
}

fn record(id: &str, sale_price: f64, sqft: f64) -> RawListingRecord {
    RawListingRecord {
        id: Some(id.to_string()),
        address: Some(format!("{id} Crestview Ave, Des Moines, IA")),
        latitude: Some(41.59),
        longitude: Some(-93.62),
        beds: Some(3.0),
        baths: Some(2.0),
        sqft: Some(sqft),
        lot_size: Some(7200.0),
        year_built: Some(1995.0),
        property_type: Some("Single Family".to_string()),
        sale_price: Some(sale_price),
        sale_date: Some("2025-05-01".to_string()),
        listing_status: Some("Sold".to_string()),
        days_on_market: Some(28.0),
        ..RawListingRecord::default()
    }
}

fn inputs() -> ValuationInputs {
    ValuationInputs {
        estimated_repairs: 10_000.0,
        holding_cost: 2_000.0,
        closing_cost: 3_000.0,
        wholesale_fee: 0.0,
        mao_rule: MaoRule::Percent70,
        mao_rule_percent: None,
    }
}

fn service_with(
    records: Vec<RawListingRecord>,
    store: Arc<InMemoryStore>,
) -> AnalysisService<StaticGeocoder, StaticCompSource, NoopAssessor, StaticNeighborhood, InMemoryStore>
{
    AnalysisService::new(
        Arc::new(StaticGeocoder),
        Arc::new(StaticCompSource { records }),
        Arc::new(NoopAssessor),
        Arc::new(StaticNeighborhood(None)),
        store,
        EngineSettings::default(),
    )
}

#[test]
fn analyze_produces_and_persists_a_full_result() {
    let store = Arc::new(InMemoryStore::default());
    let service = service_with(
        vec![
            record("c1", 295_000.0, 1500.0),
            record("c2", 305_000.0, 1500.0),
            record("c3", 300_000.0, 1500.0),
        ],
        Arc::clone(&store),
    );
    let subject = subject();

    let result = service
        .analyze(&subject, &inputs(), as_of())
        .expect("analysis succeeds");

    let arv = result.arv.expect("arv present");
    assert!((294_000.0..=306_000.0).contains(&arv), "arv was {arv}");
    assert_eq!(result.comps.len(), 3);
    assert!(!result.comps_filtered_out);
    assert!(result.mao.is_some());
    assert!(result.deal_score.is_some());
    assert!(result.recommendation.is_some());
    assert!(result.confidence > 0.0);

    let stored = store
        .fetch_analysis(&subject.id)
        .expect("fetch succeeds")
        .expect("analysis stored");
    assert_eq!(stored, result);
    assert!(store
        .fetch_subject(&subject.id)
        .expect("fetch succeeds")
        .is_some());
    assert_eq!(
        store
            .fetch_for_subject(&subject.id)
            .expect("fetch succeeds")
            .len(),
        3
    );
}

#[test]
fn recomputation_replaces_the_analysis_instead_of_accumulating() {
    let store = Arc::new(InMemoryStore::default());
    let service = service_with(vec![record("c1", 300_000.0, 1500.0)], Arc::clone(&store));
    let subject = subject();

    service
        .analyze(&subject, &inputs(), as_of())
        .expect("first analysis");
    service
        .analyze(&subject, &inputs(), as_of())
        .expect("second analysis");

    assert_eq!(store.analysis_count(), 1);
}

#[test]
fn zero_square_footage_is_a_contract_violation() {
    let store = Arc::new(InMemoryStore::default());
    let service = service_with(Vec::new(), Arc::clone(&store));
    let mut subject = subject();
    subject.sqft = 0;

    let error = service
        .analyze(&subject, &inputs(), as_of())
        .expect_err("rejected");
    match error {
        AnalysisError::Contract(_) => {}
        other => panic!("expected contract violation, got {other:?}"),
    }
    assert_eq!(store.analysis_count(), 0);
}

#[test]
fn invalid_valuation_inputs_are_rejected_before_the_pipeline() {
    let store = Arc::new(InMemoryStore::default());
    let service = service_with(Vec::new(), Arc::clone(&store));
    let mut bad_inputs = inputs();
    bad_inputs.closing_cost = -5.0;

    let error = service
        .analyze(&subject(), &bad_inputs, as_of())
        .expect_err("rejected");
    match error {
        AnalysisError::Validation(_) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn no_usable_comps_still_returns_a_partial_result() {
    let store = Arc::new(InMemoryStore::default());
    let service = service_with(Vec::new(), Arc::clone(&store));

    let result = service
        .analyze(&subject(), &inputs(), as_of())
        .expect("analysis succeeds");

    assert!(result.arv.is_none());
    assert!(result.mao.is_none());
    assert!(result.recommendation.is_none());
    assert!(result.comps.is_empty());
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn mismatched_pool_falls_back_with_zeroed_scores() {
    let store = Arc::new(InMemoryStore::default());
    let mut condos = vec![
        record("c1", 295_000.0, 1500.0),
        record("c2", 305_000.0, 1500.0),
    ];
    for raw in &mut condos {
        raw.property_type = Some("Condominium".to_string());
    }
    let service = service_with(condos, Arc::clone(&store));

    let result = service
        .analyze(&subject(), &inputs(), as_of())
        .expect("analysis succeeds");

    assert!(result.comps_filtered_out);
    assert_eq!(result.comps.len(), 2);
    assert!(result.comps.iter().all(|entry| entry.comp_score == 0.0));
    // The fallback pool still supports a valuation for manual review.
    assert!(result.arv.is_some());
}

#[test]
fn missing_repairs_are_estimated_from_the_condition_class() {
    let store = Arc::new(InMemoryStore::default());
    let service = service_with(vec![record("c1", 300_000.0, 1500.0)], Arc::clone(&store));
    let mut subject = subject();
    subject.condition = Some(ConditionSummary {
        rating: 2,
        renovation_indicators: vec!["dated kitchen".to_string()],
        damage_flags: Vec::new(),
        overall_score: Some(4.0),
        repair_class: Some(RepairClass::Heavy),
        photo_count: 12,
    });
    let mut no_repairs = inputs();
    no_repairs.estimated_repairs = 0.0;

    let result = service
        .analyze(&subject, &no_repairs, as_of())
        .expect("analysis succeeds");

    let mao = result.mao.expect("mao present");
    // Heavy repairs at $55/sqft over 1500 sqft, plus the other cost lines.
    assert_eq!(mao.total_fees, 55.0 * 1500.0 + 2_000.0 + 3_000.0);
}

#[test]
fn acquisition_failures_propagate() {
    let store = Arc::new(InMemoryStore::default());
    let service = AnalysisService::new(
        Arc::new(StaticGeocoder),
        Arc::new(FailingCompSource),
        Arc::new(NoopAssessor),
        Arc::new(StaticNeighborhood(None)),
        Arc::clone(&store),
        EngineSettings::default(),
    );

    let error = service
        .analyze(&subject(), &inputs(), as_of())
        .expect_err("acquisition error surfaces");
    match error {
        AnalysisError::Acquisition(_) => {}
        other => panic!("expected acquisition error, got {other:?}"),
    }
}
