use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use dealscope::listings::RawListingRecord;
use dealscope::valuation::{
    AnalysisRepository, AnalysisResult, AreaType, CompRepository, CompSource, ConditionAssessment,
    ConditionAssessor, Coordinates, GeocodedAddress, Geocoder, NeighborhoodRating,
    NeighborhoodSource, PropertyId, PropertyRepository, ProviderError, RepositoryError,
    ScoredComp, SearchWindow, SubjectProperty,
};

/// Offline geocoder: echoes the subject's coordinates and answers with
/// place types matching the operator-selected area type.
pub(crate) struct FixtureGeocoder {
    area: AreaType,
}

impl FixtureGeocoder {
    pub(crate) fn for_area(area: AreaType) -> Self {
        Self { area }
    }
}

impl Geocoder for FixtureGeocoder {
    fn geocode(&self, address: &str) -> Result<GeocodedAddress, ProviderError> {
        let place_types = match self.area {
            AreaType::Urban => vec!["neighborhood".to_string(), "political".to_string()],
            AreaType::Suburban => vec!["locality".to_string(), "political".to_string()],
            AreaType::Rural => vec!["administrative_area_level_2".to_string()],
        };

        Ok(GeocodedAddress {
            formatted_address: address.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            place_types,
        })
    }
}

/// Acquisition source backed by pre-loaded listing records.
pub(crate) struct FixtureCompSource {
    records: Vec<RawListingRecord>,
}

impl FixtureCompSource {
    pub(crate) fn new(records: Vec<RawListingRecord>) -> Self {
        Self { records }
    }
}

impl CompSource for FixtureCompSource {
    fn search(
        &self,
        _subject: &SubjectProperty,
        _window: &SearchWindow,
    ) -> Result<Vec<RawListingRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}

/// Condition assessor stand-in; the CLI has no imagery pipeline, so every
/// comp keeps its neutral defaults.
pub(crate) struct NoopAssessor;

impl ConditionAssessor for NoopAssessor {
    fn assess(
        &self,
        _address: &str,
        _image_urls: &[String],
    ) -> Result<Option<ConditionAssessment>, ProviderError> {
        Ok(None)
    }
}

pub(crate) struct FixtureNeighborhood(pub(crate) Option<f64>);

impl NeighborhoodSource for FixtureNeighborhood {
    fn rating(&self, _coordinates: &Coordinates) -> Result<NeighborhoodRating, ProviderError> {
        Ok(match self.0 {
            Some(score) => NeighborhoodRating::Score(score),
            None => NeighborhoodRating::Unavailable,
        })
    }
}

/// Single-process store backing the CLI run.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    subjects: Mutex<HashMap<PropertyId, SubjectProperty>>,
    comps: Mutex<HashMap<PropertyId, Vec<ScoredComp>>>,
    analyses: Mutex<HashMap<PropertyId, AnalysisResult>>,
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

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_area(raw: &str) -> Result<AreaType, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "urban" => Ok(AreaType::Urban),
        "suburban" => Ok(AreaType::Suburban),
        "rural" => Ok(AreaType::Rural),
        other => Err(format!(
            "unknown area type '{other}' (expected urban, suburban, or rural)"
        )),
    }
}
