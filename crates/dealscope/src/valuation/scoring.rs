use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ComparableSale, SubjectProperty};

/// Relative weights of the six comp sub-scores; must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub distance: f64,
    pub recency: f64,
    pub sqft: f64,
    pub bed_bath: f64,
    pub year_built: f64,
    pub condition: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.distance + self.recency + self.sqft + self.bed_bath + self.year_built + self.condition
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.25,
            recency: 0.20,
            sqft: 0.20,
            bed_bath: 0.15,
            year_built: 0.10,
            condition: 0.10,
        }
    }
}

/// Per-factor sub-scores, each 0–100, kept for transparent audits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompScoreBreakdown {
    pub distance: f64,
    pub recency: f64,
    pub sqft: f64,
    pub bed_bath: f64,
    pub year_built: f64,
    pub condition: f64,
}

/// A comparable sale together with its scoring evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredComp {
    pub comp: ComparableSale,
    pub breakdown: CompScoreBreakdown,
    pub comp_score: f64,
}

/// Score every comp in the pool against the subject. The distance factor
/// is pool-relative, so scores are only comparable within one invocation.
/// Output is ordered descending by composite score with ties broken by
/// ascending distance so downstream consumption is deterministic.
pub fn score_comps(
    subject: &SubjectProperty,
    comps: &[ComparableSale],
    as_of: NaiveDate,
) -> Vec<ScoredComp> {
    let weights = ScoreWeights::default();
    let max_distance = comps
        .iter()
        .map(|comp| comp.distance_miles)
        .fold(0.0_f64, f64::max);

    let mut scored: Vec<ScoredComp> = comps
        .iter()
        .map(|comp| {
            let breakdown = CompScoreBreakdown {
                distance: distance_score(comp.distance_miles, max_distance),
                recency: recency_score(comp, as_of),
                sqft: sqft_score(subject, comp),
                bed_bath: bed_bath_score(subject, comp),
                year_built: year_built_score(subject, comp),
                condition: condition_score(comp),
            };
            let comp_score = composite(&breakdown, &weights);

            ScoredComp {
                comp: comp.clone(),
                breakdown,
                comp_score,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.comp_score
            .total_cmp(&a.comp_score)
            .then(a.comp.distance_miles.total_cmp(&b.comp.distance_miles))
    });

    scored
}

/// Force every comp score to zero while keeping the breakdown evidence;
/// used when the eligibility gate fell back to the unfiltered pool.
pub fn zero_scores(mut scored: Vec<ScoredComp>) -> Vec<ScoredComp> {
    for entry in &mut scored {
        entry.comp_score = 0.0;
    }
    scored
}

fn composite(breakdown: &CompScoreBreakdown, weights: &ScoreWeights) -> f64 {
    let total = breakdown.distance * weights.distance
        + breakdown.recency * weights.recency
        + breakdown.sqft * weights.sqft
        + breakdown.bed_bath * weights.bed_bath
        + breakdown.year_built * weights.year_built
        + breakdown.condition * weights.condition;
    total.clamp(0.0, 100.0)
}

/// Pool-relative: a comp at zero distance scores 100, the farthest comp in
/// the pool scores 0.
fn distance_score(distance_miles: f64, max_distance: f64) -> f64 {
    if max_distance <= 0.0 {
        return 100.0;
    }
    ((1.0 - distance_miles / max_distance) * 100.0).clamp(0.0, 100.0)
}

/// Linear decay, zero by 10 months. A comp without a sale date is treated
/// as stale rather than excluded.
fn recency_score(comp: &ComparableSale, as_of: NaiveDate) -> f64 {
    match comp.months_since_sale(as_of) {
        Some(months) => (100.0 - months * 10.0).max(0.0),
        None => 0.0,
    }
}

/// A 20% square-footage difference already drives this factor to zero,
/// mirroring the tight tolerance used for filtering.
fn sqft_score(subject: &SubjectProperty, comp: &ComparableSale) -> f64 {
    if subject.sqft == 0 || comp.sqft == 0 {
        return 0.0;
    }
    let relative =
        (f64::from(comp.sqft) - f64::from(subject.sqft)).abs() / f64::from(subject.sqft);
    (100.0 - relative * 500.0).max(0.0)
}

fn bed_bath_score(subject: &SubjectProperty, comp: &ComparableSale) -> f64 {
    let bed_diff = f64::from((i16::from(comp.beds) - i16::from(subject.beds)).unsigned_abs());
    let bath_diff = f64::from((comp.baths - subject.baths).abs());
    (100.0 - (bed_diff + bath_diff) * 25.0).max(0.0)
}

fn year_built_score(subject: &SubjectProperty, comp: &ComparableSale) -> f64 {
    match (subject.year_built, comp.year_built) {
        (Some(subject_year), Some(comp_year)) => {
            let diff = f64::from((i32::from(comp_year) - i32::from(subject_year)).abs());
            (100.0 - diff * 2.0).max(0.0)
        }
        // Without both years there is nothing to compare; stay neutral.
        _ => 50.0,
    }
}

/// Base score from the 1–5 rating, scaled by a photo-evidence confidence
/// multiplier in [0.8, 1.0]. Comps with verified condition data are
/// trusted slightly more than ones defaulted to "average".
fn condition_score(comp: &ComparableSale) -> f64 {
    let rating = f64::from(comp.condition_rating());
    let base = (rating / 5.0) * 100.0;

    let photos = comp
        .condition
        .as_ref()
        .map(|summary| summary.photo_count)
        .unwrap_or(0);
    let multiplier = 0.8 + 0.2 * (photos.min(5) as f64 / 5.0);

    (base * multiplier).min(100.0)
}
