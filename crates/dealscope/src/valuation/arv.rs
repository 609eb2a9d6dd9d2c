use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::SubjectProperty;
use super::scoring::ScoredComp;

/// How the final ARV aggregate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArvMethod {
    Weighted,
    Average,
}

impl ArvMethod {
    pub const fn label(self) -> &'static str {
        match self {
            ArvMethod::Weighted => "weighted",
            ArvMethod::Average => "average",
        }
    }
}

/// One comp's contribution to the ARV aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompContribution {
    pub source_id: String,
    pub adjusted_price: f64,
    pub weight: f64,
    /// True when the adjusted price fell outside the median band and was
    /// excluded from the aggregate.
    pub outlier: bool,
}

/// After-repair value estimate with its supporting evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArvEstimate {
    pub arv: f64,
    pub method: ArvMethod,
    pub contributions: Vec<CompContribution>,
}

impl ArvEstimate {
    pub fn used(&self) -> impl Iterator<Item = &CompContribution> {
        self.contributions
            .iter()
            .filter(|contribution| !contribution.outlier)
    }
}

/// Maximum condition adjustment applied to a comp price, either direction.
const CONDITION_ADJUSTMENT_CLAMP: f64 = 0.15;

/// Adjustment per point of condition-rating difference.
const CONDITION_ADJUSTMENT_PER_POINT: f64 = 0.05;

/// Adjusted prices outside this band around the pool median are rejected.
const OUTLIER_BAND: f64 = 0.20;

/// Estimate the subject's after-repair value from the supplied comps.
///
/// Prices are size-adjusted to the subject, condition-adjusted within
/// ±15%, outlier-rejected around the median, and aggregated with each
/// comp's score as its weight. Returns `None` only when no comp yields a
/// usable adjusted price; sparse data is the caller's concern, not an
/// error.
pub fn estimate_arv(subject: &SubjectProperty, comps: &[ScoredComp]) -> Option<ArvEstimate> {
    let mut contributions: Vec<CompContribution> = comps
        .iter()
        .filter_map(|scored| {
            let adjusted = adjusted_price(subject, scored)?;
            // Unscored comps still contribute; weight defaults to 1.
            let weight = if scored.comp_score > 0.0 {
                scored.comp_score
            } else {
                1.0
            };
            Some(CompContribution {
                source_id: scored.comp.source_id.clone(),
                adjusted_price: adjusted,
                weight,
                outlier: false,
            })
        })
        .collect();

    if contributions.is_empty() {
        return None;
    }

    let prices: Vec<f64> = contributions
        .iter()
        .map(|contribution| contribution.adjusted_price)
        .collect();
    let median = median(&prices);
    let lower = median * (1.0 - OUTLIER_BAND);
    let upper = median * (1.0 + OUTLIER_BAND);

    for contribution in &mut contributions {
        contribution.outlier =
            contribution.adjusted_price < lower || contribution.adjusted_price > upper;
    }

    // Never return a valuation derived from zero comps if at least one had
    // a usable price.
    if contributions.iter().all(|contribution| contribution.outlier) {
        debug!(median, "outlier rejection emptied the comp set; keeping unfiltered prices");
        for contribution in &mut contributions {
            contribution.outlier = false;
        }
    }

    let mut weighted_total = 0.0;
    let mut weight_total = 0.0;
    let mut plain_total = 0.0;
    let mut kept = 0usize;
    for contribution in contributions.iter().filter(|c| !c.outlier) {
        weighted_total += contribution.adjusted_price * contribution.weight;
        weight_total += contribution.weight;
        plain_total += contribution.adjusted_price;
        kept += 1;
    }

    let weighted = if weight_total > 0.0 {
        weighted_total / weight_total
    } else {
        0.0
    };

    let (arv, method) = if weighted > 0.0 {
        (weighted, ArvMethod::Weighted)
    } else {
        (plain_total / kept as f64, ArvMethod::Average)
    };

    Some(ArvEstimate {
        arv: arv.round(),
        method,
        contributions,
    })
}

/// Size-adjust, then condition-adjust one comp's sale price. A comp in
/// better condition than the subject is discounted; the subject would need
/// matching work to justify that comp's price.
fn adjusted_price(subject: &SubjectProperty, scored: &ScoredComp) -> Option<f64> {
    let comp = &scored.comp;
    if comp.sale_price <= 0.0 {
        return None;
    }

    let size_adjusted = if comp.sqft > 0 && subject.sqft > 0 {
        comp.sale_price * (f64::from(subject.sqft) / f64::from(comp.sqft))
    } else {
        comp.sale_price
    };

    let rating_gap =
        f64::from(comp.condition_rating()) - f64::from(subject.condition_rating());
    let adjustment = (rating_gap * CONDITION_ADJUSTMENT_PER_POINT)
        .clamp(-CONDITION_ADJUSTMENT_CLAMP, CONDITION_ADJUSTMENT_CLAMP);

    Some(size_adjusted * (1.0 - adjustment))
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Confidence in the valuation, 0–100: comp-count coverage (40%), mean
/// comp score (40%), and adjusted-price consistency (20%).
pub fn estimate_confidence(comps: &[ScoredComp], estimate: &ArvEstimate) -> f64 {
    let used: Vec<&CompContribution> = estimate.used().collect();
    if used.is_empty() {
        return 0.0;
    }

    let coverage = (used.len().min(5) as f64 / 5.0) * 100.0;

    let mean_score = if comps.is_empty() {
        0.0
    } else {
        comps.iter().map(|scored| scored.comp_score).sum::<f64>() / comps.len() as f64
    };

    let prices: Vec<f64> = used
        .iter()
        .map(|contribution| contribution.adjusted_price)
        .collect();
    let consistency = price_consistency(&prices);

    (coverage * 0.4 + mean_score * 0.4 + consistency * 0.2).clamp(0.0, 100.0)
}

/// 100 when every kept price agrees; decays with the relative range of the
/// kept prices (a 20% spread around the median scores 50).
fn price_consistency(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 100.0;
    }
    let median = median(prices);
    if median <= 0.0 {
        return 0.0;
    }
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let relative_range = (max - min) / median;
    (100.0 - relative_range * 250.0).max(0.0)
}
