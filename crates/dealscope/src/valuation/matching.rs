use serde::Serialize;
use tracing::debug;

use super::domain::{ComparableSale, SubjectProperty};
use super::search::MatchingCriteria;

/// Result of the eligibility gate. When every candidate fails the gate the
/// original pool is returned with `filtered_out` set so downstream
/// consumers can still surface comps to a human reviewer instead of an
/// empty result.
#[derive(Debug, Clone, Serialize)]
pub struct FilterOutcome {
    pub comps: Vec<ComparableSale>,
    pub filtered_out: bool,
}

/// Hard gate deciding which candidates are eligible for scoring.
pub fn filter_eligible(
    subject: &SubjectProperty,
    comps: Vec<ComparableSale>,
    criteria: &MatchingCriteria,
) -> FilterOutcome {
    let eligible: Vec<ComparableSale> = comps
        .iter()
        .filter(|comp| is_eligible(subject, comp, criteria))
        .cloned()
        .collect();

    if eligible.is_empty() && !comps.is_empty() {
        debug!(
            candidates = comps.len(),
            "matching filter eliminated every candidate; falling back to unfiltered pool"
        );
        return FilterOutcome {
            comps,
            filtered_out: true,
        };
    }

    FilterOutcome {
        comps: eligible,
        filtered_out: false,
    }
}

/// All criteria must pass. Missing data never disqualifies on its own;
/// each check only applies when both sides carry a usable value.
pub fn is_eligible(
    subject: &SubjectProperty,
    comp: &ComparableSale,
    criteria: &MatchingCriteria,
) -> bool {
    match comp.category {
        Some(category) if category == subject.category => {}
        _ => return false,
    }

    let bed_diff = (i16::from(comp.beds) - i16::from(subject.beds)).unsigned_abs();
    if bed_diff > u16::from(criteria.bed_tolerance) {
        return false;
    }

    if (comp.baths - subject.baths).abs() > criteria.bath_tolerance {
        return false;
    }

    if subject.sqft > 0 && comp.sqft > 0 {
        let relative = (f64::from(comp.sqft) - f64::from(subject.sqft)).abs()
            / f64::from(subject.sqft);
        if relative > criteria.sqft_tolerance {
            return false;
        }
    }

    if let (Some(tolerance), Some(subject_lot), Some(comp_lot)) =
        (criteria.lot_tolerance, subject.lot_sqft, comp.lot_sqft)
    {
        if subject_lot > 0 && comp_lot > 0 {
            let relative =
                (f64::from(comp_lot) - f64::from(subject_lot)).abs() / f64::from(subject_lot);
            if relative > tolerance {
                return false;
            }
        }
    }

    if !subject.is_older_stock() {
        if let (Some(subject_year), Some(comp_year)) = (subject.year_built, comp.year_built) {
            let diff = (i32::from(comp_year) - i32::from(subject_year)).unsigned_abs();
            if diff > u32::from(criteria.year_built_tolerance) {
                return false;
            }
        }
    }

    true
}
