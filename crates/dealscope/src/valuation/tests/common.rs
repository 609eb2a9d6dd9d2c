use chrono::{Duration, NaiveDate};

use crate::valuation::domain::{
    ComparableSale, ConditionSummary, Coordinates, ListingStatus, PropertyCategory, PropertyId,
    RepairClass, SubjectProperty,
};
use crate::valuation::scoring::{CompScoreBreakdown, ScoredComp};

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn subject() -> SubjectProperty {
    SubjectProperty {
        id: PropertyId("prop-001".to_string()),
        address: "1208 Maplewood Dr, Des Moines, IA 50309".to_string(),
        coordinates: Coordinates {
            latitude: 41.5868,
            longitude: -93.6250,
        },
        beds: 3,
        baths: 2.0,
        sqft: 1500,
        lot_sqft: Some(7500),
        year_built: Some(1998),
        category: PropertyCategory::SingleFamily,
        asking_price: 240_000.0,
        days_on_market: Some(25),
        condition: None,
    }
}

/// A well-matched sold comp a few blocks from the subject.
pub(super) fn comp(source_id: &str) -> ComparableSale {
    ComparableSale {
        source_id: source_id.to_string(),
        data_source: "mls".to_string(),
        address: format!("{source_id} Crestview Ave, Des Moines, IA"),
        coordinates: Coordinates {
            latitude: 41.5900,
            longitude: -93.6200,
        },
        beds: 3,
        baths: 2.0,
        sqft: 1500,
        lot_sqft: Some(7200),
        year_built: Some(1996),
        category: Some(PropertyCategory::SingleFamily),
        sale_date: Some(as_of() - Duration::days(60)),
        sale_price: 300_000.0,
        listing_status: ListingStatus::Sold,
        days_on_market: Some(30),
        distance_miles: 0.4,
        condition: None,
    }
}

pub(super) fn condition(rating: u8, photo_count: u32) -> ConditionSummary {
    ConditionSummary {
        rating,
        renovation_indicators: Vec::new(),
        damage_flags: Vec::new(),
        overall_score: None,
        repair_class: Some(RepairClass::Medium),
        photo_count,
    }
}

/// Wrap a comp with a flat score; breakdown values mirror the composite so
/// assertions stay readable.
pub(super) fn scored(comp: ComparableSale, score: f64) -> ScoredComp {
    ScoredComp {
        comp,
        breakdown: CompScoreBreakdown {
            distance: score,
            recency: score,
            sqft: score,
            bed_bath: score,
            year_built: score,
            condition: score,
        },
        comp_score: score,
    }
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
