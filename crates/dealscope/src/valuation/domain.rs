use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for subject properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Normalized property categories used for comp eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    SingleFamily,
    Condo,
    Duplex,
    MultiUnit,
    VacantLot,
    Manufactured,
}

impl PropertyCategory {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyCategory::SingleFamily => "single_family",
            PropertyCategory::Condo => "condo",
            PropertyCategory::Duplex => "duplex",
            PropertyCategory::MultiUnit => "multi_unit",
            PropertyCategory::VacantLot => "vacant_lot",
            PropertyCategory::Manufactured => "manufactured",
        }
    }

    /// Collapse free-form provider labels into a normalized category.
    pub fn parse(raw: &str) -> Option<Self> {
        let collapsed = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_', '/'], " ");
        let compact = collapsed.split_whitespace().collect::<Vec<_>>().join(" ");

        match compact.as_str() {
            "single family" | "single family residence" | "single family home" | "sfr"
            | "house" | "residential" | "detached" => Some(Self::SingleFamily),
            "condo" | "condominium" | "apartment" | "coop" | "co op" => Some(Self::Condo),
            "duplex" | "two family" | "semi detached" => Some(Self::Duplex),
            "multi unit" | "multi family" | "multifamily" | "triplex" | "fourplex"
            | "quadruplex" => Some(Self::MultiUnit),
            "vacant lot" | "vacant land" | "lot" | "land" => Some(Self::VacantLot),
            "manufactured" | "manufactured home" | "mobile home" | "mobile" | "modular" => {
                Some(Self::Manufactured)
            }
            _ => None,
        }
    }
}

/// Area classification derived from geocoder place types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    Urban,
    Suburban,
    Rural,
}

impl AreaType {
    pub const fn label(self) -> &'static str {
        match self {
            AreaType::Urban => "urban",
            AreaType::Suburban => "suburban",
            AreaType::Rural => "rural",
        }
    }
}

/// Geographic point; validated at the adapter boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() <= 90.0
            && self.longitude.abs() <= 180.0
    }
}

/// Listing lifecycle derived from status text plus sale evidence, never
/// trusted directly from the source record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Sold,
    Pending,
    Active,
    Unknown,
}

impl ListingStatus {
    pub const fn is_sold(self) -> bool {
        matches!(self, ListingStatus::Sold)
    }
}

/// Repair burden class reported by the condition-assessment collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairClass {
    Light,
    Medium,
    Heavy,
}

impl RepairClass {
    pub const fn label(self) -> &'static str {
        match self {
            RepairClass::Light => "light",
            RepairClass::Medium => "medium",
            RepairClass::Heavy => "heavy",
        }
    }

    /// Per-square-foot renovation allowance used when no explicit repair
    /// budget is supplied.
    pub const fn repair_rate_per_sqft(self) -> f64 {
        match self {
            RepairClass::Light => 15.0,
            RepairClass::Medium => 30.0,
            RepairClass::Heavy => 55.0,
        }
    }
}

/// Aggregated condition data for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    /// 1 (poor) through 5 (excellent).
    pub rating: u8,
    pub renovation_indicators: Vec<String>,
    pub damage_flags: Vec<String>,
    /// 1–10 aggregate across assessed photos, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair_class: Option<RepairClass>,
    /// Number of photos backing the assessment; zero means the rating was
    /// defaulted rather than observed.
    pub photo_count: u32,
}

impl ConditionSummary {
    pub fn has_photo_evidence(&self) -> bool {
        self.photo_count > 0
    }
}

/// The property being evaluated for acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectProperty {
    pub id: PropertyId,
    pub address: String,
    pub coordinates: Coordinates,
    pub beds: u8,
    pub baths: f32,
    pub sqft: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_sqft: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u16>,
    pub category: PropertyCategory,
    pub asking_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_on_market: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionSummary>,
}

impl SubjectProperty {
    /// Subjects built before 1980 skip year-built matching entirely; age
    /// stops discriminating for older housing stock.
    pub fn is_older_stock(&self) -> bool {
        matches!(self.year_built, Some(year) if year < 1980)
    }

    pub fn condition_rating(&self) -> u8 {
        self.condition
            .as_ref()
            .map(|summary| summary.rating)
            .unwrap_or(DEFAULT_CONDITION_RATING)
    }
}

/// Neutral rating substituted when no condition assessment exists.
pub const DEFAULT_CONDITION_RATING: u8 = 3;

/// Neutral days-on-market substituted when the metric is missing.
pub const DEFAULT_DAYS_ON_MARKET: u32 = 90;

/// A candidate recently-sold property used as pricing evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableSale {
    pub source_id: String,
    pub data_source: String,
    pub address: String,
    pub coordinates: Coordinates,
    pub beds: u8,
    pub baths: f32,
    pub sqft: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot_sqft: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<PropertyCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_date: Option<NaiveDate>,
    pub sale_price: f64,
    pub listing_status: ListingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_on_market: Option<u32>,
    /// Recomputed from coordinates at intake.
    pub distance_miles: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionSummary>,
}

impl ComparableSale {
    pub fn condition_rating(&self) -> u8 {
        self.condition
            .as_ref()
            .map(|summary| summary.rating)
            .unwrap_or(DEFAULT_CONDITION_RATING)
    }

    pub fn months_since_sale(&self, as_of: NaiveDate) -> Option<f64> {
        let sold = self.sale_date?;
        let days = (as_of - sold).num_days();
        if days < 0 {
            return Some(0.0);
        }
        Some(days as f64 / 30.44)
    }
}
