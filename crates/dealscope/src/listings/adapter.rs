use chrono::{DateTime, NaiveDate};

use crate::valuation::{
    haversine_miles, ComparableSale, Coordinates, ListingStatus, PropertyCategory, SubjectProperty,
};

use super::record::RawListingRecord;

/// Convert one raw upstream record into a `ComparableSale`, resolving each
/// concept through a fixed priority list and re-deriving everything the
/// engine refuses to trust: distance, sold status, and category. Returns
/// `None` when the record lacks an identity, coordinates, or any usable
/// price.
pub fn normalize_record(
    subject: &SubjectProperty,
    record: &RawListingRecord,
) -> Option<ComparableSale> {
    let address = record
        .address
        .as_deref()
        .or(record.formatted_address.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())?
        .to_string();

    let source_id = record
        .id
        .as_deref()
        .or(record.mls_id.as_deref())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| address.to_ascii_lowercase());

    let data_source = record
        .source
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("mls")
        .to_ascii_lowercase();

    let coordinates = Coordinates {
        latitude: record.latitude?,
        longitude: record.longitude?,
    };
    if !coordinates.is_valid() {
        return None;
    }

    // Price priority: confirmed sale price, then historical sale, then the
    // list price as a last resort.
    let sale_price = [record.sale_price, record.last_sold_price, record.list_price]
        .into_iter()
        .flatten()
        .find(|price| *price > 0.0)?;

    let sale_date = record
        .sale_date
        .as_deref()
        .and_then(parse_date)
        .or_else(|| record.last_sold_date.as_deref().and_then(parse_date));

    let had_sale_evidence =
        (record.sale_price.is_some() || record.last_sold_price.is_some()) && sale_date.is_some();
    let listing_status = derive_status(record.listing_status.as_deref(), had_sale_evidence);

    Some(ComparableSale {
        source_id,
        data_source,
        address,
        coordinates,
        beds: bounded_u8(record.beds),
        baths: record.baths.unwrap_or(0.0).max(0.0) as f32,
        sqft: bounded_u32(record.sqft),
        lot_sqft: record.lot_size.and_then(positive_u32),
        year_built: record.year_built.and_then(plausible_year),
        category: record
            .property_type
            .as_deref()
            .and_then(PropertyCategory::parse),
        sale_date,
        sale_price,
        listing_status,
        days_on_market: record.days_on_market.and_then(positive_u32),
        distance_miles: haversine_miles(&subject.coordinates, &coordinates),
        condition: None,
    })
}

/// Sold status comes from the status text when present, otherwise from
/// sale evidence on the record itself.
fn derive_status(raw: Option<&str>, had_sale_evidence: bool) -> ListingStatus {
    if let Some(status) = raw {
        let status = status.trim().to_ascii_lowercase();
        if status.contains("sold") || status.contains("closed") {
            return ListingStatus::Sold;
        }
        if status.contains("pending")
            || status.contains("contingent")
            || status.contains("under contract")
        {
            return ListingStatus::Pending;
        }
        if status.contains("active") || status.contains("for sale") {
            return ListingStatus::Active;
        }
    }

    if had_sale_evidence {
        ListingStatus::Sold
    } else {
        ListingStatus::Unknown
    }
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

fn bounded_u8(value: Option<f64>) -> u8 {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round().min(f64::from(u8::MAX)) as u8)
        .unwrap_or(0)
}

fn bounded_u32(value: Option<f64>) -> u32 {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round().min(f64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

fn positive_u32(value: f64) -> Option<u32> {
    if value.is_finite() && value > 0.0 {
        Some(value.round().min(f64::from(u32::MAX)) as u32)
    } else {
        None
    }
}

fn plausible_year(value: f64) -> Option<u16> {
    let year = value.round();
    if (1800.0..=2100.0).contains(&year) {
        Some(year as u16)
    } else {
        None
    }
}
