use std::io::Read;

use serde::Deserialize;

use super::record::{parse_money, RawListingRecord};

/// Parse a JSON array of raw listing records.
pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<RawListingRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Parse a CSV listing export. CSV rows are flat, so multi-valued fields
/// (photo URLs) arrive pipe-separated and every number arrives as text.
pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawListingRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<CsvListingRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvListingRow {
    #[serde(alias = "listing_id", alias = "listingId")]
    id: Option<String>,
    #[serde(alias = "mls_number", alias = "mlsNumber")]
    mls_id: Option<String>,
    #[serde(alias = "data_source", alias = "provider")]
    source: Option<String>,
    #[serde(alias = "full_address", alias = "formatted_address")]
    address: Option<String>,
    #[serde(alias = "lat")]
    latitude: Option<String>,
    #[serde(alias = "lng", alias = "lon")]
    longitude: Option<String>,
    #[serde(alias = "bedrooms")]
    beds: Option<String>,
    #[serde(alias = "bathrooms")]
    baths: Option<String>,
    #[serde(alias = "square_footage", alias = "living_area")]
    sqft: Option<String>,
    #[serde(alias = "lot_size", alias = "lot_sqft")]
    lot_size: Option<String>,
    #[serde(alias = "year_built")]
    year_built: Option<String>,
    #[serde(alias = "property_type", alias = "home_type")]
    property_type: Option<String>,
    #[serde(alias = "sale_price", alias = "sold_price")]
    sale_price: Option<String>,
    #[serde(alias = "last_sold_price")]
    last_sold_price: Option<String>,
    #[serde(alias = "list_price", alias = "price")]
    list_price: Option<String>,
    #[serde(alias = "sale_date", alias = "sold_date")]
    sale_date: Option<String>,
    #[serde(alias = "last_sold_date")]
    last_sold_date: Option<String>,
    #[serde(alias = "listing_status", alias = "status")]
    listing_status: Option<String>,
    #[serde(alias = "days_on_market", alias = "dom")]
    days_on_market: Option<String>,
    #[serde(alias = "image_urls", alias = "photos")]
    image_urls: Option<String>,
}

impl CsvListingRow {
    fn into_record(self) -> RawListingRecord {
        RawListingRecord {
            id: non_empty(self.id),
            mls_id: non_empty(self.mls_id),
            source: non_empty(self.source),
            address: non_empty(self.address),
            formatted_address: None,
            latitude: numeric(self.latitude),
            longitude: numeric(self.longitude),
            beds: numeric(self.beds),
            baths: numeric(self.baths),
            sqft: numeric(self.sqft),
            lot_size: numeric(self.lot_size),
            year_built: numeric(self.year_built),
            property_type: non_empty(self.property_type),
            sale_price: numeric(self.sale_price),
            last_sold_price: numeric(self.last_sold_price),
            list_price: numeric(self.list_price),
            sale_date: non_empty(self.sale_date),
            last_sold_date: non_empty(self.last_sold_date),
            listing_status: non_empty(self.listing_status),
            days_on_market: numeric(self.days_on_market),
            image_urls: self
                .image_urls
                .map(|value| {
                    value
                        .split('|')
                        .map(str::trim)
                        .filter(|url| !url.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn numeric(value: Option<String>) -> Option<f64> {
    value.as_deref().and_then(parse_money)
}
