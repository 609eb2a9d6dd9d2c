use serde::{Deserialize, Deserializer};

/// One untrusted listing record as acquired upstream. Providers disagree
/// on field names and formats, so every concept is captured as a set of
/// optional candidates that the adapter resolves through a fixed priority
/// list. Money and numeric fields tolerate both bare numbers and
/// formatted strings ("$1,234,567").
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawListingRecord {
    #[serde(alias = "listingId", alias = "listing_id")]
    pub id: Option<String>,
    #[serde(alias = "zpid", alias = "mlsNumber", alias = "mls_number")]
    pub mls_id: Option<String>,
    #[serde(alias = "dataSource", alias = "data_source", alias = "provider")]
    pub source: Option<String>,

    pub address: Option<String>,
    #[serde(alias = "fullAddress", alias = "full_address", alias = "formattedAddress")]
    pub formatted_address: Option<String>,

    #[serde(alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<f64>,

    #[serde(alias = "bedrooms", deserialize_with = "lenient_number", default)]
    pub beds: Option<f64>,
    #[serde(alias = "bathrooms", deserialize_with = "lenient_number", default)]
    pub baths: Option<f64>,
    #[serde(
        alias = "squareFootage",
        alias = "square_footage",
        alias = "livingArea",
        alias = "living_area",
        deserialize_with = "lenient_number",
        default
    )]
    pub sqft: Option<f64>,
    #[serde(
        alias = "lotSize",
        alias = "lot_size",
        alias = "lotSqft",
        alias = "lot_sqft",
        deserialize_with = "lenient_number",
        default
    )]
    pub lot_size: Option<f64>,
    #[serde(
        alias = "yearBuilt",
        alias = "year_built",
        deserialize_with = "lenient_number",
        default
    )]
    pub year_built: Option<f64>,

    #[serde(alias = "propertyType", alias = "property_type", alias = "homeType")]
    pub property_type: Option<String>,

    #[serde(
        alias = "salePrice",
        alias = "sale_price",
        alias = "soldPrice",
        alias = "sold_price",
        deserialize_with = "lenient_number",
        default
    )]
    pub sale_price: Option<f64>,
    #[serde(
        alias = "lastSoldPrice",
        alias = "last_sold_price",
        deserialize_with = "lenient_number",
        default
    )]
    pub last_sold_price: Option<f64>,
    #[serde(
        alias = "listPrice",
        alias = "list_price",
        alias = "price",
        deserialize_with = "lenient_number",
        default
    )]
    pub list_price: Option<f64>,

    #[serde(alias = "saleDate", alias = "sale_date", alias = "soldDate", alias = "sold_date")]
    pub sale_date: Option<String>,
    #[serde(alias = "lastSoldDate", alias = "last_sold_date")]
    pub last_sold_date: Option<String>,

    #[serde(alias = "listingStatus", alias = "listing_status", alias = "status")]
    pub listing_status: Option<String>,

    #[serde(
        alias = "daysOnMarket",
        alias = "days_on_market",
        alias = "dom",
        deserialize_with = "lenient_number",
        default
    )]
    pub days_on_market: Option<f64>,

    #[serde(alias = "imageUrls", alias = "image_urls", alias = "images", alias = "photos")]
    pub image_urls: Vec<String>,
}

/// Accept a number, a formatted string, or an empty string (as absent).
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numberish {
        Number(f64),
        Text(String),
    }

    match Option::<Numberish>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numberish::Number(value)) => Ok(Some(value)),
        Some(Numberish::Text(raw)) => Ok(parse_money(&raw)),
    }
}

/// Strip currency symbols, separators, and surrounding noise from a
/// formatted amount. Returns `None` for anything non-numeric.
pub(crate) fn parse_money(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
