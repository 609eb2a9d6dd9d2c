//! Ingestion of heterogeneous upstream listing records.
//!
//! Acquisition providers return listing data in wildly inconsistent
//! shapes. This module owns the one place where those shapes are
//! reconciled: `RawListingRecord` captures every known field spelling,
//! `adapter` resolves each concept through a fixed priority list, and the
//! importer reads CSV exports and JSON payloads from disk or any reader.

pub mod adapter;
mod parser;
mod record;

use std::io::Read;
use std::path::Path;

pub use record::RawListingRecord;

#[derive(Debug)]
pub enum ListingImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ListingImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingImportError::Io(err) => write!(f, "failed to read listing export: {}", err),
            ListingImportError::Csv(err) => write!(f, "invalid listing CSV data: {}", err),
            ListingImportError::Json(err) => write!(f, "invalid listing JSON data: {}", err),
        }
    }
}

impl std::error::Error for ListingImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListingImportError::Io(err) => Some(err),
            ListingImportError::Csv(err) => Some(err),
            ListingImportError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ListingImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ListingImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<serde_json::Error> for ListingImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

pub struct ListingImporter;

impl ListingImporter {
    /// Read a listing export, choosing the format from the file extension
    /// (`.json` is JSON; everything else is treated as CSV).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawListingRecord>, ListingImportError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_reader(file)
        } else {
            Self::from_csv_reader(file)
        }
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<RawListingRecord>, ListingImportError> {
        Ok(parser::parse_csv(reader)?)
    }

    pub fn from_json_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<RawListingRecord>, ListingImportError> {
        Ok(parser::parse_json(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn money_strings_parse_through_csv_rows() {
        let csv = "address,latitude,longitude,sale_price,status\n\
18 Cedar Ct,41.59,-93.62,\"$312,500\",SOLD\n";
        let records = ListingImporter::from_csv_reader(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sale_price, Some(312_500.0));
        assert_eq!(records[0].listing_status.as_deref(), Some("SOLD"));
    }

    #[test]
    fn csv_rows_split_pipe_separated_photos() {
        let csv = "address,latitude,longitude,price,photos\n\
9 Oak St,41.6,-93.6,250000,https://cdn/a.jpg|https://cdn/b.jpg\n";
        let records = ListingImporter::from_csv_reader(Cursor::new(csv)).expect("csv parses");
        assert_eq!(records[0].image_urls.len(), 2);
    }

    #[test]
    fn json_arrays_accept_aliased_fields() {
        let json = r#"[{"fullAddress":"4 Elm Ave","lat":41.61,"lng":-93.65,"soldPrice":"$198,000","yearBuilt":1962}]"#;
        let records =
            ListingImporter::from_json_reader(Cursor::new(json)).expect("json parses");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].formatted_address.as_deref(), Some("4 Elm Ave"));
        assert_eq!(records[0].sale_price, Some(198_000.0));
        assert_eq!(records[0].year_built, Some(1962.0));
    }

    #[test]
    fn import_from_missing_path_propagates_io_errors() {
        let error =
            ListingImporter::from_path("./does-not-exist.csv").expect_err("expected io error");
        match error {
            ListingImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
