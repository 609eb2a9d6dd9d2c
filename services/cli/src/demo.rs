use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Args;
use dealscope::config::EngineSettings;
use dealscope::error::AppError;
use dealscope::listings::{ListingImporter, RawListingRecord};
use dealscope::valuation::{
    AnalysisService, AreaType, Coordinates, MaoRule, PropertyCategory, PropertyId,
    SubjectProperty, ValuationInputs,
};
use tracing::info;

use crate::cli::{parse_rule, AnalyzeArgs};
use crate::infra::{
    FixtureCompSource, FixtureGeocoder, FixtureNeighborhood, InMemoryStore, NoopAssessor,
};
use crate::render;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the valuation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Emit the full analysis as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_analyze(args: AnalyzeArgs, engine: EngineSettings) -> Result<(), AppError> {
    let subject_file = std::fs::File::open(&args.subject)?;
    let subject: SubjectProperty = serde_json::from_reader(subject_file)?;

    let records = ListingImporter::from_path(&args.comps)?;
    info!(records = records.len(), "loaded listing export");

    let inputs = ValuationInputs {
        estimated_repairs: args.repairs,
        holding_cost: args.holding_cost,
        closing_cost: args.closing_cost,
        wholesale_fee: args.wholesale_fee,
        mao_rule: parse_rule(&args.rule)?,
        mao_rule_percent: args.rule_percent,
    };

    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());

    let service = AnalysisService::new(
        Arc::new(FixtureGeocoder::for_area(args.area)),
        Arc::new(FixtureCompSource::new(records)),
        Arc::new(NoopAssessor),
        Arc::new(FixtureNeighborhood(args.neighborhood_rating)),
        Arc::new(InMemoryStore::default()),
        engine,
    );

    let result = service.analyze(&subject, &inputs, as_of)?;
    render::render_analysis(&subject, &result, args.json)
}

pub(crate) fn run_demo(args: DemoArgs, engine: EngineSettings) -> Result<(), AppError> {
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let subject = demo_subject();
    let records = demo_records(as_of);

    if !args.json {
        println!("DealScope demo analysis ({as_of})");
        println!(
            "Subject fixture: {} | asking {}",
            subject.address,
            render::money(subject.asking_price)
        );
        println!();
    }

    let inputs = ValuationInputs {
        estimated_repairs: 0.0,
        holding_cost: 4_000.0,
        closing_cost: 3_500.0,
        wholesale_fee: 2_000.0,
        mao_rule: MaoRule::Percent70,
        mao_rule_percent: None,
    };

    let service = AnalysisService::new(
        Arc::new(FixtureGeocoder::for_area(AreaType::Suburban)),
        Arc::new(FixtureCompSource::new(records)),
        Arc::new(NoopAssessor),
        Arc::new(FixtureNeighborhood(Some(72.0))),
        Arc::new(InMemoryStore::default()),
        engine,
    );

    let result = service.analyze(&subject, &inputs, as_of)?;
    render::render_analysis(&subject, &result, args.json)
}

fn demo_subject() -> SubjectProperty {
    SubjectProperty {
        id: PropertyId("demo-subject".to_string()),
        address: "1432 Birchwood Ln, Des Moines, IA 50310".to_string(),
        coordinates: Coordinates {
            latitude: 41.5868,
            longitude: -93.625,
        },
        beds: 3,
        baths: 2.0,
        sqft: 1450,
        lot_sqft: Some(7000),
        year_built: Some(1999),
        category: PropertyCategory::SingleFamily,
        asking_price: 235_000.0,
        days_on_market: Some(21),
        condition: None,
    }
}

/// A small neighborhood of recent sales: four solid matches, a condo the
/// matching filter should drop, and one record using the messier field
/// spellings providers actually send.
fn demo_records(as_of: NaiveDate) -> Vec<RawListingRecord> {
    let sold = |days: i64| Some((as_of - chrono::Duration::days(days)).format("%Y-%m-%d").to_string());

    let mut records = vec![
        RawListingRecord {
            id: Some("mls-4411".to_string()),
            address: Some("1418 Birchwood Ln, Des Moines, IA".to_string()),
            latitude: Some(41.5875),
            longitude: Some(-93.6242),
            beds: Some(3.0),
            baths: Some(2.0),
            sqft: Some(1480.0),
            lot_size: Some(7100.0),
            year_built: Some(1997.0),
            property_type: Some("Single Family".to_string()),
            sale_price: Some(289_500.0),
            sale_date: sold(45),
            listing_status: Some("Sold".to_string()),
            days_on_market: Some(19.0),
            ..RawListingRecord::default()
        },
        RawListingRecord {
            id: Some("mls-4519".to_string()),
            address: Some("1507 Crestview Ave, Des Moines, IA".to_string()),
            latitude: Some(41.5902),
            longitude: Some(-93.6301),
            beds: Some(3.0),
            baths: Some(2.5),
            sqft: Some(1520.0),
            lot_size: Some(7600.0),
            year_built: Some(2001.0),
            property_type: Some("single-family".to_string()),
            sale_price: Some(301_000.0),
            sale_date: sold(80),
            listing_status: Some("Closed".to_string()),
            days_on_market: Some(26.0),
            ..RawListingRecord::default()
        },
        RawListingRecord {
            id: Some("mls-4602".to_string()),
            address: Some("1290 Maple Ridge Dr, Des Moines, IA".to_string()),
            latitude: Some(41.5831),
            longitude: Some(-93.6199),
            beds: Some(4.0),
            baths: Some(2.0),
            sqft: Some(1555.0),
            lot_size: Some(8200.0),
            year_built: Some(1994.0),
            property_type: Some("SFR".to_string()),
            sale_price: Some(312_250.0),
            sale_date: sold(130),
            listing_status: Some("Sold".to_string()),
            days_on_market: Some(41.0),
            ..RawListingRecord::default()
        },
        RawListingRecord {
            id: Some("unit-77".to_string()),
            address: Some("880 Grand Ave #305, Des Moines, IA".to_string()),
            latitude: Some(41.5859),
            longitude: Some(-93.6277),
            beds: Some(2.0),
            baths: Some(2.0),
            sqft: Some(1210.0),
            year_built: Some(2006.0),
            property_type: Some("Condominium".to_string()),
            sale_price: Some(214_000.0),
            sale_date: sold(60),
            listing_status: Some("Sold".to_string()),
            days_on_market: Some(33.0),
            ..RawListingRecord::default()
        },
    ];

    // Provider-style record: camelCase JSON would land in the same shape,
    // with a formatted money string and a last-sold price.
    records.push(RawListingRecord {
        mls_id: Some("Z-99812".to_string()),
        formatted_address: Some("1366 Birchwood Ln, Des Moines, IA".to_string()),
        latitude: Some(41.5851),
        longitude: Some(-93.6238),
        beds: Some(3.0),
        baths: Some(1.5),
        sqft: Some(1395.0),
        lot_size: Some(6800.0),
        year_built: Some(1992.0),
        property_type: Some("house".to_string()),
        last_sold_price: Some(282_750.0),
        last_sold_date: sold(100),
        days_on_market: Some(24.0),
        ..RawListingRecord::default()
    });

    records
}
