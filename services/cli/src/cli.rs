use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use dealscope::config::AppConfig;
use dealscope::error::AppError;
use dealscope::telemetry;
use dealscope::valuation::{AreaType, MaoRule};

use crate::demo::{run_analyze, run_demo, DemoArgs};

#[derive(Parser, Debug)]
#[command(
    name = "DealScope",
    about = "Estimate ARV, maximum offer, and deal quality from comparable sales",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a subject property against a comp export file
    Analyze(AnalyzeArgs),
    /// Run a self-contained analysis on built-in fixtures (default command)
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Subject property JSON file
    #[arg(long)]
    pub(crate) subject: PathBuf,
    /// Comparable-sales export: CSV, or a JSON array of listing records
    #[arg(long)]
    pub(crate) comps: PathBuf,
    /// Area classification used when no live geocoder is wired in
    #[arg(long, default_value = "suburban", value_parser = crate::infra::parse_area)]
    pub(crate) area: AreaType,
    /// Repair budget; zero auto-estimates from the subject's condition data
    #[arg(long, default_value_t = 0.0)]
    pub(crate) repairs: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) holding_cost: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) closing_cost: f64,
    #[arg(long, default_value_t = 0.0)]
    pub(crate) wholesale_fee: f64,
    /// Offer rule: 65%, 70%, 75%, or custom
    #[arg(long, default_value = "70%")]
    pub(crate) rule: String,
    /// Percent for the custom rule, within [50, 90]
    #[arg(long)]
    pub(crate) rule_percent: Option<f64>,
    /// Valuation date (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Neighborhood quality override (0-100)
    #[arg(long)]
    pub(crate) neighborhood_rating: Option<f64>,
    /// Emit the full analysis as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn parse_rule(raw: &str) -> Result<MaoRule, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "65" | "65%" => Ok(MaoRule::Percent65),
        "70" | "70%" => Ok(MaoRule::Percent70),
        "75" | "75%" => Ok(MaoRule::Percent75),
        "custom" => Ok(MaoRule::Custom),
        other => Err(AppError::InvalidInput(format!(
            "unknown offer rule '{other}' (expected 65%, 70%, 75%, or custom)"
        ))),
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Analyze(args) => run_analyze(args, config.engine),
        Command::Demo(args) => run_demo(args, config.engine),
    }
}
