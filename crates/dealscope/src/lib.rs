//! Core library for the comparable-sales valuation engine: domain model,
//! scoring pipeline, listing-record ingestion, collaborator seams, and
//! service orchestration.

pub mod config;
pub mod error;
pub mod listings;
pub mod telemetry;
pub mod valuation;
