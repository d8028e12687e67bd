//! Rental property investment evaluation.
//!
//! Resolves a property's value, estimates market rent from comparables or
//! attributes, models operating expenses, and turns the resulting cap rate
//! into a recommendation with a narrative report.

pub mod analysis;
pub mod comparables;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod lookup;
pub mod properties;
pub mod service;
pub mod telemetry;

pub use analysis::{analyze, render_report, AnalysisRequest, AnalysisResult, AnalysisSettings};
pub use lookup::Lookup;
