//! Rental investment analysis: value resolution, rent estimation, operating
//! expenses, and the cap-rate recommendation with its narrative report.
//!
//! Everything in this module is pure. Callers pass an [`AnalysisRequest`]
//! carrying the reference date so results stay reproducible.

pub mod caprate;
pub mod domain;
pub mod expenses;
pub mod geo;
pub mod outcome;
pub mod rent;
pub mod report;
pub mod settings;
pub mod similarity;
pub mod valuation;

#[cfg(test)]
mod tests;

pub use caprate::{cap_rate_percent, recommend, CapRateAnalyzer};
pub use domain::{
    CalculationMode, Comparable, ExpenseOverrides, HoaFee, PhysicalProfile, PropertyAttributes,
    PropertyTax, Recommendation,
};
pub use expenses::{compute_annual_expenses, ExpenseBreakdown, HoaSource, TaxSource};
pub use geo::haversine_miles;
pub use outcome::{
    AnalysisDetails, AnalysisRequest, AnalysisResult, RentSource, Scenario, ScenarioOutcome,
};
pub use rent::{
    estimate_from_attributes, estimate_from_comparables, find_similar_properties,
    score_comparables, RentEstimate,
};
pub use report::{generate_insights, render_report, ReportInsights};
pub use settings::{
    AnalysisSettings, ComparableSearch, ExpenseRates, RecommendationPolicy, RentModel,
    ValuationPolicy,
};
pub use similarity::similarity_score;
pub use valuation::{resolve_value, Valuation, ValueSource};

/// One-shot analysis with the given settings.
pub fn analyze(
    attributes: &PropertyAttributes,
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
) -> AnalysisResult {
    CapRateAnalyzer::new(settings.clone()).analyze(attributes, request)
}
