use super::domain::{CalculationMode, Comparable, ExpenseOverrides, Recommendation};
use super::expenses::ExpenseBreakdown;
use super::rent::RentEstimate;
use super::valuation::ValueSource;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs for one analysis besides the property itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub overrides: Option<ExpenseOverrides>,
    /// Explicit monthly rent; bypasses estimation when positive.
    pub monthly_rent: Option<f64>,
    pub calculation_mode: CalculationMode,
    /// Falls back to the configured threshold when absent.
    pub cap_rate_threshold: Option<f64>,
    pub comparables: Option<Vec<Comparable>>,
    /// Reference date for sale-recency checks.
    pub as_of: NaiveDate,
}

impl AnalysisRequest {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            overrides: None,
            monthly_rent: None,
            calculation_mode: CalculationMode::default(),
            cap_rate_threshold: None,
            comparables: None,
            as_of,
        }
    }

    pub fn with_mode(mut self, mode: CalculationMode) -> Self {
        self.calculation_mode = mode;
        self
    }

    pub fn with_monthly_rent(mut self, rent: f64) -> Self {
        self.monthly_rent = Some(rent);
        self
    }

    pub fn with_overrides(mut self, overrides: ExpenseOverrides) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.cap_rate_threshold = Some(threshold);
        self
    }

    pub fn with_comparables(mut self, comparables: Vec<Comparable>) -> Self {
        self.comparables = Some(comparables);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentSource {
    Override,
    Comparables,
    Attributes,
    Unavailable,
}

impl RentSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Override => "Caller-supplied rent",
            Self::Comparables => "Comparable listings",
            Self::Attributes => "Property attributes",
            Self::Unavailable => "Unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Low,
    Mid,
    High,
}

impl Scenario {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Mid => "Mid",
            Self::High => "High",
        }
    }
}

/// Cap-rate result for a single monthly rent assumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub monthly_rent: f64,
    pub annual_rent: f64,
    pub annual_expenses: f64,
    pub noi: f64,
    pub cap_rate_percent: f64,
    pub meets_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    pub calculation_mode: CalculationMode,
    pub cap_rate_threshold: f64,
    pub value_source: ValueSource,
    pub rent_source: RentSource,
    pub comparables_used: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_range: Option<RentEstimate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<ScenarioOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<ExpenseBreakdown>,
}

/// Outcome of one analysis. Headline figures describe the mid scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub value: f64,
    pub monthly_rent: f64,
    pub annual_rent: f64,
    pub annual_expenses: f64,
    pub noi: f64,
    pub cap_rate_percent: f64,
    pub recommendation: Recommendation,
    pub explanation: String,
    pub details: AnalysisDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commentary: Option<String>,
}

impl AnalysisResult {
    /// Whether the numbers came from a completed calculation rather than a
    /// missing-data short circuit.
    pub fn is_assessed(&self) -> bool {
        !self.details.scenarios.is_empty()
    }

    pub fn scenario(&self, scenario: Scenario) -> Option<&ScenarioOutcome> {
        self.details
            .scenarios
            .iter()
            .find(|outcome| outcome.scenario == scenario)
    }

    pub fn expense_ratio(&self) -> Option<f64> {
        (self.annual_rent > 0.0).then(|| self.annual_expenses / self.annual_rent)
    }

    pub fn rent_to_value(&self) -> Option<f64> {
        (self.annual_rent > 0.0 && self.value > 0.0).then(|| self.annual_rent / self.value)
    }
}
