use super::domain::{CalculationMode, ExpenseOverrides, PropertyAttributes, Recommendation};
use super::expenses::{compute_annual_expenses, ExpenseBreakdown};
use super::outcome::{
    AnalysisDetails, AnalysisRequest, AnalysisResult, RentSource, Scenario, ScenarioOutcome,
};
use super::rent::{
    estimate_from_attributes, estimate_from_comparables, round_cents, score_comparables,
    RentEstimate,
};
use super::settings::{AnalysisSettings, RecommendationPolicy};
use super::valuation::{resolve_value, Valuation, ValueSource};
use tracing::{debug, info, warn};

const MONTHS_PER_YEAR: f64 = 12.0;

/// Stateless engine turning property attributes into a cap-rate recommendation.
#[derive(Debug, Clone, Default)]
pub struct CapRateAnalyzer {
    settings: AnalysisSettings,
}

struct RentBasis {
    source: RentSource,
    estimate: RentEstimate,
    ranged: bool,
    comparables_used: usize,
}

impl CapRateAnalyzer {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Never fails: missing value or rent short-circuits to a "Not worth it"
    /// result carrying the reason.
    pub fn analyze(
        &self,
        attributes: &PropertyAttributes,
        request: &AnalysisRequest,
    ) -> AnalysisResult {
        let threshold = request
            .cap_rate_threshold
            .filter(|threshold| threshold.is_finite() && *threshold > 0.0)
            .unwrap_or(self.settings.recommendation.threshold);

        let valuation = resolve_value(attributes, &self.settings.valuation, request.as_of);
        debug!(value = valuation.value, source = ?valuation.source, "resolved property value");

        if !valuation.is_known() {
            info!("property value unavailable; skipping cap rate analysis");
            return not_assessable(
                valuation,
                RentSource::Unavailable,
                0.0,
                request.calculation_mode,
                threshold,
                "Unable to determine property value from recorded sale price or square footage.",
            );
        }

        let basis = self.rent_basis(attributes, request);
        if !basis.estimate.is_available() {
            info!("monthly rent unavailable; skipping cap rate analysis");
            return not_assessable(
                valuation,
                basis.source,
                basis.estimate.rent,
                request.calculation_mode,
                threshold,
                "Missing rent drivers (square footage); cannot estimate rental income.",
            );
        }

        let rents: Vec<(Scenario, f64)> = if basis.ranged {
            vec![
                (Scenario::Low, basis.estimate.rent_low),
                (Scenario::Mid, basis.estimate.rent),
                (Scenario::High, basis.estimate.rent_high),
            ]
        } else {
            vec![(Scenario::Mid, basis.estimate.rent)]
        };

        let evaluated: Vec<(ScenarioOutcome, ExpenseBreakdown)> = rents
            .into_iter()
            .map(|(scenario, monthly_rent)| {
                evaluate_scenario(
                    attributes,
                    scenario,
                    monthly_rent,
                    valuation.value,
                    request,
                    &self.settings,
                    threshold,
                )
            })
            .collect();

        let mid_index = evaluated
            .iter()
            .position(|(outcome, _)| outcome.scenario == Scenario::Mid)
            .unwrap_or_default();
        let (mid, expenses) = evaluated[mid_index];
        let scenarios: Vec<ScenarioOutcome> =
            evaluated.into_iter().map(|(outcome, _)| outcome).collect();

        let recommendation = recommend(
            mid.cap_rate_percent,
            threshold,
            &self.settings.recommendation,
        );
        let explanation = explain(
            recommendation,
            mid.cap_rate_percent,
            threshold,
            &self.settings.recommendation,
        );
        info!(
            cap_rate = mid.cap_rate_percent,
            recommendation = recommendation.label(),
            mode = %request.calculation_mode,
            "cap rate analysis complete"
        );

        AnalysisResult {
            value: round_cents(valuation.value),
            monthly_rent: mid.monthly_rent,
            annual_rent: mid.annual_rent,
            annual_expenses: mid.annual_expenses,
            noi: mid.noi,
            cap_rate_percent: mid.cap_rate_percent,
            recommendation,
            explanation,
            details: AnalysisDetails {
                calculation_mode: request.calculation_mode,
                cap_rate_threshold: threshold,
                value_source: valuation.source,
                rent_source: basis.source,
                comparables_used: basis.comparables_used,
                rent_range: basis.ranged.then_some(basis.estimate),
                scenarios,
                expenses: Some(round_breakdown(expenses)),
            },
            commentary: None,
        }
    }

    fn rent_basis(&self, attributes: &PropertyAttributes, request: &AnalysisRequest) -> RentBasis {
        if let Some(rent) = explicit_rent(request) {
            debug!(rent, "using caller-supplied monthly rent");
            return RentBasis {
                source: RentSource::Override,
                estimate: single(rent),
                ranged: false,
                comparables_used: 0,
            };
        }

        if let Some(comparables) = request
            .comparables
            .as_ref()
            .filter(|comparables| !comparables.is_empty())
        {
            let scored = score_comparables(attributes, comparables.iter().cloned());
            let estimate = estimate_from_comparables(&scored, &self.settings.rent);
            if estimate.is_available() {
                let used = scored.iter().filter(|comp| comp.price > 0.0).count();
                debug!(rent = estimate.rent, comparables = used, "estimated rent from comparables");
                return RentBasis {
                    source: RentSource::Comparables,
                    estimate,
                    ranged: true,
                    comparables_used: used,
                };
            }
            warn!(
                supplied = comparables.len(),
                "comparables carried no usable rent; falling back to attribute estimate"
            );
        }

        let rent = estimate_from_attributes(attributes, &self.settings.rent);
        let source = if rent > 0.0 {
            RentSource::Attributes
        } else {
            RentSource::Unavailable
        };
        debug!(rent, "estimated rent from property attributes");
        RentBasis {
            source,
            estimate: single(rent),
            ranged: false,
            comparables_used: 0,
        }
    }
}

/// Tier for a cap rate against a threshold.
pub fn recommend(cap_rate: f64, threshold: f64, policy: &RecommendationPolicy) -> Recommendation {
    if cap_rate >= threshold {
        Recommendation::WorthInvesting
    } else if cap_rate >= threshold * policy.consider_ratio {
        Recommendation::Maybe
    } else {
        Recommendation::NotWorthIt
    }
}

/// Cap rate as a percentage rounded to two decimals; zero without a value.
pub fn cap_rate_percent(noi: f64, value: f64) -> f64 {
    if value > 0.0 {
        round_cents(noi / value * 100.0)
    } else {
        0.0
    }
}

fn evaluate_scenario(
    attributes: &PropertyAttributes,
    scenario: Scenario,
    monthly_rent: f64,
    value: f64,
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
    threshold: f64,
) -> (ScenarioOutcome, ExpenseBreakdown) {
    let annual_rent = monthly_rent * MONTHS_PER_YEAR;
    let expenses = compute_annual_expenses(
        attributes,
        annual_rent,
        value,
        &settings.expenses,
        request.overrides.as_ref(),
    );

    let noi = match request.calculation_mode {
        CalculationMode::Gross => annual_rent,
        CalculationMode::Net => (annual_rent - expenses.total).max(0.0),
    };
    let noi = round_cents(noi);
    let cap_rate = cap_rate_percent(noi, round_cents(value));

    let outcome = ScenarioOutcome {
        scenario,
        monthly_rent: round_cents(monthly_rent),
        annual_rent: round_cents(annual_rent),
        annual_expenses: round_cents(expenses.total),
        noi,
        cap_rate_percent: cap_rate,
        meets_threshold: cap_rate >= threshold,
    };
    (outcome, expenses)
}

fn explicit_rent(request: &AnalysisRequest) -> Option<f64> {
    let positive = |rent: &f64| rent.is_finite() && *rent > 0.0;
    request.monthly_rent.filter(positive).or_else(|| {
        request
            .overrides
            .as_ref()
            .and_then(|overrides: &ExpenseOverrides| overrides.monthly_rent)
            .filter(positive)
    })
}

fn single(rent: f64) -> RentEstimate {
    RentEstimate {
        rent,
        rent_low: rent,
        rent_high: rent,
    }
}

fn explain(
    recommendation: Recommendation,
    cap_rate: f64,
    threshold: f64,
    policy: &RecommendationPolicy,
) -> String {
    match recommendation {
        Recommendation::WorthInvesting => format!(
            "Cap rate {cap_rate:.2}% meets or exceeds the {threshold:.1}% target."
        ),
        Recommendation::Maybe => format!(
            "Cap rate {cap_rate:.2}% is borderline against the {threshold:.1}% target; consider negotiating price or reducing expenses."
        ),
        Recommendation::NotWorthIt => format!(
            "Cap rate {cap_rate:.2}% is below the {:.1}-{threshold:.1}% target range.",
            threshold * policy.consider_ratio
        ),
    }
}

fn not_assessable(
    valuation: Valuation,
    rent_source: RentSource,
    monthly_rent: f64,
    calculation_mode: CalculationMode,
    threshold: f64,
    explanation: &str,
) -> AnalysisResult {
    AnalysisResult {
        value: round_cents(valuation.value.max(0.0)),
        monthly_rent: round_cents(monthly_rent.max(0.0)),
        annual_rent: 0.0,
        annual_expenses: 0.0,
        noi: 0.0,
        cap_rate_percent: 0.0,
        recommendation: Recommendation::NotWorthIt,
        explanation: explanation.to_string(),
        details: AnalysisDetails {
            calculation_mode,
            cap_rate_threshold: threshold,
            value_source: if valuation.is_known() {
                valuation.source
            } else {
                ValueSource::Unknown
            },
            rent_source,
            comparables_used: 0,
            rent_range: None,
            scenarios: Vec::new(),
            expenses: None,
        },
        commentary: None,
    }
}

fn round_breakdown(mut breakdown: ExpenseBreakdown) -> ExpenseBreakdown {
    for amount in [
        &mut breakdown.property_management,
        &mut breakdown.maintenance_repairs,
        &mut breakdown.vacancy_allowance,
        &mut breakdown.utilities,
        &mut breakdown.insurance,
        &mut breakdown.taxes,
        &mut breakdown.hoa,
        &mut breakdown.total,
    ] {
        *amount = round_cents(*amount);
    }
    breakdown
}
