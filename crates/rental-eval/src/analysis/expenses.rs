use super::domain::{ExpenseOverrides, PropertyAttributes};
use super::settings::ExpenseRates;
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSource {
    Override,
    Recorded,
    Estimated,
}

impl TaxSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Override => "Caller override",
            Self::Recorded => "Recorded tax bill",
            Self::Estimated => "Rate-based estimate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoaSource {
    AnnualOverride,
    MonthlyOverride,
    Recorded,
    None,
}

/// Itemized annual operating expenses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub property_management: f64,
    pub maintenance_repairs: f64,
    pub vacancy_allowance: f64,
    pub utilities: f64,
    pub insurance: f64,
    pub taxes: f64,
    pub tax_source: TaxSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<i32>,
    pub hoa: f64,
    pub hoa_source: HoaSource,
    pub total: f64,
}

/// Applies rate overrides on top of the configured rates. Negative or
/// non-finite overrides are skipped.
pub fn effective_rates(base: &ExpenseRates, overrides: Option<&ExpenseOverrides>) -> ExpenseRates {
    let Some(overrides) = overrides else {
        return base.clone();
    };

    ExpenseRates {
        property_management: usable(overrides.property_management_rate)
            .unwrap_or(base.property_management),
        maintenance_repairs: usable(overrides.maintenance_repairs_rate)
            .unwrap_or(base.maintenance_repairs),
        vacancy_allowance: usable(overrides.vacancy_allowance_rate)
            .unwrap_or(base.vacancy_allowance),
        utilities: usable(overrides.utilities_rate).unwrap_or(base.utilities),
        insurance: usable(overrides.insurance_rate).unwrap_or(base.insurance),
        property_tax_rate: usable(overrides.property_tax_rate).unwrap_or(base.property_tax_rate),
    }
}

/// Annual operating expenses. Precedence for taxes and HOA is caller override,
/// then recorded data, then the rate-based fallback.
pub fn compute_annual_expenses(
    attributes: &PropertyAttributes,
    annual_rent: f64,
    value: f64,
    rates: &ExpenseRates,
    overrides: Option<&ExpenseOverrides>,
) -> ExpenseBreakdown {
    let rates = effective_rates(rates, overrides);
    let annual_rent = annual_rent.max(0.0);
    let value = value.max(0.0);

    let property_management = annual_rent * rates.property_management;
    let maintenance_repairs = annual_rent * rates.maintenance_repairs;
    let vacancy_allowance = annual_rent * rates.vacancy_allowance;
    let utilities = annual_rent * rates.utilities;
    let insurance = value * rates.insurance;

    let (taxes, tax_source, tax_year) =
        match overrides.and_then(|overrides| usable(overrides.taxes_annual)) {
            Some(taxes) => (taxes, TaxSource::Override, None),
            None => match attributes.most_recent_tax() {
                Some((year, total)) => (total, TaxSource::Recorded, Some(year)),
                None => (value * rates.property_tax_rate, TaxSource::Estimated, None),
            },
        };

    let (hoa, hoa_source) = resolve_hoa(attributes, overrides);

    let total = (property_management
        + maintenance_repairs
        + vacancy_allowance
        + utilities
        + insurance
        + taxes
        + hoa)
        .max(0.0);

    ExpenseBreakdown {
        property_management,
        maintenance_repairs,
        vacancy_allowance,
        utilities,
        insurance,
        taxes,
        tax_source,
        tax_year,
        hoa,
        hoa_source,
        total,
    }
}

fn resolve_hoa(
    attributes: &PropertyAttributes,
    overrides: Option<&ExpenseOverrides>,
) -> (f64, HoaSource) {
    if let Some(overrides) = overrides {
        if let Some(annual) = usable(overrides.hoa_annual) {
            return (annual, HoaSource::AnnualOverride);
        }
        if let Some(monthly) = usable(overrides.hoa_monthly) {
            return (monthly * MONTHS_PER_YEAR, HoaSource::MonthlyOverride);
        }
    }

    match attributes.recorded_hoa_monthly() {
        Some(monthly) => (monthly * MONTHS_PER_YEAR, HoaSource::Recorded),
        None => (0.0, HoaSource::None),
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value >= 0.0)
}
