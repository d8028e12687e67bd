use serde::{Deserialize, Serialize};

/// Single table of defaults for every estimate the analyzer makes. Callers
/// replace individual fields; nothing downstream carries its own constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    pub expenses: ExpenseRates,
    pub rent: RentModel,
    pub valuation: ValuationPolicy,
    pub recommendation: RecommendationPolicy,
    pub comparables: ComparableSearch,
}

/// Annual operating expense rates. Rent-based rates apply to annual rent,
/// value-based rates to the property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRates {
    pub property_management: f64,
    pub maintenance_repairs: f64,
    pub vacancy_allowance: f64,
    pub utilities: f64,
    pub insurance: f64,
    /// Used only when neither an override nor a recorded tax bill exists.
    pub property_tax_rate: f64,
}

impl Default for ExpenseRates {
    fn default() -> Self {
        Self {
            property_management: 0.10,
            maintenance_repairs: 0.08,
            vacancy_allowance: 0.06,
            utilities: 0.0,
            insurance: 0.007,
            property_tax_rate: 0.013,
        }
    }
}

/// Attribute-based monthly rent heuristic and the comparable range band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentModel {
    pub base_rent_per_sqft: f64,
    pub bedroom_bonus: f64,
    pub bathroom_bonus: f64,
    pub min_rent_per_sqft: f64,
    pub max_rent_per_sqft: f64,
    /// Half-width of the comparable-based rent range, as a fraction of the estimate.
    pub range_factor: f64,
    /// Monthly rent as a fraction of sale price when deriving proxy rents.
    pub rent_to_price_ratio: f64,
}

impl Default for RentModel {
    fn default() -> Self {
        Self {
            base_rent_per_sqft: 1.10,
            bedroom_bonus: 150.0,
            bathroom_bonus: 75.0,
            min_rent_per_sqft: 0.60,
            max_rent_per_sqft: 3.5,
            range_factor: 0.075,
            rent_to_price_ratio: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationPolicy {
    pub fallback_price_per_sqft: f64,
    pub max_sale_age_years: f64,
}

impl Default for ValuationPolicy {
    fn default() -> Self {
        Self {
            fallback_price_per_sqft: 160.0,
            max_sale_age_years: 10.0,
        }
    }
}

/// Tier boundaries: at or above `threshold` is worth investing, at or above
/// `threshold * consider_ratio` is a maybe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    pub threshold: f64,
    pub consider_ratio: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self {
            threshold: 8.0,
            consider_ratio: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableSearch {
    pub radius_miles: f64,
    pub max_results: usize,
}

impl Default for ComparableSearch {
    fn default() -> Self {
        Self {
            radius_miles: 5.0,
            max_results: 5,
        }
    }
}
