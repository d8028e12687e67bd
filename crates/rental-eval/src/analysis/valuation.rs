use super::domain::PropertyAttributes;
use super::rent::round_cents;
use super::settings::ValuationPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSource {
    RecentSale,
    SquareFootage,
    Unknown,
}

impl ValueSource {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RecentSale => "Recorded sale price",
            Self::SquareFootage => "Per-square-foot estimate",
            Self::Unknown => "Unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub value: f64,
    pub source: ValueSource,
}

impl Valuation {
    pub fn is_known(&self) -> bool {
        self.value > 0.0
    }
}

/// Recorded sale price when it is recent enough (or undated), otherwise square
/// footage times the fallback price. A zero value means the property cannot be
/// valued.
pub fn resolve_value(
    attributes: &PropertyAttributes,
    policy: &ValuationPolicy,
    as_of: NaiveDate,
) -> Valuation {
    if let Some(price) = attributes
        .last_sale_price
        .filter(|price| price.is_finite() && *price > 0.0)
    {
        let recent = match attributes.last_sale_date {
            Some(sold_on) => years_between(sold_on, as_of) <= policy.max_sale_age_years,
            None => true,
        };
        if recent {
            return Valuation {
                value: price,
                source: ValueSource::RecentSale,
            };
        }
    }

    match attributes.known_square_footage() {
        Some(sqft) => Valuation {
            value: round_cents(f64::from(sqft) * policy.fallback_price_per_sqft),
            source: ValueSource::SquareFootage,
        },
        None => Valuation {
            value: 0.0,
            source: ValueSource::Unknown,
        },
    }
}

fn years_between(earlier: NaiveDate, later: NaiveDate) -> f64 {
    (later - earlier).num_days() as f64 / DAYS_PER_YEAR
}
