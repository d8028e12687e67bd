use super::super::domain::{PropertyAttributes, Recommendation};
use super::super::outcome::AnalysisResult;
use serde::Serialize;

const STRONG_CAP_RATE: f64 = 8.0;
const NEGOTIABLE_CAP_RATE: f64 = 6.0;
const EFFICIENT_EXPENSE_RATIO: f64 = 0.40;
const HIGH_EXPENSE_RATIO: f64 = 0.55;
const STRONG_RENT_TO_VALUE: f64 = 0.09;
const LOW_RENT_TO_VALUE: f64 = 0.06;
const COMPACT_SQFT_PER_BEDROOM: f64 = 500.0;
const GENEROUS_SQFT_PER_BEDROOM: f64 = 800.0;
const MODERN_BUILD_YEAR: i32 = 2005;
const DATED_BUILD_YEAR: i32 = 1980;
const SINGLE_FAMILY_LABELS: [&str; 3] = ["single family", "single_family", "single-family"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseBand {
    Efficient,
    Moderate,
    High,
}

impl ExpenseBand {
    pub fn classify(ratio: f64) -> Self {
        if ratio < EFFICIENT_EXPENSE_RATIO {
            Self::Efficient
        } else if ratio <= HIGH_EXPENSE_RATIO {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn commentary(self) -> &'static str {
        match self {
            Self::Efficient => "efficient relative to typical 40-50% ranges.",
            Self::Moderate => "moderate and should be monitored.",
            Self::High => "high; investigate tax burden, insurance, or maintenance line items.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RentToValueBand {
    Strong,
    Typical,
    Low,
}

impl RentToValueBand {
    pub fn classify(ratio: f64) -> Self {
        if ratio >= STRONG_RENT_TO_VALUE {
            Self::Strong
        } else if ratio < LOW_RENT_TO_VALUE {
            Self::Low
        } else {
            Self::Typical
        }
    }

    pub const fn commentary(self) -> &'static str {
        match self {
            Self::Strong => "strong; supports the income basis for valuation.",
            Self::Typical => {
                "typical; may limit return potential unless rent growth or price adjustment occurs."
            }
            Self::Low => "low; may limit return potential unless rent growth or price adjustment occurs.",
        }
    }
}

/// Rule-based observations drawn from the property record and the analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportInsights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub next_steps: Vec<String>,
}

pub fn generate_insights(attributes: &PropertyAttributes, result: &AnalysisResult) -> ReportInsights {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();
    let cap_rate = result.cap_rate_percent;

    if cap_rate >= STRONG_CAP_RATE {
        strengths.push("Cap rate meets or exceeds typical target benchmark (>=8%).".to_string());
    } else if cap_rate >= NEGOTIABLE_CAP_RATE {
        strengths.push(
            "Cap rate is within a negotiable range; could be improved with pricing or expense optimization."
                .to_string(),
        );
    } else {
        weaknesses.push(
            "Cap rate is below the desirable 6-8% range, reducing attractiveness for standard buy-and-hold investors."
                .to_string(),
        );
    }

    if let Some(ratio) = result.expense_ratio() {
        match ExpenseBand::classify(ratio) {
            ExpenseBand::Efficient => strengths.push(
                "Operating expenses consume a reasonable share of gross rent (<40%).".to_string(),
            ),
            ExpenseBand::High => weaknesses.push(
                "Operating expenses are elevated (>55% of gross rent), compressing net operating income."
                    .to_string(),
            ),
            ExpenseBand::Moderate => {}
        }
    }

    if let Some(ratio) = result.rent_to_value() {
        match RentToValueBand::classify(ratio) {
            RentToValueBand::Strong => strengths.push(
                "Gross rent relative to property value is strong, supporting returns.".to_string(),
            ),
            RentToValueBand::Low => weaknesses.push(
                "Gross rent is low compared to property value, which may hinder yield unless price adjusts."
                    .to_string(),
            ),
            RentToValueBand::Typical => {}
        }
    }

    if let (Some(sqft), Some(bedrooms)) = (
        attributes.known_square_footage(),
        attributes.bedrooms.filter(|beds| *beds > 0),
    ) {
        let per_bedroom = f64::from(sqft) / f64::from(bedrooms);
        if per_bedroom < COMPACT_SQFT_PER_BEDROOM {
            weaknesses.push(
                "Bedroom-to-square-footage ratio indicates smaller bedroom sizes; could affect tenant appeal."
                    .to_string(),
            );
        } else if per_bedroom > GENEROUS_SQFT_PER_BEDROOM {
            strengths.push(
                "Generous square footage per bedroom; potential for premium positioning or multi-use space."
                    .to_string(),
            );
        }
    }

    if let Some(year) = attributes.year_built.filter(|year| *year > 0) {
        if year >= MODERN_BUILD_YEAR {
            strengths.push(
                "Relatively modern construction year may reduce near-term capital expenditure risk."
                    .to_string(),
            );
        } else if year < DATED_BUILD_YEAR {
            weaknesses.push(
                "Older construction could imply higher future maintenance or capex requirements."
                    .to_string(),
            );
        }
    }

    if is_single_family(attributes) {
        strengths.push(
            "Single-family property often benefits from stable tenant demand and simpler management."
                .to_string(),
        );
    }

    ReportInsights {
        strengths,
        weaknesses,
        next_steps: next_steps(result.recommendation),
    }
}

fn next_steps(recommendation: Recommendation) -> Vec<String> {
    let steps: &[&str] = match recommendation {
        Recommendation::WorthInvesting => &[
            "Proceed to detailed due diligence: inspection, rent comparables, and verify tax history.",
        ],
        Recommendation::Maybe => &[
            "Model scenarios with negotiated purchase price or targeted expense reductions.",
            "Order a professional rent comp analysis to validate income assumptions.",
        ],
        Recommendation::NotWorthIt => &[
            "Reassess pricing or identify operational improvements before acquisition.",
            "Evaluate alternative assets with stronger NOI yield.",
        ],
    };
    steps.iter().map(|step| step.to_string()).collect()
}

fn is_single_family(attributes: &PropertyAttributes) -> bool {
    attributes
        .property_type
        .as_deref()
        .map(|kind| {
            let kind = kind.trim().to_ascii_lowercase();
            SINGLE_FAMILY_LABELS.contains(&kind.as_str())
        })
        .unwrap_or(false)
}
