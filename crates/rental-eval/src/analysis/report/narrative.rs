use super::super::domain::PropertyAttributes;
use super::super::outcome::AnalysisResult;
use super::format::{count, currency, percent};
use super::insights::{generate_insights, ExpenseBand, RentToValueBand};

const NO_STRENGTHS: &str = "No pronounced strengths identified from available data.";
const NO_WEAKNESSES: &str = "No critical weaknesses surfaced; still perform onsite due diligence.";

/// Plain-text investment report for a property and its analysis.
pub fn render_report(attributes: &PropertyAttributes, result: &AnalysisResult) -> String {
    let mut lines: Vec<String> = vec![
        "Property Investment Analysis Report".to_string(),
        String::new(),
    ];

    push_subject(&mut lines, attributes);
    lines.push(String::new());
    push_metrics(&mut lines, result);

    if result.details.rent_range.is_some() && result.details.scenarios.len() > 1 {
        lines.push(String::new());
        lines.push("Rent Scenarios:".to_string());
        for outcome in &result.details.scenarios {
            lines.push(format!(
                "  - {}: {}/month -> NOI {}, cap rate {:.2}%{}",
                outcome.scenario.label(),
                currency(outcome.monthly_rent),
                currency(outcome.noi),
                outcome.cap_rate_percent,
                if outcome.meets_threshold {
                    " (meets target)"
                } else {
                    ""
                }
            ));
        }
    }

    lines.push(String::new());
    push_context(&mut lines, result);

    let insights = generate_insights(attributes, result);
    lines.push(String::new());
    lines.push("Strengths:".to_string());
    push_bullets(&mut lines, &insights.strengths, NO_STRENGTHS);

    lines.push(String::new());
    lines.push("Weaknesses / Watch Items:".to_string());
    push_bullets(&mut lines, &insights.weaknesses, NO_WEAKNESSES);

    lines.push(String::new());
    lines.push("Recommended Next Steps:".to_string());
    push_bullets(&mut lines, &insights.next_steps, "");

    if let Some(commentary) = result
        .commentary
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        lines.push(String::new());
        lines.push("Analyst Commentary:".to_string());
        lines.extend(commentary.lines().map(|line| format!("  {line}")));
    }

    lines.join("\n")
}

fn push_subject(lines: &mut Vec<String>, attributes: &PropertyAttributes) {
    lines.push(format!("Subject Property: {}", attributes.display_address()));
    lines.push(format!(
        "Type: {}",
        attributes.property_type.as_deref().unwrap_or("Unknown")
    ));

    if attributes.bedrooms.is_some() || attributes.bathrooms.is_some() {
        let bedrooms = attributes
            .bedrooms
            .map(|beds| beds.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let bathrooms = attributes
            .bathrooms
            .map(count)
            .unwrap_or_else(|| "N/A".to_string());
        lines.push(format!("Configuration: {bedrooms} BR / {bathrooms} BA"));
    }

    if let Some(sqft) = attributes.known_square_footage() {
        lines.push(format!(
            "Approximate Size: {} sq ft",
            currency(f64::from(sqft)).trim_start_matches('$')
        ));
    }

    if let Some(year) = attributes.year_built.filter(|year| *year > 0) {
        lines.push(format!("Year Built: {year}"));
    }
}

fn push_metrics(lines: &mut Vec<String>, result: &AnalysisResult) {
    lines.push("Key Financial Metrics:".to_string());
    lines.push(format!("  - Estimated Value: {}", currency(result.value)));
    lines.push(format!(
        "  - Estimated Monthly Rent: {}",
        currency(result.monthly_rent)
    ));
    lines.push(format!(
        "  - Estimated Annual Rent: {}",
        currency(result.annual_rent)
    ));
    lines.push(format!(
        "  - Estimated Annual Operating Expenses: {}",
        currency(result.annual_expenses)
    ));
    lines.push(format!(
        "  - Net Operating Income (NOI): {}",
        currency(result.noi)
    ));
    lines.push(format!("  - Cap Rate: {:.2}%", result.cap_rate_percent));
    lines.push(format!(
        "  - Decision: {}",
        result.recommendation.decision()
    ));
    lines.push(format!(
        "  - Calculation Mode: {}",
        result.details.calculation_mode.label()
    ));
}

fn push_context(lines: &mut Vec<String>, result: &AnalysisResult) {
    lines.push("Cap Rate Context:".to_string());

    lines.push(format!(
        "  The cap rate of {:.2}% represents the unlevered annual return based on current NOI \
         and estimated value. Against a {:.1}% target, this property's cap rate suggests: {}.",
        result.cap_rate_percent,
        result.details.cap_rate_threshold,
        result.recommendation.label()
    ));

    if !result.is_assessed() {
        lines.push(format!("  Assessment note: {}", result.explanation));
        return;
    }

    if let (Some(expense_ratio), Some(rent_to_value)) =
        (result.expense_ratio(), result.rent_to_value())
    {
        lines.push(format!(
            "  Expense Ratio (OpEx / Gross Rent): {} - {}",
            percent(expense_ratio, 1),
            ExpenseBand::classify(expense_ratio).commentary()
        ));
        lines.push(format!(
            "  Gross Rent-to-Value Ratio: {} - {}",
            percent(rent_to_value, 2),
            RentToValueBand::classify(rent_to_value).commentary()
        ));
    }
}

fn push_bullets(lines: &mut Vec<String>, items: &[String], placeholder: &str) {
    if items.is_empty() {
        if !placeholder.is_empty() {
            lines.push(format!("  - {placeholder}"));
        }
        return;
    }
    lines.extend(items.iter().map(|item| format!("  - {item}")));
}
