use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Property record as supplied by the data provider. Every field is optional;
/// absence means "unknown", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAttributes {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "formatted_address")]
    pub formatted_address: Option<String>,
    #[serde(default, alias = "address_line1")]
    pub address_line1: Option<String>,
    #[serde(default, alias = "address_line2")]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "zip_code")]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, alias = "property_type")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub bathrooms: Option<f64>,
    #[serde(default, alias = "square_footage", deserialize_with = "lenient_whole")]
    pub square_footage: Option<u32>,
    #[serde(default, alias = "lot_size", deserialize_with = "lenient_whole")]
    pub lot_size: Option<u32>,
    #[serde(default, alias = "year_built", deserialize_with = "lenient_whole")]
    pub year_built: Option<i32>,
    #[serde(default, alias = "last_sale_date", deserialize_with = "lenient_date")]
    pub last_sale_date: Option<NaiveDate>,
    #[serde(default, alias = "last_sale_price", deserialize_with = "lenient_amount")]
    pub last_sale_price: Option<f64>,
    #[serde(default, alias = "property_taxes")]
    pub property_taxes: BTreeMap<String, PropertyTax>,
    #[serde(default)]
    pub hoa: Option<HoaFee>,
}

impl PropertyAttributes {
    pub fn physical(&self) -> PhysicalProfile<'_> {
        PhysicalProfile {
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_footage: self.square_footage,
            property_type: self.property_type.as_deref(),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Square footage, treating a recorded zero as unknown.
    pub fn known_square_footage(&self) -> Option<u32> {
        self.square_footage.filter(|sqft| *sqft > 0)
    }

    /// Recorded tax total for the numerically largest year key. Keys that do not
    /// parse as a year are skipped; a non-positive total counts as missing.
    pub fn most_recent_tax(&self) -> Option<(i32, f64)> {
        self.property_taxes
            .iter()
            .filter_map(|(key, tax)| key.trim().parse::<i32>().ok().map(|year| (year, tax)))
            .max_by_key(|(year, _)| *year)
            .and_then(|(year, tax)| {
                tax.total
                    .filter(|total| total.is_finite() && *total > 0.0)
                    .map(|total| (year, total))
            })
    }

    pub fn recorded_hoa_monthly(&self) -> Option<f64> {
        self.hoa
            .as_ref()
            .and_then(|hoa| hoa.fee)
            .filter(|fee| fee.is_finite() && *fee > 0.0)
    }

    pub fn display_address(&self) -> String {
        if let Some(formatted) = self
            .formatted_address
            .as_deref()
            .filter(|value| !value.trim().is_empty())
        {
            return formatted.to_string();
        }

        let line1 = self
            .address_line1
            .as_deref()
            .unwrap_or("(Street Unknown)");
        format!(
            "{}, {}, {} {}",
            line1,
            self.city.as_deref().unwrap_or(""),
            self.state.as_deref().unwrap_or(""),
            self.zip_code.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyTax {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoaFee {
    #[serde(default, alias = "monthlyFee")]
    pub fee: Option<f64>,
}

/// The attributes the similarity scorer compares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalProfile<'a> {
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<u32>,
    pub property_type: Option<&'a str>,
}

/// Candidate property used to infer market rent. `price` is the observed
/// monthly rent; `distance` (miles) and `correlation` are filled in once scored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparable {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default, alias = "formatted_address")]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_whole")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub bathrooms: Option<f64>,
    #[serde(default, alias = "square_footage", deserialize_with = "lenient_whole")]
    pub square_footage: Option<u32>,
    #[serde(default, alias = "property_type")]
    pub property_type: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub correlation: Option<f64>,
}

impl Comparable {
    pub fn physical(&self) -> PhysicalProfile<'_> {
        PhysicalProfile {
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_footage: self.square_footage,
            property_type: self.property_type.as_deref(),
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Per-request overrides. Rates are fractions (0.10 = 10%); absolute amounts are
/// dollars. Malformed values deserialize as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseOverrides {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub property_management_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub maintenance_repairs_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub vacancy_allowance_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub insurance_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub property_tax_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub utilities_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub hoa_monthly: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub hoa_annual: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub taxes_annual: Option<f64>,
    #[serde(
        default,
        alias = "monthlyRent",
        deserialize_with = "lenient_amount"
    )]
    pub monthly_rent: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    Gross,
    #[default]
    Net,
}

impl CalculationMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gross => "gross",
            Self::Net => "net",
        }
    }
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CalculationMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gross" => Ok(Self::Gross),
            "net" => Ok(Self::Net),
            other => Err(format!("unknown calculation mode '{other}' (expected gross or net)")),
        }
    }
}

/// Investment recommendation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    WorthInvesting,
    Maybe,
    NotWorthIt,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::WorthInvesting => "Worth investing",
            Self::Maybe => "Maybe",
            Self::NotWorthIt => "Not worth it",
        }
    }

    pub const fn decision(self) -> &'static str {
        match self {
            Self::WorthInvesting => "Invest",
            Self::Maybe => "Consider",
            Self::NotWorthIt => "Do Not Invest",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(value)) if !value.trim().is_empty() => Some(value),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|value| value.is_finite() && *value >= 0.0))
}

/// Whole numbers given as integers, integral floats (`1500.0`), or numeric
/// strings. Fractions and out-of-range values are treated as unknown.
fn lenient_whole<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_i64().or_else(|| whole(number.as_f64()?)),
        Some(Value::String(raw)) => {
            let raw = raw.trim();
            raw.parse::<i64>()
                .ok()
                .or_else(|| whole(raw.parse::<f64>().ok()?))
        }
        _ => None,
    };
    Ok(parsed.and_then(|value| T::try_from(value).ok()))
}

fn whole(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15).then(|| value as i64)
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => raw,
        _ => return Ok(None),
    };
    Ok(parse_date(&raw))
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attributes_accept_camel_and_snake_case() {
        let camel: PropertyAttributes = serde_json::from_value(json!({
            "id": 42,
            "formattedAddress": "12 Elm St, Austin, TX 78701",
            "squareFootage": 1500,
            "lastSalePrice": 300000,
            "lastSaleDate": "2019-06-01T00:00:00.000Z",
            "hoa": { "fee": 125 }
        }))
        .expect("camelCase parses");
        let snake: PropertyAttributes = serde_json::from_value(json!({
            "formatted_address": "12 Elm St, Austin, TX 78701",
            "square_footage": 1500,
            "last_sale_price": 300000,
            "last_sale_date": "2019-06-01"
        }))
        .expect("snake_case parses");

        assert_eq!(camel.id.as_deref(), Some("42"));
        assert_eq!(camel.square_footage, snake.square_footage);
        assert_eq!(camel.last_sale_date, snake.last_sale_date);
        assert_eq!(camel.recorded_hoa_monthly(), Some(125.0));
    }

    #[test]
    fn whole_number_floats_and_strings_are_accepted() {
        let attrs: PropertyAttributes = serde_json::from_value(json!({
            "squareFootage": 1500.0,
            "bedrooms": "3",
            "bathrooms": "2.5",
            "yearBuilt": 1998.0,
            "lotSize": 6000,
            "lastSalePrice": "300000"
        }))
        .expect("float-valued record parses");

        assert_eq!(attrs.square_footage, Some(1500));
        assert_eq!(attrs.bedrooms, Some(3));
        assert_eq!(attrs.bathrooms, Some(2.5));
        assert_eq!(attrs.year_built, Some(1998));
        assert_eq!(attrs.lot_size, Some(6000));
        assert_eq!(attrs.last_sale_price, Some(300_000.0));
    }

    #[test]
    fn odd_numeric_fields_are_treated_as_unknown() {
        let attrs: PropertyAttributes = serde_json::from_value(json!({
            "squareFootage": 1500.5,
            "bedrooms": -2,
            "yearBuilt": "circa 1920",
            "lotSize": true
        }))
        .expect("record still parses");

        assert_eq!(attrs.square_footage, None);
        assert_eq!(attrs.bedrooms, None);
        assert_eq!(attrs.year_built, None);
        assert_eq!(attrs.lot_size, None);

        let comparable: Comparable =
            serde_json::from_value(json!({ "price": 2100, "squareFootage": 1400.0 }))
                .expect("comparable parses");
        assert_eq!(comparable.square_footage, Some(1400));
    }

    #[test]
    fn unparseable_sale_date_is_treated_as_missing() {
        let attrs: PropertyAttributes =
            serde_json::from_value(json!({ "lastSaleDate": "last spring" })).expect("parses");
        assert!(attrs.last_sale_date.is_none());
    }

    #[test]
    fn most_recent_tax_uses_largest_numeric_year() {
        let attrs: PropertyAttributes = serde_json::from_value(json!({
            "propertyTaxes": {
                "2021": { "year": 2021, "total": 3000 },
                "2023": { "year": 2023, "total": 3400 },
                "2009": { "year": 2009, "total": 9999 },
                "bogus": { "total": 50000 }
            }
        }))
        .expect("parses");

        assert_eq!(attrs.most_recent_tax(), Some((2023, 3400.0)));
    }

    #[test]
    fn malformed_overrides_are_ignored() {
        let overrides: ExpenseOverrides = serde_json::from_value(json!({
            "taxes_annual": "not a number",
            "hoa_monthly": "150",
            "insurance_rate": -0.5,
            "utilities_rate": true,
            "property_management_rate": 0.08
        }))
        .expect("lenient overrides parse");

        assert_eq!(overrides.taxes_annual, None);
        assert_eq!(overrides.hoa_monthly, Some(150.0));
        assert_eq!(overrides.insurance_rate, None);
        assert_eq!(overrides.utilities_rate, None);
        assert_eq!(overrides.property_management_rate, Some(0.08));
    }

    #[test]
    fn display_address_falls_back_to_components() {
        let attrs = PropertyAttributes {
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            zip_code: Some("78701".to_string()),
            ..PropertyAttributes::default()
        };
        assert_eq!(attrs.display_address(), "(Street Unknown), Austin, TX 78701");
    }

    #[test]
    fn calculation_mode_parses_case_insensitively() {
        assert_eq!("GROSS".parse::<CalculationMode>(), Ok(CalculationMode::Gross));
        assert_eq!(" net ".parse::<CalculationMode>(), Ok(CalculationMode::Net));
        assert!("levered".parse::<CalculationMode>().is_err());
    }
}
