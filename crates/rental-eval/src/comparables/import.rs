use crate::analysis::domain::Comparable;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ComparableImportError {
    #[error("failed to read comparable export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid comparable CSV data: {0}")]
    Csv(#[from] csv::Error),
}

pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Comparable>, ComparableImportError> {
    let file = std::fs::File::open(path)?;
    from_reader(file)
}

/// Parses a listing export. Rows without a positive price are skipped.
pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Comparable>, ComparableImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut comparables = Vec::new();

    for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
        let row = record?;
        match row.into_comparable() {
            Some(comparable) => comparables.push(comparable),
            None => debug!(row = index + 1, "skipping listing without a usable price"),
        }
    }

    Ok(comparables)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Address", default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(rename = "Latitude", default, deserialize_with = "empty_string_as_none")]
    latitude: Option<String>,
    #[serde(rename = "Longitude", default, deserialize_with = "empty_string_as_none")]
    longitude: Option<String>,
    #[serde(rename = "Bedrooms", default, deserialize_with = "empty_string_as_none")]
    bedrooms: Option<String>,
    #[serde(rename = "Bathrooms", default, deserialize_with = "empty_string_as_none")]
    bathrooms: Option<String>,
    #[serde(
        rename = "Square Footage",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    square_footage: Option<String>,
    #[serde(
        rename = "Property Type",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    property_type: Option<String>,
    #[serde(rename = "Distance", default, deserialize_with = "empty_string_as_none")]
    distance: Option<String>,
    #[serde(
        rename = "Correlation",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    correlation: Option<String>,
}

impl ListingRow {
    fn into_comparable(self) -> Option<Comparable> {
        let price = parse_number(self.price.as_deref()).filter(|price| *price > 0.0)?;

        Some(Comparable {
            id: None,
            formatted_address: self.address,
            price,
            latitude: parse_number(self.latitude.as_deref()),
            longitude: parse_number(self.longitude.as_deref()),
            bedrooms: parse_count(self.bedrooms.as_deref()),
            bathrooms: parse_number(self.bathrooms.as_deref()).filter(|baths| *baths >= 0.0),
            square_footage: parse_count(self.square_footage.as_deref()),
            property_type: self.property_type,
            distance: parse_number(self.distance.as_deref()).filter(|miles| *miles >= 0.0),
            correlation: parse_number(self.correlation.as_deref())
                .filter(|score| (0.0..=1.0).contains(score)),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts exported figures such as `$2,150` or `1,420`.
fn parse_number(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .chars()
        .filter(|ch| !matches!(ch, '$' | ',' | ' '))
        .collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_count(raw: Option<&str>) -> Option<u32> {
    parse_number(raw)
        .filter(|value| *value >= 0.0 && *value <= f64::from(u32::MAX))
        .map(|value| value.round() as u32)
}
