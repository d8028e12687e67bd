use chrono::NaiveDate;

use crate::analysis::domain::{Comparable, PropertyAttributes};
use crate::analysis::outcome::AnalysisRequest;

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

pub(super) fn request() -> AnalysisRequest {
    AnalysisRequest::new(as_of())
}

/// 1,500 sq ft single family sold for $300,000 eighteen months before `as_of`.
pub(super) fn subject() -> PropertyAttributes {
    PropertyAttributes {
        id: Some("prop-100".to_string()),
        formatted_address: Some("100 Main St, Springfield, IL 62701".to_string()),
        city: Some("Springfield".to_string()),
        state: Some("IL".to_string()),
        zip_code: Some("62701".to_string()),
        latitude: Some(39.7817),
        longitude: Some(-89.6501),
        property_type: Some("Single Family".to_string()),
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        square_footage: Some(1500),
        year_built: Some(2010),
        last_sale_date: NaiveDate::from_ymd_opt(2023, 6, 1),
        last_sale_price: Some(300_000.0),
        ..PropertyAttributes::default()
    }
}

pub(super) fn comparable(price: f64, correlation: f64, distance: f64) -> Comparable {
    Comparable {
        price,
        correlation: Some(correlation),
        distance: Some(distance),
        ..Comparable::default()
    }
}
