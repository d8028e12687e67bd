use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::{AnalysisOutcome, AnalysisService, AnalysisServiceError};
use crate::analysis::domain::{CalculationMode, Comparable, ExpenseOverrides, PropertyAttributes};
use crate::analysis::outcome::AnalysisRequest;
use crate::comparables::ComparableProvider;
use crate::enrichment::NarrativeEnricher;
use crate::error::AppError;
use crate::properties::PropertyRepository;

/// Options shared by every analysis endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default, alias = "expense_overrides")]
    pub overrides: Option<ExpenseOverrides>,
    #[serde(default)]
    pub monthly_rent: Option<f64>,
    #[serde(default)]
    pub calculation_mode: Option<CalculationMode>,
    #[serde(default)]
    pub cap_rate_threshold: Option<f64>,
    #[serde(default)]
    pub comparables: Option<Vec<Comparable>>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl AnalysisOptions {
    pub fn into_request(self, today: NaiveDate) -> Result<AnalysisRequest, AnalysisServiceError> {
        if let Some(threshold) = self.cap_rate_threshold {
            if !(threshold.is_finite() && threshold > 0.0) {
                return Err(AnalysisServiceError::InvalidRequest(
                    "cap_rate_threshold must be a positive percentage".to_string(),
                ));
            }
        }
        if let Some(rent) = self.monthly_rent {
            if !(rent.is_finite() && rent >= 0.0) {
                return Err(AnalysisServiceError::InvalidRequest(
                    "monthly_rent must be a non-negative amount".to_string(),
                ));
            }
        }

        Ok(AnalysisRequest {
            overrides: self.overrides,
            monthly_rent: self.monthly_rent,
            calculation_mode: self.calculation_mode.unwrap_or_default(),
            cap_rate_threshold: self.cap_rate_threshold,
            comparables: self.comparables,
            as_of: self.as_of.unwrap_or(today),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PropertyAnalysisPayload {
    pub property: PropertyAttributes,
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

#[derive(Debug, Deserialize)]
pub struct AddressAnalysisPayload {
    pub address: String,
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    #[serde(default)]
    pub calculation_mode: Option<String>,
    #[serde(default)]
    pub cap_rate_threshold: Option<f64>,
    #[serde(default)]
    pub monthly_rent: Option<f64>,
}

impl AnalysisQuery {
    fn into_options(self) -> Result<AnalysisOptions, AnalysisServiceError> {
        let calculation_mode = self
            .calculation_mode
            .as_deref()
            .map(str::parse::<CalculationMode>)
            .transpose()
            .map_err(AnalysisServiceError::InvalidRequest)?;

        Ok(AnalysisOptions {
            calculation_mode,
            cap_rate_threshold: self.cap_rate_threshold,
            monthly_rent: self.monthly_rent,
            ..AnalysisOptions::default()
        })
    }
}

/// Router exposing the analysis endpoints.
pub fn analysis_router<R, C, N>(service: Arc<AnalysisService<R, C, N>>) -> Router
where
    R: PropertyRepository + 'static,
    C: ComparableProvider + 'static,
    N: NarrativeEnricher + 'static,
{
    Router::new()
        .route("/api/v1/analysis", post(analyze_handler::<R, C, N>))
        .route(
            "/api/v1/properties/analyze",
            post(analyze_address_handler::<R, C, N>),
        )
        .route("/api/v1/properties/:id", get(property_handler::<R, C, N>))
        .route(
            "/api/v1/properties/:id/analysis",
            get(property_analysis_handler::<R, C, N>),
        )
        .with_state(service)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn analyze_handler<R, C, N>(
    State(service): State<Arc<AnalysisService<R, C, N>>>,
    Json(payload): Json<PropertyAnalysisPayload>,
) -> Result<Json<AnalysisOutcome>, AppError>
where
    R: PropertyRepository + 'static,
    C: ComparableProvider + 'static,
    N: NarrativeEnricher + 'static,
{
    let request = payload.options.into_request(today())?;
    Ok(Json(service.analyze_property(&payload.property, request)))
}

pub(crate) async fn analyze_address_handler<R, C, N>(
    State(service): State<Arc<AnalysisService<R, C, N>>>,
    Json(payload): Json<AddressAnalysisPayload>,
) -> Result<Json<AnalysisOutcome>, AppError>
where
    R: PropertyRepository + 'static,
    C: ComparableProvider + 'static,
    N: NarrativeEnricher + 'static,
{
    let request = payload.options.into_request(today())?;
    Ok(Json(service.analyze_by_address(&payload.address, request)?))
}

pub(crate) async fn property_handler<R, C, N>(
    State(service): State<Arc<AnalysisService<R, C, N>>>,
    Path(id): Path<String>,
) -> Result<Json<PropertyAttributes>, AppError>
where
    R: PropertyRepository + 'static,
    C: ComparableProvider + 'static,
    N: NarrativeEnricher + 'static,
{
    Ok(Json(service.property(&id)?))
}

pub(crate) async fn property_analysis_handler<R, C, N>(
    State(service): State<Arc<AnalysisService<R, C, N>>>,
    Path(id): Path<String>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisOutcome>, AppError>
where
    R: PropertyRepository + 'static,
    C: ComparableProvider + 'static,
    N: NarrativeEnricher + 'static,
{
    let request = query.into_options()?.into_request(today())?;
    Ok(Json(service.analyze_by_id(&id, request)?))
}
