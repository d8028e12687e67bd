use crate::comparables::ComparableImportError;
use crate::config::ConfigError;
use crate::properties::PropertyLoadError;
use crate::service::AnalysisServiceError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Comparables(ComparableImportError),
    Properties(PropertyLoadError),
    Analysis(AnalysisServiceError),
    Serialization(serde_json::Error),
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Comparables(err) => write!(f, "comparable import error: {}", err),
            AppError::Properties(err) => write!(f, "property load error: {}", err),
            AppError::Analysis(err) => write!(f, "{}", err),
            AppError::Serialization(err) => write!(f, "serialization error: {}", err),
            AppError::InvalidInput(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Comparables(err) => Some(err),
            AppError::Properties(err) => Some(err),
            AppError::Analysis(err) => Some(err),
            AppError::Serialization(err) => Some(err),
            AppError::InvalidInput(_) => None,
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Analysis(AnalysisServiceError::PropertyNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Analysis(AnalysisServiceError::InvalidRequest(_))
            | AppError::Comparables(_)
            | AppError::Properties(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Analysis(AnalysisServiceError::Repository(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ComparableImportError> for AppError {
    fn from(value: ComparableImportError) -> Self {
        Self::Comparables(value)
    }
}

impl From<PropertyLoadError> for AppError {
    fn from(value: PropertyLoadError) -> Self {
        Self::Properties(value)
    }
}

impl From<AnalysisServiceError> for AppError {
    fn from(value: AnalysisServiceError) -> Self {
        Self::Analysis(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}
