//! Composes the property repository, comparable source, and narrative
//! enricher around the cap-rate analyzer.

pub mod router;

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::domain::PropertyAttributes;
use crate::analysis::outcome::{AnalysisRequest, AnalysisResult};
use crate::analysis::report::render_report;
use crate::analysis::settings::AnalysisSettings;
use crate::analysis::CapRateAnalyzer;
use crate::comparables::ComparableProvider;
use crate::enrichment::NarrativeEnricher;
use crate::lookup::Lookup;
use crate::properties::{PropertyRepository, RepositoryError};

pub use router::analysis_router;

/// Analysis of one property together with its rendered report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    pub property: PropertyAttributes,
    pub result: AnalysisResult,
    pub report: String,
}

pub struct AnalysisService<R, C, N> {
    repository: Arc<R>,
    comparables: Arc<C>,
    enricher: Arc<N>,
    analyzer: Arc<CapRateAnalyzer>,
}

impl<R, C, N> AnalysisService<R, C, N>
where
    R: PropertyRepository + 'static,
    C: ComparableProvider + 'static,
    N: NarrativeEnricher + 'static,
{
    pub fn new(
        repository: Arc<R>,
        comparables: Arc<C>,
        enricher: Arc<N>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            repository,
            comparables,
            enricher,
            analyzer: Arc::new(CapRateAnalyzer::new(settings)),
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        self.analyzer.settings()
    }

    /// Analyzes a caller-supplied property. Comparables from the configured
    /// provider are used only when the request carries neither an explicit
    /// rent nor its own comparables.
    pub fn analyze_property(
        &self,
        property: &PropertyAttributes,
        request: AnalysisRequest,
    ) -> AnalysisOutcome {
        let request = self.with_provider_comparables(property, request);
        let mut result = self.analyzer.analyze(property, &request);

        match self.enricher.commentary(property, &result) {
            Lookup::Found(commentary) => result.commentary = Some(commentary),
            Lookup::Unavailable { reason } => debug!(%reason, "narrative commentary unavailable"),
        }

        let report = render_report(property, &result);
        AnalysisOutcome {
            property: property.clone(),
            result,
            report,
        }
    }

    pub fn property(&self, id: &str) -> Result<PropertyAttributes, AnalysisServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| AnalysisServiceError::PropertyNotFound(id.to_string()))
    }

    pub fn analyze_by_id(
        &self,
        id: &str,
        request: AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisServiceError> {
        let property = self.property(id)?;
        Ok(self.analyze_property(&property, request))
    }

    /// Analyzes the first recorded property whose address contains `fragment`.
    pub fn analyze_by_address(
        &self,
        fragment: &str,
        request: AnalysisRequest,
    ) -> Result<AnalysisOutcome, AnalysisServiceError> {
        if fragment.trim().is_empty() {
            return Err(AnalysisServiceError::InvalidRequest(
                "address must not be empty".to_string(),
            ));
        }

        let matches = self.repository.find_by_address(fragment)?;
        if matches.len() > 1 {
            info!(
                address = fragment,
                matches = matches.len(),
                "address matched several properties; using the first"
            );
        }
        let property = matches
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisServiceError::PropertyNotFound(fragment.to_string()))?;

        Ok(self.analyze_property(&property, request))
    }

    fn with_provider_comparables(
        &self,
        property: &PropertyAttributes,
        mut request: AnalysisRequest,
    ) -> AnalysisRequest {
        let has_rent = request.monthly_rent.is_some_and(|rent| rent > 0.0)
            || request
                .overrides
                .as_ref()
                .and_then(|overrides| overrides.monthly_rent)
                .is_some_and(|rent| rent > 0.0);
        let has_comparables = request
            .comparables
            .as_ref()
            .is_some_and(|comparables| !comparables.is_empty());
        if has_rent || has_comparables {
            return request;
        }

        match self.comparables.comparables(property) {
            Lookup::Found(found) => {
                debug!(count = found.len(), "using provider comparables");
                request.comparables = Some(found);
            }
            Lookup::Unavailable { reason } => {
                info!(%reason, "comparables unavailable; estimating rent from attributes");
            }
        }
        request
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("property not found: {0}")]
    PropertyNotFound(String),
    #[error("invalid analysis request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
