use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPropertyRepository};
use crate::routes::with_analysis_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rental_eval::comparables::PoolComparableProvider;
use rental_eval::config::AppConfig;
use rental_eval::enrichment::DisabledEnricher;
use rental_eval::error::AppError;
use rental_eval::properties::{self, PropertyRepository};
use rental_eval::service::{AnalysisService, AnalysisServiceError};
use rental_eval::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let records = match args.properties.take() {
        Some(path) => {
            let records = properties::load_from_path(&path)?;
            info!(count = records.len(), path = %path.display(), "loaded property records");
            records
        }
        None => {
            warn!("no property file supplied; lookup endpoints will return 404");
            Vec::new()
        }
    };

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryPropertyRepository::new(records));
    let comparables = PoolComparableProvider::new(
        repository.all().map_err(AnalysisServiceError::from)?,
        config.analysis.comparables.clone(),
        config.analysis.rent.clone(),
    );
    let analysis_service = Arc::new(AnalysisService::new(
        repository,
        Arc::new(comparables),
        Arc::new(DisabledEnricher),
        config.analysis.clone(),
    ));

    let app = with_analysis_routes(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        cap_rate_threshold = config.analysis.recommendation.threshold,
        "rental evaluator ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
