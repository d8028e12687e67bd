use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use rental_eval::analysis::PropertyAttributes;
use rental_eval::properties::{address_matches, PropertyRepository, RepositoryError};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Property records loaded at startup, kept in file order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyRepository {
    records: Arc<RwLock<Vec<PropertyAttributes>>>,
}

impl InMemoryPropertyRepository {
    pub(crate) fn new(records: Vec<PropertyAttributes>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, Vec<PropertyAttributes>>, RepositoryError> {
        self.records
            .read()
            .map_err(|_| RepositoryError::Unavailable("property store lock poisoned".to_string()))
    }
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn fetch(&self, id: &str) -> Result<Option<PropertyAttributes>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .iter()
            .find(|record| record.id.as_deref() == Some(id))
            .cloned())
    }

    fn find_by_address(&self, fragment: &str) -> Result<Vec<PropertyAttributes>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .iter()
            .filter(|record| address_matches(record, fragment))
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<PropertyAttributes>, RepositoryError> {
        Ok(self.read()?.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
