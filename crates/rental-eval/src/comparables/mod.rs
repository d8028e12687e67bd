//! Sources of rental comparables for the rent estimator.

pub mod import;

use crate::analysis::domain::{Comparable, PropertyAttributes};
use crate::analysis::rent::{find_similar_properties, score_comparables};
use crate::analysis::settings::{ComparableSearch, RentModel};
use crate::lookup::Lookup;
use std::sync::Arc;

pub use import::ComparableImportError;

/// Supplies rental comparables for a subject property.
pub trait ComparableProvider: Send + Sync {
    fn comparables(&self, subject: &PropertyAttributes) -> Lookup<Vec<Comparable>>;
}

/// Provider used when no comparable source is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoComparables;

impl ComparableProvider for NoComparables {
    fn comparables(&self, _subject: &PropertyAttributes) -> Lookup<Vec<Comparable>> {
        Lookup::unavailable("no comparable source configured")
    }
}

/// Fixed comparable list, typically loaded from a CSV export. Entries are
/// scored against each subject on request.
#[derive(Debug, Clone, Default)]
pub struct StaticComparables {
    listings: Arc<Vec<Comparable>>,
}

impl StaticComparables {
    pub fn new(listings: Vec<Comparable>) -> Self {
        Self {
            listings: Arc::new(listings),
        }
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl ComparableProvider for StaticComparables {
    fn comparables(&self, subject: &PropertyAttributes) -> Lookup<Vec<Comparable>> {
        if self.listings.is_empty() {
            return Lookup::unavailable("comparable list is empty");
        }
        Lookup::Found(score_comparables(subject, self.listings.iter().cloned()))
    }
}

/// Discovers comparables among recorded properties near the subject.
#[derive(Debug, Clone)]
pub struct PoolComparableProvider {
    pool: Arc<Vec<PropertyAttributes>>,
    search: ComparableSearch,
    model: RentModel,
}

impl PoolComparableProvider {
    pub fn new(pool: Vec<PropertyAttributes>, search: ComparableSearch, model: RentModel) -> Self {
        Self {
            pool: Arc::new(pool),
            search,
            model,
        }
    }
}

impl ComparableProvider for PoolComparableProvider {
    fn comparables(&self, subject: &PropertyAttributes) -> Lookup<Vec<Comparable>> {
        if subject.coordinates().is_none() {
            return Lookup::unavailable("subject has no coordinates");
        }

        let found = find_similar_properties(subject, &self.pool, &self.search, &self.model);
        if found.is_empty() {
            Lookup::unavailable(format!(
                "no priced properties within {:.1} miles",
                self.search.radius_miles
            ))
        } else {
            Lookup::Found(found)
        }
    }
}

impl<T: ComparableProvider + ?Sized> ComparableProvider for Arc<T> {
    fn comparables(&self, subject: &PropertyAttributes) -> Lookup<Vec<Comparable>> {
        (**self).comparables(subject)
    }
}
