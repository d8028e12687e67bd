use crate::analysis::domain::PropertyAttributes;
use crate::analysis::outcome::AnalysisResult;
use crate::lookup::Lookup;
use std::sync::Arc;

/// Optional narrative commentary attached to a finished analysis.
pub trait NarrativeEnricher: Send + Sync {
    fn commentary(&self, subject: &PropertyAttributes, result: &AnalysisResult) -> Lookup<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEnricher;

impl NarrativeEnricher for DisabledEnricher {
    fn commentary(&self, _subject: &PropertyAttributes, _result: &AnalysisResult) -> Lookup<String> {
        Lookup::unavailable("narrative enrichment disabled")
    }
}

impl<T: NarrativeEnricher + ?Sized> NarrativeEnricher for Arc<T> {
    fn commentary(&self, subject: &PropertyAttributes, result: &AnalysisResult) -> Lookup<String> {
        (**self).commentary(subject, result)
    }
}
