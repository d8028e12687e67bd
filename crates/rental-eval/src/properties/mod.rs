//! Property records and the storage seam the analysis service reads from.

use crate::analysis::domain::PropertyAttributes;
use std::io::Read;
use std::path::Path;

/// Read access to recorded properties.
pub trait PropertyRepository: Send + Sync {
    fn fetch(&self, id: &str) -> Result<Option<PropertyAttributes>, RepositoryError>;
    /// Case-insensitive substring match on the display address.
    fn find_by_address(&self, fragment: &str) -> Result<Vec<PropertyAttributes>, RepositoryError>;
    fn all(&self) -> Result<Vec<PropertyAttributes>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyLoadError {
    #[error("failed to read property records: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid property JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PropertyAttributes>, PropertyLoadError> {
    let file = std::fs::File::open(path)?;
    load_from_reader(std::io::BufReader::new(file))
}

/// Reads a JSON array of property records.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<PropertyAttributes>, PropertyLoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Shared address matching so every repository filters the same way.
pub fn address_matches(property: &PropertyAttributes, fragment: &str) -> bool {
    let needle = fragment.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    property.display_address().to_lowercase().contains(&needle)
}
