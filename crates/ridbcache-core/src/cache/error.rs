use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;

/// Failure of a cache operation that had to reach the remote catalog.
///
/// Absent data is not an error: lookups report it as `None` or as an empty
/// collection.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Remote(#[from] ApiError),

    #[error("Catalog request timed out after {after:?}: {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Remote(err) if err.is_not_found())
    }
}
