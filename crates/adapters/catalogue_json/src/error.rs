//! Catalogue-specific error type.

use devmeta_domain::error::DevMetaError;

/// Errors originating from the catalogue snapshot.
#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    /// The snapshot file could not be read.
    #[error("failed to read catalogue file")]
    Io(#[from] std::io::Error),

    /// The snapshot is not valid JSON for a [`Catalogue`](crate::Catalogue).
    #[error("failed to parse catalogue")]
    Json(#[from] serde_json::Error),
}

impl From<CatalogueError> for DevMetaError {
    fn from(err: CatalogueError) -> Self {
        Self::Storage(Box::new(err))
    }
}
