//! Catalogue snapshot format and loading.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use devmeta_domain::aspect::Aspect;
use devmeta_domain::device_type::DeviceType;
use devmeta_domain::error::DevMetaError;
use devmeta_domain::function::Function;

use crate::error::CatalogueError;
use crate::store::CatalogueStore;

/// Everything the service knows about, as stored in the snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default)]
    pub aspects: Vec<Aspect>,
    #[serde(default)]
    pub functions: Vec<Function>,
    #[serde(default)]
    pub device_types: Vec<DeviceType>,
}

impl Catalogue {
    /// Parse a snapshot from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Json`] if the text is not a valid catalogue.
    pub fn from_json(text: &str) -> Result<Self, CatalogueError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validate every aspect, function and device type.
    ///
    /// # Errors
    ///
    /// Returns the first [`DevMetaError::Validation`] found.
    pub fn validate(&self) -> Result<(), DevMetaError> {
        self.aspects.iter().try_for_each(Aspect::validate)?;
        self.functions.iter().try_for_each(Function::validate)?;
        self.device_types.iter().try_for_each(DeviceType::validate)
    }
}

/// Configuration for the catalogue adapter.
pub struct Config {
    /// Path of the JSON snapshot.
    pub path: PathBuf,
}

impl Config {
    /// Read, validate and index the snapshot.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be read or parsed,
    /// [`DevMetaError::Validation`] for invalid entries, or
    /// [`DevMetaError::Consistency`] if the aspects do not form a forest.
    pub async fn build(self) -> Result<CatalogueStore, DevMetaError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(CatalogueError::from)?;
        let catalogue = Catalogue::from_json(&text)?;
        catalogue.validate()?;
        tracing::info!(
            path = %self.path.display(),
            aspects = catalogue.aspects.len(),
            functions = catalogue.functions.len(),
            device_types = catalogue.device_types.len(),
            "catalogue loaded"
        );
        CatalogueStore::new(catalogue)
    }
}
