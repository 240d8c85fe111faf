//! Storage ports: repository traits for the metadata catalogue.

use std::future::Future;

use devmeta_domain::aspect::{Aspect, AspectNode};
use devmeta_domain::device_type::DeviceType;
use devmeta_domain::error::DevMetaError;
use devmeta_domain::function::Function;
use devmeta_domain::id::{AspectId, DeviceClassId, DeviceTypeId, FunctionId};

/// Repository for persisting root [`Aspect`] trees.
pub trait AspectRepository {
    /// Create a new root aspect (with its sub-aspects).
    fn create(&self, aspect: Aspect) -> impl Future<Output = Result<Aspect, DevMetaError>> + Send;

    /// Get a root aspect by its unique identifier.
    fn get_by_id(
        &self,
        id: AspectId,
    ) -> impl Future<Output = Result<Option<Aspect>, DevMetaError>> + Send;

    /// Get every root aspect, in storage order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Aspect>, DevMetaError>> + Send;

    /// Replace an existing root aspect.
    fn update(&self, aspect: Aspect) -> impl Future<Output = Result<Aspect, DevMetaError>> + Send;

    /// Delete a root aspect by its unique identifier.
    fn delete(&self, id: AspectId) -> impl Future<Output = Result<(), DevMetaError>> + Send;
}

/// Repository for the flattened aspect closure.
pub trait AspectNodeRepository {
    /// Get one node by aspect id.
    fn get_by_id(
        &self,
        id: AspectId,
    ) -> impl Future<Output = Result<Option<AspectNode>, DevMetaError>> + Send;

    /// Get every known node among `ids`. Unknown ids are skipped.
    fn list_by_ids(
        &self,
        ids: Vec<AspectId>,
    ) -> impl Future<Output = Result<Vec<AspectNode>, DevMetaError>> + Send;

    /// Replace the whole closure with `nodes`.
    fn replace_all(
        &self,
        nodes: Vec<AspectNode>,
    ) -> impl Future<Output = Result<(), DevMetaError>> + Send;
}

/// Repository for [`Function`] lookups.
pub trait FunctionRepository {
    fn get_by_id(
        &self,
        id: FunctionId,
    ) -> impl Future<Output = Result<Option<Function>, DevMetaError>> + Send;

    /// Get every known function among `ids`. Unknown ids are skipped.
    fn list_by_ids(
        &self,
        ids: Vec<FunctionId>,
    ) -> impl Future<Output = Result<Vec<Function>, DevMetaError>> + Send;
}

/// Storage-side pre-filter for device type listings. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceTypeListOptions {
    pub ids: Option<Vec<DeviceTypeId>>,
    pub device_class_ids: Option<Vec<DeviceClassId>>,
    /// Keep device types with at least one variable tagged by one of these.
    pub function_ids: Option<Vec<FunctionId>>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl DeviceTypeListOptions {
    /// Whether `device_type` passes every set filter (pagination excluded).
    #[must_use]
    pub fn accepts(&self, device_type: &DeviceType) -> bool {
        if let Some(ids) = &self.ids {
            if !ids.contains(&device_type.id) {
                return false;
            }
        }
        if let Some(classes) = &self.device_class_ids {
            if !classes.contains(&device_type.device_class_id) {
                return false;
            }
        }
        if let Some(functions) = &self.function_ids {
            if !device_type.uses_any_function(functions) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !device_type
                .name
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Repository for querying [`DeviceType`]s.
pub trait DeviceTypeRepository {
    fn get_by_id(
        &self,
        id: DeviceTypeId,
    ) -> impl Future<Output = Result<Option<DeviceType>, DevMetaError>> + Send;

    /// List device types passing `options`, in storage order.
    fn list(
        &self,
        options: DeviceTypeListOptions,
    ) -> impl Future<Output = Result<Vec<DeviceType>, DevMetaError>> + Send;
}
