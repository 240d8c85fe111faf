//! Device group service: validation and criteria reduction.

use devmeta_domain::aspect::AspectNodeIndex;
use devmeta_domain::device_group::DeviceGroup;
use devmeta_domain::error::DevMetaError;

use crate::device_group_reducer::reduce_device_group_criteria;
use crate::ports::AspectNodeRepository;

/// Application service preparing device groups for storage.
pub struct DeviceGroupService<N> {
    aspect_nodes: N,
}

impl<N: AspectNodeRepository> DeviceGroupService<N> {
    /// Create a new service backed by the given aspect closure.
    pub fn new(aspect_nodes: N) -> Self {
        Self { aspect_nodes }
    }

    /// Validate `group` and drop criteria made redundant by more specific
    /// descendant-aspect criteria.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, group), fields(device_group_id = %group.id))]
    pub async fn reduce_criteria(&self, group: DeviceGroup) -> Result<DeviceGroup, DevMetaError> {
        group.validate()?;
        let aspect_ids = group.referenced_aspect_ids();
        let aspects = AspectNodeIndex::from_nodes(self.aspect_nodes.list_by_ids(aspect_ids).await?);
        Ok(reduce_device_group_criteria(group, &aspects))
    }
}
