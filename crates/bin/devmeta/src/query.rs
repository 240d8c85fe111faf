//! Query documents accepted on the command line and their dispatch.

use serde::Deserialize;

use devmeta_adapter_catalogue_json::CatalogueStore;
use devmeta_app::services::aspect_service::AspectService;
use devmeta_app::services::device_group_service::DeviceGroupService;
use devmeta_app::services::selectable_service::SelectableService;
use devmeta_domain::device_group::DeviceGroup;
use devmeta_domain::filter::FilterCriteria;
use devmeta_domain::id::AspectId;
use devmeta_domain::interaction::Interaction;

use crate::config::Config;

/// A single request, tagged by `query`.
#[derive(Debug, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Selectables with a separate interaction filter.
    Selectables {
        criteria: Vec<FilterCriteria>,
        #[serde(default)]
        path_prefix: Option<String>,
        #[serde(default)]
        interactions: Vec<Interaction>,
    },
    /// Selectables with interactions inside the criteria.
    SelectablesV2 {
        criteria: Vec<FilterCriteria>,
        #[serde(default)]
        path_prefix: Option<String>,
    },
    /// Reduce the criteria of a device group.
    DeviceGroup { device_group: DeviceGroup },
    /// Closure record of one aspect.
    AspectNode { aspect_id: AspectId },
}

/// Services wired over one catalogue.
pub struct Services {
    aspects: AspectService<CatalogueStore, CatalogueStore>,
    selectables: SelectableService<CatalogueStore, CatalogueStore, CatalogueStore>,
    device_groups: DeviceGroupService<CatalogueStore>,
    path_prefix: String,
}

impl Services {
    pub fn new(store: &CatalogueStore, config: &Config) -> Self {
        Self {
            aspects: AspectService::new(store.clone(), store.clone()),
            selectables: SelectableService::new(store.clone(), store.clone(), store.clone())
                .with_configurable_scope(config.configurable_scope()),
            device_groups: DeviceGroupService::new(store.clone()),
            path_prefix: config.selection.path_prefix.clone(),
        }
    }

    /// Run `query` and return its result as JSON.
    ///
    /// # Errors
    ///
    /// Returns any service error, or a serialization failure.
    pub async fn execute(&self, query: Query) -> anyhow::Result<serde_json::Value> {
        let value = match query {
            Query::Selectables {
                criteria,
                path_prefix,
                interactions,
            } => {
                let prefix = path_prefix.as_deref().unwrap_or(self.path_prefix.as_str());
                serde_json::to_value(
                    self.selectables
                        .get_selectables(criteria, prefix, interactions)
                        .await?,
                )?
            }
            Query::SelectablesV2 {
                criteria,
                path_prefix,
            } => {
                let prefix = path_prefix.as_deref().unwrap_or(self.path_prefix.as_str());
                serde_json::to_value(
                    self.selectables
                        .get_selectables_v2(criteria, prefix)
                        .await?,
                )?
            }
            Query::DeviceGroup { device_group } => {
                serde_json::to_value(self.device_groups.reduce_criteria(device_group).await?)?
            }
            Query::AspectNode { aspect_id } => {
                serde_json::to_value(self.aspects.get_aspect_node(aspect_id).await?)?
            }
        };
        Ok(value)
    }
}
