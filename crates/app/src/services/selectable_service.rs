//! Selectable service: loads a per-request catalogue snapshot and runs the
//! selection engine over it.

use devmeta_domain::aspect::AspectNodeIndex;
use devmeta_domain::device_type::{ContentVariable, DeviceType, Service};
use devmeta_domain::error::DevMetaError;
use devmeta_domain::filter::FilterCriteria;
use devmeta_domain::function::FunctionIndex;
use devmeta_domain::id::{AspectId, DeviceClassId, FunctionId};
use devmeta_domain::interaction::Interaction;
use devmeta_domain::selectable::DeviceTypeSelectable;

use crate::ports::{
    AspectNodeRepository, DeviceTypeListOptions, DeviceTypeRepository, FunctionRepository,
};
use crate::selection::{ConfigurableScope, Resolver};

/// Immutable data one lookup runs against.
struct Snapshot {
    device_types: Vec<DeviceType>,
    aspects: AspectNodeIndex,
    functions: FunctionIndex,
}

/// Application service answering selectable lookups.
pub struct SelectableService<D, N, F> {
    device_types: D,
    aspect_nodes: N,
    functions: F,
    scope: ConfigurableScope,
}

impl<D, N, F> SelectableService<D, N, F>
where
    D: DeviceTypeRepository,
    N: AspectNodeRepository,
    F: FunctionRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(device_types: D, aspect_nodes: N, functions: F) -> Self {
        Self {
            device_types,
            aspect_nodes,
            functions,
            scope: ConfigurableScope::default(),
        }
    }

    #[must_use]
    pub fn with_configurable_scope(mut self, scope: ConfigurableScope) -> Self {
        self.scope = scope;
        self
    }

    /// Selectables with the interaction filter passed separately.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if a criteria has no function, or
    /// a storage error propagated from the repositories.
    #[tracing::instrument(skip(self, criteria, interactions), fields(criteria = criteria.len()))]
    pub async fn get_selectables(
        &self,
        criteria: Vec<FilterCriteria>,
        path_prefix: &str,
        interactions: Vec<Interaction>,
    ) -> Result<Vec<DeviceTypeSelectable>, DevMetaError> {
        let Some(snapshot) = self.load_snapshot(&criteria).await? else {
            return Ok(Vec::new());
        };
        let resolver = Resolver::new(&snapshot.aspects, &snapshot.functions)
            .with_configurable_scope(self.scope);
        Ok(resolver.resolve_selectables(
            &snapshot.device_types,
            &criteria,
            path_prefix,
            &interactions,
        ))
    }

    /// Selectables with the interaction folded into each criteria.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if a criteria has no function, or
    /// a storage error propagated from the repositories.
    #[tracing::instrument(skip(self, criteria), fields(criteria = criteria.len()))]
    pub async fn get_selectables_v2(
        &self,
        criteria: Vec<FilterCriteria>,
        path_prefix: &str,
    ) -> Result<Vec<DeviceTypeSelectable>, DevMetaError> {
        let Some(snapshot) = self.load_snapshot(&criteria).await? else {
            return Ok(Vec::new());
        };
        let resolver = Resolver::new(&snapshot.aspects, &snapshot.functions)
            .with_configurable_scope(self.scope);
        Ok(resolver.resolve_selectables_v2(&snapshot.device_types, &criteria, path_prefix))
    }

    /// Fetch everything a lookup for `criteria` can touch. `None` when no
    /// device type can match.
    async fn load_snapshot(
        &self,
        criteria: &[FilterCriteria],
    ) -> Result<Option<Snapshot>, DevMetaError> {
        for entry in criteria {
            entry.validate()?;
        }
        if criteria.is_empty() {
            return Ok(None);
        }

        let device_types = self.device_types.list(list_options(criteria)).await?;
        if device_types.is_empty() {
            return Ok(None);
        }

        let aspect_ids = referenced_aspects(&device_types);
        let aspects = AspectNodeIndex::from_nodes(self.aspect_nodes.list_by_ids(aspect_ids).await?);
        let functions = FunctionIndex::from_functions(
            self.functions.list_by_ids(distinct_functions(criteria)).await?,
        );
        tracing::debug!(
            device_types = device_types.len(),
            aspect_nodes = aspects.len(),
            "loaded selection snapshot"
        );

        Ok(Some(Snapshot {
            device_types,
            aspects,
            functions,
        }))
    }
}

fn distinct_functions(criteria: &[FilterCriteria]) -> Vec<FunctionId> {
    let mut ids: Vec<FunctionId> = Vec::new();
    for entry in criteria {
        if !ids.contains(&entry.function_id) {
            ids.push(entry.function_id.clone());
        }
    }
    ids
}

/// Storage pre-filter: only device types using a requested function, and
/// only the requested device classes when every criteria pins one.
fn list_options(criteria: &[FilterCriteria]) -> DeviceTypeListOptions {
    let device_classes: Option<Vec<DeviceClassId>> = criteria
        .iter()
        .map(|entry| entry.device_class().cloned())
        .collect();
    DeviceTypeListOptions {
        function_ids: Some(distinct_functions(criteria)),
        device_class_ids: device_classes,
        ..DeviceTypeListOptions::default()
    }
}

fn referenced_aspects(device_types: &[DeviceType]) -> Vec<AspectId> {
    fn collect(variable: &ContentVariable, ids: &mut Vec<AspectId>) {
        if let Some(id) = variable.aspect() {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        for sub in &variable.sub_content_variables {
            collect(sub, ids);
        }
    }

    let mut ids = Vec::new();
    for content in device_types
        .iter()
        .flat_map(|dt| &dt.services)
        .flat_map(Service::contents)
    {
        collect(&content.content_variable, &mut ids);
    }
    ids
}
