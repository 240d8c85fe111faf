//! Selectable resolution: which services of which device types expose data
//! paths matching a list of [`FilterCriteria`], and through which paths.
//!
//! The engine is pure: it reads an immutable snapshot of device types, the
//! aspect closure and the function catalogue, and builds fresh results.

mod configurables;
mod matcher;
mod walker;

pub use configurables::{ConfigurableScope, ScopedMatch, collect_configurables};
pub use matcher::{CandidateOwner, any_criteria_matches, criteria_matches};
pub use walker::{ContentWalk, WalkedVariable, join_path, walk_content};

use std::collections::BTreeMap;

use devmeta_domain::aspect::{AspectNode, AspectNodeProvider};
use devmeta_domain::device_type::{DeviceType, Service};
use devmeta_domain::filter::FilterCriteria;
use devmeta_domain::function::FunctionLookup;
use devmeta_domain::interaction::Interaction;
use devmeta_domain::selectable::{Configurable, DeviceTypeSelectable, ServicePathOption};

/// Result shape of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// Interactions passed separately, omitted from the options.
    V1,
    /// Interactions folded into the criteria and reported on the options.
    V2,
}

/// Resolves selectables against a point-in-time catalogue snapshot.
pub struct Resolver<'a, A: ?Sized, F: ?Sized> {
    aspects: &'a A,
    functions: &'a F,
    scope: ConfigurableScope,
}

impl<'a, A, F> Resolver<'a, A, F>
where
    A: AspectNodeProvider + ?Sized,
    F: FunctionLookup + ?Sized,
{
    pub fn new(aspects: &'a A, functions: &'a F) -> Self {
        Self {
            aspects,
            functions,
            scope: ConfigurableScope::default(),
        }
    }

    #[must_use]
    pub fn with_configurable_scope(mut self, scope: ConfigurableScope) -> Self {
        self.scope = scope;
        self
    }

    /// Lookup taking the interaction filter as a separate, OR-combined list.
    ///
    /// A criteria entry that carries its own interaction uses it instead of
    /// `interactions`. Options do not report the service interaction.
    #[must_use]
    pub fn resolve_selectables(
        &self,
        device_types: &[DeviceType],
        criteria: &[FilterCriteria],
        path_prefix: &str,
        interactions: &[Interaction],
    ) -> Vec<DeviceTypeSelectable> {
        self.resolve(device_types, criteria, path_prefix, interactions, Shape::V1)
    }

    /// Lookup with the interaction folded into each criteria entry. Options
    /// report the service interaction.
    #[must_use]
    pub fn resolve_selectables_v2(
        &self,
        device_types: &[DeviceType],
        criteria: &[FilterCriteria],
        path_prefix: &str,
    ) -> Vec<DeviceTypeSelectable> {
        self.resolve(device_types, criteria, path_prefix, &[], Shape::V2)
    }

    fn resolve(
        &self,
        device_types: &[DeviceType],
        criteria: &[FilterCriteria],
        path_prefix: &str,
        interactions: &[Interaction],
        shape: Shape,
    ) -> Vec<DeviceTypeSelectable> {
        let result: Vec<DeviceTypeSelectable> = device_types
            .iter()
            .filter_map(|dt| self.resolve_device_type(dt, criteria, path_prefix, interactions, shape))
            .collect();
        tracing::debug!(
            device_types = device_types.len(),
            criteria = criteria.len(),
            selectables = result.len(),
            "resolved selectables"
        );
        result
    }

    fn resolve_device_type(
        &self,
        device_type: &DeviceType,
        criteria: &[FilterCriteria],
        path_prefix: &str,
        interactions: &[Interaction],
        shape: Shape,
    ) -> Option<DeviceTypeSelectable> {
        let mut services: Vec<Service> = Vec::new();
        let mut service_path_options: BTreeMap<_, Vec<ServicePathOption>> = BTreeMap::new();

        for service in &device_type.services {
            let owner = CandidateOwner {
                device_type,
                service,
            };
            let options = self.resolve_service(owner, criteria, path_prefix, interactions, shape);
            if options.is_empty() {
                continue;
            }
            if !services.iter().any(|known| known.id == service.id) {
                services.push(service.clone());
            }
            service_path_options
                .entry(service.id.clone())
                .or_default()
                .extend(options);
        }

        if services.is_empty() {
            return None;
        }
        Some(DeviceTypeSelectable {
            device_type_id: device_type.id.clone(),
            services,
            service_path_options,
        })
    }

    fn resolve_service(
        &self,
        owner: CandidateOwner<'_>,
        criteria: &[FilterCriteria],
        path_prefix: &str,
        interactions: &[Interaction],
        shape: Shape,
    ) -> Vec<ServicePathOption> {
        let walks: Vec<ContentWalk<'_>> = owner
            .service
            .contents()
            .map(|content| walk_content(content, path_prefix))
            .collect();

        let selected: Vec<(usize, &WalkedVariable<'_>)> = walks
            .iter()
            .enumerate()
            .flat_map(|(root, walk)| walk.candidates.iter().map(move |c| (root, c)))
            .filter(|(_, candidate)| {
                any_criteria_matches(
                    criteria,
                    candidate.variable,
                    owner,
                    interactions,
                    self.aspects,
                )
            })
            .collect();
        if selected.is_empty() {
            return Vec::new();
        }

        let context: Vec<Configurable> = walks
            .iter()
            .flat_map(|walk| &walk.context_values)
            .map(|walked| self.configurable(walked))
            .collect();
        let matches: Vec<ScopedMatch> = selected
            .iter()
            .map(|(root, walked)| ScopedMatch {
                root: *root,
                configurable: self.configurable(walked),
            })
            .collect();

        let interaction = match shape {
            Shape::V1 => None,
            Shape::V2 => Some(owner.service.interaction),
        };

        selected
            .iter()
            .zip(&matches)
            .enumerate()
            .map(|(index, ((_, walked), scoped))| {
                let variable = walked.variable;
                let function_id = scoped.configurable.function_id.clone().unwrap_or_default();
                ServicePathOption {
                    service_id: owner.service.id.clone(),
                    path: walked.path.clone(),
                    characteristic_id: variable.characteristic_id.clone(),
                    aspect_node: scoped.configurable.aspect_node.clone(),
                    is_controlling_function: self.functions.is_controlling_function(&function_id),
                    function_id,
                    is_void: variable.is_void,
                    value: variable.value.clone(),
                    variable_type: variable.variable_type,
                    interaction,
                    configurables: collect_configurables(index, &matches, &context, self.scope),
                }
            })
            .collect()
    }

    fn configurable(&self, walked: &WalkedVariable<'_>) -> Configurable {
        let variable = walked.variable;
        Configurable {
            path: walked.path.clone(),
            characteristic_id: variable.characteristic_id.clone(),
            aspect_node: self.aspect_node(walked),
            function_id: variable.function().cloned(),
            value: variable.value.clone(),
            variable_type: variable.variable_type,
        }
    }

    /// The closure record of the variable's aspect; zero when untagged.
    fn aspect_node(&self, walked: &WalkedVariable<'_>) -> AspectNode {
        let Some(id) = walked.variable.aspect() else {
            return AspectNode::default();
        };
        if let Some(node) = self.aspects.get_aspect_node(id) {
            return node.clone();
        }
        tracing::warn!(aspect_id = %id, path = %walked.path, "unknown aspect");
        AspectNode::unknown(id.clone())
    }
}
