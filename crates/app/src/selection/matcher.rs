//! Criteria matching for a single candidate variable.

use devmeta_domain::aspect::AspectNodeProvider;
use devmeta_domain::device_type::{ContentVariable, DeviceType, Service};
use devmeta_domain::filter::FilterCriteria;
use devmeta_domain::interaction::Interaction;

/// Where a candidate lives.
#[derive(Debug, Clone, Copy)]
pub struct CandidateOwner<'a> {
    pub device_type: &'a DeviceType,
    pub service: &'a Service,
}

/// Whether `variable` satisfies `criteria`.
///
/// All of function, device class, aspect and interaction must agree.
/// `interactions` is only consulted when the criteria has no interaction
/// of its own.
pub fn criteria_matches<A: AspectNodeProvider + ?Sized>(
    criteria: &FilterCriteria,
    variable: &ContentVariable,
    owner: CandidateOwner<'_>,
    interactions: &[Interaction],
    aspects: &A,
) -> bool {
    if variable.function() != Some(&criteria.function_id) {
        return false;
    }
    if let Some(device_class) = criteria.device_class() {
        if *device_class != owner.device_type.device_class_id {
            return false;
        }
    }
    if let Some(wanted) = criteria.aspect() {
        let Some(aspect) = variable.aspect() else {
            return false;
        };
        let covered = aspect == wanted
            || aspects
                .get_aspect_node(aspect)
                .is_some_and(|node| node.has_ancestor(wanted));
        if !covered {
            return false;
        }
    }
    match criteria.interaction {
        Some(interaction) => owner.service.interaction.satisfies(&[interaction]),
        None => owner.service.interaction.satisfies(interactions),
    }
}

/// Whether `variable` satisfies at least one entry of `criteria`.
pub fn any_criteria_matches<A: AspectNodeProvider + ?Sized>(
    criteria: &[FilterCriteria],
    variable: &ContentVariable,
    owner: CandidateOwner<'_>,
    interactions: &[Interaction],
    aspects: &A,
) -> bool {
    criteria
        .iter()
        .any(|entry| criteria_matches(entry, variable, owner, interactions, aspects))
}
