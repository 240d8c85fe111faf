//! Device-group criteria reduction.
//!
//! Criteria are bucketed by (interaction, function, device class). Inside a
//! bucket, an entry is a *generic duplicate* when a different entry is more
//! specific: either the entry has no aspect, or the other entry's aspect is
//! one of its descendants. Generic duplicates and exact repeats are dropped.

use std::collections::HashMap;

use devmeta_domain::aspect::AspectNodeProvider;
use devmeta_domain::device_group::{DeviceGroup, DeviceGroupFilterCriteria};
use devmeta_domain::id::AspectId;

/// Drop redundant criteria from `group` and recompute its short criteria.
///
/// Unknown aspect ids have no descendants. Every other field of the group
/// is passed through unchanged.
#[must_use]
pub fn reduce_device_group_criteria<P: AspectNodeProvider + ?Sized>(
    mut group: DeviceGroup,
    aspects: &P,
) -> DeviceGroup {
    let referenced = group.referenced_aspect_ids();
    let descendants: HashMap<&AspectId, &[AspectId]> = aspects
        .list_aspect_nodes_by_id_list(&referenced)
        .into_iter()
        .map(|node| (&node.id, node.descendent_ids.as_slice()))
        .collect();

    let kept: Vec<DeviceGroupFilterCriteria> = group
        .criteria
        .iter()
        .enumerate()
        .filter(|(index, entry)| !is_redundant(*index, entry, &group.criteria, &descendants))
        .map(|(_, entry)| entry.clone())
        .collect();

    let removed = group.criteria.len() - kept.len();
    if removed > 0 {
        tracing::debug!(device_group_id = %group.id, removed, "dropped redundant criteria");
    }
    group.set_criteria(kept);
    group
}

fn is_redundant(
    index: usize,
    entry: &DeviceGroupFilterCriteria,
    all: &[DeviceGroupFilterCriteria],
    descendants: &HashMap<&AspectId, &[AspectId]>,
) -> bool {
    all.iter().enumerate().any(|(other_index, other)| {
        if other_index == index || !entry.same_bucket(other) {
            return false;
        }
        if other == entry {
            return other_index < index;
        }
        entry.aspect_id.is_empty()
            || descendants
                .get(&entry.aspect_id)
                .is_some_and(|ids| ids.contains(&other.aspect_id))
    })
}
