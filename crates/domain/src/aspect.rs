//! Aspect: a node of the physical/semantic taxonomy (e.g. `device` → `cpu`).
//!
//! Aspects are edited as nested trees. Matching works on the flattened
//! [`AspectNode`] closure computed by [`build_aspect_nodes`], which carries
//! every node's root, parent, children, ancestors and descendants.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{ConsistencyError, DevMetaError, ValidationError};
use crate::id::AspectId;

/// A taxonomy node and its ordered sub-aspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aspect {
    pub id: AspectId,
    pub name: String,
    #[serde(default)]
    pub sub_aspects: Vec<Aspect>,
}

impl Aspect {
    /// Create a builder for constructing an [`Aspect`].
    #[must_use]
    pub fn builder() -> AspectBuilder {
        AspectBuilder::default()
    }

    /// Check domain invariants for this aspect and all of its sub-aspects.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] when an id or name is empty.
    pub fn validate(&self) -> Result<(), DevMetaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { kind: "aspect" }.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName { kind: "aspect" }.into());
        }
        self.sub_aspects.iter().try_for_each(Aspect::validate)
    }
}

/// Step-by-step builder for [`Aspect`].
#[derive(Debug, Default)]
pub struct AspectBuilder {
    id: Option<AspectId>,
    name: Option<String>,
    sub_aspects: Vec<Aspect>,
}

impl AspectBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<AspectId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn sub_aspect(mut self, aspect: Aspect) -> Self {
        self.sub_aspects.push(aspect);
        self
    }

    /// Consume the builder, validate, and return an [`Aspect`].
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if `name` is missing or empty.
    pub fn build(self) -> Result<Aspect, DevMetaError> {
        let aspect = Aspect {
            id: self.id.unwrap_or_else(AspectId::generate),
            name: self.name.unwrap_or_default(),
            sub_aspects: self.sub_aspects,
        };
        aspect.validate()?;
        Ok(aspect)
    }
}

/// Flattened aspect record with its precomputed closure.
///
/// The zero value (all ids empty) stands for "no aspect".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectNode {
    pub id: AspectId,
    pub name: String,
    pub root_id: AspectId,
    pub parent_id: AspectId,
    pub child_ids: Vec<AspectId>,
    /// Strict ancestors, root first.
    pub ancestor_ids: Vec<AspectId>,
    /// Strict descendants in depth-first order.
    pub descendent_ids: Vec<AspectId>,
}

impl AspectNode {
    /// Node standing for an aspect id the taxonomy does not know.
    #[must_use]
    pub fn unknown(id: AspectId) -> Self {
        Self {
            root_id: id.clone(),
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_empty()
    }

    #[must_use]
    pub fn has_ancestor(&self, id: &AspectId) -> bool {
        self.ancestor_ids.contains(id)
    }

    #[must_use]
    pub fn has_descendant(&self, id: &AspectId) -> bool {
        self.descendent_ids.contains(id)
    }
}

/// Flatten a forest of aspects into one [`AspectNode`] per aspect, parents
/// before their children.
///
/// # Errors
///
/// Returns [`ConsistencyError::AspectCycle`] when an aspect reappears below
/// itself and [`ConsistencyError::DuplicateAspect`] when an id is used twice
/// anywhere else in the forest.
pub fn build_aspect_nodes(forest: &[Aspect]) -> Result<Vec<AspectNode>, ConsistencyError> {
    let mut nodes = Vec::new();
    let mut seen = HashSet::new();
    for root in forest {
        flatten(root, &root.id, None, &[], &mut seen, &mut nodes)?;
    }
    Ok(nodes)
}

/// Push `aspect` and its subtree onto `nodes`, returning the subtree's ids.
fn flatten(
    aspect: &Aspect,
    root_id: &AspectId,
    parent_id: Option<&AspectId>,
    ancestors: &[AspectId],
    seen: &mut HashSet<AspectId>,
    nodes: &mut Vec<AspectNode>,
) -> Result<Vec<AspectId>, ConsistencyError> {
    if ancestors.contains(&aspect.id) {
        return Err(ConsistencyError::AspectCycle {
            aspect_id: aspect.id.to_string(),
        });
    }
    if !seen.insert(aspect.id.clone()) {
        return Err(ConsistencyError::DuplicateAspect {
            aspect_id: aspect.id.to_string(),
        });
    }

    let index = nodes.len();
    nodes.push(AspectNode {
        id: aspect.id.clone(),
        name: aspect.name.clone(),
        root_id: root_id.clone(),
        parent_id: parent_id.cloned().unwrap_or_default(),
        child_ids: aspect.sub_aspects.iter().map(|a| a.id.clone()).collect(),
        ancestor_ids: ancestors.to_vec(),
        descendent_ids: Vec::new(),
    });

    let mut lineage = ancestors.to_vec();
    lineage.push(aspect.id.clone());

    let mut descendants = Vec::new();
    for child in &aspect.sub_aspects {
        descendants.push(child.id.clone());
        descendants.extend(flatten(
            child,
            root_id,
            Some(&aspect.id),
            &lineage,
            seen,
            nodes,
        )?);
    }
    nodes[index].descendent_ids.clone_from(&descendants);
    Ok(descendants)
}

/// Read-only access to a point-in-time aspect closure.
pub trait AspectNodeProvider {
    /// Fetch one node by id.
    fn get_aspect_node(&self, id: &AspectId) -> Option<&AspectNode>;

    /// Fetch every known node of `ids`, in the order of `ids`. Unknown ids
    /// are skipped.
    fn list_aspect_nodes_by_id_list(&self, ids: &[AspectId]) -> Vec<&AspectNode> {
        ids.iter().filter_map(|id| self.get_aspect_node(id)).collect()
    }
}

/// Immutable in-memory aspect closure keyed by id.
#[derive(Debug, Clone, Default)]
pub struct AspectNodeIndex {
    nodes: HashMap<AspectId, AspectNode>,
}

impl AspectNodeIndex {
    #[must_use]
    pub fn from_nodes(nodes: impl IntoIterator<Item = AspectNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
        }
    }

    /// Build the closure of `forest` and index it.
    ///
    /// # Errors
    ///
    /// Propagates the consistency errors of [`build_aspect_nodes`].
    pub fn from_forest(forest: &[Aspect]) -> Result<Self, ConsistencyError> {
        build_aspect_nodes(forest).map(Self::from_nodes)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl AspectNodeProvider for AspectNodeIndex {
    fn get_aspect_node(&self, id: &AspectId) -> Option<&AspectNode> {
        self.nodes.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> Aspect {
        Aspect::builder().id(id).name(id).build().unwrap()
    }

    fn device_taxonomy() -> Vec<Aspect> {
        let device = Aspect::builder()
            .id("device")
            .name("Device")
            .sub_aspect(leaf("cpu"))
            .sub_aspect(leaf("gpu"))
            .sub_aspect(leaf("case"))
            .build()
            .unwrap();
        let air = Aspect::builder()
            .id("air")
            .name("Air")
            .sub_aspect(
                Aspect::builder()
                    .id("inside_air")
                    .name("Inside Air")
                    .sub_aspect(leaf("room_air"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        vec![device, air]
    }

    fn node<'a>(nodes: &'a [AspectNode], id: &str) -> &'a AspectNode {
        nodes.iter().find(|n| n.id.as_str() == id).unwrap()
    }

    #[test]
    fn should_return_empty_set_when_forest_is_empty() {
        assert!(build_aspect_nodes(&[]).unwrap().is_empty());
    }

    #[test]
    fn should_create_one_node_per_aspect() {
        let nodes = build_aspect_nodes(&device_taxonomy()).unwrap();
        assert_eq!(nodes.len(), 7);
    }

    #[test]
    fn should_give_roots_no_parent_and_no_ancestors() {
        let nodes = build_aspect_nodes(&device_taxonomy()).unwrap();
        let device = node(&nodes, "device");
        assert!(device.is_root());
        assert!(device.ancestor_ids.is_empty());
        assert_eq!(device.root_id.as_str(), "device");
    }

    #[test]
    fn should_link_children_to_parent() {
        let nodes = build_aspect_nodes(&device_taxonomy()).unwrap();
        let device = node(&nodes, "device");
        let ids: Vec<&str> = device.child_ids.iter().map(AspectId::as_str).collect();
        assert_eq!(ids, ["cpu", "gpu", "case"]);

        let cpu = node(&nodes, "cpu");
        assert_eq!(cpu.parent_id.as_str(), "device");
        assert_eq!(cpu.root_id.as_str(), "device");
        assert!(cpu.has_ancestor(&AspectId::from("device")));
        assert!(device.has_descendant(&AspectId::from("cpu")));
    }

    #[test]
    fn should_close_ancestors_and_descendants_transitively() {
        let nodes = build_aspect_nodes(&device_taxonomy()).unwrap();
        let room_air = node(&nodes, "room_air");
        let ancestors: Vec<&str> = room_air.ancestor_ids.iter().map(AspectId::as_str).collect();
        assert_eq!(ancestors, ["air", "inside_air"]);
        assert_eq!(room_air.root_id.as_str(), "air");

        let air = node(&nodes, "air");
        let descendants: Vec<&str> = air.descendent_ids.iter().map(AspectId::as_str).collect();
        assert_eq!(descendants, ["inside_air", "room_air"]);
    }

    #[test]
    fn should_keep_closures_consistent_for_every_edge() {
        let nodes = build_aspect_nodes(&device_taxonomy()).unwrap();
        for parent in &nodes {
            for child_id in &parent.child_ids {
                let child = node(&nodes, child_id.as_str());
                assert!(child.has_ancestor(&parent.id));
                assert!(parent.has_descendant(&child.id));
                for ancestor in &parent.ancestor_ids {
                    assert!(child.has_ancestor(ancestor));
                    assert!(node(&nodes, ancestor.as_str()).has_descendant(&child.id));
                }
            }
        }
    }

    #[test]
    fn should_report_cycle_when_aspect_is_nested_below_itself() {
        let looped = Aspect {
            id: AspectId::from("a"),
            name: "a".to_string(),
            sub_aspects: vec![Aspect {
                id: AspectId::from("b"),
                name: "b".to_string(),
                sub_aspects: vec![leaf("a")],
            }],
        };
        let result = build_aspect_nodes(&[looped]);
        assert!(matches!(
            result,
            Err(ConsistencyError::AspectCycle { aspect_id }) if aspect_id == "a"
        ));
    }

    #[test]
    fn should_report_duplicate_when_id_appears_in_two_roots() {
        let first = Aspect::builder().id("x").name("x").sub_aspect(leaf("shared")).build().unwrap();
        let second = Aspect::builder().id("y").name("y").sub_aspect(leaf("shared")).build().unwrap();
        let result = build_aspect_nodes(&[first, second]);
        assert!(matches!(
            result,
            Err(ConsistencyError::DuplicateAspect { aspect_id }) if aspect_id == "shared"
        ));
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Aspect::builder().id("a").build();
        assert!(matches!(
            result,
            Err(DevMetaError::Validation(ValidationError::EmptyName { .. }))
        ));
    }

    #[test]
    fn should_skip_unknown_ids_in_batch_lookup() {
        let index = AspectNodeIndex::from_forest(&device_taxonomy()).unwrap();
        let found = index.list_aspect_nodes_by_id_list(&[
            AspectId::from("gpu"),
            AspectId::from("missing"),
            AspectId::from("air"),
        ]);
        let ids: Vec<&str> = found.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["gpu", "air"]);
    }

    #[test]
    fn should_describe_unknown_aspect_as_isolated_root() {
        let unknown = AspectNode::unknown(AspectId::from("ghost"));
        assert!(unknown.is_root());
        assert!(unknown.ancestor_ids.is_empty());
        assert!(unknown.descendent_ids.is_empty());
    }
}
