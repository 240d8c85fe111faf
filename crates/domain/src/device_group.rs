//! Device group: a set of devices described by membership criteria.

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::{DevMetaError, ValidationError};
use crate::id::{AspectId, DeviceClassId, DeviceGroupId, DeviceId, FunctionId};
use crate::interaction::Interaction;

/// One membership criterion. Empty aspect / device class ids mean "any".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceGroupFilterCriteria {
    pub interaction: Interaction,
    pub function_id: FunctionId,
    #[serde(default)]
    pub aspect_id: AspectId,
    #[serde(default)]
    pub device_class_id: DeviceClassId,
}

impl DeviceGroupFilterCriteria {
    /// Canonical `FunctionId_AspectId_DeviceClassId_Interaction` string.
    #[must_use]
    pub fn short(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.function_id, self.aspect_id, self.device_class_id, self.interaction
        )
    }

    /// Whether both criteria share interaction, function and device class.
    #[must_use]
    pub fn same_bucket(&self, other: &Self) -> bool {
        self.interaction == other.interaction
            && self.function_id == other.function_id
            && self.device_class_id == other.device_class_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroup {
    pub id: DeviceGroupId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub criteria: Vec<DeviceGroupFilterCriteria>,
    /// Derived from `criteria`; see [`DeviceGroup::set_criteria`].
    #[serde(default)]
    pub criteria_short: Vec<String>,
    #[serde(default)]
    pub device_ids: Vec<DeviceId>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl DeviceGroup {
    /// Create a builder for constructing a [`DeviceGroup`].
    #[must_use]
    pub fn builder() -> DeviceGroupBuilder {
        DeviceGroupBuilder::default()
    }

    /// Replace the criteria and recompute `criteria_short`.
    pub fn set_criteria(&mut self, criteria: Vec<DeviceGroupFilterCriteria>) {
        self.criteria_short = criteria.iter().map(DeviceGroupFilterCriteria::short).collect();
        self.criteria = criteria;
    }

    /// Distinct non-empty aspect ids of the criteria, in first-seen order.
    #[must_use]
    pub fn referenced_aspect_ids(&self) -> Vec<AspectId> {
        let mut ids: Vec<AspectId> = Vec::new();
        for criteria in &self.criteria {
            if !criteria.aspect_id.is_empty() && !ids.contains(&criteria.aspect_id) {
                ids.push(criteria.aspect_id.clone());
            }
        }
        ids
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] when the id or name is empty or
    /// a criterion has no function.
    pub fn validate(&self) -> Result<(), DevMetaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId {
                kind: "device group",
            }
            .into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName {
                kind: "device group",
            }
            .into());
        }
        if self.criteria.iter().any(|c| c.function_id.is_empty()) {
            return Err(ValidationError::MissingFunction.into());
        }
        Ok(())
    }
}

/// Step-by-step builder for [`DeviceGroup`].
#[derive(Debug, Default)]
pub struct DeviceGroupBuilder {
    id: Option<DeviceGroupId>,
    name: Option<String>,
    image: String,
    criteria: Vec<DeviceGroupFilterCriteria>,
    device_ids: Vec<DeviceId>,
    attributes: Vec<Attribute>,
}

impl DeviceGroupBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceGroupId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    #[must_use]
    pub fn criteria(mut self, criteria: DeviceGroupFilterCriteria) -> Self {
        self.criteria.push(criteria);
        self
    }

    #[must_use]
    pub fn device_id(mut self, id: impl Into<DeviceId>) -> Self {
        self.device_ids.push(id.into());
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Consume the builder, validate, and return a [`DeviceGroup`] whose
    /// `criteria_short` matches its criteria.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if required fields are missing or empty.
    pub fn build(self) -> Result<DeviceGroup, DevMetaError> {
        let mut group = DeviceGroup {
            id: self.id.unwrap_or_else(DeviceGroupId::generate),
            name: self.name.unwrap_or_default(),
            image: self.image,
            criteria: Vec::new(),
            criteria_short: Vec::new(),
            device_ids: self.device_ids,
            attributes: self.attributes,
        };
        group.set_criteria(self.criteria);
        group.validate()?;
        Ok(group)
    }
}
