//! Filter criteria: one desired capability of a selectable lookup.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{AspectId, DeviceClassId, FunctionId};
use crate::interaction::Interaction;

/// One desired capability: a function, optionally narrowed by aspect,
/// device class and interaction.
///
/// A request carries a list of criteria; a variable is selected when it
/// satisfies any one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub function_id: FunctionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_id: Option<AspectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class_id: Option<DeviceClassId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new(function_id: impl Into<FunctionId>) -> Self {
        Self {
            function_id: function_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_aspect(mut self, aspect_id: impl Into<AspectId>) -> Self {
        self.aspect_id = Some(aspect_id.into());
        self
    }

    #[must_use]
    pub fn with_device_class(mut self, device_class_id: impl Into<DeviceClassId>) -> Self {
        self.device_class_id = Some(device_class_id.into());
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    /// The aspect restriction, ignoring empty ids.
    #[must_use]
    pub fn aspect(&self) -> Option<&AspectId> {
        self.aspect_id.as_ref().filter(|id| !id.is_empty())
    }

    /// The device class restriction, ignoring empty ids.
    #[must_use]
    pub fn device_class(&self) -> Option<&DeviceClassId> {
        self.device_class_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Check that the criteria names a function.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingFunction`] when `function_id` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.function_id.is_empty() {
            return Err(ValidationError::MissingFunction);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_empty_aspect_as_unset() {
        let criteria = FilterCriteria::new("f").with_aspect("");
        assert!(criteria.aspect().is_none());
        assert!(criteria.device_class().is_none());
    }

    #[test]
    fn should_reject_missing_function() {
        assert_eq!(
            FilterCriteria::default().validate(),
            Err(ValidationError::MissingFunction)
        );
    }

    #[test]
    fn should_deserialize_with_optional_fields_absent() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"function_id":"f","interaction":"event"}"#).unwrap();
        assert_eq!(criteria.function_id.as_str(), "f");
        assert!(criteria.aspect_id.is_none());
        assert_eq!(criteria.interaction, Some(Interaction::Event));
    }
}
