//! Device type: a catalogue entry describing which services a kind of
//! device offers and which semantically tagged data those services carry.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::Attribute;
use crate::error::{DevMetaError, ValidationError};
use crate::id::{
    AspectId, CharacteristicId, ContentId, ContentVariableId, DeviceClassId, DeviceTypeId,
    FunctionId, ProtocolId, ServiceId,
};
use crate::interaction::Interaction;

/// A kind of device and the services it exposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: DeviceTypeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub device_class_id: DeviceClassId,
    pub services: Vec<Service>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl DeviceType {
    /// Create a builder for constructing a [`DeviceType`].
    #[must_use]
    pub fn builder() -> DeviceTypeBuilder {
        DeviceTypeBuilder::default()
    }

    /// Check domain invariants, including every service.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] when:
    /// - `id` or `name` is empty
    /// - `device_class_id` is empty ([`ValidationError::MissingDeviceClass`])
    /// - there is no service ([`ValidationError::NoServices`])
    /// - two services share a local id ([`ValidationError::DuplicateServiceLocalId`])
    /// - any service is invalid
    pub fn validate(&self) -> Result<(), DevMetaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId {
                kind: "device type",
            }
            .into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName {
                kind: "device type",
            }
            .into());
        }
        if self.device_class_id.is_empty() {
            return Err(ValidationError::MissingDeviceClass {
                device_type_id: self.id.to_string(),
            }
            .into());
        }
        if self.services.is_empty() {
            return Err(ValidationError::NoServices {
                device_type_id: self.id.to_string(),
            }
            .into());
        }
        let mut local_ids = HashSet::new();
        for service in &self.services {
            if !local_ids.insert(service.local_id.as_str()) {
                return Err(ValidationError::DuplicateServiceLocalId {
                    local_id: service.local_id.clone(),
                }
                .into());
            }
            service.validate()?;
        }
        Ok(())
    }

    /// Whether any variable of any service is tagged with one of `functions`.
    #[must_use]
    pub fn uses_any_function(&self, functions: &[FunctionId]) -> bool {
        self.services
            .iter()
            .flat_map(Service::contents)
            .any(|content| content.content_variable.uses_any_function(functions))
    }
}

/// Step-by-step builder for [`DeviceType`].
#[derive(Debug, Default)]
pub struct DeviceTypeBuilder {
    id: Option<DeviceTypeId>,
    name: Option<String>,
    description: String,
    device_class_id: Option<DeviceClassId>,
    services: Vec<Service>,
    attributes: Vec<Attribute>,
}

impl DeviceTypeBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceTypeId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn device_class_id(mut self, id: impl Into<DeviceClassId>) -> Self {
        self.device_class_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Consume the builder, validate, and return a [`DeviceType`].
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if required fields are missing or invalid.
    pub fn build(self) -> Result<DeviceType, DevMetaError> {
        let device_type = DeviceType {
            id: self.id.unwrap_or_else(DeviceTypeId::generate),
            name: self.name.unwrap_or_default(),
            description: self.description,
            device_class_id: self.device_class_id.unwrap_or_default(),
            services: self.services,
            attributes: self.attributes,
        };
        device_type.validate()?;
        Ok(device_type)
    }
}

/// One callable or observable endpoint of a device type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub local_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub interaction: Interaction,
    #[serde(default)]
    pub protocol_id: ProtocolId,
    #[serde(default)]
    pub inputs: Vec<Content>,
    #[serde(default)]
    pub outputs: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_group_key: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Service {
    /// Create a builder for constructing a [`Service`].
    #[must_use]
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::default()
    }

    /// Root contents, inputs before outputs.
    pub fn contents(&self) -> impl Iterator<Item = &Content> {
        self.inputs.iter().chain(&self.outputs)
    }

    /// Check domain invariants, including every content variable.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] when an id, local id or name is
    /// empty, or when any content variable is invalid.
    pub fn validate(&self) -> Result<(), DevMetaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { kind: "service" }.into());
        }
        if self.local_id.is_empty() {
            return Err(ValidationError::EmptyId {
                kind: "service local",
            }
            .into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName { kind: "service" }.into());
        }
        self.contents()
            .try_for_each(|content| content.content_variable.validate())
    }
}

/// Step-by-step builder for [`Service`].
#[derive(Debug, Default)]
pub struct ServiceBuilder {
    id: Option<ServiceId>,
    local_id: Option<String>,
    name: Option<String>,
    description: String,
    interaction: Option<Interaction>,
    protocol_id: ProtocolId,
    inputs: Vec<Content>,
    outputs: Vec<Content>,
    service_group_key: Option<String>,
}

impl ServiceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<ServiceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn local_id(mut self, local_id: impl Into<String>) -> Self {
        self.local_id = Some(local_id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    #[must_use]
    pub fn protocol_id(mut self, id: impl Into<ProtocolId>) -> Self {
        self.protocol_id = id.into();
        self
    }

    #[must_use]
    pub fn input(mut self, variable: ContentVariable) -> Self {
        self.inputs.push(Content::new(variable));
        self
    }

    #[must_use]
    pub fn output(mut self, variable: ContentVariable) -> Self {
        self.outputs.push(Content::new(variable));
        self
    }

    #[must_use]
    pub fn service_group_key(mut self, key: impl Into<String>) -> Self {
        self.service_group_key = Some(key.into());
        self
    }

    /// Consume the builder, validate, and return a [`Service`].
    ///
    /// The local id defaults to the name and the interaction to
    /// [`Interaction::Request`].
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if required fields are missing or invalid.
    pub fn build(self) -> Result<Service, DevMetaError> {
        let name = self.name.unwrap_or_default();
        let service = Service {
            id: self.id.unwrap_or_else(ServiceId::generate),
            local_id: self.local_id.unwrap_or_else(|| name.clone()),
            name,
            description: self.description,
            interaction: self.interaction.unwrap_or(Interaction::Request),
            protocol_id: self.protocol_id,
            inputs: self.inputs,
            outputs: self.outputs,
            service_group_key: self.service_group_key,
            attributes: Vec::new(),
        };
        service.validate()?;
        Ok(service)
    }
}

/// A root input or output of a service, wrapping its variable tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub id: ContentId,
    pub content_variable: ContentVariable,
    #[serde(default)]
    pub serialization: String,
    #[serde(default)]
    pub protocol_segment_id: String,
}

impl Content {
    /// Wrap `variable` in a JSON-serialized content with a generated id.
    #[must_use]
    pub fn new(variable: ContentVariable) -> Self {
        Self {
            id: ContentId::generate(),
            content_variable: variable,
            serialization: "json".to_string(),
            protocol_segment_id: String::new(),
        }
    }
}

/// Data type of a [`ContentVariable`], as schema.org type URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableType {
    #[serde(rename = "https://schema.org/Text")]
    String,
    #[serde(rename = "https://schema.org/Integer")]
    Integer,
    #[serde(rename = "https://schema.org/Float")]
    Float,
    #[serde(rename = "https://schema.org/Boolean")]
    Boolean,
    #[serde(rename = "https://schema.org/StructuredValue")]
    Structure,
    #[serde(rename = "https://schema.org/ItemList")]
    List,
}

impl VariableType {
    /// Whether variables of this type may nest sub variables.
    #[must_use]
    pub fn is_composite(self) -> bool {
        matches!(self, Self::Structure | Self::List)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "https://schema.org/Text",
            Self::Integer => "https://schema.org/Integer",
            Self::Float => "https://schema.org/Float",
            Self::Boolean => "https://schema.org/Boolean",
            Self::Structure => "https://schema.org/StructuredValue",
            Self::List => "https://schema.org/ItemList",
        })
    }
}

/// A typed, possibly nested, semantically tagged data field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentVariable {
    pub id: ContentVariableId,
    #[serde(default)]
    pub name: String,
    /// A no-payload trigger: the variable contributes no path segment.
    #[serde(default)]
    pub is_void: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
    #[serde(default)]
    pub sub_content_variables: Vec<ContentVariable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic_id: Option<CharacteristicId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_id: Option<FunctionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_id: Option<AspectId>,
}

impl ContentVariable {
    /// Create a builder for constructing a [`ContentVariable`].
    #[must_use]
    pub fn builder() -> ContentVariableBuilder {
        ContentVariableBuilder::default()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.sub_content_variables.is_empty()
    }

    /// The non-empty function id, if any.
    #[must_use]
    pub fn function(&self) -> Option<&FunctionId> {
        self.function_id.as_ref().filter(|id| !id.is_empty())
    }

    /// The non-empty aspect id, if any.
    #[must_use]
    pub fn aspect(&self) -> Option<&AspectId> {
        self.aspect_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Whether this variable or any descendant is tagged with one of `functions`.
    #[must_use]
    pub fn uses_any_function(&self, functions: &[FunctionId]) -> bool {
        self.function().is_some_and(|f| functions.contains(f))
            || self
                .sub_content_variables
                .iter()
                .any(|sub| sub.uses_any_function(functions))
    }

    /// Check domain invariants for this variable and its sub variables.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] when:
    /// - `id` is empty, or `name` is empty on a non-void variable
    /// - a primitive variable carries sub variables
    ///   ([`ValidationError::UnexpectedSubVariables`])
    /// - two sub variables of a structure share a name
    ///   ([`ValidationError::DuplicateVariableName`])
    pub fn validate(&self) -> Result<(), DevMetaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId {
                kind: "content variable",
            }
            .into());
        }
        if self.name.is_empty() && !self.is_void {
            return Err(ValidationError::EmptyName {
                kind: "content variable",
            }
            .into());
        }
        if !self.is_leaf() {
            match self.variable_type {
                Some(VariableType::Structure) => {
                    let mut names = HashSet::new();
                    for sub in &self.sub_content_variables {
                        if !names.insert(sub.name.as_str()) {
                            return Err(ValidationError::DuplicateVariableName {
                                name: sub.name.clone(),
                            }
                            .into());
                        }
                    }
                }
                Some(VariableType::List) => {}
                other => {
                    return Err(ValidationError::UnexpectedSubVariables {
                        name: self.name.clone(),
                        variable_type: other.map(|t| t.to_string()).unwrap_or_default(),
                    }
                    .into());
                }
            }
        }
        self.sub_content_variables
            .iter()
            .try_for_each(ContentVariable::validate)
    }
}

/// Step-by-step builder for [`ContentVariable`].
#[derive(Debug, Default)]
pub struct ContentVariableBuilder {
    id: Option<ContentVariableId>,
    name: String,
    is_void: bool,
    variable_type: Option<VariableType>,
    sub_content_variables: Vec<ContentVariable>,
    characteristic_id: Option<CharacteristicId>,
    value: Option<serde_json::Value>,
    function_id: Option<FunctionId>,
    aspect_id: Option<AspectId>,
}

impl ContentVariableBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<ContentVariableId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn void(mut self) -> Self {
        self.is_void = true;
        self
    }

    #[must_use]
    pub fn variable_type(mut self, variable_type: VariableType) -> Self {
        self.variable_type = Some(variable_type);
        self
    }

    #[must_use]
    pub fn sub_variable(mut self, variable: ContentVariable) -> Self {
        self.sub_content_variables.push(variable);
        self
    }

    #[must_use]
    pub fn characteristic_id(mut self, id: impl Into<CharacteristicId>) -> Self {
        self.characteristic_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: serde_json::Value) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn function_id(mut self, id: impl Into<FunctionId>) -> Self {
        self.function_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn aspect_id(mut self, id: impl Into<AspectId>) -> Self {
        self.aspect_id = Some(id.into());
        self
    }

    /// Consume the builder, validate, and return a [`ContentVariable`].
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if the variable tree is invalid.
    pub fn build(self) -> Result<ContentVariable, DevMetaError> {
        let variable = ContentVariable {
            id: self.id.unwrap_or_else(ContentVariableId::generate),
            name: self.name,
            is_void: self.is_void,
            variable_type: self.variable_type,
            sub_content_variables: self.sub_content_variables,
            characteristic_id: self.characteristic_id,
            value: self.value,
            function_id: self.function_id,
            aspect_id: self.aspect_id,
        };
        variable.validate()?;
        Ok(variable)
    }
}
