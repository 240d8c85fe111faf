//! Selectables: the result shape of a selectable lookup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aspect::AspectNode;
use crate::device_type::{Service, VariableType};
use crate::id::{CharacteristicId, DeviceTypeId, FunctionId, ServiceId};
use crate::interaction::Interaction;

/// A device type exposing at least one path that matches the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeSelectable {
    pub device_type_id: DeviceTypeId,
    /// Matched services in device type order.
    pub services: Vec<Service>,
    pub service_path_options: BTreeMap<ServiceId, Vec<ServicePathOption>>,
}

impl DeviceTypeSelectable {
    /// Options of `service_id`, empty if the service did not match.
    #[must_use]
    pub fn options_for(&self, service_id: &ServiceId) -> &[ServicePathOption] {
        self.service_path_options
            .get(service_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// One matched data path inside a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePathOption {
    pub service_id: ServiceId,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic_id: Option<CharacteristicId>,
    pub aspect_node: AspectNode,
    pub function_id: FunctionId,
    pub is_controlling_function: bool,
    pub is_void: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
    /// Only filled by the interaction-aware lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<Interaction>,
    #[serde(default)]
    pub configurables: Vec<Configurable>,
}

impl ServicePathOption {
    /// Describe this option as a companion value of another option.
    #[must_use]
    pub fn to_configurable(&self) -> Configurable {
        Configurable {
            path: self.path.clone(),
            characteristic_id: self.characteristic_id.clone(),
            aspect_node: self.aspect_node.clone(),
            function_id: Some(self.function_id.clone()),
            value: self.value.clone(),
            variable_type: self.variable_type,
        }
    }
}

/// A companion value that is set together with a matched path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configurable {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characteristic_id: Option<CharacteristicId>,
    pub aspect_node: AspectNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_id: Option<FunctionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
}
