//! Typed identifier newtypes backed by URN strings.
//!
//! The empty string is the zero value and stands for "unset".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Namespace shared by every generated identifier.
pub const URN_NAMESPACE: &str = "urn:infai:ses";

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $kind:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh `urn:infai:ses:<kind>:<uuid>` identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(format!("{URN_NAMESPACE}:{}:{}", $kind, uuid::Uuid::new_v4()))
            }

            /// Wrap an existing identifier string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether this is the zero value.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an [`Aspect`](crate::aspect::Aspect).
    AspectId,
    "aspect"
);

define_id!(
    /// Unique identifier for a [`Function`](crate::function::Function).
    FunctionId,
    "function"
);

define_id!(
    /// Identifier of a device class (lamp, thermostat, …).
    DeviceClassId,
    "device-class"
);

define_id!(
    /// Unique identifier for a [`DeviceType`](crate::device_type::DeviceType).
    DeviceTypeId,
    "device-type"
);

define_id!(
    /// Unique identifier for a [`Service`](crate::device_type::Service).
    ServiceId,
    "service"
);

define_id!(
    /// Unique identifier for a [`Content`](crate::device_type::Content).
    ContentId,
    "content"
);

define_id!(
    /// Unique identifier for a [`ContentVariable`](crate::device_type::ContentVariable).
    ContentVariableId,
    "content-variable"
);

define_id!(
    /// Identifier of a characteristic (unit / value representation).
    CharacteristicId,
    "characteristic"
);

define_id!(
    /// Identifier of a concept a function operates on.
    ConceptId,
    "concept"
);

define_id!(
    /// Unique identifier for a [`DeviceGroup`](crate::device_group::DeviceGroup).
    DeviceGroupId,
    "device-group"
);

define_id!(
    /// Identifier of a concrete device instance.
    DeviceId,
    "device"
);

define_id!(
    /// Identifier of a transport protocol.
    ProtocolId,
    "protocol"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = AspectId::generate();
        let b = AspectId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn should_prefix_generated_ids_with_kind() {
        let id = DeviceTypeId::generate();
        assert!(id.as_str().starts_with("urn:infai:ses:device-type:"));
    }

    #[test]
    fn should_default_to_empty_zero_value() {
        let id = AspectId::default();
        assert!(id.is_empty());
        assert_eq!(id.to_string(), "");
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = FunctionId::new("urn:infai:ses:measuring-function:temperature");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"urn:infai:ses:measuring-function:temperature\"");
        let parsed: FunctionId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn should_parse_any_string() {
        let id: ServiceId = "svc-1".parse().unwrap();
        assert_eq!(id.as_str(), "svc-1");
    }
}
