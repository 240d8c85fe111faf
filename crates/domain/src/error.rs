//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`DevMetaError`] via `#[from]`.

/// Top-level error for every devmeta operation.
#[derive(Debug, thiserror::Error)]
pub enum DevMetaError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("consistency error")]
    Consistency(#[from] ConsistencyError),

    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// A field-level invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} id must not be empty")]
    EmptyId { kind: &'static str },

    #[error("{kind} name must not be empty")]
    EmptyName { kind: &'static str },

    #[error("device type {device_type_id} must declare a device class")]
    MissingDeviceClass { device_type_id: String },

    #[error("device type {device_type_id} must declare at least one service")]
    NoServices { device_type_id: String },

    #[error("service local id {local_id} is used more than once")]
    DuplicateServiceLocalId { local_id: String },

    #[error("variable {name} of type {variable_type} cannot carry sub variables")]
    UnexpectedSubVariables { name: String, variable_type: String },

    #[error("sub variable name {name} is used more than once")]
    DuplicateVariableName { name: String },

    #[error("function id {function_id} is neither measuring nor controlling")]
    UnknownFunctionKind { function_id: String },

    #[error("filter criteria must reference a function")]
    MissingFunction,
}

/// A lookup by id returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The stored data violates a structural invariant and cannot be processed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("aspect {aspect_id} is its own ancestor")]
    AspectCycle { aspect_id: String },

    #[error("aspect {aspect_id} appears more than once in the taxonomy")]
    DuplicateAspect { aspect_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_validation_error_into_devmeta_error() {
        let err: DevMetaError = ValidationError::MissingFunction.into();
        assert!(matches!(
            err,
            DevMetaError::Validation(ValidationError::MissingFunction)
        ));
    }

    #[test]
    fn should_render_not_found_message() {
        let err = NotFoundError {
            entity: "Aspect",
            id: "urn:infai:ses:aspect:air".to_string(),
        };
        assert_eq!(err.to_string(), "Aspect urn:infai:ses:aspect:air not found");
    }

    #[test]
    fn should_render_cycle_message() {
        let err = ConsistencyError::AspectCycle {
            aspect_id: "a1".to_string(),
        };
        assert_eq!(err.to_string(), "aspect a1 is its own ancestor");
    }
}
