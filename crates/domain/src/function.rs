//! Function: a measuring or controlling capability.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{DevMetaError, ValidationError};
use crate::id::{ConceptId, FunctionId};

/// Id prefix of every measuring function.
pub const MEASURING_FUNCTION_PREFIX: &str = "urn:infai:ses:measuring-function";
/// Id prefix of every controlling function.
pub const CONTROLLING_FUNCTION_PREFIX: &str = "urn:infai:ses:controlling-function";

/// Semantic kind of a function, encoded in its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    Measuring,
    Controlling,
}

impl FunctionKind {
    /// Derive the kind from the id prefix convention.
    #[must_use]
    pub fn from_function_id(id: &FunctionId) -> Option<Self> {
        let id = id.as_str();
        if id.starts_with(CONTROLLING_FUNCTION_PREFIX) {
            Some(Self::Controlling)
        } else if id.starts_with(MEASURING_FUNCTION_PREFIX) {
            Some(Self::Measuring)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub id: FunctionId,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_id: Option<ConceptId>,
}

impl Function {
    #[must_use]
    pub fn kind(&self) -> Option<FunctionKind> {
        FunctionKind::from_function_id(&self.id)
    }

    #[must_use]
    pub fn is_controlling(&self) -> bool {
        self.kind() == Some(FunctionKind::Controlling)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] when the id or name is empty or
    /// the id carries neither function prefix.
    pub fn validate(&self) -> Result<(), DevMetaError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { kind: "function" }.into());
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName { kind: "function" }.into());
        }
        if self.kind().is_none() {
            return Err(ValidationError::UnknownFunctionKind {
                function_id: self.id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Read-only function lookup used to classify matched variables.
pub trait FunctionLookup {
    fn get_function(&self, id: &FunctionId) -> Option<&Function>;

    /// Whether `id` names a controlling function. Falls back to the id
    /// prefix when the function is not known.
    fn is_controlling_function(&self, id: &FunctionId) -> bool {
        self.get_function(id).map_or_else(
            || FunctionKind::from_function_id(id) == Some(FunctionKind::Controlling),
            Function::is_controlling,
        )
    }
}

/// Immutable in-memory function catalogue keyed by id.
#[derive(Debug, Clone, Default)]
pub struct FunctionIndex {
    functions: HashMap<FunctionId, Function>,
}

impl FunctionIndex {
    #[must_use]
    pub fn from_functions(functions: impl IntoIterator<Item = Function>) -> Self {
        Self {
            functions: functions.into_iter().map(|f| (f.id.clone(), f)).collect(),
        }
    }
}

impl FunctionLookup for FunctionIndex {
    fn get_function(&self, id: &FunctionId) -> Option<&Function> {
        self.functions.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(id: &str) -> Function {
        Function {
            id: FunctionId::from(id),
            name: "fn".to_string(),
            display_name: String::new(),
            description: String::new(),
            concept_id: None,
        }
    }

    #[test]
    fn should_detect_controlling_function_from_prefix() {
        let f = function("urn:infai:ses:controlling-function:set-on");
        assert_eq!(f.kind(), Some(FunctionKind::Controlling));
        assert!(f.is_controlling());
    }

    #[test]
    fn should_detect_measuring_function_from_prefix() {
        let f = function("urn:infai:ses:measuring-function:get-temperature");
        assert_eq!(f.kind(), Some(FunctionKind::Measuring));
        assert!(!f.is_controlling());
    }

    #[test]
    fn should_reject_function_with_unknown_prefix() {
        let result = function("urn:infai:ses:whatever").validate();
        assert!(matches!(
            result,
            Err(DevMetaError::Validation(ValidationError::UnknownFunctionKind { .. }))
        ));
    }

    #[test]
    fn should_fall_back_to_prefix_when_lookup_misses() {
        let index = FunctionIndex::default();
        assert!(index.is_controlling_function(&FunctionId::from(
            "urn:infai:ses:controlling-function:toggle"
        )));
        assert!(!index.is_controlling_function(&FunctionId::from(
            "urn:infai:ses:measuring-function:get-level"
        )));
    }

    #[test]
    fn should_use_indexed_function_when_known() {
        let f = function("urn:infai:ses:controlling-function:set-level");
        let index = FunctionIndex::from_functions([f.clone()]);
        assert_eq!(index.get_function(&f.id), Some(&f));
        assert!(index.is_controlling_function(&f.id));
    }
}
