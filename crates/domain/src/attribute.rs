//! Free-form key/value annotations attached to device types and groups.

use serde::{Deserialize, Serialize};

/// A single annotation. `origin` names the system that set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub origin: String,
}
