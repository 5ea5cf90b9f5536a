//! Metadata returned by the describe service.

use serde::{Deserialize, Serialize};

/// An object whose events can be forwarded to a system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegratableObject {
    pub label: String,
    pub api_name: String,
}

/// One describable field of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDescription {
    pub label: String,
    pub api_name: String,
    /// Classification of the field, e.g. `Text`, `Number`, `Currency`, `Date`.
    pub data_type: String,
}

/// An object together with its field descriptions, as kept by fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectDescribe {
    pub label: String,
    pub api_name: String,
    pub fields: Vec<FieldDescription>,
}

impl ObjectDescribe {
    pub fn summary(&self) -> IntegratableObject {
        IntegratableObject {
            label: self.label.clone(),
            api_name: self.api_name.clone(),
        }
    }
}
