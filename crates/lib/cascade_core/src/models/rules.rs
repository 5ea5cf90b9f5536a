// @zen-component: EDT-Schema
//
//! Tier records: systems, object rules, and field mappings.
//!
//! Field names serialize in camelCase (`developerName`, `sObjectName`,
//! `sourceFieldAPI`, ...), which is the shape the persistence backend and
//! fixture files use. Every attribute has a default so partial rows load.

use serde::{Deserialize, Serialize};

/// Retry budget given to a freshly added system row.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// One of the three editable configuration collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Systems,
    ObjectRules,
    FieldMappings,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Systems => "systems",
            Tier::ObjectRules => "object rules",
            Tier::FieldMappings => "field mappings",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier 1: an external system events can be routed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemConfig {
    /// Unique key, chosen when the system is created.
    pub developer_name: String,
    pub label: String,
    pub is_active: bool,
    pub max_retries: u32,
}

/// Tier 2: "object X fires events toward system Y".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectRule {
    /// Optional storage label; the identity is the object/system pair.
    pub developer_name: String,
    pub s_object_name: String,
    pub system_api_name: String,
    pub trigger_reason: String,
    pub is_active: bool,
}

impl ObjectRule {
    /// The object/system pair, if both halves are filled in.
    pub fn context(&self) -> Option<ContextKey> {
        if self.s_object_name.is_empty() || self.system_api_name.is_empty() {
            return None;
        }
        Some(ContextKey::new(&self.s_object_name, &self.system_api_name))
    }

    /// Name used when reporting on this rule.
    pub fn display_name(&self) -> String {
        if self.developer_name.is_empty() {
            format!("{}_{}", self.s_object_name, self.system_api_name)
        } else {
            self.developer_name.clone()
        }
    }
}

/// Tier 3: "source field F on object X maps to attribute T for system Y".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMapping {
    pub s_object_name: String,
    pub system_api_name: String,
    #[serde(rename = "sourceFieldAPI")]
    pub source_field_api: String,
    pub target_field_name: String,
    pub is_required: bool,
    /// Derived from the describe result whenever one is available.
    pub data_type: String,
}

impl FieldMapping {
    pub fn belongs_to(&self, context: &ContextKey) -> bool {
        self.s_object_name == context.s_object_name
            && self.system_api_name == context.system_api_name
    }
}

/// The `(sObjectName, systemApiName)` pair scoping the field-mapping tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextKey {
    pub s_object_name: String,
    pub system_api_name: String,
}

impl ContextKey {
    pub fn new(s_object_name: &str, system_api_name: &str) -> Self {
        Self {
            s_object_name: s_object_name.to_string(),
            system_api_name: system_api_name.to_string(),
        }
    }
}

impl std::fmt::Display for ContextKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.s_object_name, self.system_api_name)
    }
}
