// @zen-component: EDT-OptionCache
//
//! Read-only option lists feeding the selection widgets and row defaults.

use std::collections::HashMap;

use serde::Serialize;

use super::draft::RowDefaults;
use super::fields::DataTypeLookup;
use crate::models::{FieldDescription, IntegratableObject, SystemConfig};

/// A `{label, value}` entry for a selection widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// A describable field, with its derived data type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub label: String,
    pub value: String,
    pub data_type: String,
}

/// Lookup lists: known systems, integratable objects, and the fields of the
/// object currently opened for field mapping.
#[derive(Debug, Default)]
pub struct OptionCache {
    systems: Vec<SelectOption>,
    objects: Vec<SelectOption>,
    fields: Vec<FieldOption>,
    /// Object the field list describes.
    fields_object: Option<String>,
    data_types: HashMap<String, String>,
}

impl OptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_systems(&mut self, systems: &[SystemConfig]) {
        self.systems = systems
            .iter()
            .map(|s| SelectOption {
                label: label_or(&s.label, &s.developer_name),
                value: s.developer_name.clone(),
            })
            .collect();
    }

    pub fn set_objects(&mut self, objects: &[IntegratableObject]) {
        self.objects = objects
            .iter()
            .map(|o| SelectOption {
                label: label_or(&o.label, &o.api_name),
                value: o.api_name.clone(),
            })
            .collect();
    }

    /// Replace the field list with the description of `s_object_name`.
    pub fn set_fields(&mut self, s_object_name: &str, fields: &[FieldDescription]) {
        self.fields = fields
            .iter()
            .map(|f| FieldOption {
                label: label_or(&f.label, &f.api_name),
                value: f.api_name.clone(),
                data_type: f.data_type.clone(),
            })
            .collect();
        self.data_types = fields
            .iter()
            .map(|f| (f.api_name.clone(), f.data_type.clone()))
            .collect();
        self.fields_object = Some(s_object_name.to_string());
    }

    pub fn systems(&self) -> &[SelectOption] {
        &self.systems
    }

    pub fn objects(&self) -> &[SelectOption] {
        &self.objects
    }

    pub fn fields(&self) -> &[FieldOption] {
        &self.fields
    }

    pub fn fields_object(&self) -> Option<&str> {
        self.fields_object.as_deref()
    }

    /// First known system, or `""` when none are configured.
    pub fn default_system(&self) -> &str {
        self.systems.first().map_or("", |o| o.value.as_str())
    }

    /// First integratable object, or `""` when none are available.
    pub fn default_object(&self) -> &str {
        self.objects.first().map_or("", |o| o.value.as_str())
    }

    /// Defaults for a new object rule.
    pub fn row_defaults(&self) -> RowDefaults {
        RowDefaults {
            s_object_name: self.default_object().to_string(),
            system_api_name: self.default_system().to_string(),
        }
    }
}

impl DataTypeLookup for OptionCache {
    fn data_type_for(&self, api_name: &str) -> Option<&str> {
        self.data_types.get(api_name).map(String::as_str)
    }
}

fn label_or(label: &str, fallback: &str) -> String {
    if label.is_empty() {
        fallback.to_string()
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_give_empty_defaults() {
        let mut cache = OptionCache::new();
        cache.set_systems(&[]);
        cache.set_objects(&[]);
        assert_eq!(cache.row_defaults(), RowDefaults::default());
    }

    #[test]
    fn defaults_are_first_entries() {
        let mut cache = OptionCache::new();
        cache.set_systems(&[
            SystemConfig {
                developer_name: "BILLING".into(),
                label: "Billing".into(),
                ..Default::default()
            },
            SystemConfig {
                developer_name: "ERP".into(),
                ..Default::default()
            },
        ]);
        cache.set_objects(&[IntegratableObject {
            label: "Opportunity".into(),
            api_name: "Opportunity".into(),
        }]);

        assert_eq!(cache.default_system(), "BILLING");
        assert_eq!(cache.default_object(), "Opportunity");
        assert_eq!(cache.systems()[1].label, "ERP");
    }

    #[test]
    fn set_fields_replaces_previous_object() {
        let mut cache = OptionCache::new();
        cache.set_fields(
            "Opportunity",
            &[FieldDescription {
                label: "Amount".into(),
                api_name: "Amount".into(),
                data_type: "Currency".into(),
            }],
        );
        assert_eq!(cache.data_type_for("Amount"), Some("Currency"));

        cache.set_fields("Account", &[]);
        assert_eq!(cache.fields_object(), Some("Account"));
        assert!(cache.data_type_for("Amount").is_none());
    }
}
