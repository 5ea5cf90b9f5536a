//! Fixture files seeding the in-memory gateway.
//!
//! YAML (`.yaml` / `.yml`) and JSON are accepted; the format is picked from
//! the file extension.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FieldMapping, ObjectDescribe, ObjectRule, SystemConfig};

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Cannot read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),
}

/// Complete backend state: stored tiers plus describable objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub systems: Vec<SystemConfig>,
    pub object_rules: Vec<ObjectRule>,
    pub field_mappings: Vec<FieldMapping>,
    pub objects: Vec<ObjectDescribe>,
}

impl Fixture {
    pub fn from_yaml(text: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a fixture from disk.
    pub fn from_path(path: &Path) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
systems:
  - developerName: BILLING
    label: Billing
    isActive: true
    maxRetries: 5
objectRules:
  - sObjectName: Opportunity
    systemApiName: BILLING
    isActive: true
fieldMappings:
  - sObjectName: Opportunity
    systemApiName: BILLING
    sourceFieldAPI: Amount
    targetFieldName: amount
    dataType: Text
objects:
  - label: Opportunity
    apiName: Opportunity
    fields:
      - label: Amount
        apiName: Amount
        dataType: Currency
"#;

    #[test]
    fn parses_yaml_sample() {
        let fixture = Fixture::from_yaml(SAMPLE).unwrap();
        assert_eq!(fixture.systems.len(), 1);
        assert_eq!(fixture.systems[0].max_retries, 5);
        assert_eq!(fixture.object_rules[0].system_api_name, "BILLING");
        assert_eq!(fixture.field_mappings[0].source_field_api, "Amount");
        assert_eq!(fixture.objects[0].fields[0].data_type, "Currency");
    }

    #[test]
    fn empty_document_is_an_empty_fixture() {
        let fixture = Fixture::from_json("{}").unwrap();
        assert!(fixture.systems.is_empty());
        assert!(fixture.objects.is_empty());
    }

    #[test]
    fn from_path_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backend.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let fixture = Fixture::from_path(&path).unwrap();
        assert_eq!(fixture.objects.len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Fixture::from_path(Path::new("/nonexistent/cascade.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cascade.yaml"));
    }
}
