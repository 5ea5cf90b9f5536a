// @zen-component: EDT-UniquenessValidator
//
//! Uniqueness checks run on a tier's draft before it is persisted.
//!
//! Each validator stops at the first violation; that error is what the
//! administrator sees.

use std::collections::HashSet;

use super::EditorError;
use super::draft::DraftRow;
use crate::models::{ContextKey, FieldMapping, ObjectRule, SystemConfig};

/// Every system needs a developer name, and developer names are unique.
pub fn validate_systems(rows: &[DraftRow<SystemConfig>]) -> Result<(), EditorError> {
    let mut seen = HashSet::new();
    for row in rows {
        let name = row.record.developer_name.trim();
        if name.is_empty() {
            return Err(EditorError::MissingDeveloperName);
        }
        if !seen.insert(name) {
            return Err(EditorError::DuplicateSystem(name.to_string()));
        }
    }
    Ok(())
}

/// At most one rule per object/system pair. Incomplete rows are skipped.
pub fn validate_object_rules(rows: &[DraftRow<ObjectRule>]) -> Result<(), EditorError> {
    let mut seen = HashSet::new();
    for row in rows {
        let Some(pair) = row.record.context() else {
            continue;
        };
        if !seen.insert(pair) {
            return Err(EditorError::DuplicateObjectRule {
                rule: row.record.display_name(),
                s_object_name: row.record.s_object_name.clone(),
                system_api_name: row.record.system_api_name.clone(),
            });
        }
    }
    Ok(())
}

/// Source fields are unique within `context`. Rows outside the context and
/// rows without a source field are ignored.
pub fn validate_field_mappings(
    rows: &[DraftRow<FieldMapping>],
    context: &ContextKey,
) -> Result<(), EditorError> {
    let mut seen = HashSet::new();
    for row in rows.iter().filter(|row| row.record.belongs_to(context)) {
        let field = row.record.source_field_api.as_str();
        if field.is_empty() {
            continue;
        }
        if !seen.insert(field) {
            return Err(EditorError::DuplicateSourceField {
                field: field.to_string(),
                context: context.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::draft::RowId;

    fn rows<T>(records: Vec<T>) -> Vec<DraftRow<T>> {
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| DraftRow {
                id: RowId::Synthetic(i as u64),
                record,
            })
            .collect()
    }

    fn rule(object: &str, system: &str) -> ObjectRule {
        ObjectRule {
            s_object_name: object.into(),
            system_api_name: system.into(),
            ..Default::default()
        }
    }

    fn mapping(object: &str, system: &str, source: &str) -> FieldMapping {
        FieldMapping {
            s_object_name: object.into(),
            system_api_name: system.into(),
            source_field_api: source.into(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicate_rule_pair_is_rejected() {
        let mut second = rule("Opportunity", "BILLING");
        second.developer_name = "Opp_Billing_2".into();
        let err = validate_object_rules(&rows(vec![rule("Opportunity", "BILLING"), second]))
            .unwrap_err();
        assert!(matches!(err, EditorError::DuplicateObjectRule { ref rule, .. } if rule == "Opp_Billing_2"));
        assert!(err.to_string().contains("Duplicate mapping"));
    }

    #[test]
    fn same_object_different_system_is_fine() {
        let result = validate_object_rules(&rows(vec![
            rule("Opportunity", "BILLING"),
            rule("Opportunity", "ERP"),
        ]));
        assert!(result.is_ok());
    }

    #[test]
    fn incomplete_rules_are_not_duplicates() {
        let result = validate_object_rules(&rows(vec![
            rule("Opportunity", ""),
            rule("Opportunity", ""),
            rule("", "BILLING"),
            rule("", "BILLING"),
        ]));
        assert!(result.is_ok());
    }

    #[test]
    fn duplicate_source_field_in_context_is_rejected() {
        let ctx = ContextKey::new("Opportunity", "BILLING");
        let err = validate_field_mappings(
            &rows(vec![
                mapping("Opportunity", "BILLING", "Amount"),
                mapping("Opportunity", "BILLING", "Amount"),
            ]),
            &ctx,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EditorError::DuplicateSourceField {
                field: "Amount".into(),
                context: ctx,
            }
        );
    }

    #[test]
    fn other_contexts_and_blank_fields_are_ignored() {
        let ctx = ContextKey::new("Opportunity", "BILLING");
        let result = validate_field_mappings(
            &rows(vec![
                mapping("Opportunity", "BILLING", "Amount"),
                mapping("Opportunity", "ERP", "Amount"),
                mapping("Opportunity", "BILLING", ""),
                mapping("Opportunity", "BILLING", ""),
            ]),
            &ctx,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn systems_need_unique_developer_names() {
        let system = |name: &str| SystemConfig {
            developer_name: name.into(),
            ..Default::default()
        };
        assert_eq!(
            validate_systems(&rows(vec![system("A"), system("")])),
            Err(EditorError::MissingDeveloperName)
        );
        assert_eq!(
            validate_systems(&rows(vec![system("A"), system("A")])),
            Err(EditorError::DuplicateSystem("A".into()))
        );
        assert!(validate_systems(&rows(vec![system("A"), system("B")])).is_ok());
    }
}
