//! Integration test: a full editing session against a fixture-seeded backend.

use std::io::Write;
use std::sync::Arc;

use cascade_core::editor::ContextApplied;
use cascade_core::editor::fields::FieldInput;
use cascade_core::gateway::{Fixture, GatewayOp, MemoryGateway};
use cascade_core::models::{ContextKey, FieldMapping, ObjectRule, SystemConfig};
use cascade_core::{ConfigEditor, EditorError, EditorSettings};

const FIXTURE: &str = r#"{
  "systems": [
    { "developerName": "BILLING", "label": "Billing", "isActive": true, "maxRetries": 3 }
  ],
  "objectRules": [],
  "fieldMappings": [],
  "objects": [
    {
      "label": "Opportunity",
      "apiName": "Opportunity",
      "fields": [
        { "label": "Amount", "apiName": "Amount", "dataType": "Currency" },
        { "label": "Stage", "apiName": "StageName", "dataType": "Picklist" }
      ]
    }
  ]
}"#;

fn load_gateway() -> Arc<MemoryGateway> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().expect("tempfile");
    file.write_all(FIXTURE.as_bytes()).expect("write fixture");
    let fixture = Fixture::from_path(file.path()).expect("parse fixture");
    Arc::new(MemoryGateway::from_fixture(fixture))
}

#[tokio::test]
async fn administrator_configures_a_new_route_end_to_end() {
    let gateway = load_gateway();
    let mut editor = ConfigEditor::new(gateway.clone(), EditorSettings::default());
    editor.initialize().await.expect("initialize");

    // Tier 2: route Opportunity events to BILLING.
    let rule_id = editor.add_object_rule();
    editor
        .update_field::<ObjectRule>(&rule_id, "triggerReason", "on close")
        .expect("edit rule");
    let saved = editor.save_object_rules().await.expect("save rules");
    assert_eq!(saved.saved, 1);
    assert!(saved.reloaded);

    // The reloaded rule carries the backend-assigned developer name.
    let rules = editor.snapshot::<ObjectRule>();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].record.developer_name, "Opportunity_BILLING");
    let rule_id = rules[0].id.clone();

    // Tier 3: map two fields.
    let applied = editor.open_rule_mappings(&rule_id).await.expect("open context");
    assert_eq!(applied, ContextApplied::Applied { rows: 0 });

    let amount = editor.add_field_mapping().expect("add mapping");
    editor
        .update_field::<FieldMapping>(&amount, "sourceFieldAPI", "Amount")
        .expect("set source");
    editor
        .update_field::<FieldMapping>(&amount, "targetFieldName", "total")
        .expect("set target");
    editor
        .update_field::<FieldMapping>(&amount, "isRequired", FieldInput::Checkbox(true))
        .expect("set required");

    let stage = editor.add_field_mapping().expect("add mapping");
    editor
        .update_field::<FieldMapping>(&stage, "sourceFieldAPI", "StageName")
        .expect("set source");

    editor.save_field_mappings().await.expect("save mappings");

    let stored = gateway
        .stored_field_mappings()
        .await
        .into_iter()
        .map(|m| (m.source_field_api, m.data_type))
        .collect::<Vec<_>>();
    assert_eq!(
        stored,
        vec![
            ("Amount".to_string(), "Currency".to_string()),
            ("StageName".to_string(), "Picklist".to_string()),
        ]
    );
    assert!(editor.last_error().is_none());
    assert!(!editor.is_busy());
}

#[tokio::test]
async fn backend_rejection_can_be_retried() {
    let gateway = load_gateway();
    let mut editor = ConfigEditor::new(gateway.clone(), EditorSettings::default());
    editor.initialize().await.expect("initialize");

    let id = editor.add_system();
    editor
        .update_field::<SystemConfig>(&id, "developerName", "ERP")
        .expect("name");
    editor
        .update_field::<SystemConfig>(&id, "maxRetries", FieldInput::Number(5))
        .expect("retries");

    gateway
        .fail_on(
            GatewayOp::PersistSystems,
            serde_json::json!([{ "message": "Row locked" }, { "message": "Try again" }]),
        )
        .await;
    let err = editor.save_systems().await.expect_err("rejected");
    assert!(matches!(err, EditorError::Gateway(_)));
    assert_eq!(editor.last_error(), Some("Row locked, Try again"));
    assert_eq!(editor.snapshot::<SystemConfig>().len(), 2);

    gateway.clear_failures().await;
    editor.save_systems().await.expect("retry");
    assert!(editor.last_error().is_none());

    let erp = gateway
        .stored_systems()
        .await
        .into_iter()
        .find(|s| s.developer_name == "ERP")
        .expect("stored");
    assert_eq!(erp.max_retries, 5);
    assert!(erp.is_active);
}

#[tokio::test]
async fn mappings_of_other_contexts_stay_untouched() {
    let gateway = load_gateway();
    let mut editor = ConfigEditor::new(gateway.clone(), EditorSettings::default());
    editor.initialize().await.expect("initialize");

    let context = ContextKey::new("Opportunity", "BILLING");
    editor.open_field_mappings(context.clone()).await.expect("open");
    let id = editor.add_field_mapping().expect("add");
    editor
        .update_field::<FieldMapping>(&id, "sourceFieldAPI", "Amount")
        .expect("source");
    editor.save_field_mappings().await.expect("save");

    let other = ContextKey::new("Opportunity", "ERP");
    editor.open_field_mappings(other.clone()).await.expect("open other");
    assert_eq!(editor.active_context(), Some(&other));
    assert!(editor.snapshot::<FieldMapping>().is_empty());
    assert_eq!(gateway.stored_field_mappings().await.len(), 1);
}
