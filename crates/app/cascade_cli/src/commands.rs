//! Subcommands that need an editor over the fixture backend.

use std::path::Path;
use std::sync::Arc;

use cascade_core::gateway::{Fixture, MemoryGateway};
use cascade_core::models::{ContextKey, FieldMapping, ObjectRule, SystemConfig};
use cascade_core::{ConfigEditor, EditorSettings};
use log::info;
use serde::Serialize;

use crate::cli::ShowTier;
use crate::{Error, Result};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Listing {
    #[serde(skip_serializing_if = "Option::is_none")]
    systems: Option<Vec<SystemConfig>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    object_rules: Option<Vec<ObjectRule>>,
}

async fn open_editor(fixture: Option<&Path>) -> Result<ConfigEditor> {
    let path = fixture.ok_or_else(|| {
        Error::Custom("No fixture given: pass --fixture or set CASCADE_FIXTURE".to_string())
    })?;
    info!("loading fixture {}", path.display());
    let gateway = MemoryGateway::from_fixture(Fixture::from_path(path)?);

    let mut editor = ConfigEditor::new(Arc::new(gateway), EditorSettings::from_env());
    editor.initialize().await?;
    Ok(editor)
}

fn records<T: cascade_core::editor::draft::DraftRecord>(editor: &ConfigEditor) -> Vec<T> {
    editor
        .snapshot::<T>()
        .iter()
        .map(|row| row.record.clone())
        .collect()
}

pub async fn show(fixture: Option<&Path>, tier: Option<ShowTier>) -> Result<()> {
    let editor = open_editor(fixture).await?;
    let listing = Listing {
        systems: (tier != Some(ShowTier::Rules)).then(|| records::<SystemConfig>(&editor)),
        object_rules: (tier != Some(ShowTier::Systems)).then(|| records::<ObjectRule>(&editor)),
    };
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

/// Stops at the first violation.
pub async fn check(fixture: Option<&Path>) -> Result<()> {
    let mut editor = open_editor(fixture).await?;
    editor.validate_systems()?;
    editor.validate_object_rules()?;

    let contexts: Vec<ContextKey> = editor
        .snapshot::<ObjectRule>()
        .iter()
        .filter_map(|row| row.record.context())
        .collect();
    for context in &contexts {
        editor.open_field_mappings(context.clone()).await?;
        editor.validate_field_mappings()?;
        info!("{context}: mappings ok");
    }

    println!(
        "ok: {} systems, {} object rules, {} mapping contexts",
        editor.snapshot::<SystemConfig>().len(),
        editor.snapshot::<ObjectRule>().len(),
        contexts.len()
    );
    Ok(())
}

pub async fn mappings(fixture: Option<&Path>, context: ContextKey) -> Result<()> {
    let mut editor = open_editor(fixture).await?;
    editor.open_field_mappings(context).await?;
    let rows = records::<FieldMapping>(&editor);
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
