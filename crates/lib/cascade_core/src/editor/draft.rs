// @zen-component: EDT-DraftStore
//
//! Session-local drafts of the three tiers.
//!
//! Each tier is held as an `Arc<Vec<_>>` that is never mutated in place:
//! every edit builds a new vector and swaps it in, bumping the tier's
//! revision. Readers get a shared snapshot, so change detection by pointer
//! (`Arc::ptr_eq`) or by revision is always accurate.
//!
//! Rows carry a [`RowId`] independent of their natural key. New rows have
//! no natural key yet, so they get a synthetic id from a store-wide counter.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::EditorError;
use super::fields::{DataTypeLookup, FieldKind, FieldInput, FieldValue};
use crate::models::rules::DEFAULT_MAX_RETRIES;
use crate::models::{ContextKey, FieldMapping, ObjectRule, SystemConfig, Tier};

/// Stable identity of a draft row for the lifetime of the editing session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    /// The record's own developer name.
    Natural(String),
    /// Allocated by the store; never sent to the backend.
    Synthetic(u64),
}

impl RowId {
    pub fn is_natural(&self) -> bool {
        matches!(self, RowId::Natural(_))
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Natural(name) => f.write_str(name),
            RowId::Synthetic(n) => write!(f, "row-{n}"),
        }
    }
}

/// A record plus its row identity.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRow<T> {
    pub id: RowId,
    pub record: T,
}

/// Values used to pre-populate new rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDefaults {
    pub s_object_name: String,
    pub system_api_name: String,
}

impl From<&ContextKey> for RowDefaults {
    fn from(context: &ContextKey) -> Self {
        Self {
            s_object_name: context.s_object_name.clone(),
            system_api_name: context.system_api_name.clone(),
        }
    }
}

/// A record type that lives in one tier of the draft store.
pub trait DraftRecord: Clone + std::fmt::Debug + Send + Sync + 'static {
    const TIER: Tier;

    /// Editable fields and the value kind each one takes.
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Fields present on the record that cannot be edited per row.
    const READ_ONLY: &'static [&'static str] = &[];

    /// Field holding the natural key; only editable on rows not yet saved.
    const KEY_FIELD: Option<&'static str> = None;

    const REMOVABLE: bool = true;

    /// Developer name usable as row identity, if the record has one.
    fn natural_key(&self) -> Option<&str>;

    fn new_row(defaults: &RowDefaults) -> Self;

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditorError>;

    /// Re-derive dependent attributes after `field` changed.
    fn after_edit(&mut self, _field: &str, _types: &dyn DataTypeLookup) {}

    fn draft(store: &DraftStore) -> &TierDraft<Self>;

    fn draft_mut(store: &mut DraftStore) -> &mut TierDraft<Self>;

    fn field_kind(field: &str) -> Result<FieldKind, EditorError> {
        if let Some((_, kind)) = Self::FIELDS.iter().find(|(name, _)| *name == field) {
            return Ok(*kind);
        }
        if Self::READ_ONLY.contains(&field) {
            Err(EditorError::ReadOnlyField {
                field: field.to_string(),
            })
        } else {
            Err(EditorError::UnknownField {
                tier: Self::TIER,
                field: field.to_string(),
            })
        }
    }
}

/// One tier's current collection and its revision counter.
#[derive(Debug)]
pub struct TierDraft<T> {
    rows: Arc<Vec<DraftRow<T>>>,
    revision: u64,
}

impl<T> Default for TierDraft<T> {
    fn default() -> Self {
        Self {
            rows: Arc::new(Vec::new()),
            revision: 0,
        }
    }
}

impl<T> TierDraft<T> {
    fn replace(&mut self, rows: Vec<DraftRow<T>>) {
        self.rows = Arc::new(rows);
        self.revision += 1;
    }

    fn position(&self, id: &RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == *id)
    }
}

/// The three tier drafts plus the row-id allocator.
#[derive(Debug, Default)]
pub struct DraftStore {
    systems: TierDraft<SystemConfig>,
    object_rules: TierDraft<ObjectRule>,
    field_mappings: TierDraft<FieldMapping>,
    next_row: u64,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> RowId {
        self.next_row += 1;
        RowId::Synthetic(self.next_row)
    }

    /// Replace a tier with an owned copy of `records`.
    ///
    /// A record keeps its developer name as row id when it has one that is
    /// not already taken in this load; everything else gets a synthetic id.
    pub fn load<T: DraftRecord>(&mut self, records: &[T]) {
        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let id = match record.natural_key().filter(|k| !k.is_empty()) {
                Some(key) if seen.insert(key.to_string()) => RowId::Natural(key.to_string()),
                _ => self.allocate(),
            };
            rows.push(DraftRow {
                id,
                record: record.clone(),
            });
        }
        debug!(tier = %T::TIER, rows = rows.len(), "draft loaded");
        T::draft_mut(self).replace(rows);
    }

    /// Apply one field edit to one row, installing a new collection.
    pub fn update_field<T: DraftRecord>(
        &mut self,
        row_id: &RowId,
        field: &str,
        input: FieldInput,
        types: &dyn DataTypeLookup,
    ) -> Result<(), EditorError> {
        let kind = T::field_kind(field)?;
        let draft = T::draft(self);
        let index = draft.position(row_id).ok_or_else(|| EditorError::UnknownRow {
            tier: T::TIER,
            row: row_id.clone(),
        })?;
        if T::KEY_FIELD == Some(field) && row_id.is_natural() {
            return Err(EditorError::ReadOnlyField {
                field: field.to_string(),
            });
        }
        let value = kind.coerce(field, input)?;

        let mut rows = draft.rows.as_ref().clone();
        let record = &mut rows[index].record;
        record.set_field(field, value)?;
        record.after_edit(field, types);

        debug!(tier = %T::TIER, row = %row_id, field, "draft field updated");
        T::draft_mut(self).replace(rows);
        Ok(())
    }

    /// Append a new row built from `defaults`; returns its synthetic id.
    pub fn add_row<T: DraftRecord>(&mut self, defaults: &RowDefaults) -> RowId {
        let id = self.allocate();
        let draft = T::draft(self);
        let mut rows = draft.rows.as_ref().clone();
        rows.push(DraftRow {
            id: id.clone(),
            record: T::new_row(defaults),
        });
        T::draft_mut(self).replace(rows);
        id
    }

    pub fn remove_row<T: DraftRecord>(&mut self, row_id: &RowId) -> Result<(), EditorError> {
        if !T::REMOVABLE {
            return Err(EditorError::NotRemovable(T::TIER));
        }
        let draft = T::draft(self);
        let index = draft.position(row_id).ok_or_else(|| EditorError::UnknownRow {
            tier: T::TIER,
            row: row_id.clone(),
        })?;
        let mut rows = draft.rows.as_ref().clone();
        rows.remove(index);
        T::draft_mut(self).replace(rows);
        Ok(())
    }

    /// Shared, read-only view of a tier.
    pub fn snapshot<T: DraftRecord>(&self) -> Arc<Vec<DraftRow<T>>> {
        Arc::clone(&T::draft(self).rows)
    }

    pub fn record<T: DraftRecord>(&self, row_id: &RowId) -> Option<&T> {
        T::draft(self)
            .rows
            .iter()
            .find(|row| row.id == *row_id)
            .map(|row| &row.record)
    }

    pub fn revision<T: DraftRecord>(&self) -> u64 {
        T::draft(self).revision
    }

    pub fn changed_since<T: DraftRecord>(&self, revision: u64) -> bool {
        self.revision::<T>() != revision
    }
}

impl DraftRecord for SystemConfig {
    const TIER: Tier = Tier::Systems;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("developerName", FieldKind::Text),
        ("label", FieldKind::Text),
        ("isActive", FieldKind::Boolean),
        ("maxRetries", FieldKind::Integer),
    ];
    const KEY_FIELD: Option<&'static str> = Some("developerName");
    // Systems are deactivated, never deleted.
    const REMOVABLE: bool = false;

    fn natural_key(&self) -> Option<&str> {
        Some(&self.developer_name)
    }

    fn new_row(_defaults: &RowDefaults) -> Self {
        Self {
            is_active: true,
            max_retries: DEFAULT_MAX_RETRIES,
            ..Default::default()
        }
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditorError> {
        match (field, value) {
            ("developerName", FieldValue::Text(v)) => self.developer_name = v,
            ("label", FieldValue::Text(v)) => self.label = v,
            ("isActive", FieldValue::Boolean(v)) => self.is_active = v,
            ("maxRetries", FieldValue::Integer(v)) => self.max_retries = v,
            (field, _) => {
                return Err(EditorError::UnknownField {
                    tier: Self::TIER,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn draft(store: &DraftStore) -> &TierDraft<Self> {
        &store.systems
    }

    fn draft_mut(store: &mut DraftStore) -> &mut TierDraft<Self> {
        &mut store.systems
    }
}

impl DraftRecord for ObjectRule {
    const TIER: Tier = Tier::ObjectRules;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("developerName", FieldKind::Text),
        ("sObjectName", FieldKind::Text),
        ("systemApiName", FieldKind::Text),
        ("triggerReason", FieldKind::Text),
        ("isActive", FieldKind::Boolean),
    ];

    fn natural_key(&self) -> Option<&str> {
        Some(&self.developer_name)
    }

    fn new_row(defaults: &RowDefaults) -> Self {
        Self {
            s_object_name: defaults.s_object_name.clone(),
            system_api_name: defaults.system_api_name.clone(),
            is_active: true,
            ..Default::default()
        }
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditorError> {
        match (field, value) {
            ("developerName", FieldValue::Text(v)) => self.developer_name = v,
            ("sObjectName", FieldValue::Text(v)) => self.s_object_name = v,
            ("systemApiName", FieldValue::Text(v)) => self.system_api_name = v,
            ("triggerReason", FieldValue::Text(v)) => self.trigger_reason = v,
            ("isActive", FieldValue::Boolean(v)) => self.is_active = v,
            (field, _) => {
                return Err(EditorError::UnknownField {
                    tier: Self::TIER,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn draft(store: &DraftStore) -> &TierDraft<Self> {
        &store.object_rules
    }

    fn draft_mut(store: &mut DraftStore) -> &mut TierDraft<Self> {
        &mut store.object_rules
    }
}

impl DraftRecord for FieldMapping {
    const TIER: Tier = Tier::FieldMappings;
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("sourceFieldAPI", FieldKind::Text),
        ("targetFieldName", FieldKind::Text),
        ("isRequired", FieldKind::Boolean),
        ("dataType", FieldKind::Text),
    ];
    // Inherited from the selected object rule.
    const READ_ONLY: &'static [&'static str] = &["sObjectName", "systemApiName"];

    fn natural_key(&self) -> Option<&str> {
        None
    }

    fn new_row(defaults: &RowDefaults) -> Self {
        Self {
            s_object_name: defaults.s_object_name.clone(),
            system_api_name: defaults.system_api_name.clone(),
            ..Default::default()
        }
    }

    fn set_field(&mut self, field: &str, value: FieldValue) -> Result<(), EditorError> {
        match (field, value) {
            ("sourceFieldAPI", FieldValue::Text(v)) => self.source_field_api = v,
            ("targetFieldName", FieldValue::Text(v)) => self.target_field_name = v,
            ("isRequired", FieldValue::Boolean(v)) => self.is_required = v,
            ("dataType", FieldValue::Text(v)) => self.data_type = v,
            (field, _) => {
                return Err(EditorError::UnknownField {
                    tier: Self::TIER,
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    fn after_edit(&mut self, field: &str, types: &dyn DataTypeLookup) {
        if field != "sourceFieldAPI" {
            return;
        }
        // Keep the stored type when the field is not (or no longer) described.
        if let Some(data_type) = types
            .data_type_for(&self.source_field_api)
            .filter(|t| !t.is_empty())
        {
            self.data_type = data_type.to_string();
        }
    }

    fn draft(store: &DraftStore) -> &TierDraft<Self> {
        &store.field_mappings
    }

    fn draft_mut(store: &mut DraftStore) -> &mut TierDraft<Self> {
        &mut store.field_mappings
    }
}
