// @zen-component: EDT-SaveCoordinator
//
//! Save coordination: validation, payload, persist, reload.
//!
//! Validation runs before the busy flag is raised or any call is made, so a
//! duplicate is reported without a round trip. The draft is never updated
//! from the persist response; with `reload_after_save` the saved tier is
//! fetched again instead.

use tracing::{info, warn};

use super::draft::DraftRow;
use super::validation;
use super::{ConfigEditor, EditorError};
use crate::models::{FieldMapping, ObjectRule, SystemConfig, Tier};

/// Result of a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    pub tier: Tier,
    /// Records sent to the backend.
    pub saved: usize,
    /// Whether the tier was re-fetched afterwards. A failed reload leaves
    /// its message in the error slot.
    pub reloaded: bool,
}

/// The records of `rows` without their row identities.
pub fn payload<T: Clone>(rows: &[DraftRow<T>]) -> Vec<T> {
    rows.iter().map(|row| row.record.clone()).collect()
}

impl ConfigEditor {
    pub fn validate_systems(&mut self) -> Result<(), EditorError> {
        let rows = self.drafts.snapshot::<SystemConfig>();
        validation::validate_systems(&rows).map_err(|e| self.fail(e))
    }

    pub fn validate_object_rules(&mut self) -> Result<(), EditorError> {
        let rows = self.drafts.snapshot::<ObjectRule>();
        validation::validate_object_rules(&rows).map_err(|e| self.fail(e))
    }

    /// Check the mappings of the active context.
    pub fn validate_field_mappings(&mut self) -> Result<(), EditorError> {
        let Some(context) = self.context.clone() else {
            return Err(self.fail(EditorError::NoActiveContext));
        };
        let rows = self.drafts.snapshot::<FieldMapping>();
        validation::validate_field_mappings(&rows, &context).map_err(|e| self.fail(e))
    }

    pub async fn save_systems(&mut self) -> Result<SaveOutcome, EditorError> {
        self.validate_systems()?;
        let systems = payload(&self.drafts.snapshot::<SystemConfig>());
        let saved = systems.len();

        let busy = self.busy.enter();
        let result = self.gateway.persist_systems(systems).await;
        drop(busy);
        result.map_err(|e| self.fail(e.into()))?;
        info!(session = %self.session, saved, "systems saved");
        self.last_error = None;

        let reloaded = if self.settings.reload_after_save {
            self.refresh_systems().await.is_ok()
        } else {
            false
        };
        Ok(SaveOutcome {
            tier: Tier::Systems,
            saved,
            reloaded,
        })
    }

    pub async fn save_object_rules(&mut self) -> Result<SaveOutcome, EditorError> {
        self.validate_object_rules()?;
        let rules = payload(&self.drafts.snapshot::<ObjectRule>());
        let saved = rules.len();

        let busy = self.busy.enter();
        let result = self.gateway.persist_object_rules(rules).await;
        drop(busy);
        result.map_err(|e| self.fail(e.into()))?;
        info!(session = %self.session, saved, "object rules saved");
        self.last_error = None;

        let reloaded = if self.settings.reload_after_save {
            self.refresh_object_rules().await.is_ok()
        } else {
            false
        };
        Ok(SaveOutcome {
            tier: Tier::ObjectRules,
            saved,
            reloaded,
        })
    }

    /// Save the mappings of the active context.
    pub async fn save_field_mappings(&mut self) -> Result<SaveOutcome, EditorError> {
        self.validate_field_mappings()?;
        let Some(context) = self.context.clone() else {
            return Err(self.fail(EditorError::NoActiveContext));
        };
        let mappings: Vec<FieldMapping> = self
            .drafts
            .snapshot::<FieldMapping>()
            .iter()
            .filter(|row| row.record.belongs_to(&context))
            .map(|row| row.record.clone())
            .collect();
        let saved = mappings.len();

        let busy = self.busy.enter();
        let result = self
            .gateway
            .persist_field_mappings(&context.s_object_name, &context.system_api_name, mappings)
            .await;
        drop(busy);
        result.map_err(|e| self.fail(e.into()))?;
        info!(session = %self.session, %context, saved, "field mappings saved");
        self.last_error = None;

        let reloaded = if self.settings.reload_after_save {
            match self.open_field_mappings(context).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(session = %self.session, error = %e, "reload after save failed");
                    false
                }
            }
        } else {
            false
        };
        Ok(SaveOutcome {
            tier: Tier::FieldMappings,
            saved,
            reloaded,
        })
    }
}
