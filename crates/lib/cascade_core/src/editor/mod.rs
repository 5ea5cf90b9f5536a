// @zen-component: EDT-ConfigEditor
//
//! The three-tier configuration editor.
//!
//! [`ConfigEditor`] owns the option cache, the drafts, the active
//! field-mapping context, the busy counter and the single error slot. All
//! state changes go through `&mut self`, so one operation runs to its next
//! await before another can touch the editor.
//!
//! Every failing operation stores its message in [`ConfigEditor::last_error`]
//! and also returns it; nothing panics.

pub mod busy;
pub mod cache;
pub mod draft;
pub mod fields;
pub mod resolver;
pub mod save;
pub mod validation;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::gateway::{GatewayError, IntegrationGateway};
use crate::models::{ContextKey, FieldMapping, IntegratableObject, ObjectRule, SystemConfig, Tier};
use crate::settings::EditorSettings;
use busy::BusyCounter;
use cache::OptionCache;
use draft::{DraftRecord, DraftRow, DraftStore, RowDefaults, RowId};
use fields::FieldInput;
use resolver::{ContextResolution, PendingContext};

pub use save::SaveOutcome;

/// Editor errors. The `Display` text is what the administrator sees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error(
        "Duplicate mapping: rule '{rule}' routes {s_object_name} to {system_api_name}, which is already configured"
    )]
    DuplicateObjectRule {
        rule: String,
        s_object_name: String,
        system_api_name: String,
    },

    #[error("Duplicate field mapping: {field} is mapped more than once for {context}")]
    DuplicateSourceField { field: String, context: ContextKey },

    #[error("Duplicate system: {0}")]
    DuplicateSystem(String),

    #[error("Every system needs a developer name")]
    MissingDeveloperName,

    #[error("Select an object rule before editing field mappings")]
    NoActiveContext,

    #[error("Choose both an object and a system before editing field mappings")]
    IncompleteRule,

    #[error("Row {row} not found in {tier}")]
    UnknownRow { tier: Tier, row: RowId },

    #[error("Unknown field for {tier}: {field}")]
    UnknownField { tier: Tier, field: String },

    #[error("Field {field} cannot be edited")]
    ReadOnlyField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Rows cannot be removed from {0}")]
    NotRemovable(Tier),

    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

/// What happened to a settled context resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextApplied {
    /// The context is now active with this many mapping rows.
    Applied { rows: usize },
    /// A newer resolution was started; this one was dropped.
    Stale,
}

/// Session-local editor over the three configuration tiers.
pub struct ConfigEditor {
    gateway: Arc<dyn IntegrationGateway>,
    settings: EditorSettings,
    session: ::uuid::Uuid,
    options: OptionCache,
    drafts: DraftStore,
    context: Option<ContextKey>,
    /// Bumped on every context resolution start; only the latest applies.
    generation: u64,
    busy: BusyCounter,
    last_error: Option<String>,
}

impl ConfigEditor {
    pub fn new(gateway: Arc<dyn IntegrationGateway>, settings: EditorSettings) -> Self {
        Self {
            gateway,
            settings,
            session: crate::uuid::session_id(),
            options: OptionCache::new(),
            drafts: DraftStore::new(),
            context: None,
            generation: 0,
            busy: BusyCounter::default(),
            last_error: None,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Load systems, integratable objects and object rules.
    ///
    /// The three lookups run concurrently and are applied independently: a
    /// failed lookup leaves its collection as it was, and the first failure
    /// is reported.
    pub async fn initialize(&mut self) -> Result<(), EditorError> {
        info!(session = %self.session, gateway = self.gateway.name(), "initializing editor");
        let gateway = Arc::clone(&self.gateway);
        let busy = self.busy.enter();
        let (systems, objects, rules) = futures::join!(
            gateway.fetch_systems(),
            gateway.fetch_integratable_objects(),
            gateway.fetch_object_rules()
        );
        drop(busy);

        let mut failure: Option<GatewayError> = None;
        match systems {
            Ok(systems) => self.apply_systems(&systems),
            Err(e) => failure = failure.or(Some(e)),
        }
        match objects {
            Ok(objects) => self.apply_objects(&objects),
            Err(e) => failure = failure.or(Some(e)),
        }
        match rules {
            Ok(rules) => self.apply_object_rules(&rules),
            Err(e) => failure = failure.or(Some(e)),
        }

        if let Some(e) = failure {
            return Err(self.fail(e.into()));
        }
        self.last_error = None;
        Ok(())
    }

    pub async fn refresh_systems(&mut self) -> Result<(), EditorError> {
        let busy = self.busy.enter();
        let result = self.gateway.fetch_systems().await;
        drop(busy);
        match result {
            Ok(systems) => {
                self.apply_systems(&systems);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    pub async fn refresh_object_rules(&mut self) -> Result<(), EditorError> {
        let busy = self.busy.enter();
        let result = self.gateway.fetch_object_rules().await;
        drop(busy);
        match result {
            Ok(rules) => {
                self.apply_object_rules(&rules);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn apply_systems(&mut self, systems: &[SystemConfig]) {
        info!(session = %self.session, count = systems.len(), "systems loaded");
        self.options.set_systems(systems);
        self.drafts.load(systems);
    }

    fn apply_objects(&mut self, objects: &[IntegratableObject]) {
        info!(session = %self.session, count = objects.len(), "integratable objects loaded");
        self.options.set_objects(objects);
    }

    fn apply_object_rules(&mut self, rules: &[ObjectRule]) {
        info!(session = %self.session, count = rules.len(), "object rules loaded");
        self.drafts.load(rules);
    }

    // -----------------------------------------------------------------------
    // Row editing
    // -----------------------------------------------------------------------

    pub fn add_system(&mut self) -> RowId {
        self.drafts.add_row::<SystemConfig>(&RowDefaults::default())
    }

    /// New rule defaulting to the first known object and system.
    pub fn add_object_rule(&mut self) -> RowId {
        let defaults = self.options.row_defaults();
        self.drafts.add_row::<ObjectRule>(&defaults)
    }

    /// New mapping row in the active context.
    pub fn add_field_mapping(&mut self) -> Result<RowId, EditorError> {
        let defaults = match self.context.as_ref() {
            Some(context) => RowDefaults::from(context),
            None => return Err(self.fail(EditorError::NoActiveContext)),
        };
        Ok(self.drafts.add_row::<FieldMapping>(&defaults))
    }

    /// Apply one field edit. Editing a mapping's `sourceFieldAPI` re-derives
    /// its `dataType` from the current describe result.
    pub fn update_field<T: DraftRecord>(
        &mut self,
        row_id: &RowId,
        field: &str,
        input: impl Into<FieldInput>,
    ) -> Result<(), EditorError> {
        match self
            .drafts
            .update_field::<T>(row_id, field, input.into(), &self.options)
        {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn remove_row<T: DraftRecord>(&mut self, row_id: &RowId) -> Result<(), EditorError> {
        match self.drafts.remove_row::<T>(row_id) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }

    // -----------------------------------------------------------------------
    // Field-mapping context
    // -----------------------------------------------------------------------

    /// Start resolving `context`. Any resolution started earlier becomes
    /// stale and will be ignored when it settles.
    pub fn begin_field_mappings(&mut self, context: ContextKey) -> PendingContext {
        self.generation += 1;
        debug!(session = %self.session, generation = self.generation, %context, "resolving context");
        PendingContext::new(
            Arc::clone(&self.gateway),
            self.generation,
            context,
            self.busy.enter(),
        )
    }

    /// Apply a settled resolution if it is still the latest one.
    ///
    /// On failure the previous context and tier-3 draft stay untouched.
    pub fn finish_field_mappings(
        &mut self,
        resolution: ContextResolution,
    ) -> Result<ContextApplied, EditorError> {
        drop(resolution.busy);
        if resolution.generation != self.generation {
            debug!(
                session = %self.session,
                generation = resolution.generation,
                latest = self.generation,
                context = %resolution.context,
                "discarding stale context resolution"
            );
            return Ok(ContextApplied::Stale);
        }

        match resolution.outcome {
            Ok(resolved) => {
                let context = resolution.context;
                self.options.set_fields(&context.s_object_name, &resolved.fields);
                self.drafts.load(&resolved.mappings);
                let rows = resolved.mappings.len();
                info!(session = %self.session, %context, rows, "field mapping context opened");
                self.context = Some(context);
                self.last_error = None;
                Ok(ContextApplied::Applied { rows })
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Resolve `context` and apply it.
    pub async fn open_field_mappings(
        &mut self,
        context: ContextKey,
    ) -> Result<ContextApplied, EditorError> {
        let pending = self.begin_field_mappings(context);
        let resolution = pending.resolve().await;
        self.finish_field_mappings(resolution)
    }

    /// Open the field mappings of the object rule in row `row_id`.
    pub async fn open_rule_mappings(
        &mut self,
        row_id: &RowId,
    ) -> Result<ContextApplied, EditorError> {
        let error = match self.drafts.record::<ObjectRule>(row_id).map(ObjectRule::context) {
            Some(Some(context)) => return self.open_field_mappings(context).await,
            Some(None) => EditorError::IncompleteRule,
            None => EditorError::UnknownRow {
                tier: Tier::ObjectRules,
                row: row_id.clone(),
            },
        };
        Err(self.fail(error))
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn snapshot<T: DraftRecord>(&self) -> Arc<Vec<DraftRow<T>>> {
        self.drafts.snapshot::<T>()
    }

    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    pub fn options(&self) -> &OptionCache {
        &self.options
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn active_context(&self) -> Option<&ContextKey> {
        self.context.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    /// Record `error` in the error slot and hand it back.
    fn fail(&mut self, error: EditorError) -> EditorError {
        warn!(session = %self.session, %error, "editor operation failed");
        self.last_error = Some(error.to_string());
        error
    }
}
