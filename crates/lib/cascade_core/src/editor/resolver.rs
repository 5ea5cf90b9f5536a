// @zen-component: EDT-ContextResolver
//
//! Cascading context resolution: object rule selection → describe + stored
//! mappings → reconciled field-mapping rows.

use std::collections::HashMap;
use std::sync::Arc;

use super::busy::BusyGuard;
use crate::gateway::{GatewayError, IntegrationGateway};
use crate::models::{ContextKey, FieldDescription, FieldMapping};

/// Both lookups for one context, joined and reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContext {
    pub fields: Vec<FieldDescription>,
    pub mappings: Vec<FieldMapping>,
}

/// A started resolution, tagged with the generation it belongs to.
///
/// Holds its own handle on the gateway so it can run while the editor is
/// busy with something else. The editor counts as busy until the resolution
/// is finished or dropped.
pub struct PendingContext {
    gateway: Arc<dyn IntegrationGateway>,
    generation: u64,
    context: ContextKey,
    busy: BusyGuard,
}

impl PendingContext {
    pub(crate) fn new(
        gateway: Arc<dyn IntegrationGateway>,
        generation: u64,
        context: ContextKey,
        busy: BusyGuard,
    ) -> Self {
        Self {
            gateway,
            generation,
            context,
            busy,
        }
    }

    pub fn context(&self) -> &ContextKey {
        &self.context
    }

    /// Run both lookups to completion.
    pub async fn resolve(self) -> ContextResolution {
        let outcome = resolve_context(self.gateway.as_ref(), &self.context).await;
        ContextResolution {
            generation: self.generation,
            context: self.context,
            outcome,
            busy: self.busy,
        }
    }
}

/// The settled result of a [`PendingContext`]. Finishing consumes it.
#[derive(Debug)]
pub struct ContextResolution {
    pub(crate) generation: u64,
    pub(crate) context: ContextKey,
    pub(crate) outcome: Result<ResolvedContext, GatewayError>,
    pub(crate) busy: BusyGuard,
}

impl ContextResolution {
    pub fn context(&self) -> &ContextKey {
        &self.context
    }
}

/// Fetch the describe result and the stored mappings for `context`
/// concurrently; fail as a whole if either fails.
pub async fn resolve_context(
    gateway: &dyn IntegrationGateway,
    context: &ContextKey,
) -> Result<ResolvedContext, GatewayError> {
    let (fields, stored) = futures::try_join!(
        gateway.fetch_describable_fields(&context.s_object_name),
        gateway.fetch_field_mappings(&context.s_object_name, &context.system_api_name)
    )?;
    let mappings = reconcile_data_types(context, stored, &fields);
    Ok(ResolvedContext { fields, mappings })
}

/// Overwrite each stored `dataType` from the describe result.
///
/// The stored value survives only when the source field is no longer
/// described. Rows missing their context fields inherit them from `context`.
pub fn reconcile_data_types(
    context: &ContextKey,
    stored: Vec<FieldMapping>,
    fields: &[FieldDescription],
) -> Vec<FieldMapping> {
    let described: HashMap<&str, &str> = fields
        .iter()
        .filter(|f| !f.data_type.is_empty())
        .map(|f| (f.api_name.as_str(), f.data_type.as_str()))
        .collect();

    stored
        .into_iter()
        .map(|mut mapping| {
            if let Some(data_type) = described.get(mapping.source_field_api.as_str()) {
                mapping.data_type = (*data_type).to_string();
            }
            if mapping.s_object_name.is_empty() {
                mapping.s_object_name.clone_from(&context.s_object_name);
            }
            if mapping.system_api_name.is_empty() {
                mapping.system_api_name.clone_from(&context.system_api_name);
            }
            mapping
        })
        .collect()
}
