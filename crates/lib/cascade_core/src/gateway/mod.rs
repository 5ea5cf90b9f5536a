// @zen-component: EDT-Gateway
//
//! Boundary to the persistence backend and the describe service.
//!
//! The editor only talks to the outside world through [`IntegrationGateway`].
//! Every call may fail with an opaque payload; [`GatewayError`] keeps the
//! payload and renders it as one user-facing message.

pub mod errors;
pub mod fixture;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{FieldDescription, FieldMapping, IntegratableObject, ObjectRule, SystemConfig};

pub use errors::reduce_errors;
pub use fixture::{Fixture, FixtureError};
pub use memory::MemoryGateway;

/// Failure reported by a gateway call, carrying whatever the backend sent.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", reduce_errors(.payload))]
pub struct GatewayError {
    payload: Value,
}

impl GatewayError {
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// Error with a single `message` field.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(serde_json::json!({ "message": message.into() }))
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Gateway operations, used for call recording and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    FetchSystems,
    PersistSystems,
    FetchObjectRules,
    PersistObjectRules,
    FetchFieldMappings,
    PersistFieldMappings,
    FetchDescribableFields,
    FetchIntegratableObjects,
}

impl GatewayOp {
    pub fn is_persist(&self) -> bool {
        matches!(
            self,
            GatewayOp::PersistSystems
                | GatewayOp::PersistObjectRules
                | GatewayOp::PersistFieldMappings
        )
    }
}

/// Request/response contract consumed by the editor.
///
/// Calls are awaited; the transport behind them is the implementor's concern.
#[async_trait]
pub trait IntegrationGateway: Send + Sync {
    async fn fetch_systems(&self) -> Result<Vec<SystemConfig>, GatewayError>;

    /// Upsert keyed on `developerName`.
    async fn persist_systems(&self, systems: Vec<SystemConfig>) -> Result<(), GatewayError>;

    async fn fetch_object_rules(&self) -> Result<Vec<ObjectRule>, GatewayError>;

    /// Upsert keyed on `(sObjectName, systemApiName)`.
    async fn persist_object_rules(&self, rules: Vec<ObjectRule>) -> Result<(), GatewayError>;

    async fn fetch_field_mappings(
        &self,
        s_object_name: &str,
        system_api_name: &str,
    ) -> Result<Vec<FieldMapping>, GatewayError>;

    /// Upsert keyed on `sourceFieldAPI` within the given pair.
    async fn persist_field_mappings(
        &self,
        s_object_name: &str,
        system_api_name: &str,
        mappings: Vec<FieldMapping>,
    ) -> Result<(), GatewayError>;

    async fn fetch_describable_fields(
        &self,
        s_object_name: &str,
    ) -> Result<Vec<FieldDescription>, GatewayError>;

    async fn fetch_integratable_objects(&self) -> Result<Vec<IntegratableObject>, GatewayError>;

    /// Gateway identifier for logging.
    fn name(&self) -> &str;
}
