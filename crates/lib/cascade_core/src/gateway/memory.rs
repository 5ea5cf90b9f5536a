// @zen-component: EDT-MemoryGateway
//
//! In-memory reference backend.
//!
//! Performs the same natural-key upserts a real backend would, records every
//! call, and can be told to fail specific operations.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{RwLock, RwLockWriteGuard};
use tracing::debug;

use super::{Fixture, GatewayError, GatewayOp, IntegrationGateway};
use crate::models::{
    FieldDescription, FieldMapping, IntegratableObject, ObjectDescribe, ObjectRule, SystemConfig,
};

#[derive(Debug, Default)]
struct MemoryState {
    systems: Vec<SystemConfig>,
    object_rules: Vec<ObjectRule>,
    field_mappings: Vec<FieldMapping>,
    objects: Vec<ObjectDescribe>,
    failures: HashMap<GatewayOp, Value>,
    calls: Vec<GatewayOp>,
}

/// Gateway backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: RwLock<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend from a fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                systems: fixture.systems,
                object_rules: fixture.object_rules,
                field_mappings: fixture.field_mappings,
                objects: fixture.objects,
                ..Default::default()
            }),
        }
    }

    /// Make every subsequent call of `op` fail with `payload`.
    pub async fn fail_on(&self, op: GatewayOp, payload: Value) {
        self.state.write().await.failures.insert(op, payload);
    }

    pub async fn clear_failures(&self) {
        self.state.write().await.failures.clear();
    }

    /// Every call received so far, in order.
    pub async fn calls(&self) -> Vec<GatewayOp> {
        self.state.read().await.calls.clone()
    }

    /// Number of persist calls received so far.
    pub async fn persist_count(&self) -> usize {
        self.state
            .read()
            .await
            .calls
            .iter()
            .filter(|op| op.is_persist())
            .count()
    }

    pub async fn stored_systems(&self) -> Vec<SystemConfig> {
        self.state.read().await.systems.clone()
    }

    pub async fn stored_object_rules(&self) -> Vec<ObjectRule> {
        self.state.read().await.object_rules.clone()
    }

    pub async fn stored_field_mappings(&self) -> Vec<FieldMapping> {
        self.state.read().await.field_mappings.clone()
    }

    /// Record the call and return the injected failure, if any.
    async fn enter(&self, op: GatewayOp) -> Result<RwLockWriteGuard<'_, MemoryState>, GatewayError> {
        let mut state = self.state.write().await;
        state.calls.push(op);
        if let Some(payload) = state.failures.get(&op) {
            debug!(?op, "memory gateway: injected failure");
            return Err(GatewayError::new(payload.clone()));
        }
        Ok(state)
    }
}

#[async_trait]
impl IntegrationGateway for MemoryGateway {
    async fn fetch_systems(&self) -> Result<Vec<SystemConfig>, GatewayError> {
        let state = self.enter(GatewayOp::FetchSystems).await?;
        Ok(state.systems.clone())
    }

    async fn persist_systems(&self, systems: Vec<SystemConfig>) -> Result<(), GatewayError> {
        let mut state = self.enter(GatewayOp::PersistSystems).await?;
        if systems.iter().any(|s| s.developer_name.is_empty()) {
            return Err(GatewayError::message("System developer name is required"));
        }
        for system in systems {
            match state
                .systems
                .iter_mut()
                .find(|s| s.developer_name == system.developer_name)
            {
                Some(existing) => *existing = system,
                None => state.systems.push(system),
            }
        }
        Ok(())
    }

    async fn fetch_object_rules(&self) -> Result<Vec<ObjectRule>, GatewayError> {
        let state = self.enter(GatewayOp::FetchObjectRules).await?;
        Ok(state.object_rules.clone())
    }

    async fn persist_object_rules(&self, rules: Vec<ObjectRule>) -> Result<(), GatewayError> {
        let mut state = self.enter(GatewayOp::PersistObjectRules).await?;
        for mut rule in rules {
            if rule.developer_name.is_empty() {
                rule.developer_name = rule.display_name();
            }
            match state.object_rules.iter_mut().find(|r| {
                r.s_object_name == rule.s_object_name && r.system_api_name == rule.system_api_name
            }) {
                Some(existing) => *existing = rule,
                None => state.object_rules.push(rule),
            }
        }
        Ok(())
    }

    async fn fetch_field_mappings(
        &self,
        s_object_name: &str,
        system_api_name: &str,
    ) -> Result<Vec<FieldMapping>, GatewayError> {
        let state = self.enter(GatewayOp::FetchFieldMappings).await?;
        Ok(state
            .field_mappings
            .iter()
            .filter(|m| m.s_object_name == s_object_name && m.system_api_name == system_api_name)
            .cloned()
            .collect())
    }

    async fn persist_field_mappings(
        &self,
        s_object_name: &str,
        system_api_name: &str,
        mappings: Vec<FieldMapping>,
    ) -> Result<(), GatewayError> {
        let mut state = self.enter(GatewayOp::PersistFieldMappings).await?;
        for mut mapping in mappings {
            mapping.s_object_name = s_object_name.to_string();
            mapping.system_api_name = system_api_name.to_string();
            match state.field_mappings.iter_mut().find(|m| {
                m.s_object_name == s_object_name
                    && m.system_api_name == system_api_name
                    && m.source_field_api == mapping.source_field_api
            }) {
                Some(existing) => *existing = mapping,
                None => state.field_mappings.push(mapping),
            }
        }
        Ok(())
    }

    async fn fetch_describable_fields(
        &self,
        s_object_name: &str,
    ) -> Result<Vec<FieldDescription>, GatewayError> {
        let state = self.enter(GatewayOp::FetchDescribableFields).await?;
        Ok(state
            .objects
            .iter()
            .find(|o| o.api_name == s_object_name)
            .map(|o| o.fields.clone())
            .unwrap_or_default())
    }

    async fn fetch_integratable_objects(&self) -> Result<Vec<IntegratableObject>, GatewayError> {
        let state = self.enter(GatewayOp::FetchIntegratableObjects).await?;
        Ok(state.objects.iter().map(ObjectDescribe::summary).collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
