//! In-memory settings store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use tradedesk_core::settings::{LegalDocument, SettingsState, SettingsUpdate};
use tradedesk_core::store::SettingsStore;
use tradedesk_core::{Result, TenantId};

use crate::Latency;

pub struct MemorySettingsStore {
    settings: RwLock<HashMap<TenantId, SettingsState>>,
    latency: Latency,
}

impl MemorySettingsStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            settings: RwLock::new(HashMap::new()),
            latency,
        }
    }

    /// Replace a tenant's settings wholesale (seeding)
    pub async fn insert(&self, tenant: TenantId, state: SettingsState) {
        self.settings.write().await.insert(tenant, state);
    }

    async fn modify(
        &self,
        tenant: TenantId,
        f: impl FnOnce(&mut SettingsState) -> Result<()>,
    ) -> Result<SettingsState> {
        self.latency.wait().await;
        let mut all = self.settings.write().await;
        let state = all
            .entry(tenant)
            .or_insert_with(SettingsState::with_default_integrations);
        // Validate against a copy so a rejected update leaves nothing behind
        let mut next = state.clone();
        f(&mut next)?;
        *state = next.clone();
        Ok(next)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, tenant: TenantId) -> Result<SettingsState> {
        self.latency.wait().await;
        if let Some(state) = self.settings.read().await.get(&tenant) {
            return Ok(state.clone());
        }
        Ok(self
            .settings
            .write()
            .await
            .entry(tenant)
            .or_insert_with(SettingsState::with_default_integrations)
            .clone())
    }

    async fn update(&self, tenant: TenantId, update: SettingsUpdate) -> Result<SettingsState> {
        debug!(tenant = %tenant, "Updating settings section");
        self.modify(tenant, |s| s.apply(update)).await
    }

    async fn set_integration(
        &self,
        tenant: TenantId,
        integration_id: &str,
        connected: bool,
    ) -> Result<SettingsState> {
        self.modify(tenant, |s| s.set_integration(integration_id, connected).map(|_| ()))
            .await
    }

    async fn accept_legal(
        &self,
        tenant: TenantId,
        document: LegalDocument,
    ) -> Result<SettingsState> {
        self.modify(tenant, |s| {
            s.accept(document);
            Ok(())
        })
        .await
    }
}
