//! In-memory sourcing request store

use async_trait::async_trait;
use tracing::info;

use tradedesk_core::organization::Incoterm;
use tradedesk_core::sourcing::{
    NewSourcingRequest, SourcingFilter, SourcingPatch, SourcingRequest, SourcingStatus,
};
use tradedesk_core::store::SourcingStore;
use tradedesk_core::{Error, Result, TenantId};

use crate::Latency;
use crate::table::{Record, TenantTable};

impl Record for SourcingRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct MemorySourcingStore {
    requests: TenantTable<SourcingRequest>,
    latency: Latency,
}

impl MemorySourcingStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            requests: TenantTable::new(),
            latency,
        }
    }

    /// Insert a request as-is (seeding)
    pub async fn insert(&self, tenant: TenantId, request: SourcingRequest) {
        self.requests.push(tenant, request).await;
    }

    async fn modify(
        &self,
        tenant: TenantId,
        id: &str,
        patch: SourcingPatch,
    ) -> Result<SourcingRequest> {
        self.latency.wait().await;
        self.requests
            .modify(tenant, id, |r| r.apply(patch))
            .await
            .map(|(_, r)| r)
            .ok_or_else(|| Error::not_found("Sourcing request", id))
    }
}

#[async_trait]
impl SourcingStore for MemorySourcingStore {
    /// Most recently created first
    async fn list(
        &self,
        tenant: TenantId,
        filter: &SourcingFilter,
    ) -> Result<Vec<SourcingRequest>> {
        self.latency.wait().await;
        let mut rows = self.requests.filter(tenant, |r| filter.matches(r)).await;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get(&self, tenant: TenantId, id: &str) -> Result<SourcingRequest> {
        self.latency.wait().await;
        self.requests
            .find(tenant, id)
            .await
            .ok_or_else(|| Error::not_found("Sourcing request", id))
    }

    async fn create(
        &self,
        tenant: TenantId,
        requested_by: &str,
        request: NewSourcingRequest,
    ) -> Result<SourcingRequest> {
        request.validate()?;
        self.latency.wait().await;
        // Callers that know the organization default pass it via `incoterm`
        let request = request.into_request(requested_by, Incoterm::default());
        info!(tenant = %tenant, request = %request.id, "Created sourcing request");
        Ok(self.requests.push(tenant, request).await)
    }

    async fn update(
        &self,
        tenant: TenantId,
        id: &str,
        patch: SourcingPatch,
    ) -> Result<SourcingRequest> {
        patch.validate()?;
        self.modify(tenant, id, patch).await
    }

    async fn set_status(
        &self,
        tenant: TenantId,
        id: &str,
        status: SourcingStatus,
    ) -> Result<SourcingRequest> {
        let patch = SourcingPatch {
            status: Some(status),
            ..Default::default()
        };
        let request = self.modify(tenant, id, patch).await?;
        info!(tenant = %tenant, request = %id, status = ?status, "Sourcing request status changed");
        Ok(request)
    }

    async fn delete(&self, tenant: TenantId, id: &str) -> Result<()> {
        self.latency.wait().await;
        if self.requests.remove(tenant, id).await {
            Ok(())
        } else {
            Err(Error::not_found("Sourcing request", id))
        }
    }
}
