//! In-memory organization store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use tradedesk_core::billing::Tier;
use tradedesk_core::organization::{
    KycDocument, KycStatus, NewKycDocument, Organization, OrganizationPatch,
};
use tradedesk_core::store::OrganizationStore;
use tradedesk_core::{Error, Result, TenantId};

use crate::Latency;

pub struct MemoryOrganizationStore {
    organizations: RwLock<HashMap<TenantId, Organization>>,
    latency: Latency,
}

impl MemoryOrganizationStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            organizations: RwLock::new(HashMap::new()),
            latency,
        }
    }

    async fn modify<R>(
        &self,
        tenant: TenantId,
        f: impl FnOnce(&mut Organization) -> Result<R>,
    ) -> Result<R> {
        self.latency.wait().await;
        let mut orgs = self.organizations.write().await;
        let org = orgs
            .get_mut(&tenant)
            .ok_or_else(|| Error::TenantNotFound(tenant.to_string()))?;
        f(org)
    }
}

#[async_trait]
impl OrganizationStore for MemoryOrganizationStore {
    async fn get(&self, tenant: TenantId) -> Result<Organization> {
        self.latency.wait().await;
        self.organizations
            .read()
            .await
            .get(&tenant)
            .cloned()
            .ok_or_else(|| Error::TenantNotFound(tenant.to_string()))
    }

    async fn put(&self, organization: Organization) -> Result<()> {
        self.latency.wait().await;
        debug!(tenant = %organization.id, "Storing organization");
        self.organizations
            .write()
            .await
            .insert(organization.id, organization);
        Ok(())
    }

    async fn update(&self, tenant: TenantId, patch: OrganizationPatch) -> Result<Organization> {
        self.modify(tenant, |org| {
            org.apply(patch);
            Ok(org.clone())
        })
        .await
    }

    async fn set_tier(&self, tenant: TenantId, tier: Tier) -> Result<Organization> {
        self.modify(tenant, |org| {
            debug!(tenant = %tenant, from = org.tier.as_str(), to = tier.as_str(), "Changing tier");
            org.tier = tier;
            org.updated_at = Utc::now();
            Ok(org.clone())
        })
        .await
    }

    async fn add_kyc_document(&self, tenant: TenantId, doc: NewKycDocument) -> Result<KycDocument> {
        if doc.name.trim().is_empty() {
            return Err(Error::InvalidRequest("document name is required".to_string()));
        }
        self.modify(tenant, |org| {
            let document = KycDocument {
                id: tradedesk_core::new_id("kyc"),
                name: doc.name,
                kind: doc.kind,
                status: KycStatus::Pending,
                uploaded_at: Utc::now(),
            };
            org.compliance.kyc_documents.push(document.clone());
            org.updated_at = Utc::now();
            Ok(document)
        })
        .await
    }

    async fn remove_kyc_document(&self, tenant: TenantId, doc_id: &str) -> Result<()> {
        self.modify(tenant, |org| {
            let docs = &mut org.compliance.kyc_documents;
            let before = docs.len();
            docs.retain(|d| d.id != doc_id);
            if docs.len() == before {
                return Err(Error::not_found("KYC document", doc_id));
            }
            org.updated_at = Utc::now();
            Ok(())
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Organization>> {
        self.latency.wait().await;
        let mut all: Vec<_> = self.organizations.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.legal_name.cmp(&b.legal_name));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_org() -> (MemoryOrganizationStore, TenantId) {
        let store = MemoryOrganizationStore::new(Latency::none());
        let tenant = TenantId::new();
        store
            .put(Organization::new(tenant, "Acme Trading Ltd"))
            .await
            .unwrap();
        (store, tenant)
    }

    #[tokio::test]
    async fn test_get_unknown_tenant() {
        let store = MemoryOrganizationStore::new(Latency::none());
        let err = store.get(TenantId::new()).await.unwrap_err();
        assert!(matches!(err, Error::TenantNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_merges_patch() {
        let (store, tenant) = store_with_org().await;
        let org = store
            .update(
                tenant,
                OrganizationPatch {
                    country: Some("GB".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(org.country, "GB");
        assert_eq!(store.get(tenant).await.unwrap().legal_name, "Acme Trading Ltd");
    }

    #[tokio::test]
    async fn test_kyc_upload_and_remove() {
        let (store, tenant) = store_with_org().await;
        let doc = store
            .add_kyc_document(
                tenant,
                NewKycDocument {
                    name: "incorporation.pdf".to_string(),
                    kind: "certificate_of_incorporation".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(doc.status, KycStatus::Pending);
        assert_eq!(store.get(tenant).await.unwrap().compliance.kyc_documents.len(), 1);

        store.remove_kyc_document(tenant, &doc.id).await.unwrap();
        assert!(store.remove_kyc_document(tenant, &doc.id).await.is_err());
    }

    #[tokio::test]
    async fn test_set_tier() {
        let (store, tenant) = store_with_org().await;
        let org = store.set_tier(tenant, Tier::Enterprise).await.unwrap();
        assert_eq!(org.tier, Tier::Enterprise);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let (store, _) = store_with_org().await;
        store
            .put(Organization::new(TenantId::new(), "Zenith Imports"))
            .await
            .unwrap();
        store
            .put(Organization::new(TenantId::new(), "Baltic Freight"))
            .await
            .unwrap();
        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|o| o.legal_name).collect();
        assert_eq!(names, vec!["Acme Trading Ltd", "Baltic Freight", "Zenith Imports"]);
    }
}
