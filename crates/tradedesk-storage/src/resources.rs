//! Static resources catalog

use async_trait::async_trait;

use tradedesk_core::resources::ResourceItem;
use tradedesk_core::store::ResourceStore;
use tradedesk_core::{Error, Result};

use crate::Latency;

/// Read-only catalog shared by every tenant
pub struct MemoryResourceStore {
    items: Vec<ResourceItem>,
    latency: Latency,
}

impl MemoryResourceStore {
    pub fn new(mut items: Vec<ResourceItem>, latency: Latency) -> Self {
        items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Self { items, latency }
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    /// Newest first
    async fn list(&self) -> Result<Vec<ResourceItem>> {
        self.latency.wait().await;
        Ok(self.items.clone())
    }

    async fn get(&self, id: &str) -> Result<ResourceItem> {
        self.latency.wait().await;
        self.items
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("Resource", id))
    }
}
