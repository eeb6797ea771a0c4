//! TradeDesk Storage
//!
//! In-memory implementations of the `tradedesk-core` store traits:
//! - Tenant-scoped tables with linear find/filter/push
//! - Optional simulated latency on every operation
//! - Saved-resource overlay persisted to a JSON file
//! - Deterministic demo seed data

pub mod atomic_writer;
pub mod latency;
pub mod logistics;
pub mod messages;
pub mod organization;
pub mod resources;
pub mod saved;
pub mod seed;
pub mod settings;
pub mod sourcing;
mod table;
pub mod team;

use std::sync::Arc;

use tracing::info;
use tradedesk_core::Result;
use tradedesk_core::store::{
    MessageStore, OrganizationStore, ResourceStore, SavedResourceStore, SettingsStore,
    ShipmentStore, SourcingStore, TeamStore,
};

pub use latency::Latency;
pub use logistics::MemoryShipmentStore;
pub use messages::MemoryMessageStore;
pub use organization::MemoryOrganizationStore;
pub use resources::MemoryResourceStore;
pub use saved::FileSavedResourceStore;
pub use settings::MemorySettingsStore;
pub use sourcing::MemorySourcingStore;
pub use team::MemoryTeamStore;

/// Every store the portal needs, as trait objects.
#[derive(Clone)]
pub struct Stores {
    pub organizations: Arc<dyn OrganizationStore>,
    pub team: Arc<dyn TeamStore>,
    pub messages: Arc<dyn MessageStore>,
    pub resources: Arc<dyn ResourceStore>,
    pub saved_resources: Arc<dyn SavedResourceStore>,
    pub settings: Arc<dyn SettingsStore>,
    pub sourcing: Arc<dyn SourcingStore>,
    pub shipments: Arc<dyn ShipmentStore>,
}

impl Stores {
    /// Empty tenant stores with the standard resources catalog. Saved
    /// resources are kept in memory only.
    pub fn in_memory(latency: Latency) -> Self {
        Self::new(latency, FileSavedResourceStore::in_memory(latency))
    }

    /// Empty tenant stores with the standard resources catalog
    pub fn new(latency: Latency, saved: FileSavedResourceStore) -> Self {
        Self {
            organizations: Arc::new(MemoryOrganizationStore::new(latency)),
            team: Arc::new(MemoryTeamStore::new(latency)),
            messages: Arc::new(MemoryMessageStore::new(latency)),
            resources: Arc::new(MemoryResourceStore::new(seed::resources(), latency)),
            saved_resources: Arc::new(saved),
            settings: Arc::new(MemorySettingsStore::new(latency)),
            sourcing: Arc::new(MemorySourcingStore::new(latency)),
            shipments: Arc::new(MemoryShipmentStore::new(latency)),
        }
    }

    /// Stores pre-populated with the demo tenant from [`seed`]
    pub async fn seeded(latency: Latency, saved: FileSavedResourceStore) -> Result<Self> {
        let tenant = seed::demo_tenant();

        let organizations = MemoryOrganizationStore::new(latency);
        organizations.put(seed::organization()).await?;

        let team = MemoryTeamStore::new(latency);
        for member in seed::members() {
            team.insert(tenant, member).await;
        }

        let messages = MemoryMessageStore::new(latency);
        for conversation in seed::conversations() {
            messages.insert(tenant, conversation).await;
        }

        let settings = MemorySettingsStore::new(latency);
        settings.insert(tenant, seed::settings()).await;

        let sourcing = MemorySourcingStore::new(latency);
        for request in seed::sourcing_requests() {
            sourcing.insert(tenant, request).await;
        }

        let shipments = MemoryShipmentStore::new(latency);
        for shipment in seed::shipments() {
            shipments.insert(tenant, shipment).await;
        }

        info!(tenant = %tenant, "Seeded demo tenant");

        Ok(Self {
            organizations: Arc::new(organizations),
            team: Arc::new(team),
            messages: Arc::new(messages),
            resources: Arc::new(MemoryResourceStore::new(seed::resources(), latency)),
            saved_resources: Arc::new(saved),
            settings: Arc::new(settings),
            sourcing: Arc::new(sourcing),
            shipments: Arc::new(shipments),
        })
    }
}
