//! Store traits
//!
//! Each portal area talks to its records through one of these traits. Every
//! method is tenant-scoped. The in-memory implementations live in
//! `tradedesk-storage`; a database-backed deployment would provide its own.
//!
//! Writes are last-write-wins. Nothing here enforces referential integrity
//! between areas (a shipment may point at a deleted sourcing request).
//!
//! # Example
//! ```no_run
//! # use tradedesk_core::store::MessageStore;
//! # use tradedesk_core::messaging::ConversationFilter;
//! # use tradedesk_core::TenantId;
//! # async fn example(store: &dyn MessageStore) -> tradedesk_core::Result<()> {
//! let tenant = TenantId::new();
//! let inbox = store.list(tenant, &ConversationFilter::default()).await?;
//! for summary in inbox {
//!     println!("{} ({} unread)", summary.subject, summary.unread_count);
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::billing::Tier;
use crate::logistics::{NewMilestone, NewShipment, Shipment, ShipmentFilter};
use crate::messaging::{
    Conversation, ConversationFilter, ConversationPatch, ConversationSummary, NewConversation,
};
use crate::organization::{KycDocument, NewKycDocument, Organization, OrganizationPatch};
use crate::resources::{ResourceItem, SavedResource};
use crate::settings::{LegalDocument, SettingsState, SettingsUpdate};
use crate::sourcing::{
    NewSourcingRequest, SourcingFilter, SourcingPatch, SourcingRequest, SourcingStatus,
};
use crate::team::{InviteMember, MemberFilter, MemberPatch, TeamMember};
use crate::{Result, TenantId, UserId};

/// Organization (tenant) records
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Get the organization for a tenant
    ///
    /// # Errors
    /// - `Error::TenantNotFound` if the tenant has no organization
    async fn get(&self, tenant: TenantId) -> Result<Organization>;

    /// Insert or replace an organization
    async fn put(&self, organization: Organization) -> Result<()>;

    /// Merge a patch over the stored organization
    async fn update(&self, tenant: TenantId, patch: OrganizationPatch) -> Result<Organization>;

    async fn set_tier(&self, tenant: TenantId, tier: Tier) -> Result<Organization>;

    async fn add_kyc_document(&self, tenant: TenantId, doc: NewKycDocument) -> Result<KycDocument>;

    async fn remove_kyc_document(&self, tenant: TenantId, doc_id: &str) -> Result<()>;

    /// All organizations, for the admin console
    async fn list(&self) -> Result<Vec<Organization>>;
}

/// Team members of an organization
#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn list(&self, tenant: TenantId, filter: &MemberFilter) -> Result<Vec<TeamMember>>;

    async fn get(&self, tenant: TenantId, id: &str) -> Result<TeamMember>;

    /// Create a pending member
    async fn invite(&self, tenant: TenantId, invite: InviteMember) -> Result<TeamMember>;

    async fn update(&self, tenant: TenantId, id: &str, patch: MemberPatch) -> Result<TeamMember>;

    async fn remove(&self, tenant: TenantId, id: &str) -> Result<()>;
}

/// Conversations and their embedded messages
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Inbox rows, most recently updated first
    async fn list(
        &self,
        tenant: TenantId,
        filter: &ConversationFilter,
    ) -> Result<Vec<ConversationSummary>>;

    async fn get(&self, tenant: TenantId, id: &str) -> Result<Conversation>;

    async fn create(
        &self,
        tenant: TenantId,
        sender: &str,
        conversation: NewConversation,
    ) -> Result<Conversation>;

    /// Append a message and return the updated conversation
    async fn reply(&self, tenant: TenantId, id: &str, sender: &str, body: String)
    -> Result<Conversation>;

    async fn mark_read(&self, tenant: TenantId, id: &str) -> Result<Conversation>;

    async fn update(
        &self,
        tenant: TenantId,
        id: &str,
        patch: ConversationPatch,
    ) -> Result<Conversation>;

    async fn delete(&self, tenant: TenantId, id: &str) -> Result<()>;

    /// Total unread messages across active conversations
    async fn unread_total(&self, tenant: TenantId) -> Result<usize>;
}

/// Static resources catalog (shared across tenants)
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn list(&self) -> Result<Vec<ResourceItem>>;

    async fn get(&self, id: &str) -> Result<ResourceItem>;
}

/// Per-user saved/pinned overlay on the resources catalog
#[async_trait]
pub trait SavedResourceStore: Send + Sync {
    /// Pinned first, then most recently saved
    async fn list(&self, user: &UserId) -> Result<Vec<SavedResource>>;

    /// Save a resource; saving twice keeps the original entry
    async fn save(&self, user: &UserId, resource_id: &str) -> Result<SavedResource>;

    /// Returns whether anything was removed
    async fn unsave(&self, user: &UserId, resource_id: &str) -> Result<bool>;

    /// Pin (saving the resource first if needed) or unpin
    ///
    /// # Errors
    /// - `Error::NotFound` when unpinning a resource the user never saved
    async fn set_pinned(&self, user: &UserId, resource_id: &str, pinned: bool)
    -> Result<SavedResource>;
}

/// Settings aggregate
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Settings for a tenant, created with defaults on first access
    async fn get(&self, tenant: TenantId) -> Result<SettingsState>;

    async fn update(&self, tenant: TenantId, update: SettingsUpdate) -> Result<SettingsState>;

    async fn set_integration(
        &self,
        tenant: TenantId,
        integration_id: &str,
        connected: bool,
    ) -> Result<SettingsState>;

    async fn accept_legal(&self, tenant: TenantId, document: LegalDocument)
    -> Result<SettingsState>;
}

/// Sourcing requests
#[async_trait]
pub trait SourcingStore: Send + Sync {
    async fn list(&self, tenant: TenantId, filter: &SourcingFilter) -> Result<Vec<SourcingRequest>>;

    async fn get(&self, tenant: TenantId, id: &str) -> Result<SourcingRequest>;

    async fn create(
        &self,
        tenant: TenantId,
        requested_by: &str,
        request: NewSourcingRequest,
    ) -> Result<SourcingRequest>;

    async fn update(&self, tenant: TenantId, id: &str, patch: SourcingPatch)
    -> Result<SourcingRequest>;

    async fn set_status(
        &self,
        tenant: TenantId,
        id: &str,
        status: SourcingStatus,
    ) -> Result<SourcingRequest>;

    async fn delete(&self, tenant: TenantId, id: &str) -> Result<()>;
}

/// Shipments
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn list(&self, tenant: TenantId, filter: &ShipmentFilter) -> Result<Vec<Shipment>>;

    async fn get(&self, tenant: TenantId, id: &str) -> Result<Shipment>;

    async fn book(&self, tenant: TenantId, shipment: NewShipment) -> Result<Shipment>;

    async fn add_milestone(
        &self,
        tenant: TenantId,
        id: &str,
        milestone: NewMilestone,
    ) -> Result<Shipment>;
}
