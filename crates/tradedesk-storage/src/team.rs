//! In-memory team store

use async_trait::async_trait;
use tracing::info;

use tradedesk_core::store::TeamStore;
use tradedesk_core::team::{InviteMember, MemberFilter, MemberPatch, TeamMember};
use tradedesk_core::{Error, Result, TenantId};

use crate::Latency;
use crate::table::{Record, TenantTable};

impl Record for TeamMember {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct MemoryTeamStore {
    members: TenantTable<TeamMember>,
    latency: Latency,
}

impl MemoryTeamStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            members: TenantTable::new(),
            latency,
        }
    }

    /// Insert a member as-is (seeding)
    pub async fn insert(&self, tenant: TenantId, member: TeamMember) {
        self.members.push(tenant, member).await;
    }
}

#[async_trait]
impl TeamStore for MemoryTeamStore {
    async fn list(&self, tenant: TenantId, filter: &MemberFilter) -> Result<Vec<TeamMember>> {
        self.latency.wait().await;
        Ok(self.members.filter(tenant, |m| filter.matches(m)).await)
    }

    async fn get(&self, tenant: TenantId, id: &str) -> Result<TeamMember> {
        self.latency.wait().await;
        self.members
            .find(tenant, id)
            .await
            .ok_or_else(|| Error::not_found("Team member", id))
    }

    async fn invite(&self, tenant: TenantId, invite: InviteMember) -> Result<TeamMember> {
        invite.validate()?;
        self.latency.wait().await;
        let member = invite.into_member();
        info!(tenant = %tenant, member = %member.id, role = ?member.role, "Invited team member");
        Ok(self.members.push(tenant, member).await)
    }

    async fn update(&self, tenant: TenantId, id: &str, patch: MemberPatch) -> Result<TeamMember> {
        self.latency.wait().await;
        self.members
            .modify(tenant, id, |m| m.apply(patch))
            .await
            .map(|(_, m)| m)
            .ok_or_else(|| Error::not_found("Team member", id))
    }

    async fn remove(&self, tenant: TenantId, id: &str) -> Result<()> {
        self.latency.wait().await;
        if self.members.remove(tenant, id).await {
            info!(tenant = %tenant, member = %id, "Removed team member");
            Ok(())
        } else {
            Err(Error::not_found("Team member", id))
        }
    }
}
