//! Dashboard summary, admin listing and the JSON 404

use axum::{
    Json,
    extract::State,
    http::Uri,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use tradedesk_core::billing::Tier;
use tradedesk_core::logistics::ShipmentFilter;
use tradedesk_core::messaging::{ConversationFilter, ConversationSummary};
use tradedesk_core::organization::Completeness;
use tradedesk_core::sourcing::SourcingFilter;
use tradedesk_core::team::{MemberFilter, MemberStatus};
use tradedesk_core::{Error, TenantId};

use crate::extract::Tenant;
use crate::{AppState, ApiError, ApiResult};

const RECENT_CONVERSATIONS: usize = 3;

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub organization: String,
    pub tier: Tier,
    pub open_sourcing_requests: usize,
    pub active_shipments: usize,
    pub next_arrival: Option<NaiveDate>,
    pub unread_messages: usize,
    pub pending_invites: usize,
    pub profile_completeness: Completeness,
    pub recent_conversations: Vec<ConversationSummary>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> ApiResult<Json<Dashboard>> {
    let stores = &state.stores;
    let pending = MemberFilter {
        status: Some(MemberStatus::Pending),
        ..Default::default()
    };
    let all_requests = SourcingFilter::default();
    let all_shipments = ShipmentFilter::default();
    let inbox_filter = ConversationFilter::default();

    let (organization, requests, shipments, unread, invites, inbox) = tokio::try_join!(
        stores.organizations.get(tenant),
        stores.sourcing.list(tenant, &all_requests),
        stores.shipments.list(tenant, &all_shipments),
        stores.messages.unread_total(tenant),
        stores.team.list(tenant, &pending),
        stores.messages.list(tenant, &inbox_filter),
    )?;

    let active: Vec<_> = shipments.iter().filter(|s| s.status.is_active()).collect();
    let next_arrival = active.iter().filter_map(|s| s.eta).min();

    Ok(Json(Dashboard {
        organization: organization.legal_name.clone(),
        tier: organization.tier,
        open_sourcing_requests: requests.iter().filter(|r| r.status.is_open()).count(),
        active_shipments: active.len(),
        next_arrival,
        unread_messages: unread,
        pending_invites: invites.len(),
        profile_completeness: Completeness::from(&organization),
        recent_conversations: inbox.into_iter().take(RECENT_CONVERSATIONS).collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct AdminOrganization {
    pub id: TenantId,
    pub legal_name: String,
    pub country: String,
    pub tier: Tier,
    pub completeness: u8,
    pub created_at: DateTime<Utc>,
}

/// Every tenant, for the brokerage's own staff
pub async fn admin_organizations(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AdminOrganization>>> {
    let organizations = state.stores.organizations.list().await?;
    Ok(Json(
        organizations
            .into_iter()
            .map(|org| AdminOrganization {
                completeness: org.completeness_percent(),
                id: org.id,
                legal_name: org.legal_name,
                country: org.country,
                tier: org.tier,
                created_at: org.created_at,
            })
            .collect(),
    ))
}

pub async fn not_found(uri: Uri) -> ApiError {
    Error::not_found("Route", uri.path()).into()
}
