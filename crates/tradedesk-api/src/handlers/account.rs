//! Organization profile, KYC uploads and team administration

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use tradedesk_core::organization::{
    Completeness, KycDocument, NewKycDocument, Organization, OrganizationPatch,
};
use tradedesk_core::team::{InviteMember, MemberFilter, MemberPatch, TeamMember};

use crate::extract::{ApiJson, ApiQuery, Tenant};
use crate::{AppState, ApiResult};

pub async fn get_organization(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> ApiResult<Json<Organization>> {
    Ok(Json(state.stores.organizations.get(tenant).await?))
}

/// Merge the present fields over the profile. Missing required fields are
/// reported by `/completeness`, never rejected here.
pub async fn update_organization(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiJson(patch): ApiJson<OrganizationPatch>,
) -> ApiResult<Json<Organization>> {
    let organization = state.stores.organizations.update(tenant, patch).await?;
    Ok(Json(organization))
}

pub async fn organization_completeness(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> ApiResult<Json<Completeness>> {
    let organization = state.stores.organizations.get(tenant).await?;
    Ok(Json(Completeness::from(&organization)))
}

pub async fn add_kyc_document(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiJson(document): ApiJson<NewKycDocument>,
) -> ApiResult<(StatusCode, Json<KycDocument>)> {
    let document = state
        .stores
        .organizations
        .add_kyc_document(tenant, document)
        .await?;
    info!(tenant = %tenant, document = %document.id, "KYC document uploaded");
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn remove_kyc_document(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .stores
        .organizations
        .remove_kyc_document(tenant, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_members(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiQuery(filter): ApiQuery<MemberFilter>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    Ok(Json(state.stores.team.list(tenant, &filter).await?))
}

pub async fn invite_member(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiJson(invite): ApiJson<InviteMember>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let member = state.stores.team.invite(tenant, invite).await?;
    info!(tenant = %tenant, member = %member.id, role = ?member.role, "Team member invited");
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn get_member(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<TeamMember>> {
    Ok(Json(state.stores.team.get(tenant, &id).await?))
}

pub async fn update_member(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<MemberPatch>,
) -> ApiResult<Json<TeamMember>> {
    Ok(Json(state.stores.team.update(tenant, &id, patch).await?))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.stores.team.remove(tenant, &id).await?;
    info!(tenant = %tenant, member = %id, "Team member removed");
    Ok(StatusCode::NO_CONTENT)
}
