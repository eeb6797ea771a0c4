//! Sourcing requests

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::info;

use tradedesk_core::sourcing::{
    NewSourcingRequest, SourcingFilter, SourcingPatch, SourcingRequest, SourcingStatus,
};

use super::default_incoterm;
use crate::extract::{ApiJson, ApiQuery, Tenant, User};
use crate::{AppState, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: SourcingStatus,
}

pub async fn list_requests(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiQuery(filter): ApiQuery<SourcingFilter>,
) -> ApiResult<Json<Vec<SourcingRequest>>> {
    Ok(Json(state.stores.sourcing.list(tenant, &filter).await?))
}

/// Create a draft request, defaulting the incoterm from organization settings
pub async fn create_request(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    User(user): User,
    ApiJson(mut request): ApiJson<NewSourcingRequest>,
) -> ApiResult<(StatusCode, Json<SourcingRequest>)> {
    if request.incoterm.is_none() {
        request.incoterm = Some(default_incoterm(&state, tenant).await?);
    }
    let request = state
        .stores
        .sourcing
        .create(tenant, user.as_str(), request)
        .await?;
    info!(tenant = %tenant, request = %request.id, "Sourcing request created");
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn get_request(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<SourcingRequest>> {
    Ok(Json(state.stores.sourcing.get(tenant, &id).await?))
}

pub async fn update_request(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<SourcingPatch>,
) -> ApiResult<Json<SourcingRequest>> {
    Ok(Json(state.stores.sourcing.update(tenant, &id, patch).await?))
}

/// Any status may follow any other
pub async fn set_status(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> ApiResult<Json<SourcingRequest>> {
    let request = state
        .stores
        .sourcing
        .set_status(tenant, &id, body.status)
        .await?;
    info!(tenant = %tenant, request = %id, status = ?body.status, "Sourcing status changed");
    Ok(Json(request))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.stores.sourcing.delete(tenant, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
