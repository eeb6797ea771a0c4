//! Settings sections, integrations and legal acceptance

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use tradedesk_core::settings::{LegalDocument, SettingsState, SettingsUpdate};

use crate::extract::{ApiJson, Tenant};
use crate::{AppState, ApiResult};

pub async fn get_settings(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
) -> ApiResult<Json<SettingsState>> {
    Ok(Json(state.stores.settings.get(tenant).await?))
}

/// Replace one section, e.g. `{"section": "security", "value": {...}}`
pub async fn update_settings(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiJson(update): ApiJson<SettingsUpdate>,
) -> ApiResult<Json<SettingsState>> {
    Ok(Json(state.stores.settings.update(tenant, update).await?))
}

pub async fn connect_integration(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<SettingsState>> {
    let settings = state.stores.settings.set_integration(tenant, &id, true).await?;
    info!(tenant = %tenant, integration = %id, "Integration connected");
    Ok(Json(settings))
}

pub async fn disconnect_integration(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<SettingsState>> {
    let settings = state.stores.settings.set_integration(tenant, &id, false).await?;
    info!(tenant = %tenant, integration = %id, "Integration disconnected");
    Ok(Json(settings))
}

pub async fn accept_legal(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(document): Path<String>,
) -> ApiResult<Json<SettingsState>> {
    let document: LegalDocument = document.parse()?;
    Ok(Json(state.stores.settings.accept_legal(tenant, document).await?))
}
