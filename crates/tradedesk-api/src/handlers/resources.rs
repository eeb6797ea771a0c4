//! Resources library with per-user saved and pinned overlay
//!
//! The caller's access level comes from their organization's tier. Tenants
//! without an organization record only see public material.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::debug;

use tradedesk_core::resources::{
    AccessLevel, ResourceFilter, ResourceItem, ResourceView, SavedResource,
};
use tradedesk_core::{Error, TenantId, UserId};

use crate::extract::{ApiQuery, Tenant, User};
use crate::{AppState, ApiResult};

async fn access_level(state: &AppState, tenant: TenantId) -> ApiResult<AccessLevel> {
    match state.stores.organizations.get(tenant).await {
        Ok(org) => Ok(org.tier.access_level()),
        Err(Error::TenantNotFound(_)) => Ok(AccessLevel::Public),
        Err(e) => Err(e.into()),
    }
}

async fn saved_by_id(state: &AppState, user: &UserId) -> ApiResult<HashMap<String, SavedResource>> {
    let saved = state.stores.saved_resources.list(user).await?;
    Ok(saved
        .into_iter()
        .map(|s| (s.resource_id.clone(), s))
        .collect())
}

fn view(item: ResourceItem, level: AccessLevel, saved: Option<&SavedResource>) -> ResourceView {
    ResourceView {
        locked: !level.allows(item.access_level),
        saved: saved.is_some(),
        pinned: saved.is_some_and(|s| s.pinned),
        item,
    }
}

/// Catalog entries matching the filter. Entries above the caller's level are
/// marked locked unless `accessible_only` hides them.
pub async fn list_resources(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    User(user): User,
    ApiQuery(filter): ApiQuery<ResourceFilter>,
) -> ApiResult<Json<Vec<ResourceView>>> {
    let level = access_level(&state, tenant).await?;
    let saved = saved_by_id(&state, &user).await?;
    let items = state.stores.resources.list().await?;

    let views = items
        .into_iter()
        .filter(|item| filter.matches(item, level))
        .map(|item| {
            let entry = saved.get(&item.id);
            view(item, level, entry)
        })
        .collect();
    Ok(Json(views))
}

pub async fn get_resource(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    User(user): User,
    Path(id): Path<String>,
) -> ApiResult<Json<ResourceView>> {
    let level = access_level(&state, tenant).await?;
    let item = state.stores.resources.get(&id).await?;
    if !level.allows(item.access_level) {
        return Err(Error::AccessDenied(format!(
            "resource {} requires {:?} access",
            id, item.access_level
        ))
        .into());
    }
    let saved = saved_by_id(&state, &user).await?;
    let entry = saved.get(&item.id);
    Ok(Json(view(item, level, entry)))
}

/// The caller's saved resources, pinned first then most recently saved
pub async fn list_saved(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    User(user): User,
) -> ApiResult<Json<Vec<ResourceView>>> {
    let level = access_level(&state, tenant).await?;
    let saved = state.stores.saved_resources.list(&user).await?;
    let catalog: HashMap<String, ResourceItem> = state
        .stores
        .resources
        .list()
        .await?
        .into_iter()
        .map(|item| (item.id.clone(), item))
        .collect();

    // Entries whose resource left the catalog are skipped
    let views = saved
        .iter()
        .filter_map(|s| {
            catalog
                .get(&s.resource_id)
                .map(|item| view(item.clone(), level, Some(s)))
        })
        .collect();
    Ok(Json(views))
}

pub async fn save_resource(
    State(state): State<AppState>,
    User(user): User,
    Path(id): Path<String>,
) -> ApiResult<Json<SavedResource>> {
    state.stores.resources.get(&id).await?;
    Ok(Json(state.stores.saved_resources.save(&user, &id).await?))
}

pub async fn unsave_resource(
    State(state): State<AppState>,
    User(user): User,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let removed = state.stores.saved_resources.unsave(&user, &id).await?;
    debug!(user = %user, resource = %id, removed, "Unsaved resource");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pin_resource(
    State(state): State<AppState>,
    User(user): User,
    Path(id): Path<String>,
) -> ApiResult<Json<SavedResource>> {
    state.stores.resources.get(&id).await?;
    Ok(Json(
        state.stores.saved_resources.set_pinned(&user, &id, true).await?,
    ))
}

pub async fn unpin_resource(
    State(state): State<AppState>,
    User(user): User,
    Path(id): Path<String>,
) -> ApiResult<Json<SavedResource>> {
    state.stores.resources.get(&id).await?;
    Ok(Json(
        state.stores.saved_resources.set_pinned(&user, &id, false).await?,
    ))
}
