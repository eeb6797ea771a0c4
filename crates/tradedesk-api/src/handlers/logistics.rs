//! Shipments and milestones

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;

use tradedesk_core::logistics::{NewMilestone, NewShipment, Shipment, ShipmentFilter};

use super::default_incoterm;
use crate::extract::{ApiJson, ApiQuery, Tenant};
use crate::{AppState, ApiResult};

pub async fn list_shipments(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiQuery(filter): ApiQuery<ShipmentFilter>,
) -> ApiResult<Json<Vec<Shipment>>> {
    Ok(Json(state.stores.shipments.list(tenant, &filter).await?))
}

pub async fn book_shipment(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiJson(mut shipment): ApiJson<NewShipment>,
) -> ApiResult<(StatusCode, Json<Shipment>)> {
    if shipment.incoterm.is_none() {
        shipment.incoterm = Some(default_incoterm(&state, tenant).await?);
    }
    let shipment = state.stores.shipments.book(tenant, shipment).await?;
    info!(tenant = %tenant, shipment = %shipment.reference, "Shipment booked");
    Ok((StatusCode::CREATED, Json(shipment)))
}

pub async fn get_shipment(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<Shipment>> {
    Ok(Json(state.stores.shipments.get(tenant, &id).await?))
}

/// Append a milestone; a milestone carrying a status moves the shipment to it
pub async fn add_milestone(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
    ApiJson(milestone): ApiJson<NewMilestone>,
) -> ApiResult<(StatusCode, Json<Shipment>)> {
    let shipment = state
        .stores
        .shipments
        .add_milestone(tenant, &id, milestone)
        .await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}
