//! Conversations inbox

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use tradedesk_core::messaging::{
    ConversationFilter, ConversationPatch, ConversationSummary, ConversationView, NewConversation,
};

use crate::extract::{ApiJson, ApiQuery, Tenant, User};
use crate::{AppState, ApiResult};

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    pub body: String,
}

/// Inbox rows, most recently updated first
pub async fn list_conversations(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiQuery(filter): ApiQuery<ConversationFilter>,
) -> ApiResult<Json<Vec<ConversationSummary>>> {
    Ok(Json(state.stores.messages.list(tenant, &filter).await?))
}

pub async fn start_conversation(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    User(user): User,
    ApiJson(conversation): ApiJson<NewConversation>,
) -> ApiResult<(StatusCode, Json<ConversationView>)> {
    let conversation = state
        .stores
        .messages
        .create(tenant, user.as_str(), conversation)
        .await?;
    Ok((StatusCode::CREATED, Json(conversation.into())))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<ConversationView>> {
    let conversation = state.stores.messages.get(tenant, &id).await?;
    Ok(Json(conversation.into()))
}

/// Subject, archived, starred and read flags
pub async fn update_conversation(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ConversationPatch>,
) -> ApiResult<Json<ConversationView>> {
    let conversation = state.stores.messages.update(tenant, &id, patch).await?;
    Ok(Json(conversation.into()))
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.stores.messages.delete(tenant, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reply(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    User(user): User,
    Path(id): Path<String>,
    ApiJson(reply): ApiJson<ReplyBody>,
) -> ApiResult<Json<ConversationView>> {
    let conversation = state
        .stores
        .messages
        .reply(tenant, &id, user.as_str(), reply.body)
        .await?;
    Ok(Json(conversation.into()))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    Path(id): Path<String>,
) -> ApiResult<Json<ConversationView>> {
    let conversation = state.stores.messages.mark_read(tenant, &id).await?;
    Ok(Json(conversation.into()))
}
