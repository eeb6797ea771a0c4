//! Request extractors

use axum::extract::{FromRequest, FromRequestParts, Query};
use axum::http::request::Parts;
use std::convert::Infallible;

use tradedesk_core::{Error, TenantId, UserId};

use crate::error::ApiError;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const USER_HEADER: &str = "x-user-id";

/// Tenant named by the `x-tenant-id` header
#[derive(Debug, Clone, Copy)]
pub struct Tenant(pub TenantId);

impl<S: Send + Sync> FromRequestParts<S> for Tenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts.headers.get(TENANT_HEADER).ok_or_else(|| {
            Error::TenantRequired(format!("missing {} header", TENANT_HEADER))
        })?;
        let raw = value
            .to_str()
            .map_err(|_| Error::InvalidTenant(format!("{} is not valid text", TENANT_HEADER)))?;
        Ok(Tenant(TenantId::from_string(raw)?))
    }
}

/// Acting user from `x-user-id`, or the anonymous user
#[derive(Debug, Clone)]
pub struct User(pub UserId);

impl<S: Send + Sync> FromRequestParts<S> for User {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(UserId::new)
            .unwrap_or_else(UserId::anonymous);
        Ok(User(user))
    }
}

/// `axum::Json` with rejections rendered as API errors
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with rejections rendered as API errors
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
