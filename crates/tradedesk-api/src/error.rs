//! API error type and its JSON rendering
//!
//! Every failure leaves the API as `{"error": {"type": ..., "message": ...}}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use tradedesk_billing::BillingError;
use tradedesk_core::Error as CoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unavailable(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Core(err) => match err {
                CoreError::InvalidRequest(_)
                | CoreError::Serialization(_)
                | CoreError::InvalidTenant(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
                CoreError::TenantRequired(_) => (StatusCode::UNAUTHORIZED, "authentication_error"),
                CoreError::AccessDenied(_) => (StatusCode::FORBIDDEN, "access_denied"),
                CoreError::NotFound { .. } | CoreError::TenantNotFound(_) => {
                    (StatusCode::NOT_FOUND, "not_found")
                }
                CoreError::Internal(_)
                | CoreError::Config(_)
                | CoreError::Store(_)
                | CoreError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            ApiError::Billing(err) => match err {
                BillingError::PriceNotConfigured { .. } => {
                    (StatusCode::BAD_REQUEST, "invalid_request")
                }
                BillingError::InvalidSignature(_) | BillingError::InvalidPayload(_) => {
                    (StatusCode::BAD_REQUEST, "invalid_webhook")
                }
                BillingError::ConfigError(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
                }
                BillingError::HttpError(_)
                | BillingError::ProviderError { .. }
                | BillingError::Timeout(_) => (StatusCode::BAD_GATEWAY, "billing_provider_error"),
            },
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        } else if status != StatusCode::NOT_FOUND {
            warn!(status = status.as_u16(), "{}", message);
        }

        let body = serde_json::json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_core_errors_map_to_status_codes() {
        assert_eq!(
            status_of(CoreError::InvalidRequest("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::TenantRequired("missing".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(CoreError::AccessDenied("premium".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(CoreError::not_found("Shipment", "shp_1")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::Store("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_billing_errors_map_to_status_codes() {
        assert_eq!(
            status_of(BillingError::ProviderError {
                status_code: 500,
                message: "boom".into()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(BillingError::InvalidSignature("stale".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Unavailable("billing is not configured".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
