//! Hosted checkout and billing provider webhooks

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use serde_json::{Value, json};
use tracing::{info, warn};

use tradedesk_billing::webhook::SIGNATURE_HEADER;
use tradedesk_billing::{BillingError, WebhookEvent};
use tradedesk_core::Error;
use tradedesk_core::billing::{CheckoutRequest, CheckoutSession};
use tradedesk_observability::metrics::Outcome;

use crate::extract::{ApiJson, Tenant};
use crate::{AppState, ApiError, ApiResult};

/// Open a hosted checkout session; the client redirects to the returned URL
pub async fn create_checkout(
    State(state): State<AppState>,
    Tenant(tenant): Tenant,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> ApiResult<Json<CheckoutSession>> {
    let provider = state
        .checkout
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("billing is not configured".to_string()))?;

    let organization = state.stores.organizations.get(tenant).await?;
    if organization.tier == request.tier {
        return Err(Error::InvalidRequest(format!(
            "organization is already on the {} tier",
            request.tier.as_str()
        ))
        .into());
    }

    match provider.create_session(tenant, &request).await {
        Ok(session) => {
            state
                .metrics
                .record_checkout(request.tier.as_str(), Outcome::Success);
            Ok(Json(session))
        }
        Err(e) => {
            let outcome = match e {
                BillingError::PriceNotConfigured { .. } => Outcome::Rejected,
                _ => Outcome::Failed,
            };
            state.metrics.record_checkout(request.tier.as_str(), outcome);
            Err(e.into())
        }
    }
}

/// Apply tier changes reported by the billing provider
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    let event = match verify_and_parse(&state, &headers, &body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Rejected billing webhook: {}", e);
            state.metrics.record_webhook("unknown", Outcome::Rejected);
            return Err(e.into());
        }
    };

    match &event {
        WebhookEvent::Ignored { event_type } => {
            info!(event_type = %event_type, "Ignoring billing webhook");
        }
        _ => {
            if let Some((tenant, tier)) = event.tier_change() {
                if let Err(e) = state.stores.organizations.set_tier(tenant, tier).await {
                    state.metrics.record_webhook(event.kind(), Outcome::Failed);
                    return Err(e.into());
                }
                info!(
                    tenant = %tenant,
                    tier = tier.as_str(),
                    event = event.kind(),
                    "Subscription tier updated"
                );
            }
        }
    }

    state.metrics.record_webhook(event.kind(), Outcome::Success);
    Ok(Json(json!({ "received": true })))
}

fn verify_and_parse(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookEvent, BillingError> {
    if let Some(verifier) = &state.webhook_verifier {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                BillingError::InvalidSignature(format!("missing {} header", SIGNATURE_HEADER))
            })?;
        verifier.verify_now(body, signature)?;
    }
    WebhookEvent::parse(body)
}
