//! Billing provider webhooks
//!
//! Events arrive as JSON with a `type` and a `data.object`. Only the events
//! that change an organization's tier are recognized; everything else parses
//! to [`WebhookEvent::Ignored`].
//!
//! Signature header format: `t=<unix seconds>,v1=<hex hmac-sha256>` where the
//! MAC is computed over `"<t>.<raw body>"` with the endpoint's signing secret.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use tradedesk_core::TenantId;
use tradedesk_core::billing::Tier;

use crate::{BillingError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "billing-signature";

pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    CheckoutCompleted { tenant: TenantId, tier: Tier },
    SubscriptionUpdated { tenant: TenantId, tier: Tier },
    SubscriptionDeleted { tenant: TenantId },
    Ignored { event_type: String },
}

impl WebhookEvent {
    /// Tier the tenant should be on after this event, if it changes one
    pub fn tier_change(&self) -> Option<(TenantId, Tier)> {
        match self {
            WebhookEvent::CheckoutCompleted { tenant, tier }
            | WebhookEvent::SubscriptionUpdated { tenant, tier } => Some((*tenant, *tier)),
            WebhookEvent::SubscriptionDeleted { tenant } => Some((*tenant, Tier::Starter)),
            WebhookEvent::Ignored { .. } => None,
        }
    }

    /// Event type, with every unrecognized type collapsed to "ignored"
    pub fn kind(&self) -> &'static str {
        match self {
            WebhookEvent::CheckoutCompleted { .. } => CHECKOUT_COMPLETED,
            WebhookEvent::SubscriptionUpdated { .. } => SUBSCRIPTION_UPDATED,
            WebhookEvent::SubscriptionDeleted { .. } => SUBSCRIPTION_DELETED,
            WebhookEvent::Ignored { .. } => "ignored",
        }
    }

    pub fn parse(payload: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(payload)
            .map_err(|e| BillingError::InvalidPayload(e.to_string()))?;
        let object = envelope.data.object;
        debug!(event_type = %envelope.event_type, "Parsing billing webhook");

        let event = match envelope.event_type.as_str() {
            CHECKOUT_COMPLETED => WebhookEvent::CheckoutCompleted {
                tenant: object.tenant()?,
                tier: object.tier()?,
            },
            SUBSCRIPTION_UPDATED => WebhookEvent::SubscriptionUpdated {
                tenant: object.tenant()?,
                tier: object.tier()?,
            },
            SUBSCRIPTION_DELETED => WebhookEvent::SubscriptionDeleted {
                tenant: object.tenant()?,
            },
            _ => WebhookEvent::Ignored {
                event_type: envelope.event_type,
            },
        };
        Ok(event)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: EventObject,
}

#[derive(Debug, Default, Deserialize)]
struct EventObject {
    client_reference_id: Option<String>,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    tenant_id: Option<String>,
    tier: Option<Tier>,
}

impl EventObject {
    fn tenant(&self) -> Result<TenantId> {
        let raw = self
            .client_reference_id
            .as_deref()
            .or(self.metadata.tenant_id.as_deref())
            .ok_or_else(|| BillingError::InvalidPayload("missing tenant reference".to_string()))?;
        TenantId::from_string(raw).map_err(|e| BillingError::InvalidPayload(e.to_string()))
    }

    fn tier(&self) -> Result<Tier> {
        self.metadata
            .tier
            .ok_or_else(|| BillingError::InvalidPayload("missing tier metadata".to_string()))
    }
}

/// Verifies webhook signatures against the endpoint signing secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>, tolerance_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs,
        }
    }

    fn mac(&self, timestamp: i64, payload: &[u8]) -> HmacSha256 {
        // HMAC accepts keys of any length
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .unwrap_or_else(|_| unreachable!());
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac
    }

    /// Produce a signature header for `payload` (used by tests and tooling)
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> String {
        let digest = self.mac(timestamp, payload).finalize().into_bytes();
        format!("t={},v1={}", timestamp, to_hex(&digest))
    }

    /// Check `header` against `payload` using the current clock
    pub fn verify_now(&self, payload: &[u8], header: &str) -> Result<()> {
        self.verify(payload, header, chrono::Utc::now().timestamp())
    }

    /// Check `header` against `payload` at time `now` (unix seconds)
    pub fn verify(&self, payload: &[u8], header: &str, now: i64) -> Result<()> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", v)) => timestamp = v.parse::<i64>().ok(),
                Some(("v1", v)) => signatures.push(v),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| BillingError::InvalidSignature("missing timestamp".to_string()))?;
        if now.abs_diff(timestamp) > self.tolerance_secs.max(0) as u64 {
            return Err(BillingError::InvalidSignature(
                "timestamp outside tolerance".to_string(),
            ));
        }

        let matched = signatures.iter().any(|sig| {
            from_hex(sig)
                .is_some_and(|bytes| self.mac(timestamp, payload).verify_slice(&bytes).is_ok())
        });
        if matched {
            Ok(())
        } else {
            Err(BillingError::InvalidSignature(
                "no matching v1 signature".to_string(),
            ))
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn from_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
