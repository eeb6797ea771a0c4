//! TradeDesk Billing
//!
//! This crate talks to the third-party billing provider:
//! - Hosted checkout sessions for subscription upgrades
//! - Webhook event parsing and signature verification
//!
//! Price ids are opaque strings owned by the provider; this crate only maps
//! tier and billing period onto them.

pub mod checkout;
pub mod client;
pub mod webhook;

use thiserror::Error;

pub use checkout::{CheckoutConfig, CheckoutProvider, HostedCheckoutConnector, PriceTable};
pub use webhook::{WebhookEvent, WebhookVerifier};

#[derive(Debug, Error)]
pub enum BillingError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Billing provider error ({status_code}): {message}")]
    ProviderError { status_code: u16, message: String },

    #[error("Request timeout after {0}s")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("No price configured for {tier} ({period})")]
    PriceNotConfigured {
        tier: &'static str,
        period: &'static str,
    },

    #[error("Invalid webhook signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, BillingError>;
