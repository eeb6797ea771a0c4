//! TradeDesk portal API
//!
//! JSON handlers for every portal area, served under `/api`. Each request is
//! scoped to the tenant named in the `x-tenant-id` header; per-user state
//! (saved resources, message authorship) keys off `x-user-id`.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{ApiConfig, ApiServer, router};

use std::sync::Arc;

use tradedesk_billing::{CheckoutProvider, WebhookVerifier};
use tradedesk_observability::Metrics;
use tradedesk_storage::Stores;

/// Shared application state for the API server
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    /// `None` when no billing provider is configured
    pub checkout: Option<Arc<dyn CheckoutProvider>>,
    /// `None` accepts unsigned webhooks (local development only)
    pub webhook_verifier: Option<WebhookVerifier>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(stores: Stores, metrics: Arc<Metrics>) -> Self {
        Self {
            stores,
            checkout: None,
            webhook_verifier: None,
            metrics,
        }
    }

    pub fn with_checkout(mut self, provider: Arc<dyn CheckoutProvider>) -> Self {
        self.checkout = Some(provider);
        self
    }

    pub fn with_webhook_verifier(mut self, verifier: WebhookVerifier) -> Self {
        self.webhook_verifier = Some(verifier);
        self
    }
}
