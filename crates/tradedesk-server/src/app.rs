//! Wires configuration into the API state

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tradedesk_api::AppState;
use tradedesk_billing::{HostedCheckoutConnector, WebhookVerifier};
use tradedesk_observability::{ComponentStatus, Metrics, ReadinessChecker};
use tradedesk_storage::{FileSavedResourceStore, Latency, Stores, seed};

use crate::config::{BillingConfig, ServerConfig, StorageConfig};

/// Readiness of the portal's components, fixed at startup
pub struct PortalReadiness {
    saved_resources_path: Option<String>,
    billing_enabled: bool,
    webhooks_signed: bool,
}

impl ReadinessChecker for PortalReadiness {
    fn is_ready(&self) -> bool {
        // Stores are in-process; billing is optional
        true
    }

    fn component_statuses(&self) -> Vec<ComponentStatus> {
        let saved = match &self.saved_resources_path {
            Some(path) => ComponentStatus {
                detail: Some(path.clone()),
                ..ComponentStatus::ok("saved_resources")
            },
            None => ComponentStatus::disabled("saved_resources", "in-memory only"),
        };
        let billing = if self.billing_enabled {
            ComponentStatus::ok("billing")
        } else {
            ComponentStatus::disabled("billing", "no billing provider configured")
        };
        let webhooks = if self.webhooks_signed {
            ComponentStatus::ok("webhook_signatures")
        } else {
            ComponentStatus::disabled("webhook_signatures", "unsigned webhooks accepted")
        };
        vec![ComponentStatus::ok("stores"), saved, billing, webhooks]
    }
}

/// Build the API state and readiness checker from config
pub async fn build_state(
    config: &ServerConfig,
    metrics: Arc<Metrics>,
) -> anyhow::Result<(AppState, PortalReadiness)> {
    let (stores, saved_resources_path) = build_stores(&config.storage).await?;
    let mut state = AppState::new(stores, metrics);

    let mut readiness = PortalReadiness {
        saved_resources_path,
        billing_enabled: false,
        webhooks_signed: false,
    };

    match &config.billing {
        Some(billing) => {
            state = attach_billing(state, billing)?;
            readiness.billing_enabled = true;
            readiness.webhooks_signed = state.webhook_verifier.is_some();
        }
        None => info!("💳 Billing not configured, checkout disabled"),
    }

    Ok((state, readiness))
}

async fn build_stores(config: &StorageConfig) -> anyhow::Result<(Stores, Option<String>)> {
    let latency = Latency::from_millis(config.simulated_latency_ms);
    if config.simulated_latency_ms > 0 {
        info!("⏱️  Simulating {}ms store latency", config.simulated_latency_ms);
    }

    let path = config
        .saved_resources_path
        .as_deref()
        .map(|p| shellexpand::tilde(p).to_string());

    let saved = match &path {
        Some(path) => {
            if let Some(parent) = std::path::Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            FileSavedResourceStore::open(path, latency)
                .with_context(|| format!("Failed to open saved resources at {}", path))?
        }
        None => FileSavedResourceStore::in_memory(latency),
    };

    let stores = if config.seed_demo_data {
        let stores = Stores::seeded(latency, saved)
            .await
            .context("Failed to seed demo data")?;
        info!("🌱 Demo tenant loaded: {}", seed::DEMO_TENANT);
        stores
    } else {
        Stores::new(latency, saved)
    };

    Ok((stores, path))
}

fn attach_billing(state: AppState, billing: &BillingConfig) -> anyhow::Result<AppState> {
    let connector = HostedCheckoutConnector::new(billing.checkout.clone())
        .context("Failed to create billing connector")?;
    info!("💳 Billing enabled via {}", billing.checkout.base_url);

    let state = state.with_checkout(Arc::new(connector));

    Ok(match &billing.webhook_secret {
        Some(secret) => state.with_webhook_verifier(WebhookVerifier::new(
            secret.clone(),
            billing.webhook_tolerance_secs,
        )),
        None => {
            warn!("⚠️  No webhook secret configured, accepting unsigned billing webhooks");
            state
        }
    })
}
