//! Hosted checkout connector
//!
//! Creates a checkout session with the billing provider and hands back the
//! hosted page URL. The client redirects the user there; the provider later
//! reports the outcome through a webhook (see [`crate::webhook`]).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tradedesk_core::TenantId;
use tradedesk_core::billing::{BillingPeriod, CheckoutRequest, CheckoutSession, Tier};

use crate::client::{HttpClientConfig, create_client, with_retry};
use crate::{BillingError, Result};

/// Provider price ids for one tier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierPrices {
    pub monthly: Option<String>,
    pub annual: Option<String>,
}

/// Provider price ids by tier and billing period
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub starter: TierPrices,
    pub professional: TierPrices,
    pub enterprise: TierPrices,
}

impl PriceTable {
    pub fn price_id(&self, tier: Tier, period: BillingPeriod) -> Result<&str> {
        let prices = match tier {
            Tier::Starter => &self.starter,
            Tier::Professional => &self.professional,
            Tier::Enterprise => &self.enterprise,
        };
        let price = match period {
            BillingPeriod::Monthly => prices.monthly.as_deref(),
            BillingPeriod::Annual => prices.annual.as_deref(),
        };
        price
            .filter(|p| !p.is_empty())
            .ok_or(BillingError::PriceNotConfigured {
                tier: tier.as_str(),
                period: period.as_str(),
            })
    }
}

/// Checkout connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Provider secret key
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where the provider sends the user after payment
    pub success_url: String,

    /// Where the provider sends the user on abandon
    pub cancel_url: String,

    #[serde(default)]
    pub prices: PriceTable,

    #[serde(default)]
    pub client: HttpClientConfig,
}

fn default_base_url() -> String {
    "https://api.stripe.com".to_string()
}

/// Anything that can open a hosted checkout session
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    async fn create_session(
        &self,
        tenant: TenantId,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession>;
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Form-encoded connector for a Stripe-compatible checkout API
pub struct HostedCheckoutConnector {
    config: CheckoutConfig,
    client: Client,
}

impl HostedCheckoutConnector {
    pub fn new(config: CheckoutConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BillingError::ConfigError(
                "billing api_key is empty".to_string(),
            ));
        }
        let client = create_client(&config.client)?;
        Ok(Self { config, client })
    }

    fn session_form(
        &self,
        tenant: TenantId,
        request: &CheckoutRequest,
    ) -> Result<Vec<(&'static str, String)>> {
        let price = self.config.prices.price_id(request.tier, request.period)?;
        let mut form = vec![
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", price.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", self.config.success_url.clone()),
            ("cancel_url", self.config.cancel_url.clone()),
            ("client_reference_id", tenant.to_string()),
            ("metadata[tenant_id]", tenant.to_string()),
            ("metadata[tier]", request.tier.as_str().to_string()),
            ("subscription_data[metadata][tenant_id]", tenant.to_string()),
            (
                "subscription_data[metadata][tier]",
                request.tier.as_str().to_string(),
            ),
        ];
        if let Some(email) = &request.customer_email {
            form.push(("customer_email", email.clone()));
        }
        Ok(form)
    }

    async fn send(&self, url: &str, body: &str) -> Result<CheckoutSession> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BillingError::Timeout(self.config.client.timeout_secs)
                } else {
                    BillingError::HttpError(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            warn!("Billing provider returned {}: {}", status, message);
            return Err(BillingError::ProviderError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<CheckoutSession>().await.map_err(|e| {
            BillingError::ProviderError {
                status_code: status.as_u16(),
                message: format!("Unexpected checkout response: {}", e),
            }
        })
    }
}

#[async_trait]
impl CheckoutProvider for HostedCheckoutConnector {
    async fn create_session(
        &self,
        tenant: TenantId,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession> {
        let form = self.session_form(tenant, request)?;
        let body = serde_urlencoded::to_string(&form)
            .map_err(|e| BillingError::ConfigError(format!("Failed to encode form: {}", e)))?;
        let url = format!(
            "{}/v1/checkout/sessions",
            self.config.base_url.trim_end_matches('/')
        );
        debug!(tenant = %tenant, tier = request.tier.as_str(), "Creating checkout session");

        let (url, body) = (url.as_str(), body.as_str());
        let session =
            with_retry(self.config.client.max_retries, move || self.send(url, body)).await?;

        info!(tenant = %tenant, session = %session.id, "Checkout session created");
        Ok(session)
    }
}
