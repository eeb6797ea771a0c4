//! Subscription tiers and checkout contracts

use serde::{Deserialize, Serialize};

use crate::resources::AccessLevel;

/// Subscription tier of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

impl Tier {
    /// Resource access granted by this tier
    pub fn access_level(self) -> AccessLevel {
        match self {
            Tier::Starter => AccessLevel::Member,
            Tier::Professional => AccessLevel::Premium,
            Tier::Enterprise => AccessLevel::Enterprise,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Starter => "starter",
            Tier::Professional => "professional",
            Tier::Enterprise => "enterprise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Annual,
}

impl BillingPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Annual => "annual",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub tier: Tier,
    #[serde(default)]
    pub period: BillingPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Hosted checkout session returned by the billing provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the client should be redirected to
    pub url: String,
}
