use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tradedesk_api::ApiConfig;
use tradedesk_billing::CheckoutConfig;
use tradedesk_observability::{LogFormat, LoggingConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub http: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Hosted checkout and webhooks; checkout is unavailable when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing: Option<BillingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Delay added to every store call
    #[serde(default)]
    pub simulated_latency_ms: u64,

    /// JSON file backing saved resources; in-memory only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_resources_path: Option<String>,

    /// Load the demo tenant at startup
    #[serde(default = "default_true")]
    pub seed_demo_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 0,
            saved_resources_path: None,
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(flatten)]
    pub checkout: CheckoutConfig,

    /// Shared secret for webhook signatures. Unsigned webhooks are accepted
    /// when this is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_secret: Option<String>,

    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,
}

const REDACTED: &str = "<redacted>";

impl ServerConfig {
    /// Load configuration from file (YAML or TOML)
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        // Server settings
        if let Ok(val) = std::env::var("TRADEDESK_HOST") {
            self.http.host = val;
        }

        if let Ok(val) = std::env::var("TRADEDESK_PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.http.port = port,
                Err(_) => eprintln!("Warning: Invalid TRADEDESK_PORT '{}', ignoring", val),
            }
        }

        // Logging settings
        if let Ok(val) = std::env::var("TRADEDESK_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("TRADEDESK_LOG_FORMAT") {
            match val.to_lowercase().as_str() {
                "text" => self.logging.format = LogFormat::Text,
                "json" => self.logging.format = LogFormat::Json,
                _ => eprintln!("Warning: Invalid TRADEDESK_LOG_FORMAT '{}', ignoring", val),
            }
        }

        // Storage settings
        if let Ok(val) = std::env::var("TRADEDESK_SIMULATED_LATENCY_MS")
            && let Ok(ms) = val.parse::<u64>()
        {
            self.storage.simulated_latency_ms = ms;
        }

        if let Ok(val) = std::env::var("TRADEDESK_SAVED_RESOURCES_PATH") {
            self.storage.saved_resources_path = Some(val).filter(|p| !p.is_empty());
        }

        if let Ok(val) = std::env::var("TRADEDESK_SEED_DEMO_DATA")
            && let Ok(enabled) = val.parse::<bool>()
        {
            self.storage.seed_demo_data = enabled;
        }

        // Billing secrets only fill in a billing section that exists
        if let Some(billing) = self.billing.as_mut() {
            if let Ok(val) = std::env::var("TRADEDESK_BILLING_API_KEY") {
                billing.checkout.api_key = val;
            }
            if let Ok(val) = std::env::var("TRADEDESK_WEBHOOK_SECRET") {
                billing.webhook_secret = Some(val).filter(|s| !s.is_empty());
            }
        }
    }

    /// Copy with secrets masked, for printing
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(billing) = config.billing.as_mut() {
            billing.checkout.api_key = REDACTED.to_string();
            if billing.webhook_secret.is_some() {
                billing.webhook_secret = Some(REDACTED.to_string());
            }
        }
        config
    }
}

fn default_true() -> bool {
    true
}

fn default_webhook_tolerance() -> i64 {
    300
}
