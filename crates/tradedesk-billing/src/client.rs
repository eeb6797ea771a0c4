//! Shared HTTP client utilities

use crate::{BillingError, Result};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum number of idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Maximum number of retries for transient errors
    pub max_retries: u32,

    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            pool_max_idle_per_host: 8,
            max_retries: 2,
            user_agent: format!("TradeDesk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Create a configured HTTP client with connection pooling
pub fn create_client(config: &HttpClientConfig) -> Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        // Expire idle connections before the provider closes them
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| BillingError::ConfigError(format!("Failed to create HTTP client: {}", e)))
}

fn is_retryable(error: &BillingError) -> bool {
    match error {
        BillingError::HttpError(req_err) => req_err.is_connect() || req_err.is_timeout(),
        BillingError::ProviderError { status_code, .. } => {
            matches!(status_code, 429 | 500 | 502 | 503 | 504)
        }
        BillingError::Timeout(_) => true,
        _ => false,
    }
}

/// Retry transient failures with exponential backoff (100ms, 200ms, 400ms, ...)
pub async fn with_retry<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_retries && is_retryable(&e) => {
                warn!(
                    "Billing request failed (attempt {}/{}): {}",
                    attempt + 1,
                    max_retries + 1,
                    e
                );
                let backoff_ms = 2u64.pow(attempt) * 100;
                debug!("Retrying billing request after {}ms", backoff_ms);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_config() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_retries, 2);
        assert!(config.user_agent.starts_with("TradeDesk/"));
    }

    #[test]
    fn test_create_client() {
        assert!(create_client(&HttpClientConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_retry_success_first_attempt() {
        let result = with_retry(3, || async { Ok::<i32, BillingError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_non_retryable_error() {
        let calls = &AtomicU32::new(0);
        let result = with_retry(3, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<i32, BillingError>(BillingError::ConfigError("bad".to_string()))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_transient_then_success() {
        let calls = &AtomicU32::new(0);
        let result = with_retry(2, move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(BillingError::ProviderError {
                    status_code: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok("ok")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max() {
        let calls = &AtomicU32::new(0);
        let result = with_retry(1, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(BillingError::Timeout(5))
        })
        .await;
        assert!(matches!(result, Err(BillingError::Timeout(5))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_error_display_formatting() {
        let err = BillingError::ProviderError {
            status_code: 402,
            message: "card declined".to_string(),
        };
        assert!(err.to_string().contains("402"));
        let err = BillingError::PriceNotConfigured {
            tier: "enterprise",
            period: "annual",
        };
        assert_eq!(err.to_string(), "No price configured for enterprise (annual)");
    }
}
