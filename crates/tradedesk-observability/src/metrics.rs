//! Metrics collection with Prometheus
//!
//! This module provides Prometheus metrics for the portal backend:
//! - HTTP request counts and latency by route template
//! - Checkout session outcomes by tier
//! - Billing webhook events by type and outcome

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};
use std::sync::Arc;

/// Metrics collector for TradeDesk
#[derive(Clone)]
pub struct Metrics {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Requests handled, by method, route template and status code
    pub http_requests_total: CounterVec,
    /// Request duration (handler plus store latency)
    pub http_request_duration_seconds: HistogramVec,

    /// Checkout sessions attempted, by tier and outcome
    pub checkout_sessions_total: CounterVec,

    /// Webhook deliveries, by event type and outcome
    pub webhook_events_total: CounterVec,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total = CounterVec::new(
            Opts::new(
                "tradedesk_http_requests_total",
                "Total number of HTTP requests",
            ),
            &["method", "route", "status"],
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "tradedesk_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        let checkout_sessions_total = CounterVec::new(
            Opts::new(
                "tradedesk_checkout_sessions_total",
                "Checkout sessions requested from the billing provider",
            ),
            &["tier", "outcome"],
        )?;

        let webhook_events_total = CounterVec::new(
            Opts::new(
                "tradedesk_webhook_events_total",
                "Billing webhook events received",
            ),
            &["event_type", "outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(checkout_sessions_total.clone()))?;
        registry.register(Box::new(webhook_events_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            http_requests_total,
            http_request_duration_seconds,
            checkout_sessions_total,
            webhook_events_total,
        })
    }

    /// Get the Prometheus registry for exporting metrics
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a completed HTTP request
    ///
    /// `route` should be the matched route template (`/api/messages/{id}`),
    /// not the raw path, to keep label cardinality bounded.
    pub fn record_http_request(&self, method: &str, route: &str, status: u16, duration_secs: f64) {
        self.http_requests_total
            .with_label_values(&[method, route, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration_secs);
    }

    pub fn record_checkout(&self, tier: &str, outcome: Outcome) {
        self.checkout_sessions_total
            .with_label_values(&[tier, outcome.as_str()])
            .inc();
    }

    pub fn record_webhook(&self, event_type: &str, outcome: Outcome) {
        self.webhook_events_total
            .with_label_values(&[event_type, outcome.as_str()])
            .inc();
    }
}

/// Outcome label for billing metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Rejected,
    Failed,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}
