//! TradeDesk Observability
//!
//! This crate provides observability features:
//! - Metrics collection (Prometheus)
//! - Structured logging setup
//! - Health endpoints

pub mod health;
pub mod logging;
pub mod metrics;

pub use health::{ComponentState, ComponentStatus, HealthState, ReadinessChecker, health_router};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use metrics::Metrics;
