//! Operational endpoints mounted next to the portal API
//!
//! - `/healthz` answers as long as the process is serving
//! - `/readyz` reports each backing component and returns 503 when the
//!   portal cannot take traffic
//! - `/metrics` exposes the Prometheus registry

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::TextEncoder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::metrics::Metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    Ok,
    /// Not configured; the portal runs without it
    Disabled,
    Unavailable,
}

impl ComponentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentState::Ok => "ok",
            ComponentState::Disabled => "disabled",
            ComponentState::Unavailable => "unavailable",
        }
    }
}

/// One line of the `/readyz` report (stores, billing connector, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub name: String,
    pub status: ComponentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentStatus {
    pub fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ComponentState::Ok,
            detail: None,
        }
    }

    pub fn disabled(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ComponentState::Disabled,
            detail: Some(detail.into()),
        }
    }

    pub fn unavailable(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ComponentState::Unavailable,
            detail: Some(detail.into()),
        }
    }
}

pub trait ReadinessChecker: Send + Sync {
    fn is_ready(&self) -> bool;

    fn component_statuses(&self) -> Vec<ComponentStatus>;
}

#[derive(Debug, Serialize)]
struct ReadinessReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    components: Vec<ComponentStatus>,
}

#[derive(Clone)]
pub struct HealthState {
    pub metrics: Arc<Metrics>,
    pub readiness_checker: Option<Arc<dyn ReadinessChecker>>,
}

impl HealthState {
    /// Without a checker `/readyz` always reports ready
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            readiness_checker: None,
        }
    }

    pub fn with_readiness_checker(
        metrics: Arc<Metrics>,
        readiness_checker: Arc<dyn ReadinessChecker>,
    ) -> Self {
        Self {
            metrics,
            readiness_checker: Some(readiness_checker),
        }
    }
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn readyz(State(state): State<HealthState>) -> Response {
    let (ready, components) = match &state.readiness_checker {
        Some(checker) => (checker.is_ready(), checker.component_statuses()),
        None => (true, Vec::new()),
    };

    let (code, status) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };
    (code, Json(ReadinessReport { status, components })).into_response()
}

async fn metrics(State(state): State<HealthState>) -> Response {
    let families = state.metrics.registry().gather();
    match TextEncoder::new().encode_to_string(&families) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", err),
        )
            .into_response(),
    }
}
