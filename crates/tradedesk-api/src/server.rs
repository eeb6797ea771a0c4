//! API server implementation

use crate::AppState;
use crate::handlers::{
    account, billing, dashboard, logistics, messages, resources, settings, sourcing,
};
use crate::middleware::{security_headers, track_metrics};
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to (default: 127.0.0.1)
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow any origin (browser clients served from another host)
    #[serde(default)]
    pub permissive_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            permissive_cors: false,
        }
    }
}

impl ApiConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid address {}:{}: {}", self.host, self.port, e))
    }
}

/// Build the `/api` router with all portal routes
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        // Account
        .route(
            "/account/organization",
            get(account::get_organization).patch(account::update_organization),
        )
        .route(
            "/account/organization/completeness",
            get(account::organization_completeness),
        )
        .route("/account/organization/kyc", post(account::add_kyc_document))
        .route(
            "/account/organization/kyc/{id}",
            axum::routing::delete(account::remove_kyc_document),
        )
        .route(
            "/account/team",
            get(account::list_members).post(account::invite_member),
        )
        .route(
            "/account/team/{id}",
            get(account::get_member)
                .patch(account::update_member)
                .delete(account::remove_member),
        )
        // Messages
        .route(
            "/messages",
            get(messages::list_conversations).post(messages::start_conversation),
        )
        .route(
            "/messages/{id}",
            get(messages::get_conversation)
                .patch(messages::update_conversation)
                .delete(messages::delete_conversation),
        )
        .route("/messages/{id}/reply", post(messages::reply))
        .route("/messages/{id}/read", post(messages::mark_read))
        // Resources
        .route("/resources", get(resources::list_resources))
        .route("/resources/saved", get(resources::list_saved))
        .route("/resources/{id}", get(resources::get_resource))
        .route(
            "/resources/{id}/save",
            put(resources::save_resource).delete(resources::unsave_resource),
        )
        .route(
            "/resources/{id}/pin",
            put(resources::pin_resource).delete(resources::unpin_resource),
        )
        // Settings
        .route(
            "/settings",
            get(settings::get_settings).patch(settings::update_settings),
        )
        .route(
            "/settings/integrations/{id}",
            put(settings::connect_integration).delete(settings::disconnect_integration),
        )
        .route("/settings/legal/{document}", post(settings::accept_legal))
        // Sourcing
        .route(
            "/sourcing-requests",
            get(sourcing::list_requests).post(sourcing::create_request),
        )
        .route(
            "/sourcing-requests/{id}",
            get(sourcing::get_request)
                .patch(sourcing::update_request)
                .delete(sourcing::delete_request),
        )
        .route("/sourcing-requests/{id}/status", put(sourcing::set_status))
        // Logistics
        .route(
            "/logistics/shipments",
            get(logistics::list_shipments).post(logistics::book_shipment),
        )
        .route("/logistics/shipments/{id}", get(logistics::get_shipment))
        .route(
            "/logistics/shipments/{id}/milestones",
            post(logistics::add_milestone),
        )
        // Billing
        .route("/checkout", post(billing::create_checkout))
        .route("/billing/webhook", post(billing::webhook))
        // Overview
        .route("/dashboard", get(dashboard::dashboard))
        .route("/admin/organizations", get(dashboard::admin_organizations));

    Router::new()
        .nest("/api", api)
        .fallback(dashboard::not_found)
        .route_layer(from_fn_with_state(state.metrics.clone(), track_metrics))
        .layer(from_fn(security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API Server
pub struct ApiServer {
    config: ApiConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the full router, including CORS when enabled
    pub fn build_router(&self) -> Router {
        let router = router(self.state.clone());
        if self.config.permissive_cors {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn serve(
        self,
        extra: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let addr = self.config.socket_addr()?;
        let router = self.build_router().merge(extra);

        info!("🌐 TradeDesk API listening on http://{}", addr);
        info!("   Dashboard:  http://{}/api/dashboard", addr);
        info!("   Health:     http://{}/healthz", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
