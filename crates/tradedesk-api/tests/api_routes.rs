//! Router tests against the seeded demo tenant

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt; // for oneshot

use tradedesk_api::{AppState, router};
use tradedesk_billing::webhook::SIGNATURE_HEADER;
use tradedesk_billing::{CheckoutProvider, WebhookVerifier};
use tradedesk_core::TenantId;
use tradedesk_core::billing::{CheckoutRequest, CheckoutSession};
use tradedesk_observability::Metrics;
use tradedesk_storage::seed::DEMO_TENANT;
use tradedesk_storage::{FileSavedResourceStore, Latency, Stores};

async fn seeded_state() -> AppState {
    let stores = Stores::seeded(
        Latency::none(),
        FileSavedResourceStore::in_memory(Latency::none()),
    )
    .await
    .unwrap();
    AppState::new(stores, Arc::new(Metrics::new().unwrap()))
}

async fn app() -> Router {
    router(seeded_state().await)
}

async fn send_as(
    app: &Router,
    tenant: Option<&str>,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", "mem_priya");
    if let Some(tenant) = tenant {
        builder = builder.header("x-tenant-id", tenant);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, Some(DEMO_TENANT), method, uri, body).await
}

#[tokio::test]
async fn test_missing_tenant_header_is_unauthorized() {
    let app = app().await;
    let (status, body) = send_as(&app, None, "GET", "/api/messages", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "authentication_error");

    let (status, body) = send_as(&app, Some("not-a-uuid"), "GET", "/api/messages", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization"], "Harbourline Trading Ltd");
    assert_eq!(body["tier"], "professional");
    assert_eq!(body["open_sourcing_requests"], 3);
    assert_eq!(body["active_shipments"], 1);
    assert_eq!(body["unread_messages"], 3);
    assert_eq!(body["pending_invites"], 1);
    assert_eq!(body["profile_completeness"]["percent"], 100);
    assert_eq!(body["recent_conversations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_organization_patch_and_completeness() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "PATCH",
        "/api/account/organization",
        Some(json!({
            "registration_number": "",
            "address": "",
            "website": "https://harbourline.test"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["website"], "https://harbourline.test");
    assert_eq!(body["legal_name"], "Harbourline Trading Ltd");

    let (status, body) = send(&app, "GET", "/api/account/organization/completeness", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["missing"], json!(["registration_number"]));
    assert_eq!(body["percent"], 80);
}

#[tokio::test]
async fn test_kyc_upload_and_remove() {
    let app = app().await;
    let (status, doc) = send(
        &app,
        "POST",
        "/api/account/organization/kyc",
        Some(json!({ "name": "certificate-of-incorporation.pdf", "kind": "incorporation" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(doc["status"], "pending");

    let uri = format!("/api/account/organization/kyc/{}", doc["id"].as_str().unwrap());
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_team_invite_filter_and_remove() {
    let app = app().await;
    let (status, member) = send(
        &app,
        "POST",
        "/api/account/team",
        Some(json!({
            "name": "Ana Ruiz",
            "email": "ana@harbourline.example",
            "role": "sourcing",
            "regions": ["LATAM"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(member["status"], "pending");

    let (_, pending) = send(&app, "GET", "/api/account/team?status=pending", None).await;
    assert_eq!(pending.as_array().unwrap().len(), 2);

    let (_, found) = send(&app, "GET", "/api/account/team?search=RUIZ", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let uri = format!("/api/account/team/{}", member["id"].as_str().unwrap());
    let (status, updated) = send(&app, "PATCH", &uri, Some(json!({ "role": "owner" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "owner");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_invite_is_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/account/team",
        Some(json!({ "name": "", "email": "nobody", "role": "viewer" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_api_error() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/messages",
        Some(json!({ "subject": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_conversation_flow() {
    let app = app().await;
    let (status, inbox) = send(&app, "GET", "/api/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox.as_array().unwrap().len(), 2);

    let (_, archived) = send(&app, "GET", "/api/messages?archived=true", None).await;
    assert_eq!(archived[0]["id"], "conv_onboarding");

    let (status, created) = send(
        &app,
        "POST",
        "/api/messages",
        Some(json!({
            "subject": "Cashew kernel samples",
            "participants": ["Broker desk"],
            "related_request": "src_cashew",
            "body": "Can we get two samples couriered to Dubai?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["unread_count"], 0);
    let uri = format!("/api/messages/{}", created["id"].as_str().unwrap());

    let (status, replied) = send(
        &app,
        "POST",
        &format!("{}/reply", uri),
        Some(json!({ "body": "Following up on this." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replied["messages"].as_array().unwrap().len(), 2);
    assert_eq!(replied["messages"][1]["sender"], "mem_priya");

    let (status, patched) = send(&app, "PATCH", &uri, Some(json!({ "starred": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["starred"], true);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_read_clears_unread_count() {
    let app = app().await;
    let (_, unread) = send(&app, "GET", "/api/messages?unread_only=true", None).await;
    assert_eq!(unread.as_array().unwrap().len(), 2);

    let (status, conversation) = send(&app, "POST", "/api/messages/conv_hdpe/read", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(conversation["unread_count"], 0);

    let (_, dashboard) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(dashboard["unread_messages"], 1);
}

#[tokio::test]
async fn test_empty_reply_is_rejected() {
    let app = app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/messages/conv_customs/reply",
        Some(json!({ "body": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resources_are_gated_by_tier() {
    let app = app().await;
    let (status, all) = send(&app, "GET", "/api/resources", None).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 6);
    let locked: Vec<_> = all
        .iter()
        .filter(|r| r["locked"] == true)
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(locked, vec!["res_sanctions"]);

    let (_, accessible) = send(&app, "GET", "/api/resources?accessible_only=true", None).await;
    assert_eq!(accessible.as_array().unwrap().len(), 5);

    let (status, _) = send(&app, "GET", "/api/resources/res_polymer_outlook", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, "GET", "/api/resources/res_sanctions", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["type"], "access_denied");
}

#[tokio::test]
async fn test_unknown_tenant_sees_public_resources_only() {
    let app = app().await;
    let stranger = TenantId::new().to_string();
    let (status, body) = send_as(
        &app,
        Some(&stranger),
        "GET",
        "/api/resources?accessible_only=true",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "res_incoterms");
}

#[tokio::test]
async fn test_resource_search() {
    let app = app().await;
    let (_, found) = send(&app, "GET", "/api/resources?search=COMPLIANCE", None).await;
    assert_eq!(found.as_array().unwrap().len(), 2);
    let (_, found) = send(&app, "GET", "/api/resources?category=webinar", None).await;
    assert_eq!(found[0]["id"], "res_freight_webinar");
}

#[tokio::test]
async fn test_blank_resource_filters_match_everything() {
    let app = app().await;
    let (_, all) = send(&app, "GET", "/api/resources", None).await;
    let total = all.as_array().unwrap().len();
    assert_eq!(total, 6);

    let (_, found) = send(&app, "GET", "/api/resources?search=", None).await;
    assert_eq!(found.as_array().unwrap().len(), total);
    let (_, found) = send(&app, "GET", "/api/resources?tag=", None).await;
    assert_eq!(found.as_array().unwrap().len(), total);
    let (_, found) = send(&app, "GET", "/api/resources?tag=sanctions", None).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unpin_unsaved_resource_does_not_save_it() {
    let app = app().await;
    let (status, body) = send(&app, "DELETE", "/api/resources/res_cbam/pin", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");

    let (_, saved) = send(&app, "GET", "/api/resources/saved", None).await;
    assert!(saved.as_array().unwrap().is_empty());

    send(&app, "PUT", "/api/resources/res_cbam/pin", None).await;
    let (status, unpinned) = send(&app, "DELETE", "/api/resources/res_cbam/pin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unpinned["pinned"], false);
    let (_, saved) = send(&app, "GET", "/api/resources/saved", None).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_and_pin_resources() {
    let app = app().await;
    let (status, _) = send(&app, "PUT", "/api/resources/res_cbam/save", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, pinned) = send(&app, "PUT", "/api/resources/res_incoterms/pin", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pinned["pinned"], true);

    let (_, saved) = send(&app, "GET", "/api/resources/saved", None).await;
    let ids: Vec<_> = saved
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["res_incoterms", "res_cbam"]);

    let (status, _) = send(&app, "DELETE", "/api/resources/res_cbam/save", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, saved) = send(&app, "GET", "/api/resources/saved", None).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "PUT", "/api/resources/res_missing/save", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_sections() {
    let app = app().await;
    let (status, settings) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["user"]["timezone"], "Europe/London");

    let (status, _) = send(
        &app,
        "PATCH",
        "/api/settings",
        Some(json!({
            "section": "security",
            "value": {
                "two_factor_enabled": true,
                "session_timeout_minutes": 1,
                "login_alerts": true
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, settings) = send(
        &app,
        "PATCH",
        "/api/settings",
        Some(json!({
            "section": "organization",
            "value": {
                "default_currency": "EUR",
                "default_incoterm": "DAP",
                "fiscal_year_start_month": 4,
                "require_po_approval": true
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["organization"]["default_incoterm"], "DAP");

    let (status, settings) = send(&app, "PUT", "/api/settings/integrations/xero", None).await;
    assert_eq!(status, StatusCode::OK);
    let xero = settings["integrations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "xero")
        .unwrap()
        .clone();
    assert_eq!(xero["connected"], true);

    let (status, _) = send(&app, "PUT", "/api/settings/integrations/sap", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, settings) = send(&app, "POST", "/api/settings/legal/privacy", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(settings["legal"]["privacy_accepted_at"].is_string());
    let (status, _) = send(&app, "POST", "/api/settings/legal/cookies", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sourcing_uses_default_incoterm_and_any_status() {
    let app = app().await;
    send(
        &app,
        "PATCH",
        "/api/settings",
        Some(json!({
            "section": "organization",
            "value": {
                "default_currency": "USD",
                "default_incoterm": "CIP",
                "fiscal_year_start_month": 1,
                "require_po_approval": false
            }
        })),
    )
    .await;

    let (status, created) = send(
        &app,
        "POST",
        "/api/sourcing-requests",
        Some(json!({
            "title": "Kraft liner board",
            "product_category": "Paper",
            "quantity": 20,
            "unit": "MT",
            "destination_country": "KE"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["incoterm"], "CIP");
    assert_eq!(created["status"], "draft");
    assert_eq!(created["requested_by"], "mem_priya");

    let uri = format!("/api/sourcing-requests/{}", created["id"].as_str().unwrap());
    let status_uri = format!("{}/status", uri);
    let (_, closed) = send(&app, "PUT", &status_uri, Some(json!({ "status": "closed" }))).await;
    assert_eq!(closed["status"], "closed");
    let (_, reopened) =
        send(&app, "PUT", &status_uri, Some(json!({ "status": "quoting" }))).await;
    assert_eq!(reopened["status"], "quoting");

    let (_, polymers) = send(&app, "GET", "/api/sourcing-requests?category=polymers", None).await;
    assert_eq!(polymers.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_invalid_sourcing_patch_is_rejected() {
    let app = app().await;
    let uri = "/api/sourcing-requests/src_hdpe";

    let (status, body) = send(&app, "PATCH", uri, Some(json!({ "quantity": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");

    let negative = json!({ "target_price": { "amount_minor": -100, "currency": "USD" } });
    let (status, _) = send(&app, "PATCH", uri, Some(negative)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, unchanged) = send(&app, "GET", uri, None).await;
    assert_eq!(unchanged["quantity"], 50);
    assert_eq!(unchanged["target_price"]["amount_minor"], 115_000);

    let (status, updated) = send(&app, "PATCH", uri, Some(json!({ "quantity": 60 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["quantity"], 60);
}

#[tokio::test]
async fn test_shipment_booking_and_milestones() {
    let app = app().await;
    let (status, shipment) = send(
        &app,
        "POST",
        "/api/logistics/shipments",
        Some(json!({
            "reference": "SHP-2024-0052",
            "sourcing_request_id": "src_hdpe",
            "origin": "Jebel Ali",
            "destination": "Mombasa",
            "mode": "sea",
            "eta": "2024-07-30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(shipment["status"], "booked");
    assert_eq!(shipment["incoterm"], "FOB");

    let uri = format!(
        "/api/logistics/shipments/{}/milestones",
        shipment["id"].as_str().unwrap()
    );
    let (status, updated) = send(
        &app,
        "POST",
        &uri,
        Some(json!({
            "label": "Vessel departed",
            "location": "Jebel Ali",
            "status": "in_transit"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(updated["status"], "in_transit");
    assert_eq!(updated["milestones"].as_array().unwrap().len(), 1);

    let (_, active) = send(&app, "GET", "/api/logistics/shipments?status=in_transit", None).await;
    assert_eq!(active.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_lists_every_organization() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/admin/organizations", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], DEMO_TENANT);
    assert_eq!(body[0]["completeness"], 100);
}

#[tokio::test]
async fn test_checkout_without_billing_is_unavailable() {
    let app = app().await;
    let request = json!({ "tier": "enterprise" });
    let (status, body) = send(&app, "POST", "/api/checkout", Some(request)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "unavailable");
}

struct FakeCheckout {
    calls: AtomicU32,
}

#[async_trait]
impl CheckoutProvider for FakeCheckout {
    async fn create_session(
        &self,
        tenant: TenantId,
        request: &CheckoutRequest,
    ) -> tradedesk_billing::Result<CheckoutSession> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CheckoutSession {
            id: format!("cs_{}", request.tier.as_str()),
            url: format!("https://checkout.example/{}", tenant),
        })
    }
}

#[tokio::test]
async fn test_checkout_redirect() {
    let provider = Arc::new(FakeCheckout {
        calls: AtomicU32::new(0),
    });
    let app = router(seeded_state().await.with_checkout(provider.clone()));

    let request = json!({ "tier": "enterprise", "period": "annual" });
    let (status, session) = send(&app, "POST", "/api/checkout", Some(request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["id"], "cs_enterprise");
    assert!(session["url"].as_str().unwrap().ends_with(DEMO_TENANT));

    // Already on professional
    let request = json!({ "tier": "professional" });
    let (status, _) = send(&app, "POST", "/api/checkout", Some(request)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
}

fn webhook_payload(event_type: &str, tier: &str) -> String {
    json!({
        "id": "evt_1",
        "type": event_type,
        "data": {
            "object": {
                "client_reference_id": DEMO_TENANT,
                "metadata": { "tenant_id": DEMO_TENANT, "tier": tier }
            }
        }
    })
    .to_string()
}

async fn post_webhook(app: &Router, payload: String, signature: Option<String>) -> StatusCode {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/billing/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(payload)).unwrap())
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn test_signed_webhook_changes_tier() {
    let verifier = WebhookVerifier::new("whsec_test", 300);
    let app = router(
        seeded_state()
            .await
            .with_webhook_verifier(verifier.clone()),
    );

    let payload = webhook_payload("checkout.session.completed", "enterprise");
    let now = chrono::Utc::now().timestamp();

    let status = post_webhook(&app, payload.clone(), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let status = post_webhook(&app, payload.clone(), Some(verifier.sign(b"{}", now))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let signature = verifier.sign(payload.as_bytes(), now);
    let status = post_webhook(&app, payload, Some(signature)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, dashboard) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(dashboard["tier"], "enterprise");
    let (status, _) = send(&app, "GET", "/api/resources/res_sanctions", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_subscription_deleted_downgrades_to_starter() {
    let app = app().await;
    let payload = webhook_payload("customer.subscription.deleted", "professional");
    assert_eq!(post_webhook(&app, payload, None).await, StatusCode::OK);

    let (_, dashboard) = send(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(dashboard["tier"], "starter");
    let (status, _) = send(&app, "GET", "/api/resources/res_polymer_outlook", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_request_metrics_use_route_templates() {
    let state = seeded_state().await;
    let metrics = state.metrics.clone();
    let app = router(state);

    send(&app, "GET", "/api/messages/conv_hdpe", None).await;
    send(&app, "GET", "/api/messages/conv_customs", None).await;

    let families = metrics.registry().gather();
    let requests = families
        .iter()
        .find(|m| m.name() == "tradedesk_http_requests_total")
        .unwrap();
    assert_eq!(requests.metric.len(), 1);
    let labels: Vec<_> = requests.metric[0]
        .label
        .iter()
        .map(|l| l.value().to_string())
        .collect();
    assert!(labels.contains(&"/api/messages/{id}".to_string()));
}
