// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes exercised in-process through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use kedai_agent::IngestController;
use kedai_context::{OrderPipeline, Persona, ProductKnowledge, ReplyGenerator};
use async_trait::async_trait;
use kedai_config::model::ServerConfig;
use kedai_core::{AdapterType, ConversationStore, HealthStatus, KedaiError, PluginAdapter};
use kedai_gateway::{GatewayState, WebhookSecrets, router};
use kedai_router::IntentClassifier;
use kedai_shipping::QuoteService;
use kedai_test_utils::{MockDelivery, MockProvider, MockShipping, TestHarness};
use kedai_whatsapp::{SIGNATURE_HEADER, sign};
use tower::ServiceExt;

const SECRET: &str = "app-secret";
const EVENTS_TOKEN: &str = "dashboard-token";
const DASHBOARD_ORIGIN: &str = "https://dashboard.toko.example";
const CHAT_ANSWER: &str = r#"{"intent":"Chat_Biasa","nama":null,"alamat_lengkap":null,"kecamatan":null,"kabupaten_kota":null,"provinsi":null,"jumlah_barang":null}"#;

struct Fixture {
    harness: TestHarness,
    provider: Arc<MockProvider>,
    delivery: Arc<MockDelivery>,
    app: Router,
}

/// Adapter whose health is fixed at construction.
struct FixedHealth {
    name: &'static str,
    status: HealthStatus,
}

#[async_trait]
impl PluginAdapter for FixedHealth {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Shipping
    }

    async fn health_check(&self) -> Result<HealthStatus, KedaiError> {
        Ok(self.status.clone())
    }

    async fn shutdown(&self) -> Result<(), KedaiError> {
        Ok(())
    }
}

impl Fixture {
    async fn new() -> Self {
        Self::with_components(Vec::new()).await
    }

    async fn with_components(components: Vec<Arc<dyn PluginAdapter>>) -> Self {
        let harness = TestHarness::new().await.unwrap();
        let provider = Arc::new(MockProvider::new());
        let delivery = Arc::new(MockDelivery::new());
        let shipping = Arc::new(MockShipping::fixture());

        let replies = ReplyGenerator::new(
            provider.clone(),
            harness.store.clone(),
            Arc::new(ProductKnowledge::from_text("Serum Waiteu 30ml").unwrap()),
            Persona {
                bot_name: "Sari".into(),
                brand_name: "Waiteu".into(),
            },
            "reply-model",
            10,
        );
        let controller = IngestController::new(
            harness.store.clone(),
            IntentClassifier::new(provider.clone(), "classifier-model"),
            OrderPipeline::new(QuoteService::new(shipping, 1477, "jne"), 150),
            replies,
            delivery.clone(),
        );
        let state = GatewayState::new(
            Arc::new(controller),
            harness.bus.clone(),
            WebhookSecrets {
                verify_token: "verify-me".into(),
                app_secret: SECRET.into(),
            },
        )
        .with_server_config(&ServerConfig {
            events_token: Some(EVENTS_TOKEN.into()),
            cors_origins: vec![DASHBOARD_ORIGIN.into()],
            ..ServerConfig::default()
        })
        .with_components(components);

        Self {
            app: router(state),
            harness,
            provider,
            delivery,
        }
    }
}

fn text_payload(wamid: &str) -> String {
    serde_json::json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "value": {
                    "contacts": [{"profile": {"name": "Ani"}, "wa_id": "628111"}],
                    "messages": [{
                        "from": "628111",
                        "id": wamid,
                        "timestamp": "1760000000",
                        "type": "text",
                        "text": {"body": "Halo, ready ga?"}
                    }]
                }
            }]
        }]
    })
    .to_string()
}

fn post(body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn subscription_handshake_echoes_challenge() {
    let fx = Fixture::new().await;
    let response = fx
        .app
        .oneshot(
            Request::get("/webhook?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=1158201444")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"1158201444");
}

#[tokio::test]
async fn subscription_handshake_rejects_wrong_token_and_missing_params() {
    let fx = Fixture::new().await;

    let wrong = fx
        .app
        .clone()
        .oneshot(
            Request::get("/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);

    let missing = fx
        .app
        .oneshot(Request::get("/webhook?hub.mode=subscribe").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signed_delivery_is_processed_and_acknowledged() {
    let fx = Fixture::new().await;
    fx.provider.add_response(CHAT_ANSWER).await;
    fx.provider.add_response("Ready Kak!").await;
    let body = text_payload("wamid.W1");

    let response = fx
        .app
        .oneshot(post(&body, Some(sign(body.as_bytes(), SECRET))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"received": true, "processed": 1})
    );

    let messages = fx.harness.store.list_messages("628111").await.unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(fx.delivery.sent_count().await, 1);
}

#[tokio::test]
async fn missing_signature_is_401_and_mutates_nothing() {
    let fx = Fixture::new().await;
    let body = text_payload("wamid.W2");

    let response = fx.app.oneshot(post(&body, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(fx.harness.store.list_contacts().await.unwrap().is_empty());
    assert_eq!(fx.delivery.sent_count().await, 0);
}

#[tokio::test]
async fn wrong_signature_is_403_and_mutates_nothing() {
    let fx = Fixture::new().await;
    let body = text_payload("wamid.W3");

    let response = fx
        .app
        .oneshot(post(&body, Some(sign(body.as_bytes(), "other-secret"))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(fx.harness.store.list_contacts().await.unwrap().is_empty());
    assert!(fx.provider.requests().await.is_empty());
}

#[tokio::test]
async fn signed_malformed_payload_is_acknowledged() {
    let fx = Fixture::new().await;
    let body = r#"{"hello": "world"}"#;

    let response = fx
        .app
        .oneshot(post(body, Some(sign(body.as_bytes(), SECRET))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::json!({"received": true, "processed": 0})
    );
}

fn health_request() -> Request<Body> {
    Request::get("/health").body(Body::empty()).unwrap()
}

#[tokio::test]
async fn health_reports_version_and_components() {
    let fx = Fixture::with_components(vec![Arc::new(MockShipping::fixture())]).await;
    let response = fx.app.oneshot(health_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["uptime_secs"].is_u64());
    assert_eq!(json["components"][0]["name"], "mock-shipping");
    assert_eq!(json["components"][0]["status"], "healthy");
    assert_eq!(json["components"][0]["version"], "0.1.0");
    assert!(json["components"][0].get("reason").is_none());
}

#[tokio::test]
async fn degraded_component_degrades_health() {
    let fx = Fixture::with_components(vec![
        Arc::new(MockShipping::fixture()),
        Arc::new(FixedHealth {
            name: "slow-upstream",
            status: HealthStatus::Degraded("province list is empty".into()),
        }),
    ])
    .await;
    let response = fx.app.oneshot(health_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["components"][1]["status"], "degraded");
    assert_eq!(json["components"][1]["reason"], "province list is empty");
}

#[tokio::test]
async fn unhealthy_component_returns_503() {
    let fx = Fixture::with_components(vec![Arc::new(FixedHealth {
        name: "sqlite",
        status: HealthStatus::Unhealthy("database is closed".into()),
    })])
    .await;
    let response = fx.app.oneshot(health_request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["components"][0]["reason"], "database is closed");
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let fx = Fixture::new().await;

    let allowed = fx
        .app
        .clone()
        .oneshot(
            Request::get("/health")
                .header("origin", DASHBOARD_ORIGIN)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        DASHBOARD_ORIGIN
    );

    let foreign = fx
        .app
        .oneshot(
            Request::get("/health")
                .header("origin", "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(foreign.headers().get("access-control-allow-origin").is_none());
}

fn events_request(token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get("/events");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn event_stream_requires_bearer_token() {
    let fx = Fixture::new().await;

    let missing = fx.app.clone().oneshot(events_request(None)).await.unwrap();
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let wrong = fx
        .app
        .clone()
        .oneshot(events_request(Some("guess")))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let ok = fx
        .app
        .oneshot(events_request(Some(EVENTS_TOKEN)))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);
}

#[tokio::test]
async fn event_stream_forwards_store_updates() {
    let fx = Fixture::new().await;
    let response = fx
        .app
        .oneshot(events_request(Some(EVENTS_TOKEN)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    fx.harness.store.upsert_contact("628999", Some("Rina")).await.unwrap();

    let mut frames = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(Duration::from_secs(5), frames.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.contains("event: update_contact"), "frame: {text}");
    assert!(text.contains("628999"));
}
