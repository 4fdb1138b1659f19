// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.

use std::sync::Arc;
use std::time::Instant;

use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware, routing::get};
use kedai_agent::IngestController;
use kedai_bus::EventBus;
use kedai_config::model::{ServerConfig, WhatsAppConfig};
use kedai_core::{KedaiError, PluginAdapter};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{EventsAuth, auth_middleware};
use crate::{handlers, sse};

/// Secrets shared with the messaging platform.
#[derive(Clone)]
pub struct WebhookSecrets {
    /// Token echoed back during the subscription handshake.
    pub verify_token: String,
    /// Key the platform signs deliveries with.
    pub app_secret: String,
}

impl WebhookSecrets {
    pub fn from_config(config: &WhatsAppConfig) -> Result<Self, KedaiError> {
        let required = |value: &Option<String>, key: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .ok_or_else(|| KedaiError::Config(format!("whatsapp.{key} is not set")))
        };
        Ok(Self {
            verify_token: required(&config.verify_token, "verify_token")?,
            app_secret: required(&config.app_secret, "app_secret")?,
        })
    }
}

impl std::fmt::Debug for WebhookSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSecrets")
            .field("verify_token", &"[redacted]")
            .field("app_secret", &"[redacted]")
            .finish()
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub controller: Arc<IngestController>,
    /// Bus the store publishes to; `/events` subscribers attach here.
    pub events: EventBus,
    pub secrets: WebhookSecrets,
    pub events_auth: EventsAuth,
    /// Browser origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Adapters reported by `/health`.
    pub components: Vec<Arc<dyn PluginAdapter>>,
    /// Process start, for `uptime_secs`.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(controller: Arc<IngestController>, events: EventBus, secrets: WebhookSecrets) -> Self {
        Self {
            controller,
            events,
            secrets,
            events_auth: EventsAuth::default(),
            cors_origins: Vec::new(),
            components: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Applies the `[server]` token and origin list.
    pub fn with_server_config(mut self, config: &ServerConfig) -> Self {
        self.events_auth = EventsAuth::new(config.events_token.clone());
        self.cors_origins = config.cors_origins.clone();
        self
    }

    pub fn with_components(mut self, components: Vec<Arc<dyn PluginAdapter>>) -> Self {
        self.components = components;
        self
    }
}

/// All gateway routes with middleware applied.
pub fn router(state: GatewayState) -> Router {
    let events = Router::new()
        .route("/events", get(sse::stream_events))
        .route_layer(middleware::from_fn_with_state(
            state.events_auth.clone(),
            auth_middleware,
        ));
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route(
            "/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .route("/health", get(handlers::get_health))
        .merge(events)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Binds `host:port` and serves until `shutdown` is cancelled.
///
/// In-flight requests are allowed to finish after cancellation.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), KedaiError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| KedaiError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| KedaiError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("gateway stopped");
    Ok(())
}
