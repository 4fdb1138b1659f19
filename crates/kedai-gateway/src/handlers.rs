// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook and health handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::future::join_all;
use kedai_core::HealthStatus;
use kedai_whatsapp::{SIGNATURE_HEADER, verify_signature};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::server::GatewayState;

/// Query of the subscription handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Acknowledgement of a webhook delivery.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub received: bool,
    /// Messages that reached a delivered reply.
    pub processed: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` or `unhealthy`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub components: Vec<ComponentHealth>,
}

/// One adapter's entry in the health report.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub kind: String,
    pub version: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// GET /webhook
///
/// Echoes `hub.challenge` when the mode is `subscribe` and the token matches.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(query): Query<VerifyQuery>,
) -> Response {
    let (Some(mode), Some(token), Some(challenge)) =
        (query.mode, query.verify_token, query.challenge)
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    if mode == "subscribe" && token == state.secrets.verify_token {
        info!("webhook subscription verified");
        (StatusCode::OK, challenge).into_response()
    } else {
        warn!(%mode, "webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// POST /webhook
///
/// Authenticates the raw body, then processes every text message it carries.
/// Anything past authentication is acknowledged with 200.
pub async fn receive_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());

    if let Err(e) = verify_signature(Some(&body), signature, &state.secrets.app_secret) {
        warn!(error = %e, "webhook delivery rejected");
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    let outcomes = state.controller.ingest_payload(&body).await;
    let processed = outcomes.iter().filter(|o| o.is_replied()).count();
    debug!(messages = outcomes.len(), processed, "webhook delivery handled");

    Json(WebhookAck {
        received: true,
        processed,
    })
    .into_response()
}

/// GET /health
///
/// Checks every registered adapter. Any unhealthy adapter turns the
/// response into a 503.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let checks = join_all(state.components.iter().map(|c| c.health_check())).await;

    let mut degraded = false;
    let mut unhealthy = false;
    let components: Vec<ComponentHealth> = state
        .components
        .iter()
        .zip(checks)
        .map(|(component, check)| {
            let (status, reason) = match check {
                Ok(HealthStatus::Healthy) => ("healthy", None),
                Ok(HealthStatus::Degraded(reason)) => {
                    degraded = true;
                    ("degraded", Some(reason))
                }
                Ok(HealthStatus::Unhealthy(reason)) => {
                    unhealthy = true;
                    ("unhealthy", Some(reason))
                }
                Err(e) => {
                    unhealthy = true;
                    ("unhealthy", Some(e.to_string()))
                }
            };
            if let Some(reason) = &reason {
                warn!(component = component.name(), %status, %reason, "health check");
            }
            ComponentHealth {
                name: component.name().to_string(),
                kind: component.adapter_type().to_string(),
                version: component.version().to_string(),
                status: status.to_string(),
                reason,
            }
        })
        .collect();

    let (code, status) = if unhealthy {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    } else if degraded {
        (StatusCode::OK, "degraded")
    } else {
        (StatusCode::OK, "ok")
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.start_time.elapsed().as_secs(),
            components,
        }),
    )
        .into_response()
}
