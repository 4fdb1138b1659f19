// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token guard for the live update stream.
//!
//! When no token is configured every request is rejected (fail-closed).

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

/// Credentials accepted by `GET /events`.
#[derive(Clone, Default)]
pub struct EventsAuth {
    /// Expected bearer token.
    pub bearer_token: Option<String>,
}

impl EventsAuth {
    /// Blank tokens count as unset.
    pub fn new(bearer_token: Option<String>) -> Self {
        Self {
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl std::fmt::Debug for EventsAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventsAuth")
            .field(
                "bearer_token",
                &self.bearer_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Rejects requests without `Authorization: Bearer <token>`.
pub async fn auth_middleware(
    State(auth): State<EventsAuth>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.bearer_token.as_deref() else {
        error!("events stream has no token configured -- rejecting subscriber");
        return Err(StatusCode::UNAUTHORIZED);
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(token) if token == expected => Ok(next.run(request).await),
        _ => {
            warn!("events subscriber rejected");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
