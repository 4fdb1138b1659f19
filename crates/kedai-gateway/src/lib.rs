// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP surface of the Kedai order assistant.
//!
//! Routes:
//! - `GET /webhook` - platform subscription handshake
//! - `POST /webhook` - signed message deliveries
//! - `GET /health` - adapter health report
//! - `GET /events` - Server-Sent Events stream of store updates (bearer token)

pub mod auth;
pub mod handlers;
pub mod server;
pub mod sse;

pub use auth::EventsAuth;
pub use server::{GatewayState, WebhookSecrets, router, start_server};
