// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Server-Sent Events stream of store updates for GET /events.
//!
//! Event format:
//! ```text
//! event: new_message
//! data: {"type":"new_message","wa_id":"628...","message":{...}}
//! ```
//!
//! A subscriber that falls behind skips the lost events and keeps going.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use kedai_bus::KedaiEvent;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::server::GatewayState;

pub async fn stream_events(
    State(state): State<GatewayState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    debug!(subscribers = state.events.subscriber_count(), "event stream opened");

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(sse) = to_sse(&event) {
                        return Some((Ok(sse), rx));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event stream subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_sse(event: &KedaiEvent) -> Option<Event> {
    match serde_json::to_string(event) {
        Ok(data) => Some(Event::default().event(event.name()).data(data)),
        Err(e) => {
            warn!(event = event.name(), error = %e, "failed to serialize event");
            None
        }
    }
}
