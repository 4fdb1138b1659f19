// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API support for Kedai.
//!
//! - [`signature`]: `X-Hub-Signature-256` validation
//! - [`payload`]: webhook payload model and text-message extraction
//! - [`client`]: outbound text delivery

pub mod client;
pub mod payload;
pub mod signature;

pub use client::WhatsAppClient;
pub use payload::{InboundText, WebhookPayload};
pub use signature::{SIGNATURE_HEADER, SignatureError, sign, verify_signature};
