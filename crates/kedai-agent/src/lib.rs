// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message handling for the Kedai order assistant.
//!
//! The [`IngestController`] turns authenticated webhook deliveries into
//! persisted conversations and replies. [`shutdown`] wires process signals
//! to a cancellation token.

pub mod ingest;
pub mod shutdown;

pub use ingest::{APOLOGY_REPLY, IngestController, IngestOutcome, IngestState};
pub use shutdown::install_signal_handler;
