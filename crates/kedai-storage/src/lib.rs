// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Kedai order assistant.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed operations for
//! contacts, conversations and messages. Uniqueness invariants (one contact
//! per wa id, one OPEN conversation per contact, one row per channel message
//! id) live in the schema and are hit with `ON CONFLICT` upserts.

pub mod adapter;
pub mod database;
pub mod migrations;
mod models;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
