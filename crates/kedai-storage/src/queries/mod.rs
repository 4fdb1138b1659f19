// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for contacts, conversations and messages.

pub mod contacts;
pub mod conversations;
pub mod messages;
