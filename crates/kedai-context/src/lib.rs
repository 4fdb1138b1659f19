// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context assembly for Kedai replies.
//!
//! - [`knowledge`]: product document loaded at startup
//! - [`pipeline`]: order completeness, shipping quote and dynamic context
//! - [`reply`]: persona prompt with history, answered by the language model

pub mod knowledge;
pub mod pipeline;
pub mod reply;

pub use knowledge::ProductKnowledge;
pub use pipeline::{MissingField, NO_CONTEXT, OrderPipeline, PipelineOutcome, missing_fields};
pub use reply::{FALLBACK_REPLY, HISTORY_UNAVAILABLE, NO_HISTORY, Persona, ReplyGenerator};
