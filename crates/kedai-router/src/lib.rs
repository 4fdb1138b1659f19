// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing for Kedai.
//!
//! Decides whether a customer message is an order attempt or plain chat and
//! pulls the order fields out of free text with one language-model call.

pub mod classifier;
pub mod prompt;

pub use classifier::{ClassificationFailure, IntentClassifier, parse_answer, strip_code_fences};
pub use prompt::extraction_prompt;
