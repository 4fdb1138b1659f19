// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Kedai order assistant.

use thiserror::Error;

/// The primary error type used across all Kedai adapter traits and core operations.
#[derive(Debug, Error)]
pub enum KedaiError {
    /// Configuration errors (invalid TOML, missing required fields, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (delivery failure, bind failure, payload format).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Language model provider errors (API failure, empty candidates, parse failure).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Shipping-rate provider errors (transport failure, non-200 envelope).
    #[error("shipping error: {message}")]
    Shipping {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KedaiError {
    /// Wrap any error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        KedaiError::Storage {
            source: Box::new(err),
        }
    }
}
