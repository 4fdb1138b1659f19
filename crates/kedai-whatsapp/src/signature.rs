// SPDX-FileCopyrightText: 2026 Kedai Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `X-Hub-Signature-256` validation for webhook deliveries.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Header Meta signs webhook bodies with.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

type HmacSha256 = Hmac<Sha256>;

/// Why a delivery was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature header missing")]
    Missing,

    /// The raw body was not retained; a server wiring problem, not an auth failure.
    #[error("raw request body not available")]
    RawBodyMissing,

    #[error("signature does not match")]
    Mismatch,
}

impl SignatureError {
    /// HTTP status the gateway answers with.
    pub fn status_code(self) -> u16 {
        match self {
            SignatureError::Missing => 401,
            SignatureError::RawBodyMissing => 500,
            SignatureError::Mismatch => 403,
        }
    }
}

/// Checks `header` (`sha256=<hex>`) against HMAC-SHA256 of `raw_body` under
/// `app_secret`. The comparison is constant time.
pub fn verify_signature(
    raw_body: Option<&[u8]>,
    header: Option<&str>,
    app_secret: &str,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let body = raw_body.ok_or(SignatureError::RawBodyMissing)?;

    let hex_sig = header
        .trim()
        .strip_prefix("sha256=")
        .ok_or(SignatureError::Mismatch)?;
    let expected = hex::decode(hex_sig).map_err(|_| SignatureError::Mismatch)?;

    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).map_err(|_| SignatureError::Mismatch)?;
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
}

/// `sha256=<hex>` header value for `body`. Used by tests and tooling.
pub fn sign(body: &[u8], app_secret: &str) -> String {
    let mut mac = match HmacSha256::new_from_slice(app_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
