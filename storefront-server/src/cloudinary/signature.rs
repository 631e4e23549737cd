//! Request signing and notification verification (SHA-256)

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Notifications further than this from now, either way, are rejected
pub const NOTIFICATION_MAX_AGE_SECS: i64 = 2 * 60 * 60;

/// Parameters that are sent but never signed
const UNSIGNED_PARAMS: &[&str] = &["file", "api_key", "cloud_name", "resource_type", "signature"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing {0} header")]
    MissingHeader(&'static str),

    #[error("Invalid notification timestamp")]
    InvalidTimestamp,

    #[error("Notification timestamp outside the allowed window")]
    Expired,

    #[error("Notification signature mismatch")]
    Mismatch,
}

fn sha256_hex(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Sign upload parameters: sorted `k=v` pairs joined with `&`, then the secret
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<_> = params
        .iter()
        .filter(|(k, v)| !v.is_empty() && !UNSIGNED_PARAMS.contains(k))
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    sha256_hex(&[to_sign.as_bytes(), api_secret.as_bytes()])
}

/// Verify an inbound notification: `hex(sha256(body + timestamp + secret))`
pub fn verify_notification(
    body: &[u8],
    timestamp: &str,
    signature: &str,
    api_secret: &str,
    now_secs: i64,
) -> Result<(), SignatureError> {
    let ts: i64 = timestamp
        .trim()
        .parse()
        .map_err(|_| SignatureError::InvalidTimestamp)?;

    let expected = sha256_hex(&[body, timestamp.trim().as_bytes(), api_secret.as_bytes()]);
    if !constant_time_eq(expected.as_bytes(), signature.trim().to_lowercase().as_bytes()) {
        return Err(SignatureError::Mismatch);
    }

    if (now_secs - ts).abs() > NOTIFICATION_MAX_AGE_SECS {
        return Err(SignatureError::Expired);
    }

    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
