//! Webhook payload signature verification.
//!
//! Requests from webhook producers carry an HMAC-SHA256 signature of the
//! raw body in the `X-Webhook-Signature` header, formatted as
//! `sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Compute the expected signature for a payload.
pub fn sign(payload: &[u8], secret: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(payload);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

/// Verify a webhook signature against the raw request body.
pub fn verify(payload: &[u8], secret: &str, signature: &str) -> bool {
    let expected = sign(payload, secret);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

/// Constant-time equality comparison
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
