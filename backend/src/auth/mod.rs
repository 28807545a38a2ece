//! # API Key Authentication
//!
//! Every ledger endpoint is protected by one shared secret. Callers send
//! it either as `x-api-key: <secret>` or `Authorization: Bearer <secret>`.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use constant_time_eq::constant_time_eq;
use tracing::{error, warn};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Extract the caller's API key from the request headers.
///
/// `x-api-key` wins when present and non-empty; otherwise a
/// `Bearer`-prefixed `Authorization` header is used.
pub fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    let from_header = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    from_header.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

/// Check the request's API key against the configured secret.
///
/// ## Returns
///
/// `false` when the secret is not configured, when no key was supplied,
/// or when the keys differ.
pub fn verify_auth(headers: &HeaderMap, expected_key: Option<&str>) -> bool {
    let expected = match expected_key.filter(|k| !k.is_empty()) {
        Some(key) => key,
        None => {
            error!("API_SECRET_KEY not configured");
            return false;
        }
    };

    let provided = match extract_api_key(headers) {
        Some(key) => key,
        None => {
            warn!("No API key provided in request");
            return false;
        }
    };

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        true
    } else {
        warn!("Invalid API key provided");
        false
    }
}
