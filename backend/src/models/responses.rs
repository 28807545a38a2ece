//! # API Response Models
//!
//! Structures for outgoing API response bodies.
//! All responses are wrapped in a standard format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper.
///
/// ## Success Response
///
/// ```json
/// {
///     "success": true,
///     "data": { ... }
/// }
/// ```
///
/// ## Error Response
///
/// ```json
/// {
///     "success": false,
///     "error": "Unauthorized. Invalid or missing API key."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Whether the request was successful.
    pub success: bool,

    /// Response data (omitted on error).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable error (omitted on success).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with data.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.to_string()),
        }
    }
}

/// Returned by `POST /api/create-badge`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBadgeResponse {
    pub badge_id: String,
    pub digest: String,
    pub student_name: String,
    pub course_id: String,
    pub student_address: String,
}

/// Returned by `POST /api/update-progress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressResponse {
    pub badge_id: String,
    pub progress: i64,
    pub digest: String,
}

/// Returned by `POST /api/get-balance`.
///
/// ## Example Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "address": "0x8f2c...e41a",
///         "balance": "2.5",
///         "balanceRaw": "2500000000",
///         "coinType": "0x2::sui::SUI",
///         "network": "testnet",
///         "timestamp": "2025-01-15T12:00:00Z"
///     }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    /// Balance in SUI.
    pub balance: String,
    /// Balance in MIST.
    pub balance_raw: String,
    pub coin_type: String,
    pub network: String,
    pub timestamp: DateTime<Utc>,
}

/// Returned by `POST /api/generate-wallet`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub address: String,
    /// `suiprivkey1...`
    pub private_key: String,
    pub network: String,
    pub timestamp: DateTime<Utc>,
}

/// Returned by `GET /api/test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatusResponse {
    pub network: String,
    pub address: String,
    /// e.g. `"1.25 SUI"`
    pub balance: String,
    pub package_id: String,
    pub admin_cap_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Returned by `GET /api/hello`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
