//! # API Request Handlers
//!
//! This module contains the handler functions for each API endpoint.
//! Each ledger handler:
//! 1. Checks the API key (before any of the body is read)
//! 2. Reads, parses and validates the body
//! 3. Calls the loyalty client
//! 4. Returns a formatted response
//!
//! Preflight and wrong-method requests never reach these handlers; see
//! [`super::routes`].
//!
//! ## Status Codes
//!
//! | Status | Cause |
//! |--------|-------|
//! | 400 | Missing or malformed field |
//! | 401 | Missing or wrong API key |
//! | 405 | Wrong HTTP method |
//! | 413 | Body larger than [`MAX_BODY_BYTES`] |
//! | 500 | Configuration missing, RPC or transaction failure |

use std::sync::Arc;

use actix_web::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::auth::verify_auth;
use crate::models::{
    non_empty, parse_progress, ApiResponse, BalanceResponse, ConnectionStatusResponse,
    CreateBadgeRequest, CreateBadgeResponse, GetBadgeRequest, GetBalanceRequest, HelloResponse,
    UpdateProgressRequest, UpdateProgressResponse, WalletResponse,
};
use crate::services::loyalty_client::MAX_PROGRESS;
use crate::services::{LedgerError, SuiLoyaltyClient};
use crate::sui::{RpcError, SuiKeypair, SuiRpcClient};
use crate::utils::{format_sui_str, is_valid_sui_address};
use crate::AppState;

use super::cors::cors_response;

/// Largest accepted request body: 256 KiB.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

// ============================================================================
// SHARED HELPERS
// ============================================================================

fn respond<T: Serialize>(req: &HttpRequest, status: StatusCode, body: &ApiResponse<T>) -> HttpResponse {
    cors_response(req, status).json(body)
}

fn ok<T: Serialize>(req: &HttpRequest, data: T) -> HttpResponse {
    respond(req, StatusCode::OK, &ApiResponse::success(data))
}

fn error_response(req: &HttpRequest, status: StatusCode, message: &str) -> HttpResponse {
    respond(req, status, &ApiResponse::<()>::error(message))
}

fn bad_request(req: &HttpRequest, message: &str) -> HttpResponse {
    warn!("Rejected {}: {}", req.path(), message);
    error_response(req, StatusCode::BAD_REQUEST, message)
}

/// Reject the request unless it carries the configured API key.
fn authorize(req: &HttpRequest, state: &AppState) -> Result<(), HttpResponse> {
    if verify_auth(req.headers(), state.config.api_secret_key.as_deref()) {
        Ok(())
    } else {
        Err(error_response(
            req,
            StatusCode::UNAUTHORIZED,
            "Unauthorized. Invalid or missing API key.",
        ))
    }
}

/// Read the request body, stopping at [`MAX_BODY_BYTES`].
async fn read_body(req: &HttpRequest, mut payload: web::Payload) -> Result<web::Bytes, HttpResponse> {
    let mut body = web::BytesMut::new();

    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| bad_request(req, &format!("Invalid request body: {}", e)))?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            warn!("Rejected {}: body exceeds {} bytes", req.path(), MAX_BODY_BYTES);
            return Err(error_response(
                req,
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large",
            ));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body.freeze())
}

/// Read and parse a JSON body; an empty body yields the default (all
/// fields missing).
async fn parse_body<T: DeserializeOwned + Default>(
    req: &HttpRequest,
    payload: web::Payload,
) -> Result<T, HttpResponse> {
    let body = read_body(req, payload).await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&body)
        .map_err(|e| bad_request(req, &format!("Invalid JSON body: {}", e)))
}

/// Convert a node-reported MIST balance to SUI.
fn balance_in_sui(raw: &str) -> Result<String, LedgerError> {
    format_sui_str(raw).map_err(|e| {
        RpcError::InvalidResponse(format!("totalBalance {:?} is not an amount: {}", raw, e)).into()
    })
}

/// Build a loyalty client from the injected configuration.
fn ledger_client(req: &HttpRequest, state: &AppState) -> Result<SuiLoyaltyClient, HttpResponse> {
    state
        .config
        .ledger_config()
        .map_err(LedgerError::from)
        .and_then(|config| SuiLoyaltyClient::new(&config))
        .map_err(|e| ledger_failure(req, "Failed to initialize Sui client", e))
}

/// Map a ledger error to a response: bad input is the caller's fault,
/// everything else is ours.
fn ledger_failure(req: &HttpRequest, context: &str, e: LedgerError) -> HttpResponse {
    if e.is_invalid_input() {
        bad_request(req, &e.to_string())
    } else {
        error!("{}: {}", context, e);
        error_response(req, StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
    }
}

// ============================================================================
// ROUTING HELPERS
// ============================================================================

/// CORS preflight: allow any origin and stop.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .finish()
}

/// Answer a request whose method the endpoint does not serve.
pub fn method_not_allowed(req: &HttpRequest, allowed: &str) -> HttpResponse {
    warn!("{} {} not allowed", req.method(), req.path());
    error_response(
        req,
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Method not allowed. Use {}.", allowed),
    )
}

// ============================================================================
// PUBLIC ENDPOINTS
// ============================================================================

/// API information endpoint (root).
///
/// ## Endpoint
///
/// `GET /`
pub async fn api_info() -> HttpResponse {
    let info = json!({
        "name": "Loyalty Badge API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Mint and update course loyalty badges on Sui",
        "endpoints": {
            "createBadge": { "method": "POST", "path": "/api/create-badge" },
            "updateProgress": { "method": "POST", "path": "/api/update-progress" },
            "getBadge": { "method": "POST", "path": "/api/get-badge" },
            "getBalance": { "method": "POST", "path": "/api/get-balance" },
            "generateWallet": { "method": "POST", "path": "/api/generate-wallet" },
            "test": { "method": "GET", "path": "/api/test" },
            "hello": { "method": "GET", "path": "/api/hello" }
        }
    });

    HttpResponse::Ok().json(ApiResponse::success(info))
}

/// Liveness probe.
///
/// ## Endpoint
///
/// `GET /api/hello`
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok().json(HelloResponse {
        success: true,
        message: "Hello from the loyalty badge API!".to_string(),
        timestamp: Utc::now(),
    })
}

// ============================================================================
// LEDGER ENDPOINTS
// ============================================================================

/// Mint a badge for a student.
///
/// ## Endpoint
///
/// `POST /api/create-badge`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/create-badge \
///   -H "Content-Type: application/json" \
///   -H "x-api-key: $API_SECRET_KEY" \
///   -d '{
///     "studentName": "Ada Lovelace",
///     "courseId": "RUST-101",
///     "studentAddress": "0x8f2c...e41a"
///   }'
/// ```
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "badgeId": "0x5d1e...9b07",
///         "digest": "8Hq3...",
///         "studentName": "Ada Lovelace",
///         "courseId": "RUST-101",
///         "studentAddress": "0x8f2c...e41a"
///     }
/// }
/// ```
pub async fn create_badge(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: web::Payload,
) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }

    let request: CreateBadgeRequest = match parse_body(&req, payload).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (student_name, course_id, student_address) = match (
        non_empty(&request.student_name),
        non_empty(&request.course_id),
        non_empty(&request.student_address),
    ) {
        (Some(name), Some(course), Some(address)) => (name, course, address),
        _ => {
            return bad_request(
                &req,
                "Missing required fields: studentName, courseId, studentAddress",
            )
        }
    };

    if !is_valid_sui_address(student_address) {
        return bad_request(&req, "Invalid Sui address format");
    }

    let client = match ledger_client(&req, &state) {
        Ok(client) => client,
        Err(response) => return response,
    };

    info!(
        "Creating badge for {} ({}) -> {}",
        student_name, course_id, student_address
    );

    match client
        .create_badge(student_name, course_id, student_address)
        .await
    {
        Ok(badge) => ok(
            &req,
            CreateBadgeResponse {
                badge_id: badge.badge_id,
                digest: badge.digest,
                student_name: student_name.to_string(),
                course_id: course_id.to_string(),
                student_address: student_address.to_string(),
            },
        ),
        Err(e) => ledger_failure(&req, "Create badge failed", e),
    }
}

/// Update the progress recorded on a badge.
///
/// ## Endpoint
///
/// `POST /api/update-progress`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/update-progress \
///   -H "Content-Type: application/json" \
///   -H "Authorization: Bearer $API_SECRET_KEY" \
///   -d '{ "badgeId": "0x5d1e...9b07", "progress": 50 }'
/// ```
///
/// ## Errors
///
/// - 400 - `badgeId` missing or malformed
/// - 400 - `progress` missing, not a number, or outside 0-100
pub async fn update_progress(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: web::Payload,
) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }

    let request: UpdateProgressRequest = match parse_body(&req, payload).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let badge_id = match non_empty(&request.badge_id) {
        Some(badge_id) => badge_id,
        None => return bad_request(&req, "Missing required field: badgeId"),
    };

    let progress = match request.progress.as_ref().filter(|p| !p.is_null()) {
        Some(progress) => progress,
        None => return bad_request(&req, "Missing required field: progress"),
    };

    let progress = match parse_progress(progress) {
        Some(p) if (0..=MAX_PROGRESS).contains(&p) => p,
        _ => return bad_request(&req, "Progress must be a number between 0 and 100"),
    };

    if !is_valid_sui_address(badge_id) {
        return bad_request(&req, "Invalid badge ID format");
    }

    let client = match ledger_client(&req, &state) {
        Ok(client) => client,
        Err(response) => return response,
    };

    info!("Updating progress for badge {} to {}%", badge_id, progress);

    match client.update_progress(badge_id, progress).await {
        Ok(digest) => ok(
            &req,
            UpdateProgressResponse {
                badge_id: badge_id.to_string(),
                progress,
                digest,
            },
        ),
        Err(e) => ledger_failure(&req, "Update progress failed", e),
    }
}

/// Read a badge object from the ledger.
///
/// ## Endpoint
///
/// `POST /api/get-badge`
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "objectId": "0x5d1e...9b07",
///         "version": "42",
///         "objectType": "0x...::online_course_loyalty::Badge",
///         "owner": { "AddressOwner": "0x8f2c...e41a" },
///         "fields": { "student_name": "Ada Lovelace", "progress": 50 }
///     }
/// }
/// ```
pub async fn get_badge(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: web::Payload,
) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }

    let request: GetBadgeRequest = match parse_body(&req, payload).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let badge_id = match non_empty(&request.badge_id) {
        Some(badge_id) => badge_id,
        None => return bad_request(&req, "Missing required field: badgeId"),
    };

    if !is_valid_sui_address(badge_id) {
        return bad_request(&req, "Invalid badge ID format");
    }

    let client = match ledger_client(&req, &state) {
        Ok(client) => client,
        Err(response) => return response,
    };

    match client.get_badge(badge_id).await {
        Ok(badge) => ok(&req, badge),
        Err(e) => ledger_failure(&req, "Get badge failed", e),
    }
}

/// Look up the SUI balance of any address.
///
/// Needs only the RPC endpoint, not the signing key.
///
/// ## Endpoint
///
/// `POST /api/get-balance`
///
/// ## Example
///
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/get-balance \
///   -H "Content-Type: application/json" \
///   -H "x-api-key: $API_SECRET_KEY" \
///   -d '{ "address": "0x8f2c...e41a" }'
/// ```
pub async fn get_balance(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    payload: web::Payload,
) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }

    let request: GetBalanceRequest = match parse_body(&req, payload).await {
        Ok(request) => request,
        Err(response) => return response,
    };

    let address = match non_empty(&request.address) {
        Some(address) => address,
        None => return bad_request(&req, "Missing required field: address"),
    };

    if !is_valid_sui_address(address) {
        return bad_request(&req, "Invalid Sui address format");
    }

    let rpc = match SuiRpcClient::new(&state.config.rpc_url()) {
        Ok(rpc) => rpc,
        Err(e) => return ledger_failure(&req, "Failed to initialize Sui client", e.into()),
    };

    let balance = match rpc.get_balance(address).await {
        Ok(balance) => balance,
        Err(e) => return ledger_failure(&req, "Error getting balance", e.into()),
    };

    let balance_sui = match balance_in_sui(&balance.total_balance) {
        Ok(balance_sui) => balance_sui,
        Err(e) => return ledger_failure(&req, "Error getting balance", e),
    };

    info!("Balance check for {}: {} SUI", address, balance_sui);

    ok(
        &req,
        BalanceResponse {
            address: address.to_string(),
            balance: balance_sui,
            balance_raw: balance.total_balance,
            coin_type: balance.coin_type,
            network: state.config.network.to_string(),
            timestamp: Utc::now(),
        },
    )
}

/// Generate a fresh Ed25519 wallet.
///
/// The private key is returned once and never stored or logged.
///
/// ## Endpoint
///
/// `POST /api/generate-wallet`
///
/// ## Response
///
/// ```json
/// {
///     "success": true,
///     "data": {
///         "address": "0x3b7a...c210",
///         "privateKey": "suiprivkey1qz...",
///         "network": "testnet",
///         "timestamp": "2025-01-15T12:00:00Z"
///     }
/// }
/// ```
pub async fn generate_wallet(req: HttpRequest, state: web::Data<Arc<AppState>>) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }

    let keypair = SuiKeypair::generate();
    let address = keypair.address();

    let private_key = match keypair.to_sui_private_key() {
        Ok(private_key) => private_key,
        Err(e) => return ledger_failure(&req, "Failed to encode wallet key", e.into()),
    };

    info!("🔑 Generated new wallet: {}", address);

    ok(
        &req,
        WalletResponse {
            address,
            private_key,
            network: state.config.network.to_string(),
            timestamp: Utc::now(),
        },
    )
}

/// Connection check: backend address, balance and contract IDs.
///
/// ## Endpoint
///
/// `GET /api/test`
pub async fn connection_test(req: HttpRequest, state: web::Data<Arc<AppState>>) -> HttpResponse {
    if let Err(response) = authorize(&req, &state) {
        return response;
    }

    let ledger_config = match state.config.ledger_config() {
        Ok(config) => config,
        Err(e) => return ledger_failure(&req, "Failed to initialize Sui client", e.into()),
    };

    let client = match SuiLoyaltyClient::new(&ledger_config) {
        Ok(client) => client,
        Err(e) => return ledger_failure(&req, "Failed to initialize Sui client", e),
    };

    let address = client.get_address();

    let balance = match client.get_balance().await {
        Ok(raw) => raw,
        Err(e) => return ledger_failure(&req, "Error in test handler", e),
    };

    let balance_sui = match balance_in_sui(&balance) {
        Ok(balance_sui) => balance_sui,
        Err(e) => return ledger_failure(&req, "Error in test handler", e),
    };

    ok(
        &req,
        ConnectionStatusResponse {
            network: ledger_config.network.to_string(),
            address,
            balance: format!("{} SUI", balance_sui),
            package_id: ledger_config.package_id,
            admin_cap_id: ledger_config.admin_cap_id,
            timestamp: Utc::now(),
        },
    )
}
