//! # REST API Module
//!
//! This module defines all HTTP endpoints for the loyalty badge API.
//!
//! ## Endpoint Overview
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/api/create-badge` | Mint a badge |
//! | POST | `/api/update-progress` | Update badge progress |
//! | POST | `/api/get-badge` | Read a badge |
//! | POST | `/api/get-balance` | SUI balance of an address |
//! | POST | `/api/generate-wallet` | Generate a keypair |
//! | GET | `/api/test` | Connection check |
//! | GET | `/api/hello` | Liveness probe |
//!
//! ## Request/Response Format
//!
//! All requests and responses use JSON:
//!
//! ```json
//! // Success response
//! {
//!     "success": true,
//!     "data": { ... }
//! }
//!
//! // Error response
//! {
//!     "success": false,
//!     "error": "Human readable message"
//! }
//! ```
//!
//! ## Authentication
//!
//! Ledger endpoints require `x-api-key: <secret>` or
//! `Authorization: Bearer <secret>`.

pub mod cors;
pub mod handlers;
pub mod routes;

pub use routes::configure_routes;
