//! # Loyalty Badge Backend
//!
//! HTTP backend that mints and updates course loyalty badges on the Sui
//! ledger. It provides:
//!
//! - REST API for badge creation and progress updates
//! - Balance lookups and wallet generation
//! - A signing client holding one Ed25519 key
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      BACKEND SERVICE                       │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐ │
//! │  │                 REST API (Actix)                      │ │
//! │  │  API key check • CORS • validation • JSON envelope    │ │
//! │  └──────────────────────────────────────────────────────┘ │
//! │                           │                                │
//! │  ┌──────────────────────────────────────────────────────┐ │
//! │  │                   SERVICE LAYER                       │ │
//! │  │  SuiLoyaltyClient → TransactionBuilder/Submitter      │ │
//! │  └──────────────────────────────────────────────────────┘ │
//! │                           │                                │
//! │                    ┌──────┴──────┐                         │
//! │                    │  Sui JSON   │                         │
//! │                    │    RPC      │                         │
//! │                    └─────────────┘                         │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod services;
pub mod sui;
pub mod utils;

use config::AppConfig;

/// Application state shared across all handlers.
///
/// Only immutable configuration is shared; every request builds its
/// own ledger client from it.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}
