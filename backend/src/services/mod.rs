//! # Services Module
//!
//! This module contains the ledger-facing business logic of the
//! backend.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `SuiLoyaltyClient` | Badge creation, progress updates, lookups |
//! | `TransactionBuilder` | Building loyalty contract Move calls |
//! | `TransactionSubmitter` | Signing and executing transactions |
//!
//! ## Service Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   SuiLoyaltyClient                    │
//! │  • create_badge()   • update_progress()               │
//! │  • get_badge()      • get_balance()   • get_address() │
//! └──────────────────────────────────────────────────────┘
//!              │                         │
//!              ▼                         ▼
//!     ┌────────────────┐       ┌──────────────────────┐
//!     │  Transaction   │       │     Transaction      │
//!     │    Builder     │       │      Submitter       │
//!     │ Build Move     │       │ Resolve, sign and    │
//!     │ calls          │       │ execute via RPC      │
//!     └────────────────┘       └──────────────────────┘
//! ```

pub mod loyalty_client;
pub mod transaction_builder;
pub mod transaction_submitter;

pub use loyalty_client::{BadgeObject, CreatedBadge, LedgerError, SuiLoyaltyClient};
pub use transaction_builder::{MoveArg, MoveCall, TransactionBuilder};
pub use transaction_submitter::TransactionSubmitter;
