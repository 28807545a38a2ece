//! # Sui Client Module
//!
//! Low-level building blocks for talking to the Sui ledger.
//!
//! ## Responsibilities
//!
//! - Load and use the backend's Ed25519 signing key
//! - Derive Sui addresses
//! - Send JSON-RPC calls to a full node
//! - Decode the BCS transaction data the node resolves calls into
//!
//! ## Submission Flow
//!
//! ```text
//! 1. Move call (package, module, function, args)
//!              ↓
//! 2. unsafe_moveCall → unsigned tx bytes
//!              ↓
//! 3. TransactionData::from_bytes() → checked against the call
//!              ↓
//! 4. SuiKeypair::sign_transaction()
//!              ↓
//! 5. sui_executeTransactionBlock → digest, effects, object changes
//! ```

pub mod keypair;
pub mod rpc;
pub mod transaction;

pub use keypair::{KeypairError, SuiKeypair};
pub use rpc::{RpcError, SuiRpcClient};
