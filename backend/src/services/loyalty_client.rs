//! # Loyalty Client
//!
//! The SuiLoyaltyClient is the single entry point the HTTP layer uses to
//! touch the ledger. It owns the backend's keypair and a node handle.
//!
//! ## Operations
//!
//! | Operation | Network | Result |
//! |-----------|---------|--------|
//! | `get_address` | no | Address of the held key |
//! | `create_badge` | submit | Badge ID + digest |
//! | `update_progress` | submit | Digest |
//! | `get_badge` | read | Badge object |
//! | `get_balance` | read | Raw MIST balance |
//!
//! ## Flow Example: Create Badge
//!
//! ```text
//! 1. Validate student address (no network call on failure)
//!                ↓
//! 2. TransactionBuilder builds the create_badge Move call
//!                ↓
//! 3. TransactionSubmitter resolves it, checks the resolved
//!    transaction, signs and executes it
//!                ↓
//! 4. Check effects status
//!                ↓
//! 5. Find the created Badge in the object changes
//! ```

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::{ConfigError, LedgerConfig};
use crate::sui::rpc::{ObjectChange, TransactionBlockResponse};
use crate::sui::{KeypairError, RpcError, SuiKeypair, SuiRpcClient};
use crate::utils::is_valid_sui_address;

use super::transaction_builder::{TransactionBuilder, BADGE_TYPE_MARKER};
use super::transaction_submitter::TransactionSubmitter;

/// Highest allowed progress value.
pub const MAX_PROGRESS: i64 = 100;

/// Errors that can occur in ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The student address is not a Sui address.
    #[error("Invalid Sui address: {0}")]
    InvalidAddress(String),

    /// The badge ID is not a Sui object ID.
    #[error("Invalid badge ID: {0}")]
    InvalidBadgeId(String),

    /// Progress outside `[0, 100]`.
    #[error("Progress must be between 0 and 100 (got {0})")]
    InvalidProgress(i64),

    /// Required configuration is missing.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The configured key material could not be decoded.
    #[error(transparent)]
    Keypair(#[from] KeypairError),

    /// Talking to the node failed.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The node resolved a call into a transaction other than the one requested.
    #[error("Refusing to sign unexpected transaction: {0}")]
    UnexpectedTransaction(String),

    /// The transaction was executed but aborted on chain.
    #[error("Transaction {digest} failed: {reason}")]
    ExecutionFailed { digest: String, reason: String },

    /// The transaction succeeded but no Badge object was created.
    #[error("Could not extract badge ID from transaction result (digest {digest})")]
    BadgeNotCreated { digest: String },

    /// The requested object does not exist.
    #[error("Object not found: {0}")]
    ObjectNotFound(String),
}

impl LedgerError {
    /// Whether the error was caused by the caller's input rather than the ledger.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAddress(_)
                | LedgerError::InvalidBadgeId(_)
                | LedgerError::InvalidProgress(_)
        )
    }
}

/// A freshly minted badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBadge {
    pub badge_id: String,
    pub digest: String,
}

/// A badge object as stored on the ledger.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeObject {
    pub object_id: String,
    pub version: String,
    pub object_type: Option<String>,
    pub owner: Value,
    /// Move struct fields (student name, course, progress, ...).
    pub fields: Value,
}

/// Client for the loyalty contract.
///
/// ## Usage
///
/// ```rust,ignore
/// let client = SuiLoyaltyClient::new(&config.ledger_config()?)?;
/// let badge = client.create_badge("Ada", "RUST-101", &student).await?;
/// println!("Minted {} in {}", badge.badge_id, badge.digest);
/// ```
#[derive(Clone)]
pub struct SuiLoyaltyClient {
    rpc: SuiRpcClient,
    keypair: SuiKeypair,
    builder: TransactionBuilder,
    submitter: TransactionSubmitter,
}

impl SuiLoyaltyClient {
    /// Create a new client.
    ///
    /// ## Returns
    ///
    /// * `Ok(SuiLoyaltyClient)` - Key decoded and transport ready
    /// * `Err(LedgerError::Keypair)` - Malformed key material
    pub fn new(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let keypair = SuiKeypair::from_encoded(&config.private_key)?;
        let rpc = SuiRpcClient::new(&config.rpc_url())?;

        info!("Sui client initialized:");
        info!("  Network: {}", config.network);
        info!("  RPC: {}", rpc.url());
        info!("  Address: {}", keypair.address());

        Ok(Self {
            builder: TransactionBuilder::new(&config.package_id, &config.admin_cap_id),
            submitter: TransactionSubmitter::new(rpc.clone(), keypair.clone(), config.gas_budget),
            rpc,
            keypair,
        })
    }

    /// The address transactions are sent from.
    pub fn get_address(&self) -> String {
        self.keypair.address()
    }

    /// Mint a badge for a student.
    ///
    /// ## Arguments
    ///
    /// * `student_name` - Student display name
    /// * `course_id` - Course identifier
    /// * `student_address` - Recipient Sui address
    ///
    /// ## Returns
    ///
    /// * `Ok(CreatedBadge)` - Badge object ID and transaction digest
    /// * `Err(LedgerError::InvalidAddress)` - Rejected before any network call
    /// * `Err(LedgerError::BadgeNotCreated)` - Executed, but no Badge in the object changes
    pub async fn create_badge(
        &self,
        student_name: &str,
        course_id: &str,
        student_address: &str,
    ) -> Result<CreatedBadge, LedgerError> {
        if !is_valid_sui_address(student_address) {
            return Err(LedgerError::InvalidAddress(student_address.to_string()));
        }

        let call = self
            .builder
            .build_create_badge(student_name, course_id, student_address);

        let response = self
            .submitter
            .sign_and_submit(&call, true)
            .await
            .map_err(|e| {
                error!("Error creating badge: {}", e);
                e
            })?;
        ensure_success(&response)?;

        let badge_id = extract_badge_id(response.object_changes.as_deref().unwrap_or_default())
            .ok_or_else(|| LedgerError::BadgeNotCreated {
                digest: response.digest.clone(),
            })?;

        info!("🎖️  Badge {} created in {}", badge_id, response.digest);
        Ok(CreatedBadge {
            badge_id,
            digest: response.digest,
        })
    }

    /// Set a badge's progress percentage.
    ///
    /// ## Returns
    ///
    /// The transaction digest.
    pub async fn update_progress(&self, badge_id: &str, new_progress: i64) -> Result<String, LedgerError> {
        if !is_valid_sui_address(badge_id) {
            return Err(LedgerError::InvalidBadgeId(badge_id.to_string()));
        }

        let progress = u8::try_from(new_progress)
            .ok()
            .filter(|p| i64::from(*p) <= MAX_PROGRESS)
            .ok_or(LedgerError::InvalidProgress(new_progress))?;

        let call = self.builder.build_update_progress(badge_id, progress);

        let response = self
            .submitter
            .sign_and_submit(&call, false)
            .await
            .map_err(|e| {
                error!("Error updating progress: {}", e);
                e
            })?;
        ensure_success(&response)?;

        Ok(response.digest)
    }

    /// Fetch a badge object with its content and owner.
    pub async fn get_badge(&self, badge_id: &str) -> Result<BadgeObject, LedgerError> {
        if !is_valid_sui_address(badge_id) {
            return Err(LedgerError::InvalidBadgeId(badge_id.to_string()));
        }

        let response = self.rpc.get_object(badge_id).await.map_err(|e| {
            error!("Error getting badge: {}", e);
            LedgerError::from(e)
        })?;

        let data = match (response.data, response.error) {
            (Some(data), _) => data,
            (None, Some(err)) => {
                return Err(LedgerError::ObjectNotFound(format!("{} ({})", badge_id, err)))
            }
            (None, None) => return Err(LedgerError::ObjectNotFound(badge_id.to_string())),
        };

        let fields = data
            .content
            .as_ref()
            .and_then(|c| c.get("fields"))
            .cloned()
            .unwrap_or(Value::Null);

        Ok(BadgeObject {
            object_id: data.object_id,
            version: data.version,
            object_type: data.object_type,
            owner: data.owner.unwrap_or(Value::Null),
            fields,
        })
    }

    /// Balance of the client's own address, in MIST.
    pub async fn get_balance(&self) -> Result<String, LedgerError> {
        let balance = self.rpc.get_balance(&self.get_address()).await?;
        Ok(balance.total_balance)
    }
}

/// Fail if the transaction's effects report an abort.
fn ensure_success(response: &TransactionBlockResponse) -> Result<(), LedgerError> {
    match &response.effects {
        Some(effects) if !effects.status.is_success() => Err(LedgerError::ExecutionFailed {
            digest: response.digest.clone(),
            reason: effects
                .status
                .error
                .clone()
                .unwrap_or_else(|| effects.status.status.clone()),
        }),
        _ => Ok(()),
    }
}

/// Find the ID of the first created object whose type is the Badge.
pub fn extract_badge_id(changes: &[ObjectChange]) -> Option<String> {
    changes
        .iter()
        .find(|change| {
            change.change_type == "created"
                && change
                    .object_type
                    .as_deref()
                    .is_some_and(|t| t.contains(BADGE_TYPE_MARKER))
        })
        .and_then(|change| change.object_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(change_type: &str, object_type: &str, object_id: &str) -> ObjectChange {
        ObjectChange {
            change_type: change_type.to_string(),
            object_type: Some(object_type.to_string()),
            object_id: Some(object_id.to_string()),
        }
    }

    #[test]
    fn test_extract_badge_id_picks_created_badge() {
        let changes = vec![
            change("mutated", "0x2::coin::Coin<0x2::sui::SUI>", "0xgas"),
            change("mutated", "0xpkg::online_course_loyalty::Badge", "0xold"),
            change("created", "0xpkg::online_course_loyalty::Badge", "0xnew"),
            change("created", "0xpkg::online_course_loyalty::Badge", "0xsecond"),
        ];
        assert_eq!(extract_badge_id(&changes), Some("0xnew".to_string()));
    }

    #[test]
    fn test_extract_badge_id_none_when_no_badge() {
        let changes = vec![
            change("created", "0xpkg::other_module::Badge", "0xother"),
            change("mutated", "0x2::coin::Coin<0x2::sui::SUI>", "0xgas"),
        ];
        assert_eq!(extract_badge_id(&changes), None);
        assert_eq!(extract_badge_id(&[]), None);
    }

    #[test]
    fn test_ensure_success() {
        let mut response: TransactionBlockResponse = serde_json::from_value(serde_json::json!({
            "digest": "D1",
            "effects": { "status": { "status": "failure", "error": "MoveAbort(1)" } }
        }))
        .unwrap();
        let err = ensure_success(&response).unwrap_err();
        assert_eq!(err.to_string(), "Transaction D1 failed: MoveAbort(1)");

        response.effects = None;
        assert!(ensure_success(&response).is_ok());
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(LedgerError::InvalidAddress("x".into()).is_invalid_input());
        assert!(LedgerError::InvalidProgress(101).is_invalid_input());
        assert!(!LedgerError::BadgeNotCreated { digest: "d".into() }.is_invalid_input());
        assert!(!LedgerError::Config(ConfigError::MissingEnvVar("PACKAGE_ID".into())).is_invalid_input());
    }
}
