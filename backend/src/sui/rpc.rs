//! # Sui JSON-RPC Transport
//!
//! Thin typed wrapper over the Sui full node JSON-RPC API. Each method
//! maps one RPC call and is attempted exactly once.
//!
//! | Method | RPC |
//! |--------|-----|
//! | `unsafe_move_call` | `unsafe_moveCall` |
//! | `execute_transaction_block` | `sui_executeTransactionBlock` |
//! | `get_object` | `sui_getObject` |
//! | `get_balance` | `suix_getBalance` |

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Per-request HTTP timeout.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors returned by the RPC transport.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The HTTP request could not be sent or the body not read.
    #[error("Failed to reach Sui RPC at {url}: {message}")]
    Transport { url: String, message: String },

    /// The node answered with a JSON-RPC error object.
    #[error("Sui RPC error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The node answered with something we could not decode.
    #[error("Unexpected Sui RPC response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// JSON-RPC ENVELOPE
// ============================================================================

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

// ============================================================================
// RESPONSE STRUCTURES
// ============================================================================

/// Unsigned transaction produced by `unsafe_moveCall`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockBytes {
    /// BCS-encoded `TransactionData`, base64.
    pub tx_bytes: String,
}

/// Result of executing a transaction block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    #[serde(default)]
    pub object_changes: Option<Vec<ObjectChange>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionEffects {
    pub status: ExecutionStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionStatus {
    /// `"success"` or `"failure"`.
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionStatus {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// One entry of a transaction's object changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectChange {
    /// `created`, `mutated`, `deleted`, `published`, ...
    #[serde(rename = "type")]
    pub change_type: String,
    #[serde(default)]
    pub object_type: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
}

/// Balance of one coin type for an owner.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub coin_type: String,
    #[serde(default)]
    pub coin_object_count: u64,
    /// Integer amount in MIST, as a decimal string.
    pub total_balance: String,
}

/// `sui_getObject` response: either `data` or `error` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResponse {
    #[serde(default)]
    pub data: Option<ObjectData>,
    #[serde(default)]
    pub error: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: String,
    pub version: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
}

// ============================================================================
// CLIENT
// ============================================================================

/// JSON-RPC client for one Sui full node.
#[derive(Clone)]
pub struct SuiRpcClient {
    client: Client,
    url: String,
}

impl SuiRpcClient {
    /// Create a client for the given endpoint.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| RpcError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one JSON-RPC call and decode its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T, RpcError> {
        debug!("Sui RPC call {} -> {}", method, self.url);

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let transport_err = |e: reqwest::Error| RpcError::Transport {
            url: self.url.clone(),
            message: e.to_string(),
        };

        let response: JsonRpcResponse = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?
            .json()
            .await
            .map_err(transport_err)?;

        if let Some(error) = response.error {
            return Err(RpcError::Remote {
                code: error.code,
                message: error.message,
            });
        }

        let result = response
            .result
            .ok_or_else(|| RpcError::InvalidResponse(format!("{} returned no result", method)))?;

        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("{}: {}", method, e)))
    }

    /// Ask the node to resolve a Move call into unsigned transaction bytes.
    ///
    /// Gas payment is selected by the node from the signer's coins.
    pub async fn unsafe_move_call(
        &self,
        signer: &str,
        package_id: &str,
        module: &str,
        function: &str,
        arguments: Vec<Value>,
        gas_budget: u64,
    ) -> Result<TransactionBlockBytes, RpcError> {
        self.call(
            "unsafe_moveCall",
            vec![
                json!(signer),
                json!(package_id),
                json!(module),
                json!(function),
                json!([]),
                Value::Array(arguments),
                Value::Null,
                json!(gas_budget.to_string()),
            ],
        )
        .await
    }

    /// Execute a signed transaction and wait for local execution.
    pub async fn execute_transaction_block(
        &self,
        tx_bytes: &str,
        signature: &str,
        show_object_changes: bool,
    ) -> Result<TransactionBlockResponse, RpcError> {
        self.call(
            "sui_executeTransactionBlock",
            vec![
                json!(tx_bytes),
                json!([signature]),
                json!({
                    "showEffects": true,
                    "showObjectChanges": show_object_changes,
                }),
                json!("WaitForLocalExecution"),
            ],
        )
        .await
    }

    /// Fetch an object with its type, owner and content.
    pub async fn get_object(&self, object_id: &str) -> Result<ObjectResponse, RpcError> {
        self.call(
            "sui_getObject",
            vec![
                json!(object_id),
                json!({
                    "showType": true,
                    "showOwner": true,
                    "showContent": true,
                }),
            ],
        )
        .await
    }

    /// Fetch the SUI balance of an address.
    pub async fn get_balance(&self, owner: &str) -> Result<Balance, RpcError> {
        self.call("suix_getBalance", vec![json!(owner), Value::Null]).await
    }
}
