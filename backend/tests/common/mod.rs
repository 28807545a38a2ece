//! Shared helpers for the integration tests: configuration, a fixed
//! keypair and JSON-RPC mocks standing in for a Sui full node.

#![allow(dead_code)]

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use loyalty_badge_backend::config::{AppConfig, LedgerConfig, Network, DEFAULT_GAS_BUDGET};
use loyalty_badge_backend::sui::transaction::{
    parse_address, Address, Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind,
};
use loyalty_badge_backend::sui::SuiKeypair;

pub const API_KEY: &str = "test-api-secret";

const SECRET: [u8; 32] = [42u8; 32];

// ============================================================================
// FIXTURES
// ============================================================================

pub fn test_keypair() -> SuiKeypair {
    SuiKeypair::from_secret_bytes(&SECRET)
}

/// `0x` followed by 64 copies of `digit`.
pub fn object_id(digit: char) -> String {
    format!("0x{}", digit.to_string().repeat(64))
}

pub fn package_id() -> String {
    object_id('a')
}

pub fn admin_cap_id() -> String {
    object_id('c')
}

/// Fully configured app pointing at the given RPC endpoint.
pub fn test_config(rpc_url: &str) -> AppConfig {
    AppConfig {
        network: Network::Testnet,
        rpc_url: Some(rpc_url.to_string()),
        private_key: Some(
            test_keypair()
                .to_sui_private_key()
                .expect("test key encodes"),
        ),
        package_id: Some(package_id()),
        admin_cap_id: Some(admin_cap_id()),
        gas_budget: DEFAULT_GAS_BUDGET,
        api_secret_key: Some(API_KEY.to_string()),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
    }
}

pub fn test_ledger_config(rpc_url: &str) -> LedgerConfig {
    test_config(rpc_url)
        .ledger_config()
        .expect("test config is complete")
}

// ============================================================================
// RPC MOCKS
// ============================================================================

/// Respond to one JSON-RPC method with a result.
pub async fn mock_rpc_result(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result,
        })))
        .mount(server)
        .await;
}

/// Respond to one JSON-RPC method with an error object.
pub async fn mock_rpc_error(server: &MockServer, rpc_method: &str, code: i64, message: &str) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": code, "message": message },
        })))
        .mount(server)
        .await;
}

/// Fail the test if the node receives any request at all.
pub async fn expect_no_rpc_calls(server: &MockServer) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

pub fn address_bytes(address: &str) -> Address {
    parse_address(address).expect("valid address")
}

/// `unsafe_moveCall` result carrying the given transaction bytes.
pub fn move_call_result(tx_bytes: &[u8]) -> Value {
    json!({
        "txBytes": BASE64.encode(tx_bytes),
        "gas": [],
        "inputObjects": [],
    })
}

/// Transaction bytes a node would resolve a loyalty call into: one Move
/// call taking every input in order, sent and paid for by the test key.
pub fn resolved_call_bytes(function: &str, inputs: Vec<CallArg>) -> Vec<u8> {
    let sender = address_bytes(&test_keypair().address());
    let arguments = (0..inputs.len() as u16).map(Argument::Input).collect();

    TransactionData::V1(TransactionDataV1 {
        kind: TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
            inputs,
            commands: vec![Command::MoveCall(Box::new(ProgrammableMoveCall {
                package: address_bytes(&package_id()),
                module: "online_course_loyalty".to_string(),
                function: function.to_string(),
                type_arguments: vec![],
                arguments,
            }))],
        }),
        sender,
        gas_data: GasData {
            payment: vec![(address_bytes(&object_id('9')), 10, vec![0u8; 32])],
            owner: sender,
            price: 1_000,
            budget: DEFAULT_GAS_BUDGET,
        },
        expiration: TransactionExpiration::None,
    })
    .to_bytes()
    .expect("transaction encodes")
}

pub fn create_badge_bytes(student_name: &str, course_id: &str, student_address: &str) -> Vec<u8> {
    resolved_call_bytes(
        "create_badge",
        vec![
            CallArg::Pure(bcs::to_bytes(student_name).expect("string encodes")),
            CallArg::Pure(bcs::to_bytes(course_id).expect("string encodes")),
            CallArg::Pure(address_bytes(student_address).to_vec()),
        ],
    )
}

pub fn update_progress_bytes(badge_id: &str, progress: u8) -> Vec<u8> {
    resolved_call_bytes(
        "update_progress",
        vec![
            CallArg::Object(ObjectArg::ImmOrOwnedObject((
                address_bytes(&admin_cap_id()),
                3,
                vec![0u8; 32],
            ))),
            CallArg::Object(ObjectArg::SharedObject {
                id: address_bytes(badge_id),
                initial_shared_version: 4,
                mutable: true,
            }),
            CallArg::Pure(vec![progress]),
        ],
    )
}

/// Executed transaction with the given status and object changes.
pub fn execution_result(digest: &str, status: &str, object_changes: Value) -> Value {
    let error = match status {
        "success" => Value::Null,
        _ => json!("MoveAbort in 1st command"),
    };
    json!({
        "digest": digest,
        "effects": {
            "status": { "status": status, "error": error }
        },
        "objectChanges": object_changes,
    })
}

/// Object changes of a `create_badge` call that minted `badge_id`.
pub fn badge_created_changes(badge_id: &str) -> Value {
    json!([
        {
            "type": "mutated",
            "sender": test_keypair().address(),
            "objectType": "0x2::coin::Coin<0x2::sui::SUI>",
            "objectId": object_id('9'),
            "version": "11",
        },
        {
            "type": "created",
            "sender": test_keypair().address(),
            "objectType": format!("{}::online_course_loyalty::Badge", package_id()),
            "objectId": badge_id,
            "version": "11",
        }
    ])
}

/// `suix_getBalance` result.
pub fn balance_result(total: &str) -> Value {
    json!({
        "coinType": "0x2::sui::SUI",
        "coinObjectCount": 1,
        "totalBalance": total,
        "lockedBalance": {},
    })
}
