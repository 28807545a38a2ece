//! # Transaction Submitter Service
//!
//! This service turns a [`MoveCall`] into an executed transaction:
//! the node resolves the call into transaction bytes, the backend checks
//! those bytes against the call it asked for, signs them, and executes
//! the signed transaction.
//!
//! ## What Gets Checked Before Signing
//!
//! - Sender and gas owner are the backend's own address
//! - Gas budget does not exceed the configured budget
//! - Exactly one command: the requested Move call, no type arguments
//! - Every call argument is an input carrying the requested value
//! - No inputs beyond the call's own arguments

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, info, warn};

use crate::sui::rpc::TransactionBlockResponse;
use crate::sui::transaction::{
    parse_address, Argument, Command, TransactionData, TransactionKind,
};
use crate::sui::{SuiKeypair, SuiRpcClient};

use super::loyalty_client::LedgerError;
use super::transaction_builder::MoveCall;

/// Signs and submits transactions with one keypair.
#[derive(Clone)]
pub struct TransactionSubmitter {
    rpc: SuiRpcClient,
    keypair: SuiKeypair,
    gas_budget: u64,
}

impl TransactionSubmitter {
    pub fn new(rpc: SuiRpcClient, keypair: SuiKeypair, gas_budget: u64) -> Self {
        Self {
            rpc,
            keypair,
            gas_budget,
        }
    }

    /// Resolve, verify, sign and execute a Move call.
    ///
    /// ## Arguments
    ///
    /// * `call` - The Move call to execute
    /// * `show_object_changes` - Request the object change list in the result
    ///
    /// ## Returns
    ///
    /// The execution response. A response whose effects report failure is
    /// still returned here; interpreting it is up to the caller.
    ///
    /// ## Errors
    ///
    /// `LedgerError::UnexpectedTransaction` if the node resolved the call
    /// into anything other than what was requested. Nothing is signed then.
    pub async fn sign_and_submit(
        &self,
        call: &MoveCall,
        show_object_changes: bool,
    ) -> Result<TransactionBlockResponse, LedgerError> {
        let sender = self.keypair.address();
        info!("Submitting {} from {}", call.target(), sender);

        let unsigned = self
            .rpc
            .unsafe_move_call(
                &sender,
                &call.package_id,
                call.module,
                call.function,
                call.json_arguments(),
                self.gas_budget,
            )
            .await?;

        let tx_bytes = BASE64.decode(&unsigned.tx_bytes).map_err(|e| {
            LedgerError::UnexpectedTransaction(format!("txBytes is not base64: {}", e))
        })?;
        debug!("Resolved {} into {} transaction bytes", call.target(), tx_bytes.len());

        if let Err(e) = self.verify(call, &tx_bytes) {
            warn!("Refusing to sign {}: {}", call.target(), e);
            return Err(e);
        }

        let signature = self.keypair.sign_transaction(&tx_bytes);

        let response = self
            .rpc
            .execute_transaction_block(&unsigned.tx_bytes, &signature, show_object_changes)
            .await?;

        info!("✅ Transaction executed: {}", response.digest);
        Ok(response)
    }

    /// Check resolved transaction bytes against the requested call.
    pub fn verify(&self, call: &MoveCall, tx_bytes: &[u8]) -> Result<(), LedgerError> {
        let mismatch = |reason: String| Err(LedgerError::UnexpectedTransaction(reason));

        let TransactionData::V1(data) = TransactionData::from_bytes(tx_bytes)
            .map_err(|e| LedgerError::UnexpectedTransaction(format!("undecodable transaction: {}", e)))?;

        let sender = self.keypair.address();
        if parse_address(&sender) != Some(data.sender) {
            return mismatch("sender is not the backend address".to_string());
        }
        if data.gas_data.owner != data.sender {
            return mismatch("gas is not paid by the sender".to_string());
        }
        if data.gas_data.budget > self.gas_budget {
            return mismatch(format!(
                "gas budget {} exceeds configured {}",
                data.gas_data.budget, self.gas_budget
            ));
        }

        let TransactionKind::ProgrammableTransaction(ptb) = data.kind;
        let move_call = match ptb.commands.as_slice() {
            [Command::MoveCall(move_call)] => move_call,
            _ => return mismatch(format!("expected 1 command, got {}", ptb.commands.len())),
        };

        if parse_address(&call.package_id) != Some(move_call.package)
            || move_call.module != call.module
            || move_call.function != call.function
        {
            return mismatch(format!(
                "call targets {}::{}::{}",
                hex::encode(move_call.package),
                move_call.module,
                move_call.function
            ));
        }
        if !move_call.type_arguments.is_empty() {
            return mismatch("unexpected type arguments".to_string());
        }
        if move_call.arguments.len() != call.arguments.len()
            || ptb.inputs.len() != call.arguments.len()
        {
            return mismatch(format!(
                "expected {} arguments, got {} arguments and {} inputs",
                call.arguments.len(),
                move_call.arguments.len(),
                ptb.inputs.len()
            ));
        }

        for (position, (expected, actual)) in
            call.arguments.iter().zip(&move_call.arguments).enumerate()
        {
            let input = match actual {
                Argument::Input(index) => ptb.inputs.get(usize::from(*index)),
                _ => None,
            };
            if !input.is_some_and(|input| expected.matches(input)) {
                return mismatch(format!("argument {} does not carry the requested value", position));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::transaction_builder::TransactionBuilder;
    use crate::sui::transaction::{
        CallArg, GasData, ObjectArg, ProgrammableMoveCall, ProgrammableTransaction,
        TransactionDataV1, TransactionExpiration,
    };

    const BUDGET: u64 = 10_000_000;

    fn id(byte: u8) -> String {
        format!("0x{}", hex::encode([byte; 32]))
    }

    fn submitter() -> TransactionSubmitter {
        TransactionSubmitter::new(
            SuiRpcClient::new("http://127.0.0.1:1").unwrap(),
            SuiKeypair::from_secret_bytes(&[1u8; 32]),
            BUDGET,
        )
    }

    fn sender() -> [u8; 32] {
        parse_address(&submitter().keypair.address()).unwrap()
    }

    fn update_call() -> MoveCall {
        TransactionBuilder::new(&id(0xaa), &id(0xcc)).build_update_progress(&id(0xbb), 50)
    }

    /// What a node would return for the update_progress call.
    fn resolved(mutate: impl FnOnce(&mut TransactionDataV1)) -> Vec<u8> {
        let mut data = TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
                inputs: vec![
                    CallArg::Object(ObjectArg::ImmOrOwnedObject(([0xcc; 32], 3, vec![0; 32]))),
                    CallArg::Object(ObjectArg::SharedObject {
                        id: [0xbb; 32],
                        initial_shared_version: 5,
                        mutable: true,
                    }),
                    CallArg::Pure(vec![50]),
                ],
                commands: vec![Command::MoveCall(Box::new(ProgrammableMoveCall {
                    package: [0xaa; 32],
                    module: "online_course_loyalty".to_string(),
                    function: "update_progress".to_string(),
                    type_arguments: vec![],
                    arguments: vec![Argument::Input(0), Argument::Input(1), Argument::Input(2)],
                }))],
            }),
            sender: sender(),
            gas_data: GasData {
                payment: vec![([0x99; 32], 8, vec![0; 32])],
                owner: sender(),
                price: 750,
                budget: BUDGET,
            },
            expiration: TransactionExpiration::None,
        };
        mutate(&mut data);
        TransactionData::V1(data).to_bytes().unwrap()
    }

    fn move_call(data: &mut TransactionDataV1) -> &mut ProgrammableMoveCall {
        let TransactionKind::ProgrammableTransaction(ptb) = &mut data.kind;
        let Command::MoveCall(call) = &mut ptb.commands[0];
        call
    }

    fn inputs(data: &mut TransactionDataV1) -> &mut Vec<CallArg> {
        let TransactionKind::ProgrammableTransaction(ptb) = &mut data.kind;
        &mut ptb.inputs
    }

    fn assert_rejected(bytes: &[u8]) {
        let err = submitter().verify(&update_call(), bytes).unwrap_err();
        assert!(matches!(err, LedgerError::UnexpectedTransaction(_)), "{:?}", err);
    }

    #[test]
    fn test_accepts_requested_call() {
        submitter().verify(&update_call(), &resolved(|_| {})).unwrap();
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        assert_rejected(b"unsigned-transaction-data");
    }

    #[test]
    fn test_rejects_foreign_sender_or_gas_owner() {
        assert_rejected(&resolved(|d| d.sender = [7; 32]));
        assert_rejected(&resolved(|d| d.gas_data.owner = [7; 32]));
    }

    #[test]
    fn test_rejects_inflated_gas_budget() {
        assert_rejected(&resolved(|d| d.gas_data.budget = BUDGET + 1));
    }

    #[test]
    fn test_rejects_other_target() {
        assert_rejected(&resolved(|d| move_call(d).package = [0x01; 32]));
        assert_rejected(&resolved(|d| move_call(d).function = "create_badge".to_string()));
        assert_rejected(&resolved(|d| move_call(d).module = "coin".to_string()));
    }

    #[test]
    fn test_rejects_extra_command() {
        assert_rejected(&resolved(|d| {
            let extra = Command::MoveCall(Box::new(move_call(d).clone()));
            let TransactionKind::ProgrammableTransaction(ptb) = &mut d.kind;
            ptb.commands.push(extra);
        }));
    }

    #[test]
    fn test_rejects_changed_arguments() {
        assert_rejected(&resolved(|d| inputs(d)[2] = CallArg::Pure(vec![100])));
        assert_rejected(&resolved(|d| {
            inputs(d)[1] = CallArg::Object(ObjectArg::SharedObject {
                id: [0xdd; 32],
                initial_shared_version: 5,
                mutable: true,
            })
        }));
        assert_rejected(&resolved(|d| move_call(d).arguments[2] = Argument::GasCoin));
        assert_rejected(&resolved(|d| inputs(d).push(CallArg::Pure(vec![1]))));
    }
}
