//! # Transaction Data
//!
//! BCS layout of the Sui `TransactionData` the node returns from
//! `unsafe_moveCall`. The backend decodes these bytes before signing so
//! it only ever signs the call it asked for.
//!
//! Only the shapes this backend signs are modelled: a V1 programmable
//! transaction made of Move calls. Any other kind, command or input
//! variant fails to decode and is never signed.

use serde::{Deserialize, Serialize};

/// Raw 32-byte address or object ID.
pub type Address = [u8; 32];

/// `(object_id, version, digest)`
pub type ObjectRef = (Address, u64, Vec<u8>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: Address,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// BCS bytes of a pure value.
    Pure(Vec<u8>),
    Object(ObjectArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: Address,
        initial_shared_version: u64,
        mutable: bool,
    },
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn object_id(&self) -> &Address {
        match self {
            ObjectArg::ImmOrOwnedObject((id, _, _)) | ObjectArg::Receiving((id, _, _)) => id,
            ObjectArg::SharedObject { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    pub package: Address,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    U16,
    U32,
    U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructTag {
    pub address: Address,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: Address,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    None,
    Epoch(u64),
}

impl TransactionData {
    /// Decode BCS transaction bytes. Trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bcs::Error> {
        bcs::from_bytes(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        bcs::to_bytes(self)
    }
}

/// Parse a `0x`-prefixed hex address into raw bytes.
///
/// Short forms are left-padded with zeros, as Sui does for `0x2`.
pub fn parse_address(address: &str) -> Option<Address> {
    let hex_part = address.strip_prefix("0x")?;
    if hex_part.is_empty() || hex_part.len() > 64 {
        return None;
    }

    let padded = format!("{:0>64}", hex_part);
    let bytes = hex::decode(padded).ok()?;
    bytes.try_into().ok()
}
