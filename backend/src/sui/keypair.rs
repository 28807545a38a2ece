//! # Sui Keypair
//!
//! Ed25519 signing key handling for the Sui ledger:
//!
//! - Decode `suiprivkey1...` (bech32) and legacy base64 key material
//! - Derive the Sui address of the public key
//! - Sign transaction bytes under the transaction intent
//! - Generate fresh keypairs for the wallet endpoint
//!
//! ## Address Derivation
//!
//! ```text
//! address = "0x" + hex( blake2b_256( 0x00 || public_key ) )
//! ```
//!
//! ## Transaction Signature
//!
//! ```text
//! intent_msg = [0, 0, 0] || tx_bytes
//! signature  = base64( 0x00 || ed25519_sign( blake2b_256(intent_msg) ) || public_key )
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bech32::{FromBase32, ToBase32, Variant};
use blake2::{digest::consts::U32, Blake2b, Digest};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

/// Bech32 human-readable part of Sui private keys.
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

/// Signature scheme flag for Ed25519.
pub const ED25519_FLAG: u8 = 0x00;

/// Intent prefix for transaction data: scope TransactionData, version V0, app Sui.
const TRANSACTION_INTENT: [u8; 3] = [0, 0, 0];

type Blake2b256 = Blake2b<U32>;

/// Errors that can occur when loading a keypair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeypairError {
    /// The bech32 string could not be decoded.
    #[error("Invalid suiprivkey encoding: {0}")]
    Bech32(String),

    /// The base64 string could not be decoded.
    #[error("Invalid base64 private key: {0}")]
    Base64(String),

    /// The encoded key uses a scheme other than Ed25519.
    #[error("Unsupported key scheme flag: 0x{0:02x} (only Ed25519 is supported)")]
    UnsupportedScheme(u8),

    /// The decoded key has the wrong size.
    #[error("Invalid private key length: {0} bytes")]
    InvalidLength(usize),
}

/// An Ed25519 keypair used to sign Sui transactions.
#[derive(Clone)]
pub struct SuiKeypair {
    signing_key: SigningKey,
}

impl std::fmt::Debug for SuiKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuiKeypair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl SuiKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from raw 32-byte secret key material.
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(secret),
        }
    }

    /// Decode key material in either supported format.
    ///
    /// ## Formats
    ///
    /// | Format | Layout |
    /// |--------|--------|
    /// | `suiprivkey1...` | bech32 of `flag || secret(32)` |
    /// | base64, 32 bytes | `secret` |
    /// | base64, 33 bytes | `flag || secret` (Sui keystore) |
    /// | base64, 64 bytes | `secret || public` |
    pub fn from_encoded(encoded: &str) -> Result<Self, KeypairError> {
        let encoded = encoded.trim();
        if encoded.starts_with(SUI_PRIVATE_KEY_PREFIX) {
            Self::from_bech32(encoded)
        } else {
            Self::from_base64(encoded)
        }
    }

    fn from_bech32(encoded: &str) -> Result<Self, KeypairError> {
        let (hrp, data, _variant) =
            bech32::decode(encoded).map_err(|e| KeypairError::Bech32(e.to_string()))?;

        if hrp != SUI_PRIVATE_KEY_PREFIX {
            return Err(KeypairError::Bech32(format!("unexpected prefix '{}'", hrp)));
        }

        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| KeypairError::Bech32(e.to_string()))?;

        Self::from_flagged_bytes(&bytes)
    }

    fn from_base64(encoded: &str) -> Result<Self, KeypairError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| KeypairError::Base64(e.to_string()))?;

        match bytes.len() {
            32 => Ok(Self::from_secret_bytes(&to_secret(&bytes)?)),
            33 => Self::from_flagged_bytes(&bytes),
            64 => Ok(Self::from_secret_bytes(&to_secret(&bytes[..32])?)),
            len => Err(KeypairError::InvalidLength(len)),
        }
    }

    fn from_flagged_bytes(bytes: &[u8]) -> Result<Self, KeypairError> {
        match bytes.split_first() {
            Some((&ED25519_FLAG, secret)) => Ok(Self::from_secret_bytes(&to_secret(secret)?)),
            Some((&flag, _)) => Err(KeypairError::UnsupportedScheme(flag)),
            None => Err(KeypairError::InvalidLength(0)),
        }
    }

    /// Export the secret key as a `suiprivkey1...` string.
    pub fn to_sui_private_key(&self) -> Result<String, KeypairError> {
        let mut bytes = Vec::with_capacity(33);
        bytes.push(ED25519_FLAG);
        bytes.extend_from_slice(&self.signing_key.to_bytes());

        bech32::encode(SUI_PRIVATE_KEY_PREFIX, bytes.to_base32(), Variant::Bech32)
            .map_err(|e| KeypairError::Bech32(e.to_string()))
    }

    /// The Ed25519 public key.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// The Sui address of this keypair.
    pub fn address(&self) -> String {
        let mut hasher = Blake2b256::new();
        hasher.update([ED25519_FLAG]);
        hasher.update(self.public_key().as_bytes());
        format!("0x{}", hex::encode(hasher.finalize()))
    }

    /// Sign BCS transaction bytes and return the serialized Sui signature
    /// (base64 of `flag || signature || public_key`).
    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> String {
        let digest = intent_digest(tx_bytes);
        let signature = self.signing_key.sign(&digest);

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.public_key().as_bytes());
        BASE64.encode(serialized)
    }
}

/// Hash of the intent message that wraps the transaction bytes.
pub fn intent_digest(tx_bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(TRANSACTION_INTENT);
    hasher.update(tx_bytes);

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

fn to_secret(bytes: &[u8]) -> Result<[u8; 32], KeypairError> {
    bytes
        .try_into()
        .map_err(|_| KeypairError::InvalidLength(bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier};
    use crate::utils::is_valid_sui_address;

    const SECRET: [u8; 32] = [7u8; 32];

    #[test]
    fn test_address_is_well_formed() {
        let keypair = SuiKeypair::from_secret_bytes(&SECRET);
        let address = keypair.address();
        assert!(is_valid_sui_address(&address), "bad address {}", address);
        // Lowercase hex, stable for the same key
        assert_eq!(address, address.to_lowercase());
        assert_eq!(address, SuiKeypair::from_secret_bytes(&SECRET).address());
    }

    #[test]
    fn test_sui_private_key_round_trip() {
        let keypair = SuiKeypair::generate();
        let encoded = keypair.to_sui_private_key().unwrap();
        assert!(encoded.starts_with("suiprivkey1"));
        // flag + 32-byte secret in bech32: hrp, separator, 53 data chars, 6 checksum chars
        assert_eq!(encoded.len(), "suiprivkey1".len() + 53 + 6);

        let decoded = SuiKeypair::from_encoded(&encoded).unwrap();
        assert_eq!(decoded.address(), keypair.address());
    }

    #[test]
    fn test_legacy_base64_formats() {
        let expected = SuiKeypair::from_secret_bytes(&SECRET).address();

        let raw = BASE64.encode(SECRET);
        assert_eq!(SuiKeypair::from_encoded(&raw).unwrap().address(), expected);

        let mut flagged = vec![ED25519_FLAG];
        flagged.extend_from_slice(&SECRET);
        let flagged = BASE64.encode(flagged);
        assert_eq!(SuiKeypair::from_encoded(&flagged).unwrap().address(), expected);

        let mut full = SECRET.to_vec();
        full.extend_from_slice(SuiKeypair::from_secret_bytes(&SECRET).public_key().as_bytes());
        let full = BASE64.encode(full);
        assert_eq!(SuiKeypair::from_encoded(&full).unwrap().address(), expected);
    }

    #[test]
    fn test_malformed_key_material() {
        assert!(matches!(
            SuiKeypair::from_encoded("not base64 !!"),
            Err(KeypairError::Base64(_))
        ));
        assert_eq!(
            SuiKeypair::from_encoded(&BASE64.encode([1u8; 16])).unwrap_err(),
            KeypairError::InvalidLength(16)
        );
        assert!(matches!(
            SuiKeypair::from_encoded("suiprivkey1qqqqqq"),
            Err(KeypairError::Bech32(_))
        ));
    }

    #[test]
    fn test_rejects_non_ed25519_scheme() {
        let mut bytes = vec![0x01];
        bytes.extend_from_slice(&SECRET);
        let encoded = bech32::encode(SUI_PRIVATE_KEY_PREFIX, bytes.to_base32(), Variant::Bech32)
            .unwrap();
        assert_eq!(
            SuiKeypair::from_encoded(&encoded).unwrap_err(),
            KeypairError::UnsupportedScheme(0x01)
        );
    }

    #[test]
    fn test_signature_layout_and_validity() {
        let keypair = SuiKeypair::from_secret_bytes(&SECRET);
        let tx_bytes = b"transaction-bytes";

        let serialized = BASE64.decode(keypair.sign_transaction(tx_bytes)).unwrap();
        assert_eq!(serialized.len(), 97);
        assert_eq!(serialized[0], ED25519_FLAG);
        assert_eq!(&serialized[65..], keypair.public_key().as_bytes());

        let signature = Signature::from_slice(&serialized[1..65]).unwrap();
        assert!(keypair
            .public_key()
            .verify(&intent_digest(tx_bytes), &signature)
            .is_ok());
    }
}
