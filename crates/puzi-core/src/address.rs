//! 32-byte ledger addresses.
//!
//! Wallet addresses are Ed25519 verifying keys. Derived addresses are
//! deliberately off the curve, so no signing key exists for them.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{Signature as DalekSignature, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::CoreError;

/// Length of an address in bytes.
pub const ADDRESS_BYTES: usize = 32;

/// The system program: owner of plain wallet accounts.
pub const SYSTEM_PROGRAM_ID: Address = Address::new([0u8; ADDRESS_BYTES]);

/// The token program: owner of mints and holding accounts.
pub const TOKEN_PROGRAM_ID: Address = Address::from_tag(b"puzi/token-program");

/// The associated token program: derives canonical holding account addresses.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Address = Address::from_tag(b"puzi/associated-token-program");

/// A ledger address (32 bytes, base58 in text form).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    /// Builds a fixed address from a short ASCII tag, zero padded.
    ///
    /// Tags longer than 32 bytes are truncated.
    #[must_use]
    pub const fn from_tag(tag: &[u8]) -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        let mut i = 0;
        while i < tag.len() && i < ADDRESS_BYTES {
            bytes[i] = tag[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Creates an address from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAddress`] if the slice is not 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let array: [u8; ADDRESS_BYTES] = bytes.try_into().map_err(|_| {
            CoreError::InvalidAddress(format!(
                "address must be {ADDRESS_BYTES} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// A random address, useful for ids that never sign.
    #[must_use]
    pub fn new_unique() -> Self {
        Self(rand::random())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// Returns a copy of the raw bytes.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    /// Whether these bytes decode to a valid Ed25519 point.
    ///
    /// Only on-curve addresses can ever produce signatures.
    #[must_use]
    pub fn is_on_curve(&self) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok()
    }

    /// Verifies `signature` over `message` against this address.
    ///
    /// Uses strict verification to reject malleable signatures.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSignature`] if the address is not a valid
    /// public key or the signature does not verify.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), CoreError> {
        let key = VerifyingKey::from_bytes(&self.0).map_err(|_| CoreError::InvalidSignature)?;
        key.verify_strict(message, &signature.0)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| CoreError::InvalidAddress(format!("invalid base58: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// An Ed25519 signature over a transaction message.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub(crate) DalekSignature);

impl Signature {
    /// Returns the raw 64 signature bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }

    /// Creates a signature from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; 64]) -> Self {
        Self(DalekSignature::from_bytes(bytes))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0.to_bytes()).into_string())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}
