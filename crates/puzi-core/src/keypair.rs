//! Ed25519 keypairs for signing ledger transactions.

use std::fmt;
use std::path::Path;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;

use crate::address::{Address, Signature};
use crate::error::CoreError;

/// An Ed25519 keypair. Its address is the verifying key.
pub struct Keypair {
    signing_key: SigningKey,
    address: Address,
}

impl Keypair {
    /// Generates a new keypair from the operating system's CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Creates a keypair from a 32-byte secret.
    #[must_use]
    pub fn from_secret_bytes(secret: &[u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(secret))
    }

    /// Creates a keypair from 64 bytes (secret followed by public key).
    ///
    /// # Errors
    ///
    /// Returns error if the length is wrong or the public half does not
    /// match the secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() != 64 {
            return Err(CoreError::InvalidKeypair(format!(
                "keypair must be 64 bytes, got {}",
                bytes.len()
            )));
        }
        let secret: [u8; 32] = bytes[..32]
            .try_into()
            .map_err(|_| CoreError::InvalidKeypair("failed to read secret key".to_string()))?;
        let keypair = Self::from_secret_bytes(&secret);
        if keypair.address.as_bytes()[..] != bytes[32..] {
            return Err(CoreError::InvalidKeypair(
                "public key does not match secret key".to_string(),
            ));
        }
        Ok(keypair)
    }

    /// Returns the 64-byte encoding (secret followed by public key).
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 64] {
        self.signing_key.to_keypair_bytes()
    }

    /// Loads a keypair from a JSON byte-array file (Solana CLI layout).
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is malformed.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let contents = std::fs::read_to_string(path)?;
        let bytes: Vec<u8> = serde_json::from_str(&contents)?;
        Self::from_bytes(&bytes)
    }

    /// Writes the keypair as a JSON byte array.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let json = serde_json::to_string(&self.to_bytes().to_vec())?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The address (public key) of this keypair.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Signs a message.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = Address::new(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
