//! Messages, account declarations and signed transactions.

use std::collections::HashSet;

use puzi_core::{Address, Keypair, Signature};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One account a message touches and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// The account address.
    pub address: Address,
    /// Whether a signature from this address is required.
    pub is_signer: bool,
    /// Whether the transaction may mutate this account.
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    #[must_use]
    pub const fn new(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    #[must_use]
    pub const fn new_readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction for one program together with its declared account set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Program that executes the instruction.
    pub program_id: Address,
    /// Every account the instruction may read or write.
    pub accounts: Vec<AccountMeta>,
    /// Program-specific instruction payload.
    pub data: Vec<u8>,
}

impl Message {
    /// Create a message.
    #[must_use]
    pub fn new(program_id: Address, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }

    /// Canonical bytes that signers sign.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Addresses that must sign, without duplicates.
    pub fn signers(&self) -> Vec<Address> {
        let mut seen = HashSet::new();
        self.accounts
            .iter()
            .filter(|meta| meta.is_signer)
            .map(|meta| meta.address)
            .filter(|address| seen.insert(*address))
            .collect()
    }
}

/// A message plus the signatures of its signers.
#[derive(Debug, Clone)]
pub struct Transaction {
    /// The signed message.
    pub message: Message,
    /// Signatures keyed by signer address.
    pub signatures: Vec<(Address, Signature)>,
}

impl Transaction {
    /// Sign `message` with every keypair in `signers`.
    pub fn new(message: Message, signers: &[&Keypair]) -> Result<Self, LedgerError> {
        let bytes = message.to_bytes()?;
        let signatures = signers
            .iter()
            .map(|keypair| (keypair.address(), keypair.sign(&bytes)))
            .collect();
        Ok(Self {
            message,
            signatures,
        })
    }

    /// Checks that every declared signer produced a valid signature.
    ///
    /// Returns the set of verified signers. Signatures from addresses that
    /// are not declared signers grant nothing.
    pub fn verify(&self) -> Result<HashSet<Address>, LedgerError> {
        let bytes = self.message.to_bytes()?;
        let mut verified = HashSet::new();
        for signer in self.message.signers() {
            let (_, signature) = self
                .signatures
                .iter()
                .find(|(address, _)| *address == signer)
                .ok_or(LedgerError::MissingSignature(signer))?;
            signer
                .verify(&bytes, signature)
                .map_err(|_| LedgerError::InvalidSignature(signer))?;
            verified.insert(signer);
        }
        Ok(verified)
    }
}
