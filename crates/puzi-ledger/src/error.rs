//! Error types for puzi-ledger.

use puzi_core::{Address, CoreError};
use thiserror::Error;

/// Errors raised while executing or reading ledger state.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(Address),

    /// An account was created at an address already in use.
    #[error("account already exists: {0}")]
    AccountAlreadyExists(Address),

    /// The handler touched an account missing from the message.
    #[error("account {0} was not declared by the transaction")]
    UndeclaredAccount(Address),

    /// The handler tried to mutate an account declared read-only.
    #[error("account {0} is declared read-only")]
    ReadonlyAccount(Address),

    /// A declared signer did not sign, or an authority check failed.
    #[error("missing required signature for {0}")]
    MissingSignature(Address),

    /// A signature did not verify against the message.
    #[error("invalid signature for {0}")]
    InvalidSignature(Address),

    /// Token balance too low for a transfer.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount required.
        required: u64,
        /// Amount held.
        available: u64,
    },

    /// Lamport balance too low to pay a deposit.
    #[error("insufficient lamports: required {required}, available {available}")]
    InsufficientLamports {
        /// Lamports required.
        required: u64,
        /// Lamports held.
        available: u64,
    },

    /// Token accounts are bound to different mints.
    #[error("mint mismatch: expected {expected}, found {found}")]
    MintMismatch {
        /// Mint the operation expected.
        expected: Address,
        /// Mint the account is bound to.
        found: Address,
    },

    /// Token account owner differs from the acting authority.
    #[error("owner mismatch: expected {expected}, found {found}")]
    OwnerMismatch {
        /// Owner the operation expected.
        expected: Address,
        /// Owner recorded on the account.
        found: Address,
    },

    /// The account is not a mint.
    #[error("account {0} is not a mint")]
    NotAMint(Address),

    /// The account is not a token holding account.
    #[error("account {0} is not a token account")]
    NotATokenAccount(Address),

    /// A token account with a balance cannot be closed.
    #[error("token account {address} still holds {amount}")]
    NonZeroBalance {
        /// Account that was being closed.
        address: Address,
        /// Remaining balance.
        amount: u64,
    },

    /// The executing program does not own the account it tried to change.
    #[error("account {0} is not owned by the executing program")]
    IllegalOwner(Address),

    /// Program data exceeds the space reserved for the account.
    #[error("data of {len} bytes exceeds reserved space of {space}")]
    DataTooLarge {
        /// Length of the data written.
        len: usize,
        /// Space reserved at creation.
        space: usize,
    },

    /// The transaction created or destroyed lamports.
    #[error("transaction is unbalanced: {before} lamports before, {after} after")]
    UnbalancedTransaction {
        /// Sum of lamports before execution.
        before: u128,
        /// Sum of lamports after execution.
        after: u128,
    },

    /// No matching implementation is registered for the message's program.
    #[error("no matching program registered for {0}")]
    UnknownProgram(Address),

    /// The program id is already bound to another implementation.
    #[error("program {0} is already registered")]
    ProgramAlreadyRegistered(Address),

    /// The submitted program runs under a different id than the message names.
    #[error("incorrect program id: message targets {expected}, program is {found}")]
    IncorrectProgramId {
        /// Program named by the message.
        expected: Address,
        /// Id of the program submitted.
        found: Address,
    },

    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,

    /// State could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Primitive-level failure.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl LedgerError {
    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_display() {
        let err = LedgerError::InsufficientFunds {
            required: 50,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "insufficient funds: required 50, available 10"
        );
    }

    #[test]
    fn core_errors_are_transparent() {
        let err: LedgerError = CoreError::NoViableBump.into();
        assert_eq!(err.to_string(), CoreError::NoViableBump.to_string());
    }
}
