//! Error types for puzi-market.

use puzi_core::{Address, CoreError};
use puzi_ledger::LedgerError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse error category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The listing does not exist.
    NotFound,
    /// The caller may not perform the operation.
    Unauthorized,
    /// Zero or malformed amount or price.
    InvalidAmount,
    /// Purchase exceeds the remaining quantity.
    InsufficientStock,
    /// A balance is too low.
    InsufficientFunds,
    /// Amount times price does not fit.
    Overflow,
    /// A listing already exists at the derived address.
    DuplicateListing,
    /// A supplied account is not the one the operation requires.
    InvalidAccount,
    /// Anything else surfaced by the ledger.
    Internal,
}

/// Errors that can occur in marketplace operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// No listing at the given address.
    #[error("listing not found: {0}")]
    ListingNotFound(Address),

    /// Caller is not allowed to act on the listing.
    #[error("unauthorized: {0} may not perform this operation")]
    Unauthorized(Address),

    /// Amount is zero or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Price is zero.
    #[error("invalid price: price per unit must be greater than zero")]
    InvalidPrice,

    /// Purchase asks for more than the listing holds.
    #[error("insufficient stock: requested {requested}, remaining {remaining}")]
    InsufficientStock {
        /// Raw units requested.
        requested: u64,
        /// Raw units still listed.
        remaining: u64,
    },

    /// A party cannot cover a transfer or deposit.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Amount required.
        required: u64,
        /// Amount available.
        available: u64,
    },

    /// Cost computation exceeded the u64 range.
    #[error("arithmetic overflow computing purchase cost")]
    Overflow,

    /// A listing already exists for this seller and id.
    #[error("listing already exists at {0}")]
    DuplicateListing(Address),

    /// Sell and buy assets are the same mint.
    #[error("sell and buy asset are the same mint: {0}")]
    SameAsset(Address),

    /// A holding account has the wrong mint or owner, or is missing.
    #[error("invalid token account: {0}")]
    InvalidTokenAccount(Address),

    /// An account claimed to be a listing is not one.
    #[error("invalid listing address: {0}")]
    InvalidListingAddress(Address),

    /// Instruction data or account list is malformed.
    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),

    /// Listing record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Other ledger failure.
    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl MarketError {
    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount(message.into())
    }

    /// Create an invalid instruction error.
    #[must_use]
    pub fn invalid_instruction(message: impl Into<String>) -> Self {
        Self::InvalidInstruction(message.into())
    }

    /// The category this error belongs to.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ListingNotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::InvalidAmount(_) | Self::InvalidPrice => ErrorKind::InvalidAmount,
            Self::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::Overflow => ErrorKind::Overflow,
            Self::DuplicateListing(_) => ErrorKind::DuplicateListing,
            Self::SameAsset(_) | Self::InvalidTokenAccount(_) | Self::InvalidListingAddress(_) => {
                ErrorKind::InvalidAccount
            }
            Self::InvalidInstruction(_) | Self::Serialization(_) => ErrorKind::Internal,
            Self::Ledger(e) => match e {
                LedgerError::MissingSignature(_)
                | LedgerError::InvalidSignature(_)
                | LedgerError::UnknownProgram(_)
                | LedgerError::ProgramAlreadyRegistered(_)
                | LedgerError::IncorrectProgramId { .. } => ErrorKind::Unauthorized,
                LedgerError::AccountNotFound(_)
                | LedgerError::UndeclaredAccount(_)
                | LedgerError::ReadonlyAccount(_)
                | LedgerError::MintMismatch { .. }
                | LedgerError::OwnerMismatch { .. }
                | LedgerError::NotAMint(_)
                | LedgerError::NotATokenAccount(_) => ErrorKind::InvalidAccount,
                _ => ErrorKind::Internal,
            },
        }
    }
}

impl From<LedgerError> for MarketError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::InsufficientFunds {
                required,
                available,
            }
            | LedgerError::InsufficientLamports {
                required,
                available,
            } => Self::InsufficientFunds {
                required,
                available,
            },
            LedgerError::Overflow => Self::Overflow,
            LedgerError::Core(CoreError::InvalidAmount(message)) => Self::InvalidAmount(message),
            other => Self::Ledger(other),
        }
    }
}

impl From<CoreError> for MarketError {
    fn from(e: CoreError) -> Self {
        LedgerError::Core(e).into()
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
