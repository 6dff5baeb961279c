//! Error types for puzi-core.

use thiserror::Error;

/// Errors that can occur in core primitive operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Address text or bytes could not be decoded.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Signature did not verify against the address.
    #[error("invalid signature")]
    InvalidSignature,

    /// Keypair bytes are malformed or inconsistent.
    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    /// A derivation seed exceeds [`crate::pda::MAX_SEED_LEN`].
    #[error("seed length {len} exceeds maximum of {max}")]
    SeedTooLong {
        /// Length of the offending seed.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// Too many seeds were supplied for a derivation.
    #[error("{count} seeds exceeds maximum of {max}")]
    TooManySeeds {
        /// Number of seeds supplied.
        count: usize,
        /// Maximum allowed number of seeds.
        max: usize,
    },

    /// The seeds and bump hash to a point on the Ed25519 curve.
    #[error("derived address lies on the ed25519 curve")]
    OnCurve,

    /// No bump in `0..=255` produced an off-curve address.
    #[error("unable to find a viable bump seed")]
    NoViableBump,

    /// Amount text could not be converted to raw units.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount(message.into())
    }
}
