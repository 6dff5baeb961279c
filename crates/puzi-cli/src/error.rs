//! CLI error types.

use puzi_core::CoreError;
use puzi_ledger::LedgerError;
use puzi_market::MarketError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Ledger state file could not be read or written.
    #[error("state error: {0}")]
    State(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// Key or amount handling failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Marketplace operation failed.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
