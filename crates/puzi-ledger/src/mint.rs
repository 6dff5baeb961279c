//! Mint descriptor lookups.

use puzi_core::Address;

use crate::account::AccountData;
use crate::context::TxContext;
use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Resolves an asset's decimal precision.
pub trait MintResolver {
    /// Decimal precision of `mint`.
    fn decimals(&self, mint: &Address) -> Result<u8, LedgerError>;
}

fn decimals_of(mint: &Address, data: &AccountData) -> Result<u8, LedgerError> {
    match data {
        AccountData::Mint { decimals, .. } => Ok(*decimals),
        _ => Err(LedgerError::NotAMint(*mint)),
    }
}

impl MintResolver for Ledger {
    fn decimals(&self, mint: &Address) -> Result<u8, LedgerError> {
        let account = self
            .account(mint)
            .ok_or(LedgerError::AccountNotFound(*mint))?;
        decimals_of(mint, &account.data)
    }
}

impl MintResolver for TxContext<'_> {
    fn decimals(&self, mint: &Address) -> Result<u8, LedgerError> {
        decimals_of(mint, &self.existing(mint)?.data)
    }
}
