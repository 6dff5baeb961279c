//! Development faucet.

use std::io::Write;

use puzi_core::Address;

use super::Session;
use crate::error::CliError;
use crate::output::{BalanceInfo, OutputFormat};

/// Airdrop command executor.
pub struct AirdropCommand<'a> {
    session: &'a Session,
}

impl<'a> AirdropCommand<'a> {
    /// Create a new airdrop command.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Credit `lamports` to `address` and save the ledger.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        address: &Address,
        lamports: u64,
    ) -> Result<(), CliError> {
        let balance = self.session.ledger().airdrop(address, lamports)?;
        self.session.save()?;
        format.write(
            writer,
            &BalanceInfo {
                owner: *address,
                lamports: balance,
                token: None,
            },
        )
    }
}
