//! Balance lookups.

use std::io::Write;

use puzi_core::{Address, associated_token_address};

use super::Session;
use crate::error::CliError;
use crate::output::{BalanceInfo, OutputFormat, TokenAmount, TokenBalance};

/// Balance command executor.
pub struct BalanceCommand<'a> {
    session: &'a Session,
}

impl<'a> BalanceCommand<'a> {
    /// Create a new balance command.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Show `owner`'s lamports and, if `mint` is given, its holding balance.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        owner: &Address,
        mint: Option<&Address>,
    ) -> Result<(), CliError> {
        let ledger = self.session.ledger();
        let token = match mint {
            Some(mint) => {
                let decimals = self.session.decimals(mint)?;
                Some(TokenBalance {
                    mint: *mint,
                    symbol: self.session.symbol(mint),
                    holding: associated_token_address(owner, mint)?,
                    amount: TokenAmount::new(ledger.token_balance(owner, mint)?, decimals),
                })
            }
            None => None,
        };
        format.write(
            writer,
            &BalanceInfo {
                owner: *owner,
                lamports: ledger.balance(owner),
                token,
            },
        )
    }
}
