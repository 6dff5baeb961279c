//! Mint creation and issuance.

use std::io::Write;

use puzi_core::{Keypair, parse_ui_amount};
use puzi_ledger::MintResolver;

use super::{Session, load_keypair};
use crate::cli::MintCommands;
use crate::error::CliError;
use crate::output::{MintInfo, MintedInfo, OutputFormat, TokenAmount};

/// Mint command executor.
pub struct MintCommand<'a> {
    session: &'a Session,
}

impl<'a> MintCommand<'a> {
    /// Create a new mint command.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Execute a mint subcommand.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &MintCommands,
    ) -> Result<(), CliError> {
        let ledger = self.session.ledger();
        match command {
            MintCommands::Create {
                payer,
                decimals,
                out,
            } => {
                let payer = load_keypair(payer)?;
                let mint = Keypair::generate();
                ledger.create_mint(&payer, &mint, &payer.address(), *decimals)?;
                if let Some(out) = out {
                    mint.write_to_file(out)?;
                }
                self.session.save()?;
                format.write(
                    writer,
                    &MintInfo {
                        mint: mint.address(),
                        decimals: *decimals,
                        authority: payer.address(),
                    },
                )?;
            }
            MintCommands::To {
                authority,
                mint,
                owner,
                amount,
            } => {
                let authority = load_keypair(authority)?;
                let decimals = ledger.decimals(mint)?;
                let raw = parse_ui_amount(amount, decimals)?;
                let holding = ledger.mint_to(&authority, mint, owner, raw)?;
                self.session.save()?;
                format.write(
                    writer,
                    &MintedInfo {
                        mint: *mint,
                        owner: *owner,
                        holding,
                        amount: TokenAmount::new(raw, decimals),
                    },
                )?;
            }
        }
        Ok(())
    }
}
