//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`keygen`] - Keypair generation
//! - [`airdrop`] - Development faucet
//! - [`mint`] - Mint creation and issuance
//! - [`listing`] - Marketplace listings
//! - [`balance`] - Balance lookups

pub mod airdrop;
pub mod balance;
pub mod keygen;
pub mod listing;
pub mod mint;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use puzi_core::{Address, Keypair};
use puzi_ledger::{Ledger, MintResolver};
use puzi_market::{KnownMints, Market};

pub use airdrop::AirdropCommand;
pub use balance::BalanceCommand;
pub use keygen::KeygenCommand;
pub use listing::ListingCommand;
pub use mint::MintCommand;

use crate::cli::{Cli, Commands};
use crate::config::PuziConfig;
use crate::error::CliError;
use crate::output::OutputFormat;
use crate::store::LedgerStore;

/// A loaded ledger, the market client bound to it and the well-known mints.
#[derive(Debug)]
pub struct Session {
    store: LedgerStore,
    ledger: Arc<Ledger>,
    market: Market,
    known: KnownMints,
}

impl Session {
    /// Loads the ledger named by `config`.
    pub fn open(config: &PuziConfig) -> Result<Self, CliError> {
        let store = LedgerStore::new(&config.state_path);
        let ledger = Arc::new(store.load(config.rent)?);
        let market = Market::new(Arc::clone(&ledger), config.market())?;
        Ok(Self {
            store,
            ledger,
            market,
            known: KnownMints::builtin()?,
        })
    }

    /// The ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The market client.
    #[must_use]
    pub const fn market(&self) -> &Market {
        &self.market
    }

    /// Built-in token registry used for symbols.
    #[must_use]
    pub const fn known_mints(&self) -> &KnownMints {
        &self.known
    }

    /// Ticker symbol of `mint`, if it is well known.
    #[must_use]
    pub fn symbol(&self, mint: &Address) -> Option<String> {
        self.known.by_mint(mint).map(|t| t.symbol.to_string())
    }

    /// Decimals of `mint` from the ledger, falling back to the registry.
    pub fn decimals(&self, mint: &Address) -> Result<u8, CliError> {
        match self.ledger.decimals(mint) {
            Ok(decimals) => Ok(decimals),
            Err(e) => self.known.decimals(mint).map_err(|_| CliError::from(e)),
        }
    }

    /// Persists the ledger.
    pub fn save(&self) -> Result<(), CliError> {
        self.store.save(&self.ledger)
    }
}

/// Reads a keypair file, naming the file in any error.
pub fn load_keypair(path: &Path) -> Result<Keypair, CliError> {
    Keypair::read_from_file(path).map_err(|e| {
        CliError::InvalidArgument(format!("cannot load keypair {}: {e}", path.display()))
    })
}

/// Runs a parsed command line, writing results to `writer`.
pub fn run<W: Write>(cli: &Cli, writer: &mut W) -> Result<(), CliError> {
    let config = PuziConfig::resolve(cli)?;
    let format = OutputFormat::new(config.format);

    match &cli.command {
        Commands::Keygen { out, force } => {
            KeygenCommand::new(out, *force).execute(writer, &format)?;
        }
        Commands::Airdrop { address, lamports } => {
            let session = Session::open(&config)?;
            AirdropCommand::new(&session).execute(writer, &format, address, *lamports)?;
        }
        Commands::Mint { command } => {
            let session = Session::open(&config)?;
            MintCommand::new(&session).execute(writer, &format, command)?;
        }
        Commands::Listing { command } => {
            let session = Session::open(&config)?;
            ListingCommand::new(&session).execute(writer, &format, command)?;
        }
        Commands::Balance { owner, mint } => {
            let session = Session::open(&config)?;
            BalanceCommand::new(&session).execute(writer, &format, owner, mint.as_ref())?;
        }
    }

    Ok(())
}
