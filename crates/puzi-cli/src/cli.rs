//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use puzi_core::Address;
use serde::{Deserialize, Serialize};

/// Puzi - peer-to-peer token listings on a local ledger.
#[derive(Parser, Debug, Clone)]
#[command(name = "puzi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Ledger state file; overrides the config file.
    #[arg(short, long, env = "PUZI_STATE", global = true)]
    pub state: Option<PathBuf>,

    /// Config file (JSON).
    #[arg(short, long, env = "PUZI_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format; overrides the config file.
    #[arg(short, long, value_enum, env = "PUZI_FORMAT", global = true)]
    pub format: Option<Format>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a keypair file.
    Keygen {
        /// Where to write the keypair.
        #[arg(short, long)]
        out: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Credit lamports to an address (development faucet).
    Airdrop {
        /// Recipient.
        address: Address,

        /// Lamports to credit.
        lamports: u64,
    },

    /// Mint management commands.
    Mint {
        /// Mint subcommand to execute.
        #[command(subcommand)]
        command: MintCommands,
    },

    /// Listing commands.
    Listing {
        /// Listing subcommand to execute.
        #[command(subcommand)]
        command: ListingCommands,
    },

    /// Show lamport and token balances.
    Balance {
        /// Account owner.
        owner: Address,

        /// Also show the holding balance for this mint.
        #[arg(short, long)]
        mint: Option<Address>,
    },
}

/// Mint subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MintCommands {
    /// Create a new mint; the payer becomes its mint authority.
    Create {
        /// Keypair paying the deposit.
        #[arg(long)]
        payer: PathBuf,

        /// Decimal precision.
        #[arg(short, long, default_value_t = 0)]
        decimals: u8,

        /// Save the mint keypair here.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Mint tokens to an owner's holding account.
    To {
        /// Mint authority keypair.
        #[arg(long)]
        authority: PathBuf,

        /// Mint address.
        #[arg(long)]
        mint: Address,

        /// Recipient owner.
        #[arg(long)]
        owner: Address,

        /// Amount in display units (e.g. `1.5`).
        #[arg(long)]
        amount: String,
    },
}

/// Listing subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ListingCommands {
    /// Lock tokens in escrow and offer them for sale.
    Create(CreateListingArgs),

    /// Buy from a listing.
    Buy {
        /// Buyer keypair.
        #[arg(long)]
        buyer: PathBuf,

        /// Listing address.
        listing: Address,

        /// Amount of the sell asset, in display units.
        #[arg(long)]
        amount: String,
    },

    /// Show what buying from a listing would cost.
    Quote {
        /// Listing address.
        listing: Address,

        /// Amount of the sell asset, in display units.
        #[arg(long)]
        amount: String,
    },

    /// Cancel a listing and reclaim what is left.
    Cancel {
        /// Seller keypair.
        #[arg(long)]
        seller: PathBuf,

        /// Listing address.
        listing: Address,
    },

    /// Show one listing.
    Show {
        /// Listing address.
        listing: Address,
    },

    /// List listings.
    List {
        /// Only listings by this seller.
        #[arg(long)]
        seller: Option<Address>,

        /// Only listings selling this mint.
        #[arg(long)]
        mint: Option<Address>,

        /// Only listings with quantity left.
        #[arg(long)]
        active: bool,
    },
}

/// Arguments for `listing create`.
#[derive(Args, Debug, Clone)]
pub struct CreateListingArgs {
    /// Seller keypair.
    #[arg(long)]
    pub seller: PathBuf,

    /// Mint being sold.
    #[arg(long)]
    pub sell_mint: Address,

    /// Mint accepted as payment.
    #[arg(long)]
    pub buy_mint: Address,

    /// Amount to sell, in display units.
    #[arg(long)]
    pub amount: String,

    /// Price of one whole sell token, in buy-asset display units.
    #[arg(long)]
    pub price: String,

    /// Listing id; defaults to the current time in milliseconds.
    #[arg(long)]
    pub id: Option<u64>,
}
