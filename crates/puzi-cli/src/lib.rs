//! # puzi-cli
//!
//! Puzi command-line interface.
//!
//! Provides commands for:
//! - Keypair generation and a lamport faucet
//! - Mint creation and issuance
//! - Creating, buying from, cancelling and browsing listings
//! - Balance lookups
//!
//! # Architecture
//!
//! Every invocation loads a JSON ledger snapshot, runs one command against
//! an in-process [`puzi_ledger::Ledger`] and writes the snapshot back if
//! the command changed anything.
//!
//! ```text
//! ┌───────────┐   load / save   ┌──────────────────┐
//! │  puzi-cli │◄───────────────►│ puzi-ledger.json │
//! └───────────┘                 └──────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod store;

pub use cli::{Cli, Commands, Format, ListingCommands, MintCommands};
pub use commands::{Session, run};
pub use config::PuziConfig;
pub use error::CliError;
pub use output::OutputFormat;
pub use store::LedgerStore;
