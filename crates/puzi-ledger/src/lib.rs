//! # puzi-ledger
//!
//! In-process account ledger that the Puzi marketplace runs on.
//!
//! This crate provides:
//!
//! - [`Ledger`] - committed state, per-account locking and atomic execution
//! - [`Program`] - code registered to run the transactions addressed to its id
//! - [`TxContext`] - the working copy a program mutates
//! - [`Transaction`] / [`Message`] - signed, declared account sets
//! - The token program: mints, holding accounts and transfers
//! - [`MintResolver`] - decimal precision lookups
//! - [`Rent`] - refundable storage deposits

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod account;
pub mod context;
pub mod error;
pub mod ledger;
mod locks;
pub mod mint;
pub mod program;
pub mod rent;
pub mod token;
pub mod transaction;

pub use account::{Account, AccountData, MINT_SPACE, TOKEN_ACCOUNT_SPACE};
pub use context::TxContext;
pub use error::LedgerError;
pub use ledger::{Ledger, LedgerSnapshot};
pub use mint::MintResolver;
pub use program::{Program, TokenProgram};
pub use rent::Rent;
pub use token::{TokenAccount, TokenInstruction, process_token_instruction};
pub use transaction::{AccountMeta, Message, Transaction};
