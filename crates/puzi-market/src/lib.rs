//! # puzi-market
//!
//! Escrow-backed peer-to-peer listings on top of [`puzi_ledger`].
//!
//! This crate provides:
//!
//! - [`Listing`] - the on-ledger listing record and its pricing
//! - [`MarketProgram`] - the market program: create, purchase, cancel
//! - [`instruction`] - message builders for each instruction
//! - [`Market`] - a client that signs, submits and queries
//! - [`quote`] - decimal scaling, cost quotes and deposit estimates
//!
//! Sold tokens are held by a holding account whose owner is the listing's
//! derived address, so only the program can release them. Every
//! instruction either applies in full or not at all.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod instruction;
mod instructions;
pub mod market;
pub mod processor;
pub mod quote;
pub mod state;

pub use config::{MARKET_PROGRAM_ID, MarketConfig};
pub use error::{ErrorKind, MarketError};
pub use instruction::{CreateListingArgs, MarketInstruction};
pub use market::{CreateListingParams, Market};
pub use processor::{
    CancelReceipt, InstructionOutcome, ListingCreated, MarketProgram, PurchaseReceipt,
    process_instruction,
};
pub use quote::{KnownMints, KnownToken, listing_deposit, price_from_ui, quote_purchase};
pub use state::{Listing, PriceBasis, total_cost};
