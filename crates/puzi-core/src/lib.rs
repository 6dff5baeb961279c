//! # puzi-core
//!
//! Primitives shared by the Puzi ledger and marketplace.
//!
//! This crate provides:
//!
//! - [`Address`] - 32-byte ledger addresses, base58 in text form
//! - [`Keypair`] - Ed25519 signing keys and keyfile IO
//! - [`find_program_address`] - program-derived addresses with bump search
//! - [`derive_listing_address`] / [`derive_escrow_address`] - marketplace addresses
//! - [`parse_ui_amount`] / [`format_ui_amount`] - raw-unit conversion

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod amount;
pub mod error;
pub mod keypair;
pub mod pda;

pub use address::{
    ADDRESS_BYTES, ASSOCIATED_TOKEN_PROGRAM_ID, Address, SYSTEM_PROGRAM_ID, Signature,
    TOKEN_PROGRAM_ID,
};
pub use amount::{MAX_DECIMALS, format_ui_amount, parse_ui_amount, units_per_token};
pub use error::CoreError;
pub use keypair::Keypair;
pub use pda::{
    LISTING_SEED, MAX_SEED_LEN, MAX_SEEDS, associated_token_address, create_program_address,
    derive_escrow_address, derive_listing_address, find_program_address,
};
