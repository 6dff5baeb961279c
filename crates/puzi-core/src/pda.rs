//! Program-derived addresses.
//!
//! A derived address is a blake3 hash of length-prefixed seeds, a bump byte,
//! the deriving program id and a fixed domain marker. The bump is searched
//! downward from 255 until the hash is not a valid Ed25519 point, so no
//! signing key can exist for the result. Only the deriving program can act
//! for such an address, by presenting the same seeds.

use crate::address::{ASSOCIATED_TOKEN_PROGRAM_ID, Address, TOKEN_PROGRAM_ID};
use crate::error::CoreError;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds in one derivation (the bump is extra).
pub const MAX_SEEDS: usize = 16;

const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Computes the derived address for `seeds` with a known `bump`.
///
/// # Errors
///
/// Returns [`CoreError::OnCurve`] if the hash lands on the curve, or a seed
/// limit error for oversized input.
pub fn create_program_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address, CoreError> {
    if seeds.len() > MAX_SEEDS {
        return Err(CoreError::TooManySeeds {
            count: seeds.len(),
            max: MAX_SEEDS,
        });
    }

    let mut hasher = blake3::Hasher::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(CoreError::SeedTooLong {
                len: seed.len(),
                max: MAX_SEED_LEN,
            });
        }
        hasher.update(&[seed.len() as u8]);
        hasher.update(seed);
    }
    hasher.update(&[bump]);
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);

    let address = Address::new(*hasher.finalize().as_bytes());
    if address.is_on_curve() {
        return Err(CoreError::OnCurve);
    }
    Ok(address)
}

/// Finds the canonical (highest-bump) derived address for `seeds`.
///
/// # Errors
///
/// Returns [`CoreError::NoViableBump`] if every bump lands on the curve.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), CoreError> {
    for bump in (0..=u8::MAX).rev() {
        match create_program_address(seeds, bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(CoreError::OnCurve) => {}
            Err(e) => return Err(e),
        }
    }
    Err(CoreError::NoViableBump)
}

/// The canonical holding account for `owner`'s balance of `mint`.
///
/// Works for wallet owners and derived owners alike.
///
/// # Errors
///
/// Returns [`CoreError::NoViableBump`] in the (astronomically unlikely) case
/// that no bump yields an off-curve address.
pub fn associated_token_address(owner: &Address, mint: &Address) -> Result<Address, CoreError> {
    let (address, _) = find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )?;
    Ok(address)
}

/// Seed prefix of listing record addresses.
pub const LISTING_SEED: &[u8] = b"listing";

/// Address of the listing record for `(seller, listing_id)` under
/// `program_id`, with its bump.
///
/// Seeds are `["listing", seller, listing_id as little-endian bytes]`.
pub fn derive_listing_address(
    seller: &Address,
    listing_id: u64,
    program_id: &Address,
) -> Result<(Address, u8), CoreError> {
    find_program_address(
        &[LISTING_SEED, seller.as_ref(), &listing_id.to_le_bytes()],
        program_id,
    )
}

/// Address of `owner`'s holding account for `asset`.
///
/// For a listing this is its escrow; for a wallet it is its canonical
/// token account.
pub fn derive_escrow_address(owner: &Address, asset: &Address) -> Result<Address, CoreError> {
    associated_token_address(owner, asset)
}
