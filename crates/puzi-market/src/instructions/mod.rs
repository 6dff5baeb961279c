//! Instruction handlers.
//!
//! Each handler validates every precondition against the transaction's
//! working copy before it moves anything. The ledger discards the copy on
//! any error, so a failed instruction leaves no trace.

pub(crate) mod cancel_listing;
pub(crate) mod create_listing;
pub(crate) mod purchase;

use puzi_core::{Address, LISTING_SEED, create_program_address};
use puzi_ledger::{TokenAccount, TxContext};

use crate::error::MarketError;
use crate::state::Listing;

/// Loads and authenticates the listing stored at `address`.
///
/// The account must be owned by the executing program and its record must
/// re-derive to `address`.
pub(crate) fn load_listing(ctx: &TxContext<'_>, address: &Address) -> Result<Listing, MarketError> {
    let account = ctx
        .account(address)?
        .ok_or(MarketError::ListingNotFound(*address))?;
    if account.owner != *ctx.program_id() {
        return Err(MarketError::InvalidListingAddress(*address));
    }
    let bytes = account
        .program_data()
        .ok_or(MarketError::InvalidListingAddress(*address))?;
    let listing = Listing::unpack(bytes)?;

    let derived = create_program_address(
        &[LISTING_SEED, listing.seller.as_ref(), &listing.id_seed()],
        listing.bump,
        ctx.program_id(),
    )
    .map_err(|_| MarketError::InvalidListingAddress(*address))?;
    if derived != *address {
        return Err(MarketError::InvalidListingAddress(*address));
    }
    Ok(listing)
}

/// Checks that `address` is a holding account for `mint` owned by `owner`.
pub(crate) fn check_holding(
    ctx: &TxContext<'_>,
    address: &Address,
    mint: &Address,
    owner: &Address,
) -> Result<TokenAccount, MarketError> {
    let holding = ctx
        .token_account(address)
        .map_err(|_| MarketError::InvalidTokenAccount(*address))?;
    if holding.mint != *mint || holding.owner != *owner {
        return Err(MarketError::InvalidTokenAccount(*address));
    }
    Ok(holding)
}

/// Registers the listing's derived address as an authority so it can move
/// its escrow.
pub(crate) fn sign_for_listing(ctx: &mut TxContext<'_>, listing: &Listing) -> Result<Address, MarketError> {
    Ok(ctx.sign_derived(
        &[LISTING_SEED, listing.seller.as_ref(), &listing.id_seed()],
        listing.bump,
    )?)
}
