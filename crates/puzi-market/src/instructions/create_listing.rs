use puzi_core::{Address, derive_escrow_address, derive_listing_address};
use puzi_ledger::{MintResolver, TOKEN_ACCOUNT_SPACE, TxContext};
use tracing::info;

use super::check_holding;
use crate::error::MarketError;
use crate::instruction::key;
use crate::processor::ListingCreated;
use crate::state::{Listing, PriceBasis};

pub(crate) fn process(
    ctx: &mut TxContext<'_>,
    keys: &[Address],
    listing_id: u64,
    amount: u64,
    price_per_unit: u64,
    price_basis: PriceBasis,
) -> Result<ListingCreated, MarketError> {
    let seller = key(keys, 0)?;
    let listing_address = key(keys, 1)?;
    let escrow = key(keys, 2)?;
    let seller_holding = key(keys, 3)?;
    let sell_asset = key(keys, 4)?;
    let buy_asset = key(keys, 5)?;

    if !ctx.is_signer(&seller) {
        return Err(MarketError::Unauthorized(seller));
    }
    if amount == 0 {
        return Err(MarketError::invalid_amount("listing amount must be greater than zero"));
    }
    if price_per_unit == 0 {
        return Err(MarketError::InvalidPrice);
    }
    if sell_asset == buy_asset {
        return Err(MarketError::SameAsset(sell_asset));
    }

    let (expected, bump) = derive_listing_address(&seller, listing_id, ctx.program_id())?;
    if expected != listing_address {
        return Err(MarketError::InvalidListingAddress(listing_address));
    }
    if ctx.exists(&listing_address)? {
        return Err(MarketError::DuplicateListing(listing_address));
    }

    let sell_decimals = ctx.decimals(&sell_asset)?;
    ctx.decimals(&buy_asset)?;

    if derive_escrow_address(&listing_address, &sell_asset)? != escrow {
        return Err(MarketError::InvalidTokenAccount(escrow));
    }
    check_holding(ctx, &seller_holding, &sell_asset, &seller)?;

    // A pre-funded escrow would break the balance/remaining equality.
    let escrow_existed = match ctx.account(&escrow)? {
        Some(_) => {
            let held = check_holding(ctx, &escrow, &sell_asset, &listing_address)?;
            if held.amount != 0 {
                return Err(MarketError::InvalidTokenAccount(escrow));
            }
            true
        }
        None => false,
    };

    let record = Listing {
        seller,
        sell_asset,
        buy_asset,
        price_per_unit,
        remaining_amount: amount,
        listing_id,
        escrow_address: escrow,
        bump,
        price_basis,
        sell_decimals,
    };
    let mut deposit =
        ctx.create_program_account(&seller, &listing_address, Listing::SPACE, record.pack()?)?;
    ctx.create_associated_token_account(&seller, &listing_address, &sell_asset)?;
    if !escrow_existed {
        deposit = deposit
            .checked_add(ctx.rent().minimum_balance(TOKEN_ACCOUNT_SPACE))
            .ok_or(MarketError::Overflow)?;
    }
    ctx.token_transfer(&seller_holding, &escrow, &seller, amount)?;

    info!(
        listing = %listing_address,
        %seller,
        %sell_asset,
        %buy_asset,
        amount,
        price_per_unit,
        ?price_basis,
        deposit,
        "listing created"
    );
    Ok(ListingCreated {
        listing: listing_address,
        deposit,
    })
}
