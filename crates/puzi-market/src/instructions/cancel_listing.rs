use puzi_core::Address;
use puzi_ledger::TxContext;
use tracing::info;

use super::{check_holding, load_listing, sign_for_listing};
use crate::error::MarketError;
use crate::instruction::key;
use crate::processor::CancelReceipt;

pub(crate) fn process(ctx: &mut TxContext<'_>, keys: &[Address]) -> Result<CancelReceipt, MarketError> {
    let caller = key(keys, 0)?;
    let listing_address = key(keys, 1)?;
    let escrow = key(keys, 2)?;
    let seller_holding = key(keys, 3)?;

    let listing = load_listing(ctx, &listing_address)?;
    if !ctx.is_signer(&caller) || caller != listing.seller {
        return Err(MarketError::Unauthorized(caller));
    }
    if escrow != listing.escrow_address {
        return Err(MarketError::InvalidTokenAccount(escrow));
    }
    check_holding(ctx, &seller_holding, &listing.sell_asset, &listing.seller)?;

    // Anything sent to the escrow outside the protocol goes back too.
    let held = ctx.token_account(&escrow)?.amount;
    let authority = sign_for_listing(ctx, &listing)?;
    if held > 0 {
        ctx.token_transfer(&escrow, &seller_holding, &authority, held)?;
    }
    let escrow_refund = ctx.close_token_account(&escrow, &listing.seller, &authority)?;
    let record_refund = ctx.close_program_account(&listing_address, &listing.seller)?;
    let refunded_lamports = escrow_refund
        .checked_add(record_refund)
        .ok_or(MarketError::Overflow)?;

    info!(
        listing = %listing_address,
        seller = %listing.seller,
        returned = held,
        refunded_lamports,
        "listing cancelled"
    );
    Ok(CancelReceipt {
        returned_amount: held,
        refunded_lamports,
    })
}
