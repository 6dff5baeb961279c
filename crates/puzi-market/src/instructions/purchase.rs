use puzi_core::Address;
use puzi_ledger::TxContext;
use tracing::info;

use super::{check_holding, load_listing, sign_for_listing};
use crate::error::MarketError;
use crate::instruction::key;
use crate::processor::PurchaseReceipt;

pub(crate) fn process(
    ctx: &mut TxContext<'_>,
    keys: &[Address],
    buy_amount: u64,
) -> Result<PurchaseReceipt, MarketError> {
    let buyer = key(keys, 0)?;
    let listing_address = key(keys, 1)?;
    let escrow = key(keys, 2)?;
    let buyer_payment = key(keys, 3)?;
    let seller_payment = key(keys, 4)?;
    let buyer_receive = key(keys, 5)?;

    if !ctx.is_signer(&buyer) {
        return Err(MarketError::Unauthorized(buyer));
    }
    let mut listing = load_listing(ctx, &listing_address)?;

    if buy_amount == 0 {
        return Err(MarketError::invalid_amount("buy amount must be greater than zero"));
    }
    if buy_amount > listing.remaining_amount {
        return Err(MarketError::InsufficientStock {
            requested: buy_amount,
            remaining: listing.remaining_amount,
        });
    }
    let total_cost = listing.cost_of(buy_amount)?;

    if escrow != listing.escrow_address {
        return Err(MarketError::InvalidTokenAccount(escrow));
    }
    check_holding(ctx, &buyer_payment, &listing.buy_asset, &buyer)?;
    check_holding(ctx, &seller_payment, &listing.buy_asset, &listing.seller)?;
    check_holding(ctx, &buyer_receive, &listing.sell_asset, &buyer)?;

    ctx.token_transfer(&buyer_payment, &seller_payment, &buyer, total_cost)?;
    let authority = sign_for_listing(ctx, &listing)?;
    ctx.token_transfer(&escrow, &buyer_receive, &authority, buy_amount)?;

    listing.remaining_amount -= buy_amount;
    ctx.write_program_data(&listing_address, listing.pack()?)?;

    info!(
        listing = %listing_address,
        %buyer,
        buy_amount,
        total_cost,
        remaining = listing.remaining_amount,
        "purchase settled"
    );
    Ok(PurchaseReceipt {
        total_cost,
        remaining_amount: listing.remaining_amount,
    })
}
