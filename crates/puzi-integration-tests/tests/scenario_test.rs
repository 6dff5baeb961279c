//! End-to-end marketplace scenarios over a real ledger.
//!
//! Covers the create / purchase / cancel lifecycle:
//! 1. Integral assets, partial purchase
//! 2. Same-decimal assets priced per whole token
//! 3. Mixed-decimal assets priced per whole token
//! 4. Immediate cancellation
//! 5. Sell out, then cancel
//! 6. Oversell rejected

mod common;

use common::World;
use puzi_core::{Address, derive_escrow_address, derive_listing_address};
use puzi_market::{
    CreateListingParams, ErrorKind, MARKET_PROGRAM_ID, MarketError, PriceBasis, listing_deposit,
    price_from_ui,
};

// ============================================================================
// Purchases
// ============================================================================

#[test]
fn integral_assets_partial_purchase() {
    let w = World::new(0, 0, 100, 1_000);
    let listing = w.list(100, 5, 1);

    let receipt = w.market.purchase(&w.buyer, &listing, 10).expect("purchase");

    assert_eq!(receipt.total_cost, 50);
    assert_eq!(w.sell_balance(&w.buyer), 10);
    assert_eq!(w.buy_balance(&w.seller), 50);
    assert_eq!(w.buy_balance(&w.buyer), 950);
    assert_eq!(w.remaining(&listing), 90);
    assert_eq!(w.escrow_balance(&listing), 90);
}

#[test]
fn nine_decimal_assets_priced_per_token() {
    let w = World::new(9, 9, 10_000_000_000, 10_000_000_000);
    let (price, basis) = price_from_ui("1.5", 9, 9).expect("price");
    assert_eq!((price, basis), (1_500_000_000, PriceBasis::PerWholeToken));
    let listing = w.list_with(10_000_000_000, price, basis, 2);

    let receipt = w
        .market
        .purchase(&w.buyer, &listing, 5_000_000_000)
        .expect("purchase");

    assert_eq!(receipt.total_cost, 7_500_000_000);
    assert_eq!(w.sell_balance(&w.buyer), 5_000_000_000);
    assert_eq!(w.buy_balance(&w.seller), 7_500_000_000);
    assert_eq!(w.remaining(&listing), 5_000_000_000);
}

#[test]
fn mixed_decimal_assets_priced_per_token() {
    let w = World::new(9, 6, 1_000_000_000, 100_000_000);
    let listing = w.list_with(1_000_000_000, 30_000_000, PriceBasis::PerWholeToken, 3);

    let receipt = w
        .market
        .purchase(&w.buyer, &listing, 500_000_000)
        .expect("purchase");

    assert_eq!(receipt.total_cost, 15_000_000);
    assert_eq!(w.buy_balance(&w.seller), 15_000_000);
    assert_eq!(w.sell_balance(&w.buyer), 500_000_000);
}

#[test]
fn fractional_cost_purchase_is_rejected() {
    let w = World::new(9, 6, 1_000_000_000, 100_000_000);
    let listing = w.list_with(1_000_000_000, 30_000_000, PriceBasis::PerWholeToken, 3);

    let err = w.market.purchase(&w.buyer, &listing, 1).expect_err("dust");

    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert_eq!(w.remaining(&listing), 1_000_000_000);
}

#[test]
fn oversell_is_rejected_without_change() {
    let w = World::integral();
    let listing = w.list(100, 1, 6);
    w.market.purchase(&w.buyer, &listing, 60).expect("first");

    let before = w.ledger().snapshot();
    let err = w.market.purchase(&w.buyer, &listing, 60).expect_err("second");

    assert!(matches!(
        err,
        MarketError::InsufficientStock {
            requested: 60,
            remaining: 40
        }
    ));
    assert_eq!(w.ledger().snapshot(), before);
}

#[test]
fn zero_purchase_is_invalid() {
    let w = World::integral();
    let listing = w.list(100, 1, 1);
    let err = w.market.purchase(&w.buyer, &listing, 0).expect_err("zero");
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
}

#[test]
fn overflowing_cost_is_rejected() {
    let w = World::integral();
    let listing = w.list(1_000, u64::MAX / 2, 1);
    let err = w.market.purchase(&w.buyer, &listing, 3).expect_err("overflow");
    assert_eq!(err.kind(), ErrorKind::Overflow);
    assert_eq!(w.remaining(&listing), 1_000);
}

#[test]
fn purchase_without_seller_payment_account_fails() {
    let w = World::integral();
    let stranger_seller = w.new_wallet();
    w.ledger()
        .mint_to(&w.authority, &w.sell_mint, &stranger_seller.address(), 10)
        .expect("fund");
    let listing = w
        .market
        .create_listing(
            &stranger_seller,
            CreateListingParams::new(w.sell_mint, w.buy_mint, 10, 1).with_id(1),
        )
        .expect("create");

    let err = w.market.purchase(&w.buyer, &listing, 1).expect_err("no payee");

    assert_eq!(err.kind(), ErrorKind::InvalidAccount);
    assert_eq!(w.remaining(&listing), 10);
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn immediate_cancel_restores_everything() {
    let w = World::new(0, 0, 500, 0);
    let lamports = w.ledger().balance(&w.seller.address());
    let listing = w.list(500, 2, 4);
    assert_eq!(w.sell_balance(&w.seller), 0);
    assert_eq!(
        w.ledger().balance(&w.seller.address()),
        lamports - listing_deposit(w.ledger().rent(), false)
    );

    let receipt = w.market.cancel_listing(&w.seller, &listing).expect("cancel");

    assert_eq!(receipt.returned_amount, 500);
    assert_eq!(w.sell_balance(&w.seller), 500);
    assert_eq!(w.ledger().balance(&w.seller.address()), lamports);
    assert!(w.ledger().account(&listing).is_none());
    let escrow = derive_escrow_address(&listing, &w.sell_mint).expect("escrow");
    assert!(w.ledger().account(&escrow).is_none());
}

#[test]
fn sold_out_listing_cancels_with_no_transfer() {
    let w = World::new(0, 0, 100, 200);
    let listing = w.list(100, 2, 5);
    let receipt = w.market.purchase(&w.buyer, &listing, 100).expect("buy all");
    assert_eq!(receipt.remaining_amount, 0);
    assert!(!w.market.listing(&listing).expect("listing").is_active());

    let sell_before = w.sell_balance(&w.seller);
    let cancel = w.market.cancel_listing(&w.seller, &listing).expect("cancel");

    assert_eq!(cancel.returned_amount, 0);
    assert_eq!(
        cancel.refunded_lamports,
        listing_deposit(w.ledger().rent(), false)
    );
    assert_eq!(w.sell_balance(&w.seller), sell_before);
    assert_eq!(w.buy_balance(&w.seller), 200);
    assert!(w.market.listing(&listing).is_err());
}

#[test]
fn cancel_by_other_party_changes_nothing() {
    let w = World::integral();
    let listing = w.list(100, 5, 1);
    let record = w.market.listing(&listing).expect("listing");
    w.ledger()
        .create_token_account(&w.buyer, &w.buyer.address(), &w.sell_mint)
        .expect("stranger holding");
    let before = w.ledger().snapshot();

    let err = w
        .market
        .submit_cancel(&w.buyer, &listing, &record)
        .expect_err("stranger");

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(w.ledger().snapshot(), before);

    let err = w
        .market
        .cancel_listing(&w.buyer, &listing)
        .expect_err("stranger via facade");
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn stray_escrow_deposits_are_returned_on_cancel() {
    let w = World::integral();
    let listing = w.list(100, 5, 1);
    let escrow = derive_escrow_address(&listing, &w.sell_mint).expect("escrow");
    w.ledger()
        .mint_to(&w.authority, &w.sell_mint, &listing, 7)
        .expect("stray deposit");
    assert_eq!(w.ledger().token_balance(&listing, &w.sell_mint).expect("escrow"), 107);
    assert_eq!(w.remaining(&listing), 100);

    let seller_before = w.sell_balance(&w.seller);
    let receipt = w.market.cancel_listing(&w.seller, &listing).expect("cancel");

    assert_eq!(receipt.returned_amount, 107);
    assert_eq!(w.sell_balance(&w.seller), seller_before + 107);
    assert!(w.ledger().account(&escrow).is_none());
}

#[test]
fn actions_on_cancelled_listing_are_not_found() {
    let w = World::integral();
    let listing = w.list(100, 5, 1);
    w.market.cancel_listing(&w.seller, &listing).expect("cancel");

    let err = w.market.purchase(&w.buyer, &listing, 1).expect_err("gone");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = w.market.cancel_listing(&w.seller, &listing).expect_err("gone");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn listing_address_matches_derivation() {
    let w = World::integral();
    let listing = w.list(10, 1, 42);
    let (expected, bump) =
        derive_listing_address(&w.seller.address(), 42, &MARKET_PROGRAM_ID).expect("derive");
    assert_eq!(listing, expected);

    let record = w.market.listing(&listing).expect("listing");
    assert_eq!(record.bump, bump);
    assert_eq!(record.listing_id, 42);
    assert_eq!(
        record.escrow_address,
        derive_escrow_address(&listing, &w.sell_mint).expect("escrow")
    );
}

#[test]
fn duplicate_listing_id_is_rejected() {
    let w = World::integral();
    w.list(10, 1, 9);
    let before = w.ledger().snapshot();
    let err = w
        .market
        .create_listing(
            &w.seller,
            CreateListingParams::new(w.sell_mint, w.buy_mint, 10, 1).with_id(9),
        )
        .expect_err("duplicate");
    assert_eq!(err.kind(), ErrorKind::DuplicateListing);
    assert_eq!(w.ledger().snapshot(), before);
}

#[test]
fn prefunded_escrow_blocks_creation() {
    let w = World::integral();
    let (listing, _) =
        derive_listing_address(&w.seller.address(), 77, &MARKET_PROGRAM_ID).expect("derive");
    w.ledger()
        .mint_to(&w.authority, &w.sell_mint, &listing, 1)
        .expect("grief");

    let err = w
        .market
        .create_listing(
            &w.seller,
            CreateListingParams::new(w.sell_mint, w.buy_mint, 10, 1).with_id(77),
        )
        .expect_err("prefunded escrow");
    assert!(matches!(err, MarketError::InvalidTokenAccount(_)));
}

#[test]
fn empty_preexisting_escrow_is_reused_without_deposit() {
    let w = World::integral();
    let (listing, _) =
        derive_listing_address(&w.seller.address(), 78, &MARKET_PROGRAM_ID).expect("derive");
    w.ledger()
        .create_token_account(&w.buyer, &listing, &w.sell_mint)
        .expect("empty escrow");

    let created = w
        .market
        .create_listing_with_receipt(
            &w.seller,
            CreateListingParams::new(w.sell_mint, w.buy_mint, 10, 1).with_id(78),
        )
        .expect("create");
    assert_eq!(created.deposit, listing_deposit(w.ledger().rent(), true));
    assert_eq!(w.escrow_balance(&listing), 10);
}

#[test]
fn listings_are_queryable_by_seller_and_asset() {
    let w = World::integral();
    let other = w.new_wallet();
    w.ledger()
        .mint_to(&w.authority, &w.sell_mint, &other.address(), 10)
        .expect("fund");
    let mine = w.list(10, 1, 1);
    let theirs = w
        .market
        .create_listing(
            &other,
            CreateListingParams::new(w.sell_mint, w.buy_mint, 10, 1).with_id(1),
        )
        .expect("create");
    assert_ne!(mine, theirs);

    let by_seller: Vec<Address> = w
        .market
        .listings_by_seller(&w.seller.address())
        .into_iter()
        .map(|(address, _)| address)
        .collect();
    assert_eq!(by_seller, vec![mine]);
    assert_eq!(w.market.listings_by_sell_asset(&w.sell_mint).len(), 2);
    assert_eq!(w.market.active_listings().len(), 2);
}
