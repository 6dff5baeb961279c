//! Benchmarks for puzi-market.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use puzi_core::{Address, Keypair, derive_listing_address};
use puzi_ledger::Ledger;
use puzi_market::{CreateListingParams, Market, MarketConfig, MARKET_PROGRAM_ID, PriceBasis, total_cost};

fn benchmark_derive_listing(c: &mut Criterion) {
    let seller = Address::new_unique();
    let mut id = 0u64;

    c.bench_function("derive_listing_address", |b| {
        b.iter(|| {
            id = id.wrapping_add(1);
            derive_listing_address(&seller, black_box(id), &MARKET_PROGRAM_ID).expect("derive")
        });
    });
}

fn benchmark_total_cost(c: &mut Criterion) {
    c.bench_function("total_cost_per_whole_token", |b| {
        b.iter(|| {
            total_cost(
                black_box(2_500_000_000),
                black_box(30_000_000),
                PriceBasis::PerWholeToken,
                9,
            )
            .expect("cost")
        });
    });
}

fn benchmark_purchase(c: &mut Criterion) {
    let ledger = Arc::new(Ledger::default());
    let authority = Keypair::generate();
    let seller = Keypair::generate();
    let buyer = Keypair::generate();
    for who in [&authority, &seller, &buyer] {
        ledger.airdrop(&who.address(), 1_000_000_000_000).expect("airdrop");
    }
    let sell = Keypair::generate();
    let buy = Keypair::generate();
    ledger
        .create_mint(&authority, &sell, &authority.address(), 0)
        .expect("mint");
    ledger
        .create_mint(&authority, &buy, &authority.address(), 0)
        .expect("mint");
    ledger
        .mint_to(&authority, &sell.address(), &seller.address(), u64::MAX / 2)
        .expect("fund seller");
    ledger
        .mint_to(&authority, &buy.address(), &buyer.address(), u64::MAX / 2)
        .expect("fund buyer");
    ledger
        .create_token_account(&seller, &seller.address(), &buy.address())
        .expect("payment account");

    let market = Market::new(ledger, MarketConfig::default()).expect("market");
    let listing = market
        .create_listing(
            &seller,
            CreateListingParams::new(sell.address(), buy.address(), u64::MAX / 2, 1).with_id(1),
        )
        .expect("listing");

    c.bench_function("purchase_one_unit", |b| {
        b.iter(|| market.purchase(&buyer, &listing, black_box(1)).expect("purchase"));
    });
}

criterion_group!(
    benches,
    benchmark_derive_listing,
    benchmark_total_cost,
    benchmark_purchase,
);
criterion_main!(benches);
