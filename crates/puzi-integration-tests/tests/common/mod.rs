//! Shared fixture: a ledger with two mints, a funded seller and buyer.

#![allow(dead_code)]

use std::sync::Arc;

use puzi_core::{Address, Keypair};
use puzi_ledger::Ledger;
use puzi_market::{CreateListingParams, Market, MarketConfig, PriceBasis};

/// Lamports every fixture wallet starts with.
pub const LAMPORTS: u64 = 1_000_000_000_000;

pub struct World {
    pub market: Market,
    pub authority: Keypair,
    pub seller: Keypair,
    pub buyer: Keypair,
    pub sell_mint: Address,
    pub buy_mint: Address,
}

impl World {
    /// Mints with the given decimals; seller holds `seller_tokens` of the
    /// sell asset, buyer holds `buyer_tokens` of the buy asset.
    pub fn new(sell_decimals: u8, buy_decimals: u8, seller_tokens: u64, buyer_tokens: u64) -> Self {
        let ledger = Arc::new(Ledger::default());
        let authority = Keypair::generate();
        let seller = Keypair::generate();
        let buyer = Keypair::generate();
        for who in [&authority, &seller, &buyer] {
            ledger.airdrop(&who.address(), LAMPORTS).expect("airdrop");
        }

        let sell = Keypair::generate();
        let buy = Keypair::generate();
        ledger
            .create_mint(&authority, &sell, &authority.address(), sell_decimals)
            .expect("sell mint");
        ledger
            .create_mint(&authority, &buy, &authority.address(), buy_decimals)
            .expect("buy mint");
        if seller_tokens > 0 {
            ledger
                .mint_to(&authority, &sell.address(), &seller.address(), seller_tokens)
                .expect("fund seller");
        }
        if buyer_tokens > 0 {
            ledger
                .mint_to(&authority, &buy.address(), &buyer.address(), buyer_tokens)
                .expect("fund buyer");
        }
        ledger
            .create_token_account(&seller, &seller.address(), &buy.address())
            .expect("seller payment account");

        Self {
            market: Market::new(ledger, MarketConfig::default()).expect("market"),
            authority,
            seller,
            buyer,
            sell_mint: sell.address(),
            buy_mint: buy.address(),
        }
    }

    /// Integral assets, generously funded.
    pub fn integral() -> Self {
        Self::new(0, 0, 1_000_000, 1_000_000)
    }

    pub fn ledger(&self) -> &Ledger {
        self.market.ledger()
    }

    /// A wallet with lamports and no token accounts.
    pub fn new_wallet(&self) -> Keypair {
        let wallet = Keypair::generate();
        self.ledger()
            .airdrop(&wallet.address(), LAMPORTS)
            .expect("airdrop");
        wallet
    }

    /// Another buyer holding `buy_tokens` of the buy asset.
    pub fn new_buyer(&self, buy_tokens: u64) -> Keypair {
        let buyer = self.new_wallet();
        self.ledger()
            .mint_to(&self.authority, &self.buy_mint, &buyer.address(), buy_tokens)
            .expect("fund buyer");
        buyer
    }

    pub fn list(&self, amount: u64, price: u64, id: u64) -> Address {
        self.list_with(amount, price, PriceBasis::PerRawUnit, id)
    }

    pub fn list_with(&self, amount: u64, price: u64, basis: PriceBasis, id: u64) -> Address {
        self.market
            .create_listing(
                &self.seller,
                CreateListingParams::new(self.sell_mint, self.buy_mint, amount, price)
                    .with_basis(basis)
                    .with_id(id),
            )
            .expect("create listing")
    }

    pub fn sell_balance(&self, owner: &Keypair) -> u64 {
        self.ledger()
            .token_balance(&owner.address(), &self.sell_mint)
            .expect("sell balance")
    }

    pub fn buy_balance(&self, owner: &Keypair) -> u64 {
        self.ledger()
            .token_balance(&owner.address(), &self.buy_mint)
            .expect("buy balance")
    }

    pub fn remaining(&self, listing: &Address) -> u64 {
        self.market
            .listing(listing)
            .expect("listing")
            .remaining_amount
    }

    pub fn escrow_balance(&self, listing: &Address) -> u64 {
        self.ledger()
            .token_balance(listing, &self.sell_mint)
            .expect("escrow balance")
    }
}
