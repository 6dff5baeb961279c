//! Client facade over the market program.

use std::sync::Arc;

use puzi_core::{Address, Keypair};
use puzi_ledger::{AccountData, Ledger, Transaction};
use tracing::debug;

use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::instruction::{self, CreateListingArgs};
use crate::processor::{
    CancelReceipt, InstructionOutcome, ListingCreated, MarketProgram, PurchaseReceipt,
};
use crate::state::{Listing, PriceBasis};

/// Parameters for [`Market::create_listing`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateListingParams {
    /// Mint being sold.
    pub sell_asset: Address,
    /// Mint accepted as payment.
    pub buy_asset: Address,
    /// Raw sell-asset units to lock.
    pub amount: u64,
    /// Price on `price_basis`.
    pub price_per_unit: u64,
    /// Denomination of the price.
    pub price_basis: PriceBasis,
    /// Id; the current time in milliseconds when `None`.
    pub listing_id: Option<u64>,
}

impl CreateListingParams {
    /// A raw-unit priced listing with a generated id.
    #[must_use]
    pub fn new(sell_asset: Address, buy_asset: Address, amount: u64, price_per_unit: u64) -> Self {
        Self {
            sell_asset,
            buy_asset,
            amount,
            price_per_unit,
            price_basis: PriceBasis::PerRawUnit,
            listing_id: None,
        }
    }

    /// Sets the listing id.
    #[must_use]
    pub const fn with_id(mut self, listing_id: u64) -> Self {
        self.listing_id = Some(listing_id);
        self
    }

    /// Sets the price basis.
    #[must_use]
    pub const fn with_basis(mut self, price_basis: PriceBasis) -> Self {
        self.price_basis = price_basis;
        self
    }
}

/// Submits market instructions to a ledger and reads listings back.
#[derive(Debug, Clone)]
pub struct Market {
    ledger: Arc<Ledger>,
    config: MarketConfig,
    program: MarketProgram,
}

impl Market {
    /// Create a client for `ledger`, registering the market program under
    /// the configured id.
    ///
    /// Fails if another program already holds that id.
    pub fn new(ledger: Arc<Ledger>, config: MarketConfig) -> Result<Self, MarketError> {
        let program = MarketProgram::new(config.program_id);
        ledger.register_program(&program)?;
        Ok(Self {
            ledger,
            config,
            program,
        })
    }

    /// The underlying ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The market program id.
    #[must_use]
    pub const fn program_id(&self) -> &Address {
        &self.config.program_id
    }

    fn submit(&self, tx: &Transaction) -> Result<InstructionOutcome, MarketError> {
        self.ledger.process(tx, &self.program)
    }

    /// Creates a listing and returns its address.
    pub fn create_listing(
        &self,
        seller: &Keypair,
        params: CreateListingParams,
    ) -> Result<Address, MarketError> {
        self.create_listing_with_receipt(seller, params)
            .map(|created| created.listing)
    }

    /// Creates a listing and returns its address with the deposit charged.
    pub fn create_listing_with_receipt(
        &self,
        seller: &Keypair,
        params: CreateListingParams,
    ) -> Result<ListingCreated, MarketError> {
        let listing_id = params.listing_id.unwrap_or_else(default_listing_id);
        let args = CreateListingArgs {
            sell_asset: params.sell_asset,
            buy_asset: params.buy_asset,
            amount: params.amount,
            price_per_unit: params.price_per_unit,
            price_basis: params.price_basis,
            listing_id,
        };
        let (message, _) = instruction::create_listing(self.program_id(), &seller.address(), &args)?;
        let tx = Transaction::new(message, &[seller])?;
        match self.submit(&tx)? {
            InstructionOutcome::Created(created) => Ok(created),
            other => Err(unexpected(&other)),
        }
    }

    /// Buys `buy_amount` raw units from the listing at `listing_address`.
    ///
    /// The buyer's receiving holding account is created first (paid by the
    /// buyer) if missing. The seller's payment account must already exist.
    pub fn purchase(
        &self,
        buyer: &Keypair,
        listing_address: &Address,
        buy_amount: u64,
    ) -> Result<PurchaseReceipt, MarketError> {
        let listing = self.listing(listing_address)?;
        self.ledger
            .create_token_account(buyer, &buyer.address(), &listing.sell_asset)?;
        let message = instruction::purchase(
            self.program_id(),
            &buyer.address(),
            listing_address,
            &listing,
            buy_amount,
        )?;
        let tx = Transaction::new(message, &[buyer])?;
        match self.submit(&tx)? {
            InstructionOutcome::Purchased(receipt) => Ok(receipt),
            other => Err(unexpected(&other)),
        }
    }

    /// Cancels the listing at `listing_address`, returning what is left in
    /// escrow and refunding both deposits to the seller.
    pub fn cancel_listing(
        &self,
        seller: &Keypair,
        listing_address: &Address,
    ) -> Result<CancelReceipt, MarketError> {
        let listing = self.listing(listing_address)?;
        if listing.seller != seller.address() {
            return Err(MarketError::Unauthorized(seller.address()));
        }
        self.ledger
            .create_token_account(seller, &seller.address(), &listing.sell_asset)?;
        self.submit_cancel(seller, listing_address, &listing)
    }

    /// Submits a cancel without any client-side checks.
    ///
    /// Lets tests and tools confirm that the program itself rejects
    /// callers other than the seller.
    pub fn submit_cancel(
        &self,
        caller: &Keypair,
        listing_address: &Address,
        listing: &Listing,
    ) -> Result<CancelReceipt, MarketError> {
        let message =
            instruction::cancel_listing(self.program_id(), &caller.address(), listing_address, listing)?;
        let tx = Transaction::new(message, &[caller])?;
        match self.submit(&tx)? {
            InstructionOutcome::Cancelled(receipt) => Ok(receipt),
            other => Err(unexpected(&other)),
        }
    }

    /// Reads the listing at `address`.
    pub fn listing(&self, address: &Address) -> Result<Listing, MarketError> {
        let account = self
            .ledger
            .account(address)
            .ok_or(MarketError::ListingNotFound(*address))?;
        if account.owner != self.config.program_id {
            return Err(MarketError::InvalidListingAddress(*address));
        }
        match &account.data {
            AccountData::Program { bytes, .. } => Listing::unpack(bytes),
            _ => Err(MarketError::InvalidListingAddress(*address)),
        }
    }

    /// Every listing, ordered by address.
    ///
    /// A full scan of the program's accounts; records that fail to decode
    /// are skipped.
    pub fn all_listings(&self) -> Vec<(Address, Listing)> {
        self.ledger
            .program_accounts(&self.config.program_id)
            .into_iter()
            .filter_map(|(address, account)| {
                let bytes = account.program_data()?;
                match Listing::unpack(bytes) {
                    Ok(listing) => Some((address, listing)),
                    Err(e) => {
                        debug!(%address, error = %e, "skipping undecodable program account");
                        None
                    }
                }
            })
            .collect()
    }

    /// Listings created by `seller`, including exhausted ones.
    pub fn listings_by_seller(&self, seller: &Address) -> Vec<(Address, Listing)> {
        self.filtered(|listing| listing.seller == *seller)
    }

    /// Listings selling `mint`.
    pub fn listings_by_sell_asset(&self, mint: &Address) -> Vec<(Address, Listing)> {
        self.filtered(|listing| listing.sell_asset == *mint)
    }

    /// Listings with quantity left to buy.
    pub fn active_listings(&self) -> Vec<(Address, Listing)> {
        self.filtered(Listing::is_active)
    }

    fn filtered(&self, keep: impl Fn(&Listing) -> bool) -> Vec<(Address, Listing)> {
        self.all_listings()
            .into_iter()
            .filter(|(_, listing)| keep(listing))
            .collect()
    }
}

/// Milliseconds since the Unix epoch, the default listing id.
fn default_listing_id() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}

fn unexpected(outcome: &InstructionOutcome) -> MarketError {
    MarketError::invalid_instruction(format!("unexpected instruction outcome: {outcome:?}"))
}
