//! Market instructions and the account sets they declare.

use puzi_core::{Address, derive_escrow_address, derive_listing_address};
use puzi_ledger::{AccountMeta, Message};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::state::{Listing, PriceBasis};

/// Instructions understood by the market program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum MarketInstruction {
    /// Lock `amount` of the sell asset in escrow and record a listing.
    ///
    /// Accounts: `[seller (s, w), listing (w), escrow (w), seller sell holding (w),
    /// sell mint, buy mint]`.
    CreateListing {
        /// Seller-chosen id.
        listing_id: u64,
        /// Raw sell-asset units to lock.
        amount: u64,
        /// Price on `price_basis`.
        price_per_unit: u64,
        /// Denomination of the price.
        #[serde(default)]
        price_basis: PriceBasis,
    },
    /// Buy `buy_amount` raw units from a listing.
    ///
    /// Accounts: `[buyer (s), listing (w), escrow (w), buyer payment holding (w),
    /// seller payment holding (w), buyer receiving holding (w)]`.
    Purchase {
        /// Raw sell-asset units to receive.
        buy_amount: u64,
    },
    /// Return the escrowed remainder and delete the listing.
    ///
    /// Accounts: `[seller (s, w), listing (w), escrow (w), seller sell holding (w)]`.
    CancelListing,
}

impl MarketInstruction {
    /// Encodes the instruction as message data.
    pub fn pack(&self) -> Result<Vec<u8>, MarketError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes message data.
    pub fn unpack(data: &[u8]) -> Result<Self, MarketError> {
        serde_json::from_slice(data)
            .map_err(|e| MarketError::invalid_instruction(e.to_string()))
    }
}

/// Returns `keys[index]` or an invalid instruction error.
pub(crate) fn key(keys: &[Address], index: usize) -> Result<Address, MarketError> {
    keys.get(index)
        .copied()
        .ok_or_else(|| MarketError::invalid_instruction(format!("missing account #{index}")))
}

/// Arguments for building a create-listing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateListingArgs {
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
    /// Seller-chosen id.
    pub listing_id: u64,
}

/// Builds a create-listing message. Returns it with the listing address.
pub fn create_listing(
    program_id: &Address,
    seller: &Address,
    args: &CreateListingArgs,
) -> Result<(Message, Address), MarketError> {
    let (listing, _) = derive_listing_address(seller, args.listing_id, program_id)?;
    let escrow = derive_escrow_address(&listing, &args.sell_asset)?;
    let seller_holding = derive_escrow_address(seller, &args.sell_asset)?;
    let data = MarketInstruction::CreateListing {
        listing_id: args.listing_id,
        amount: args.amount,
        price_per_unit: args.price_per_unit,
        price_basis: args.price_basis,
    }
    .pack()?;
    let message = Message::new(
        *program_id,
        vec![
            AccountMeta::new(*seller, true),
            AccountMeta::new(listing, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new(seller_holding, false),
            AccountMeta::new_readonly(args.sell_asset, false),
            AccountMeta::new_readonly(args.buy_asset, false),
        ],
        data,
    );
    Ok((message, listing))
}

/// Builds a purchase message against a listing as last read.
pub fn purchase(
    program_id: &Address,
    buyer: &Address,
    listing_address: &Address,
    listing: &Listing,
    buy_amount: u64,
) -> Result<Message, MarketError> {
    let buyer_payment = derive_escrow_address(buyer, &listing.buy_asset)?;
    let seller_payment = derive_escrow_address(&listing.seller, &listing.buy_asset)?;
    let buyer_receive = derive_escrow_address(buyer, &listing.sell_asset)?;
    Ok(Message::new(
        *program_id,
        vec![
            AccountMeta::new_readonly(*buyer, true),
            AccountMeta::new(*listing_address, false),
            AccountMeta::new(listing.escrow_address, false),
            AccountMeta::new(buyer_payment, false),
            AccountMeta::new(seller_payment, false),
            AccountMeta::new(buyer_receive, false),
        ],
        MarketInstruction::Purchase { buy_amount }.pack()?,
    ))
}

/// Builds a cancel message for `listing_address`.
///
/// `caller` is placed in the seller slot; the program rejects it unless it
/// is the recorded seller.
pub fn cancel_listing(
    program_id: &Address,
    caller: &Address,
    listing_address: &Address,
    listing: &Listing,
) -> Result<Message, MarketError> {
    let caller_holding = derive_escrow_address(caller, &listing.sell_asset)?;
    Ok(Message::new(
        *program_id,
        vec![
            AccountMeta::new(*caller, true),
            AccountMeta::new(*listing_address, false),
            AccountMeta::new(listing.escrow_address, false),
            AccountMeta::new(caller_holding, false),
        ],
        MarketInstruction::CancelListing.pack()?,
    ))
}
