//! The listing record and purchase pricing.

use puzi_core::{Address, units_per_token};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

/// How `price_per_unit` is denominated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBasis {
    /// Raw units of the buy asset per raw unit of the sell asset.
    #[default]
    PerRawUnit,
    /// Raw units of the buy asset per whole sell token
    /// (`10^sell_decimals` raw units).
    PerWholeToken,
}

/// An offer to sell a quantity of one asset for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Creator; the only party that may cancel, and the payee.
    pub seller: Address,
    /// Mint being sold.
    pub sell_asset: Address,
    /// Mint accepted as payment.
    pub buy_asset: Address,
    /// Price in raw buy-asset units, on `price_basis`.
    pub price_per_unit: u64,
    /// Raw sell-asset units still held in escrow.
    pub remaining_amount: u64,
    /// Seller-chosen id, unique per seller.
    pub listing_id: u64,
    /// Holding account custodying `remaining_amount`.
    pub escrow_address: Address,
    /// Bump of the listing's derived address.
    pub bump: u8,
    /// Denomination of `price_per_unit`.
    #[serde(default)]
    pub price_basis: PriceBasis,
    /// Decimal precision of `sell_asset`, captured at creation.
    pub sell_decimals: u8,
}

impl Listing {
    /// Bytes reserved for the encoded record; rent is charged on this.
    pub const SPACE: usize = 512;

    /// Whether any quantity is left to buy.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.remaining_amount > 0
    }

    /// Cost of buying `buy_amount` raw units at this listing's price.
    pub fn cost_of(&self, buy_amount: u64) -> Result<u64, MarketError> {
        total_cost(
            buy_amount,
            self.price_per_unit,
            self.price_basis,
            self.sell_decimals,
        )
    }

    /// Little-endian id bytes, the last derivation seed.
    #[must_use]
    pub const fn id_seed(&self) -> [u8; 8] {
        self.listing_id.to_le_bytes()
    }

    /// Encodes the record for storage.
    pub fn pack(&self) -> Result<Vec<u8>, MarketError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a stored record.
    pub fn unpack(bytes: &[u8]) -> Result<Self, MarketError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Total raw buy-asset units owed for `buy_amount` raw sell-asset units.
///
/// Computed in 128 bits. Fails with [`MarketError::Overflow`] if the result
/// does not fit in a u64. With [`PriceBasis::PerWholeToken`] the scaled
/// result must be exact; a remainder is rejected rather than rounded. A zero
/// amount or zero result is rejected.
pub fn total_cost(
    buy_amount: u64,
    price_per_unit: u64,
    basis: PriceBasis,
    sell_decimals: u8,
) -> Result<u64, MarketError> {
    if buy_amount == 0 {
        return Err(MarketError::invalid_amount("buy amount must be greater than zero"));
    }
    if price_per_unit == 0 {
        return Err(MarketError::InvalidPrice);
    }

    let mut total = u128::from(buy_amount) * u128::from(price_per_unit);
    if basis == PriceBasis::PerWholeToken {
        let scale = u128::from(units_per_token(sell_decimals)?);
        if total % scale != 0 {
            return Err(MarketError::invalid_amount(format!(
                "{buy_amount} raw units does not price to a whole number of payment units"
            )));
        }
        total /= scale;
    }

    let total = u64::try_from(total).map_err(|_| MarketError::Overflow)?;
    if total == 0 {
        return Err(MarketError::invalid_amount("purchase cost rounds to zero"));
    }
    Ok(total)
}
