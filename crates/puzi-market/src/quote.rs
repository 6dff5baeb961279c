//! Caller-side helpers: decimal scaling, quotes and deposit estimates.
//!
//! The protocol only sees raw units. These functions sit at the boundary
//! where human-entered prices are turned into raw integers.

use puzi_core::{Address, parse_ui_amount, units_per_token};
use puzi_ledger::{LedgerError, MintResolver, Rent, TOKEN_ACCOUNT_SPACE};

use crate::error::MarketError;
use crate::state::{Listing, PriceBasis};

/// Cost of buying `buy_amount` from `listing` as it currently stands.
pub fn quote_purchase(listing: &Listing, buy_amount: u64) -> Result<u64, MarketError> {
    if buy_amount > listing.remaining_amount {
        return Err(MarketError::InsufficientStock {
            requested: buy_amount,
            remaining: listing.remaining_amount,
        });
    }
    listing.cost_of(buy_amount)
}

/// Converts a per-whole-token price string into a raw price and its basis.
///
/// `text` is the price of one whole sell token in buy-asset display units.
/// When that divides evenly into raw sell units the price is expressed per
/// raw unit; otherwise it stays per whole token.
pub fn price_from_ui(
    text: &str,
    sell_decimals: u8,
    buy_decimals: u8,
) -> Result<(u64, PriceBasis), MarketError> {
    let per_token = parse_ui_amount(text, buy_decimals)?;
    if per_token == 0 {
        return Err(MarketError::InvalidPrice);
    }
    let scale = units_per_token(sell_decimals)?;
    if per_token % scale == 0 {
        Ok((per_token / scale, PriceBasis::PerRawUnit))
    } else {
        Ok((per_token, PriceBasis::PerWholeToken))
    }
}

/// Lamports a seller deposits when creating a listing.
///
/// Covers the listing record and, unless it already exists, the escrow
/// holding account. Both are refunded on cancellation.
#[must_use]
pub fn listing_deposit(rent: &Rent, escrow_exists: bool) -> u64 {
    let record = rent.minimum_balance(Listing::SPACE);
    if escrow_exists {
        record
    } else {
        record.saturating_add(rent.minimum_balance(TOKEN_ACCOUNT_SPACE))
    }
}

/// A well-known token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownToken {
    /// Ticker symbol.
    pub symbol: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Mint address.
    pub mint: Address,
    /// Decimal precision.
    pub decimals: u8,
}

const BUILTIN_TOKENS: &[(&str, &str, &str, u8)] = &[
    ("USDC-Dev", "USD Coin Dev", "Gh9ZwEmdLJ8DscKNTkTqPbNwLNNBjuSzaG9Vp2KGtKJr", 6),
    ("SOL", "Wrapped SOL", "So11111111111111111111111111111111111111112", 9),
];

/// Static mint registry for callers without ledger access.
#[derive(Debug, Clone, Default)]
pub struct KnownMints {
    tokens: Vec<KnownToken>,
}

impl KnownMints {
    /// The built-in payment tokens.
    pub fn builtin() -> Result<Self, MarketError> {
        let tokens = BUILTIN_TOKENS
            .iter()
            .map(|&(symbol, name, mint, decimals)| {
                Ok(KnownToken {
                    symbol,
                    name,
                    mint: mint.parse()?,
                    decimals,
                })
            })
            .collect::<Result<Vec<_>, MarketError>>()?;
        Ok(Self { tokens })
    }

    /// Adds or replaces a token.
    #[must_use]
    pub fn with(mut self, token: KnownToken) -> Self {
        self.tokens.retain(|t| t.mint != token.mint);
        self.tokens.push(token);
        self
    }

    /// Looks a token up by mint.
    #[must_use]
    pub fn by_mint(&self, mint: &Address) -> Option<&KnownToken> {
        self.tokens.iter().find(|t| t.mint == *mint)
    }

    /// Looks a token up by symbol.
    #[must_use]
    pub fn by_symbol(&self, symbol: &str) -> Option<&KnownToken> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    /// Every registered token.
    #[must_use]
    pub fn tokens(&self) -> &[KnownToken] {
        &self.tokens
    }
}

impl MintResolver for KnownMints {
    fn decimals(&self, mint: &Address) -> Result<u8, LedgerError> {
        self.by_mint(mint)
            .map(|t| t.decimals)
            .ok_or(LedgerError::AccountNotFound(*mint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1.5", 9, 9 => (1_500_000_000, PriceBasis::PerWholeToken) ; "fractional raw price")]
    #[test_case("30", 9, 6 => (30_000_000, PriceBasis::PerWholeToken) ; "finer sell asset")]
    #[test_case("5", 0, 0 => (5, PriceBasis::PerRawUnit) ; "integral assets")]
    #[test_case("2", 6, 9 => (2_000, PriceBasis::PerRawUnit) ; "finer buy asset")]
    #[test_case("1", 0, 6 => (1_000_000, PriceBasis::PerRawUnit) ; "whole sell units")]
    fn price_conversion(text: &str, sell_decimals: u8, buy_decimals: u8) -> (u64, PriceBasis) {
        price_from_ui(text, sell_decimals, buy_decimals).expect("price")
    }

    #[test]
    fn zero_price_rejected() {
        assert!(matches!(price_from_ui("0", 6, 6), Err(MarketError::InvalidPrice)));
        assert!(matches!(price_from_ui("-1", 6, 6), Err(MarketError::InvalidAmount(_))));
    }

    #[test]
    fn deposit_depends_on_escrow() {
        let rent = Rent::default();
        let fresh = listing_deposit(&rent, false);
        let reused = listing_deposit(&rent, true);
        assert_eq!(fresh - reused, rent.minimum_balance(TOKEN_ACCOUNT_SPACE));
        assert_eq!(reused, rent.minimum_balance(Listing::SPACE));
    }

    #[test]
    fn quote_respects_stock() {
        let listing = Listing {
            seller: Address::new_unique(),
            sell_asset: Address::new_unique(),
            buy_asset: Address::new_unique(),
            price_per_unit: 2,
            remaining_amount: 10,
            listing_id: 1,
            escrow_address: Address::new_unique(),
            bump: 255,
            price_basis: PriceBasis::PerRawUnit,
            sell_decimals: 0,
        };
        assert_eq!(quote_purchase(&listing, 10).expect("quote"), 20);
        assert!(matches!(
            quote_purchase(&listing, 11),
            Err(MarketError::InsufficientStock { requested: 11, remaining: 10 })
        ));
    }

    #[test]
    fn builtin_registry_resolves_decimals() {
        let mints = KnownMints::builtin().expect("builtin");
        let sol = mints.by_symbol("SOL").expect("sol");
        assert_eq!(mints.decimals(&sol.mint).expect("decimals"), 9);
        assert_eq!(mints.by_symbol("USDC-Dev").expect("usdc").decimals, 6);
        assert!(mints.decimals(&Address::new_unique()).is_err());
    }

    #[test]
    fn with_replaces_existing_entry() {
        let mint = Address::new_unique();
        let mints = KnownMints::default()
            .with(KnownToken { symbol: "A", name: "A", mint, decimals: 2 })
            .with(KnownToken { symbol: "B", name: "B", mint, decimals: 3 });
        assert_eq!(mints.tokens().len(), 1);
        assert_eq!(mints.by_mint(&mint).expect("token").symbol, "B");
    }
}
