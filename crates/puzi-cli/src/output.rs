//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use puzi_core::{Address, format_ui_amount};
use puzi_market::{KnownMints, Listing, PriceBasis};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A status line.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Message text.
    pub message: String,
    /// Whether this is a success message.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub success: bool,
}

impl Message {
    /// Create a success message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }

    /// Create an informational message.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

impl TableDisplay for Message {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.success {
            writeln!(writer, "✓ {}", self.message)?;
        } else {
            writeln!(writer, "{}", self.message)?;
        }
        Ok(())
    }
}

/// A generated keypair.
#[derive(Debug, Clone, Serialize)]
pub struct KeyInfo {
    /// Public address.
    pub address: Address,
    /// File the keypair was written to.
    pub path: String,
}

impl TableDisplay for KeyInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Address:  {}", self.address)?;
        writeln!(writer, "Keypair:  {}", self.path)?;
        Ok(())
    }
}

/// A newly created mint.
#[derive(Debug, Clone, Serialize)]
pub struct MintInfo {
    /// Mint address.
    pub mint: Address,
    /// Decimal precision.
    pub decimals: u8,
    /// Mint authority.
    pub authority: Address,
}

impl TableDisplay for MintInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Mint:       {}", self.mint)?;
        writeln!(writer, "Decimals:   {}", self.decimals)?;
        writeln!(writer, "Authority:  {}", self.authority)?;
        Ok(())
    }
}

/// A token amount in raw and display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAmount {
    /// Raw units.
    pub raw: u64,
    /// Display units.
    pub ui: String,
}

impl TokenAmount {
    /// Pairs `raw` with its display form.
    #[must_use]
    pub fn new(raw: u64, decimals: u8) -> Self {
        Self {
            raw,
            ui: format_ui_amount(raw, decimals),
        }
    }
}

/// Lamport and optional token balance of an owner.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceInfo {
    /// Account owner.
    pub owner: Address,
    /// Lamports held directly.
    pub lamports: u64,
    /// Holding balance for the requested mint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenBalance>,
}

/// Holding-account balance for one mint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenBalance {
    /// Mint address.
    pub mint: Address,
    /// Ticker symbol for well-known mints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Holding account address.
    pub holding: Address,
    /// Balance.
    pub amount: TokenAmount,
}

impl TableDisplay for BalanceInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Owner:     {}", self.owner)?;
        writeln!(writer, "Lamports:  {}", self.lamports)?;
        if let Some(token) = &self.token {
            writeln!(writer)?;
            writeln!(writer, "Mint:      {}", labeled(&token.mint, token.symbol.as_deref()))?;
            writeln!(writer, "Holding:   {}", token.holding)?;
            writeln!(writer, "Balance:   {} ({} raw)", token.amount.ui, token.amount.raw)?;
        }
        Ok(())
    }
}

/// Tokens minted to an owner.
#[derive(Debug, Clone, Serialize)]
pub struct MintedInfo {
    /// Mint address.
    pub mint: Address,
    /// Recipient owner.
    pub owner: Address,
    /// Holding account credited.
    pub holding: Address,
    /// Amount minted.
    pub amount: TokenAmount,
}

impl TableDisplay for MintedInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "✓ Minted {} ({} raw) to {}",
            self.amount.ui, self.amount.raw, self.owner
        )?;
        writeln!(writer, "  Holding:  {}", self.holding)?;
        Ok(())
    }
}

/// A listing for display.
#[derive(Debug, Clone, Serialize)]
pub struct ListingInfo {
    /// Listing address.
    pub address: Address,
    /// Seller.
    pub seller: Address,
    /// Mint being sold.
    pub sell_asset: Address,
    /// Symbol of the sell asset, if well known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_symbol: Option<String>,
    /// Mint accepted as payment.
    pub buy_asset: Address,
    /// Symbol of the buy asset, if well known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_symbol: Option<String>,
    /// Raw price.
    pub price_per_unit: u64,
    /// Denomination of the price.
    pub price_basis: PriceBasis,
    /// Quantity left.
    pub remaining: TokenAmount,
    /// Seller-chosen id.
    pub listing_id: u64,
    /// Escrow holding account.
    pub escrow_address: Address,
    /// Whether any quantity is left.
    pub active: bool,
}

impl ListingInfo {
    /// Display form of `listing` stored at `address`, naming mints found
    /// in `known`.
    #[must_use]
    pub fn new(address: Address, listing: &Listing, known: &KnownMints) -> Self {
        let symbol = |mint: &Address| known.by_mint(mint).map(|t| t.symbol.to_string());
        Self {
            address,
            seller: listing.seller,
            sell_asset: listing.sell_asset,
            sell_symbol: symbol(&listing.sell_asset),
            buy_asset: listing.buy_asset,
            buy_symbol: symbol(&listing.buy_asset),
            price_per_unit: listing.price_per_unit,
            price_basis: listing.price_basis,
            remaining: TokenAmount::new(listing.remaining_amount, listing.sell_decimals),
            listing_id: listing.listing_id,
            escrow_address: listing.escrow_address,
            active: listing.is_active(),
        }
    }
}

const fn basis_label(basis: PriceBasis) -> &'static str {
    match basis {
        PriceBasis::PerRawUnit => "per raw unit",
        PriceBasis::PerWholeToken => "per token",
    }
}

impl TableDisplay for ListingInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Listing {}", self.address)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Seller:      {}", self.seller)?;
        writeln!(writer, "Listing ID:  {}", self.listing_id)?;
        writeln!(
            writer,
            "Selling:     {}",
            labeled(&self.sell_asset, self.sell_symbol.as_deref())
        )?;
        writeln!(
            writer,
            "For:         {}",
            labeled(&self.buy_asset, self.buy_symbol.as_deref())
        )?;
        writeln!(
            writer,
            "Price:       {} raw {}",
            self.price_per_unit,
            basis_label(self.price_basis)
        )?;
        writeln!(
            writer,
            "Remaining:   {} ({} raw)",
            self.remaining.ui, self.remaining.raw
        )?;
        writeln!(writer, "Escrow:      {}", self.escrow_address)?;
        writeln!(
            writer,
            "Status:      {}",
            if self.active { "active" } else { "sold out" }
        )?;
        Ok(())
    }
}

/// Several listings.
#[derive(Debug, Clone, Serialize)]
pub struct ListingList {
    /// Listings in address order.
    pub listings: Vec<ListingInfo>,
}

impl TableDisplay for ListingList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.listings.is_empty() {
            writeln!(writer, "No listings")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:<44}  {:<12}  {:<12}  {:>20}  {:>14}  {:<8}",
            "ADDRESS", "SELLER", "SELLING", "REMAINING", "PRICE", "STATUS"
        )?;
        writeln!(writer, "{}", "─".repeat(120))?;

        for listing in &self.listings {
            writeln!(
                writer,
                "{:<44}  {:<12}  {:<12}  {:>20}  {:>14}  {:<8}",
                listing.address.to_string(),
                short(&listing.seller),
                listing
                    .sell_symbol
                    .clone()
                    .unwrap_or_else(|| short(&listing.sell_asset)),
                listing.remaining.ui,
                listing.price_per_unit,
                if listing.active { "active" } else { "sold out" }
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} listing(s)", self.listings.len())?;
        Ok(())
    }
}

/// Result of `listing create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedInfo {
    /// Listing address.
    pub listing: Address,
    /// Quantity locked in escrow.
    pub amount: TokenAmount,
    /// Lamports deposited for storage.
    pub deposit: u64,
}

impl TableDisplay for CreatedInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "✓ Listing created: {}", self.listing)?;
        writeln!(writer, "  Escrowed:  {} ({} raw)", self.amount.ui, self.amount.raw)?;
        writeln!(writer, "  Deposit:   {} lamports", self.deposit)?;
        Ok(())
    }
}

/// Result of `listing buy`.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseInfo {
    /// Listing address.
    pub listing: Address,
    /// Quantity bought.
    pub bought: TokenAmount,
    /// Amount paid.
    pub paid: TokenAmount,
    /// Quantity left on the listing.
    pub remaining: TokenAmount,
}

impl TableDisplay for PurchaseInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(
            writer,
            "✓ Bought {} for {} ({} raw)",
            self.bought.ui, self.paid.ui, self.paid.raw
        )?;
        writeln!(writer, "  Remaining:  {}", self.remaining.ui)?;
        Ok(())
    }
}

/// Result of `listing quote`.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteInfo {
    /// Listing address.
    pub listing: Address,
    /// Quantity quoted.
    pub amount: TokenAmount,
    /// Cost in the buy asset.
    pub cost: TokenAmount,
    /// Symbol of the buy asset, if well known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl TableDisplay for QuoteInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let unit = self.symbol.as_deref().unwrap_or("raw buy units");
        writeln!(writer, "Listing:  {}", self.listing)?;
        writeln!(writer, "Amount:   {} ({} raw)", self.amount.ui, self.amount.raw)?;
        writeln!(writer, "Cost:     {} {unit} ({} raw)", self.cost.ui, self.cost.raw)?;
        Ok(())
    }
}

/// Result of `listing cancel`.
#[derive(Debug, Clone, Serialize)]
pub struct CancelInfo {
    /// Listing address.
    pub listing: Address,
    /// Quantity returned to the seller.
    pub returned: TokenAmount,
    /// Lamports refunded to the seller.
    pub refunded_lamports: u64,
}

impl TableDisplay for CancelInfo {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "✓ Listing cancelled: {}", self.listing)?;
        writeln!(writer, "  Returned:  {} ({} raw)", self.returned.ui, self.returned.raw)?;
        writeln!(writer, "  Refunded:  {} lamports", self.refunded_lamports)?;
        Ok(())
    }
}

/// `address`, followed by its symbol when known.
fn labeled(address: &Address, symbol: Option<&str>) -> String {
    match symbol {
        Some(symbol) => format!("{address} ({symbol})"),
        None => address.to_string(),
    }
}

/// First and last four characters of an address.
fn short(address: &Address) -> String {
    let text = address.to_string();
    if text.len() <= 12 {
        text
    } else {
        format!("{}..{}", &text[..4], &text[text.len() - 4..])
    }
}
