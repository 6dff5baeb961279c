//! Marketplace listing commands.

use std::io::Write;

use puzi_core::parse_ui_amount;
use puzi_market::{CreateListingParams, price_from_ui, quote_purchase};
use tracing::debug;

use super::{Session, load_keypair};
use crate::cli::{CreateListingArgs, ListingCommands};
use crate::error::CliError;
use crate::output::{
    CancelInfo, CreatedInfo, ListingInfo, ListingList, OutputFormat, PurchaseInfo, QuoteInfo,
    TokenAmount,
};

/// Listing command executor.
pub struct ListingCommand<'a> {
    session: &'a Session,
}

impl<'a> ListingCommand<'a> {
    /// Create a new listing command.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Execute a listing subcommand.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        command: &ListingCommands,
    ) -> Result<(), CliError> {
        let market = self.session.market();
        match command {
            ListingCommands::Create(args) => {
                let created = self.create(args)?;
                format.write(writer, &created)?;
            }
            ListingCommands::Buy {
                buyer,
                listing,
                amount,
            } => {
                let buyer = load_keypair(buyer)?;
                let record = market.listing(listing)?;
                let buy_amount = parse_ui_amount(amount, record.sell_decimals)?;
                // Reject before the buyer pays for a receiving account.
                let quoted = quote_purchase(&record, buy_amount)?;
                debug!(listing = %listing, buy_amount, quoted, "submitting purchase");
                let receipt = market.purchase(&buyer, listing, buy_amount)?;
                self.session.save()?;
                let buy_decimals = self.session.decimals(&record.buy_asset)?;
                format.write(
                    writer,
                    &PurchaseInfo {
                        listing: *listing,
                        bought: TokenAmount::new(buy_amount, record.sell_decimals),
                        paid: TokenAmount::new(receipt.total_cost, buy_decimals),
                        remaining: TokenAmount::new(receipt.remaining_amount, record.sell_decimals),
                    },
                )?;
            }
            ListingCommands::Quote { listing, amount } => {
                let record = market.listing(listing)?;
                let buy_amount = parse_ui_amount(amount, record.sell_decimals)?;
                let cost = quote_purchase(&record, buy_amount)?;
                let buy_decimals = self.session.decimals(&record.buy_asset)?;
                format.write(
                    writer,
                    &QuoteInfo {
                        listing: *listing,
                        amount: TokenAmount::new(buy_amount, record.sell_decimals),
                        cost: TokenAmount::new(cost, buy_decimals),
                        symbol: self.session.symbol(&record.buy_asset),
                    },
                )?;
            }
            ListingCommands::Cancel { seller, listing } => {
                let seller = load_keypair(seller)?;
                let record = market.listing(listing)?;
                let receipt = market.cancel_listing(&seller, listing)?;
                self.session.save()?;
                format.write(
                    writer,
                    &CancelInfo {
                        listing: *listing,
                        returned: TokenAmount::new(receipt.returned_amount, record.sell_decimals),
                        refunded_lamports: receipt.refunded_lamports,
                    },
                )?;
            }
            ListingCommands::Show { listing } => {
                let record = market.listing(listing)?;
                format.write(
                    writer,
                    &ListingInfo::new(*listing, &record, self.session.known_mints()),
                )?;
            }
            ListingCommands::List {
                seller,
                mint,
                active,
            } => {
                let found = match seller {
                    Some(seller) => market.listings_by_seller(seller),
                    None => market.all_listings(),
                };
                let listings = found
                    .into_iter()
                    .filter(|(_, listing)| mint.is_none_or(|m| listing.sell_asset == m))
                    .filter(|(_, listing)| !*active || listing.is_active())
                    .map(|(address, listing)| {
                        ListingInfo::new(address, &listing, self.session.known_mints())
                    })
                    .collect();
                format.write(writer, &ListingList { listings })?;
            }
        }
        Ok(())
    }

    fn create(&self, args: &CreateListingArgs) -> Result<CreatedInfo, CliError> {
        let ledger = self.session.ledger();
        let seller = load_keypair(&args.seller)?;
        let sell_decimals = self.session.decimals(&args.sell_mint)?;
        let buy_decimals = self.session.decimals(&args.buy_mint)?;
        let amount = parse_ui_amount(&args.amount, sell_decimals)?;
        let (price_per_unit, price_basis) = price_from_ui(&args.price, sell_decimals, buy_decimals)?;

        let mut params = CreateListingParams::new(args.sell_mint, args.buy_mint, amount, price_per_unit)
            .with_basis(price_basis);
        params.listing_id = args.id;

        // Proceeds land in the seller's payment holding account.
        ledger.create_token_account(&seller, &seller.address(), &args.buy_mint)?;

        let created = self
            .session
            .market()
            .create_listing_with_receipt(&seller, params)?;
        self.session.save()?;
        Ok(CreatedInfo {
            listing: created.listing,
            amount: TokenAmount::new(amount, sell_decimals),
            deposit: created.deposit,
        })
    }
}
