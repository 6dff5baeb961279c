//! Market program entry point.

use puzi_core::Address;
use puzi_ledger::{Program, TxContext};
use serde::{Deserialize, Serialize};

use crate::error::MarketError;
use crate::instruction::MarketInstruction;
use crate::instructions::{cancel_listing, create_listing, purchase};

/// Result of a successful create-listing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingCreated {
    /// Address of the new listing record.
    pub listing: Address,
    /// Lamports taken from the seller as storage deposit.
    pub deposit: u64,
}

/// Result of a successful purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    /// Raw buy-asset units paid to the seller.
    pub total_cost: u64,
    /// Raw sell-asset units left on the listing.
    pub remaining_amount: u64,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelReceipt {
    /// Raw sell-asset units returned to the seller.
    pub returned_amount: u64,
    /// Storage deposit refunded to the seller, in lamports.
    pub refunded_lamports: u64,
}

/// What an instruction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionOutcome {
    /// A listing was created.
    Created(ListingCreated),
    /// A purchase settled.
    Purchased(PurchaseReceipt),
    /// A listing was cancelled.
    Cancelled(CancelReceipt),
}

/// Decodes the context's instruction data and runs the matching handler.
pub fn process_instruction(ctx: &mut TxContext<'_>) -> Result<InstructionOutcome, MarketError> {
    let instruction = MarketInstruction::unpack(ctx.instruction_data())?;
    let keys = ctx.account_keys().to_vec();
    match instruction {
        MarketInstruction::CreateListing {
            listing_id,
            amount,
            price_per_unit,
            price_basis,
        } => create_listing::process(ctx, &keys, listing_id, amount, price_per_unit, price_basis)
            .map(InstructionOutcome::Created),
        MarketInstruction::Purchase { buy_amount } => {
            purchase::process(ctx, &keys, buy_amount).map(InstructionOutcome::Purchased)
        }
        MarketInstruction::CancelListing => {
            cancel_listing::process(ctx, &keys).map(InstructionOutcome::Cancelled)
        }
    }
}

/// The market program, bound to a ledger with [`puzi_ledger::Ledger::register_program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketProgram {
    id: Address,
}

impl MarketProgram {
    /// The market program running under `id`.
    #[must_use]
    pub const fn new(id: Address) -> Self {
        Self { id }
    }
}

impl Program for MarketProgram {
    type Output = InstructionOutcome;
    type Error = MarketError;

    fn id(&self) -> Address {
        self.id
    }

    fn process(&self, ctx: &mut TxContext<'_>) -> Result<InstructionOutcome, MarketError> {
        process_instruction(ctx)
    }
}
