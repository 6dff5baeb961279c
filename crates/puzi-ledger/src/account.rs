//! Account state.

use puzi_core::{Address, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
use serde::{Deserialize, Serialize};

/// Storage size of a mint account in bytes.
pub const MINT_SPACE: usize = 82;

/// Storage size of a token holding account in bytes.
pub const TOKEN_ACCOUNT_SPACE: usize = 165;

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Native balance, including any storage deposit.
    pub lamports: u64,
    /// Program allowed to mutate the account's data.
    pub owner: Address,
    /// Typed account contents.
    pub data: AccountData,
}

/// Contents of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountData {
    /// Plain wallet with no data.
    Empty,
    /// Fungible asset definition.
    Mint {
        /// Decimal precision of the asset.
        decimals: u8,
        /// Total raw units in circulation.
        supply: u64,
        /// Address allowed to mint new units.
        mint_authority: Address,
    },
    /// Balance of one mint held for one owner.
    Token {
        /// Mint the balance is denominated in.
        mint: Address,
        /// Address allowed to move the balance.
        owner: Address,
        /// Raw-unit balance.
        amount: u64,
    },
    /// Opaque data owned by a program.
    Program {
        /// Bytes reserved at creation; rent was paid on this.
        space: usize,
        /// Current contents, at most `space` bytes.
        bytes: Vec<u8>,
    },
}

impl Account {
    /// A system-owned wallet holding `lamports`.
    #[must_use]
    pub const fn wallet(lamports: u64) -> Self {
        Self {
            lamports,
            owner: SYSTEM_PROGRAM_ID,
            data: AccountData::Empty,
        }
    }

    /// A token-program mint.
    #[must_use]
    pub const fn mint(lamports: u64, decimals: u8, mint_authority: Address) -> Self {
        Self {
            lamports,
            owner: TOKEN_PROGRAM_ID,
            data: AccountData::Mint {
                decimals,
                supply: 0,
                mint_authority,
            },
        }
    }

    /// An empty token holding account.
    #[must_use]
    pub const fn token(lamports: u64, mint: Address, owner: Address) -> Self {
        Self {
            lamports,
            owner: TOKEN_PROGRAM_ID,
            data: AccountData::Token {
                mint,
                owner,
                amount: 0,
            },
        }
    }

    /// Storage size used for rent.
    #[must_use]
    pub const fn space(&self) -> usize {
        match &self.data {
            AccountData::Empty => 0,
            AccountData::Mint { .. } => MINT_SPACE,
            AccountData::Token { .. } => TOKEN_ACCOUNT_SPACE,
            AccountData::Program { space, .. } => *space,
        }
    }

    /// Token balance, if this is a token account.
    #[must_use]
    pub const fn token_amount(&self) -> Option<u64> {
        match self.data {
            AccountData::Token { amount, .. } => Some(amount),
            _ => None,
        }
    }

    /// Program data, if this is a program account.
    #[must_use]
    pub fn program_data(&self) -> Option<&[u8]> {
        match &self.data {
            AccountData::Program { bytes, .. } => Some(bytes),
            _ => None,
        }
    }
}
