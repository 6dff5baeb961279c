//! The token program.
//!
//! Mints, holding accounts and transfers. Operations are methods on
//! [`TxContext`] so any program can invoke them inside its own transaction;
//! [`process_token_instruction`] is the entry point when the token program
//! itself is the executing program.

use puzi_core::{Address, associated_token_address, units_per_token};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::account::{Account, AccountData, MINT_SPACE, TOKEN_ACCOUNT_SPACE};
use crate::context::TxContext;
use crate::error::LedgerError;

/// Decoded token holding account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccount {
    /// Mint the balance is denominated in.
    pub mint: Address,
    /// Address allowed to move the balance.
    pub owner: Address,
    /// Raw-unit balance.
    pub amount: u64,
}

impl TokenAccount {
    /// Decodes `account`, failing if it is not a token holding account.
    pub fn unpack(address: &Address, account: &Account) -> Result<Self, LedgerError> {
        match account.data {
            AccountData::Token {
                mint,
                owner,
                amount,
            } => Ok(Self {
                mint,
                owner,
                amount,
            }),
            _ => Err(LedgerError::NotATokenAccount(*address)),
        }
    }
}

/// Instructions understood by the token program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "instruction", rename_all = "snake_case")]
pub enum TokenInstruction {
    /// Accounts: `[payer (s, w), mint (s, w)]`.
    CreateMint {
        /// Decimal precision.
        decimals: u8,
        /// Address allowed to mint.
        mint_authority: Address,
    },
    /// Accounts: `[payer (s, w), holding (w), owner, mint]`.
    CreateAssociatedAccount,
    /// Accounts: `[authority (s, w), mint (w), holding (w), owner]`.
    ///
    /// Creates the owner's associated holding account first if missing.
    MintTo {
        /// Raw units to mint.
        amount: u64,
    },
}

impl TokenInstruction {
    /// Encodes the instruction as message data.
    pub fn pack(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes message data.
    pub fn unpack(data: &[u8]) -> Result<Self, LedgerError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Runs a [`TokenInstruction`] carried in the context's instruction data.
pub fn process_token_instruction(ctx: &mut TxContext<'_>) -> Result<(), LedgerError> {
    let instruction = TokenInstruction::unpack(ctx.instruction_data())?;
    let keys = ctx.account_keys().to_vec();
    let key = |index: usize| {
        keys.get(index)
            .copied()
            .ok_or_else(|| LedgerError::serialization(format!("missing account #{index}")))
    };

    match instruction {
        TokenInstruction::CreateMint {
            decimals,
            mint_authority,
        } => ctx.create_mint(&key(0)?, &key(1)?, &mint_authority, decimals),
        TokenInstruction::CreateAssociatedAccount => {
            let holding = ctx.create_associated_token_account(&key(0)?, &key(2)?, &key(3)?)?;
            if holding != key(1)? {
                return Err(LedgerError::NotATokenAccount(key(1)?));
            }
            Ok(())
        }
        TokenInstruction::MintTo { amount } => {
            let (authority, mint, holding, owner) = (key(0)?, key(1)?, key(2)?, key(3)?);
            let created = ctx.create_associated_token_account(&authority, &owner, &mint)?;
            if created != holding {
                return Err(LedgerError::NotATokenAccount(holding));
            }
            ctx.mint_to(&mint, &holding, &authority, amount)
        }
    }
}

impl TxContext<'_> {
    /// Reads a declared token holding account.
    pub fn token_account(&self, address: &Address) -> Result<TokenAccount, LedgerError> {
        TokenAccount::unpack(address, self.existing(address)?)
    }

    fn set_token_amount(&mut self, address: &Address, value: u64) -> Result<(), LedgerError> {
        match &mut self.existing_mut(address)?.data {
            AccountData::Token { amount, .. } => {
                *amount = value;
                Ok(())
            }
            _ => Err(LedgerError::NotATokenAccount(*address)),
        }
    }

    /// Creates a mint. The mint address must sign, proving it is fresh.
    pub fn create_mint(
        &mut self,
        payer: &Address,
        mint: &Address,
        mint_authority: &Address,
        decimals: u8,
    ) -> Result<(), LedgerError> {
        units_per_token(decimals)?;
        self.require_signer(mint)?;
        let deposit = self.rent().minimum_balance(MINT_SPACE);
        self.create_account(payer, mint, Account::mint(deposit, decimals, *mint_authority))?;
        debug!(%mint, decimals, "created mint");
        Ok(())
    }

    /// Ensures `owner` has its associated holding account for `mint`.
    ///
    /// Idempotent: an existing, consistent account is left untouched and
    /// nothing is charged. A new account is funded by `payer`.
    pub fn create_associated_token_account(
        &mut self,
        payer: &Address,
        owner: &Address,
        mint: &Address,
    ) -> Result<Address, LedgerError> {
        let address = associated_token_address(owner, mint)?;
        match self.existing(mint)?.data {
            AccountData::Mint { .. } => {}
            _ => return Err(LedgerError::NotAMint(*mint)),
        }

        if let Some(existing) = self.account(&address)? {
            let token = TokenAccount::unpack(&address, existing)?;
            if token.mint != *mint {
                return Err(LedgerError::MintMismatch {
                    expected: *mint,
                    found: token.mint,
                });
            }
            if token.owner != *owner {
                return Err(LedgerError::OwnerMismatch {
                    expected: *owner,
                    found: token.owner,
                });
            }
            return Ok(address);
        }

        let deposit = self.rent().minimum_balance(TOKEN_ACCOUNT_SPACE);
        self.create_account(payer, &address, Account::token(deposit, *mint, *owner))?;
        debug!(%address, %owner, %mint, "created associated token account");
        Ok(address)
    }

    /// Moves `amount` between two holding accounts of the same mint.
    ///
    /// `authority` must own `from` and must have signed or been derived.
    pub fn token_transfer(
        &mut self,
        from: &Address,
        to: &Address,
        authority: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.require_authority(authority)?;
        let source = self.token_account(from)?;
        if source.owner != *authority {
            return Err(LedgerError::OwnerMismatch {
                expected: source.owner,
                found: *authority,
            });
        }
        let destination = self.token_account(to)?;
        if destination.mint != source.mint {
            return Err(LedgerError::MintMismatch {
                expected: source.mint,
                found: destination.mint,
            });
        }
        if source.amount < amount {
            return Err(LedgerError::InsufficientFunds {
                required: amount,
                available: source.amount,
            });
        }
        if from == to {
            self.existing_mut(from)?;
            return Ok(());
        }

        let credited = destination
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.set_token_amount(from, source.amount - amount)?;
        self.set_token_amount(to, credited)?;
        Ok(())
    }

    /// Closes an empty holding account, moving its lamports to
    /// `destination`. Returns the lamports moved.
    pub fn close_token_account(
        &mut self,
        account: &Address,
        destination: &Address,
        authority: &Address,
    ) -> Result<u64, LedgerError> {
        self.require_authority(authority)?;
        let token = self.token_account(account)?;
        if token.owner != *authority {
            return Err(LedgerError::OwnerMismatch {
                expected: token.owner,
                found: *authority,
            });
        }
        if token.amount != 0 {
            return Err(LedgerError::NonZeroBalance {
                address: *account,
                amount: token.amount,
            });
        }

        let slot = self.slot_mut(account)?;
        let lamports = slot.as_ref().map_or(0, |a| a.lamports);
        *slot = None;
        self.credit_lamports(destination, lamports)?;
        Ok(lamports)
    }

    /// Mints `amount` new units of `mint` into `destination`.
    pub fn mint_to(
        &mut self,
        mint: &Address,
        destination: &Address,
        authority: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.require_authority(authority)?;
        let (supply, mint_authority) = match self.existing(mint)?.data {
            AccountData::Mint {
                supply,
                mint_authority,
                ..
            } => (supply, mint_authority),
            _ => return Err(LedgerError::NotAMint(*mint)),
        };
        if mint_authority != *authority {
            return Err(LedgerError::OwnerMismatch {
                expected: mint_authority,
                found: *authority,
            });
        }
        let holding = self.token_account(destination)?;
        if holding.mint != *mint {
            return Err(LedgerError::MintMismatch {
                expected: *mint,
                found: holding.mint,
            });
        }

        let new_supply = supply.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let new_amount = holding
            .amount
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if let AccountData::Mint { supply, .. } = &mut self.existing_mut(mint)?.data {
            *supply = new_supply;
        }
        self.set_token_amount(destination, new_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::tests::Fixture;
    use crate::rent::Rent;
    use proptest::prelude::*;
    use puzi_core::TOKEN_PROGRAM_ID;

    struct Setup {
        fixture: Fixture,
        payer: Address,
        mint: Address,
        authority: Address,
        alice: Address,
        alice_holding: Address,
        bob: Address,
        bob_holding: Address,
    }

    fn setup() -> Setup {
        let payer = Address::new_unique();
        let mint = Address::new_unique();
        let authority = Address::new_unique();
        let alice = Address::new_unique();
        let bob = Address::new_unique();
        let alice_holding = associated_token_address(&alice, &mint).expect("ata");
        let bob_holding = associated_token_address(&bob, &mint).expect("ata");

        let mut fixture = Fixture::new(TOKEN_PROGRAM_ID);
        fixture
            .declare(payer, true, true, Some(Account::wallet(100_000_000)))
            .declare(mint, false, true, Some(Account::mint(1_461_600, 6, authority)))
            .declare(authority, true, false, None)
            .declare(alice, true, false, None)
            .declare(alice_holding, false, true, None)
            .declare(bob, false, false, None)
            .declare(bob_holding, false, true, None);

        Setup {
            fixture,
            payer,
            mint,
            authority,
            alice,
            alice_holding,
            bob,
            bob_holding,
        }
    }

    fn funded(s: &Setup, amount: u64) -> TxContext<'_> {
        let mut ctx = s.fixture.context();
        ctx.create_associated_token_account(&s.payer, &s.alice, &s.mint)
            .expect("alice ata");
        ctx.create_associated_token_account(&s.payer, &s.bob, &s.mint)
            .expect("bob ata");
        ctx.mint_to(&s.mint, &s.alice_holding, &s.authority, amount)
            .expect("mint");
        ctx
    }

    #[test]
    fn associated_account_creation_is_idempotent() {
        let s = setup();
        let mut ctx = s.fixture.context();
        let first = ctx
            .create_associated_token_account(&s.payer, &s.alice, &s.mint)
            .expect("create");
        let lamports_after_first = ctx.existing(&s.payer).expect("payer").lamports;
        let second = ctx
            .create_associated_token_account(&s.payer, &s.alice, &s.mint)
            .expect("again");
        assert_eq!(first, second);
        assert_eq!(ctx.existing(&s.payer).expect("payer").lamports, lamports_after_first);
        assert_eq!(
            lamports_after_first,
            100_000_000 - Rent::default().minimum_balance(TOKEN_ACCOUNT_SPACE)
        );
    }

    #[test]
    fn transfer_moves_balance() {
        let s = setup();
        let mut ctx = funded(&s, 1_000);
        ctx.token_transfer(&s.alice_holding, &s.bob_holding, &s.alice, 400)
            .expect("transfer");
        assert_eq!(ctx.token_account(&s.alice_holding).expect("a").amount, 600);
        assert_eq!(ctx.token_account(&s.bob_holding).expect("b").amount, 400);
    }

    proptest! {
        #[test]
        fn transfers_conserve_supply(
            minted in 0u64..1_000_000,
            amounts in prop::collection::vec(0u64..400_000, 1..12),
        ) {
            let s = setup();
            let mut ctx = funded(&s, minted);
            for amount in amounts {
                let before = ctx.token_account(&s.alice_holding).expect("a").amount;
                let result = ctx.token_transfer(&s.alice_holding, &s.bob_holding, &s.alice, amount);
                prop_assert_eq!(result.is_ok(), amount <= before);
                let total = ctx.token_account(&s.alice_holding).expect("a").amount
                    + ctx.token_account(&s.bob_holding).expect("b").amount;
                prop_assert_eq!(total, minted);
            }
        }
    }

    #[test]
    fn transfer_reports_insufficient_funds() {
        let s = setup();
        let mut ctx = funded(&s, 10);
        let result = ctx.token_transfer(&s.alice_holding, &s.bob_holding, &s.alice, 11);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientFunds {
                required: 11,
                available: 10
            })
        ));
    }

    #[test]
    fn transfer_requires_owner_authority() {
        let s = setup();
        let mut ctx = funded(&s, 10);
        // bob is declared but did not sign
        let result = ctx.token_transfer(&s.alice_holding, &s.bob_holding, &s.bob, 1);
        assert!(matches!(result, Err(LedgerError::MissingSignature(_))));
        // authority signed but does not own the account
        let result = ctx.token_transfer(&s.alice_holding, &s.bob_holding, &s.authority, 1);
        assert!(matches!(result, Err(LedgerError::OwnerMismatch { .. })));
    }

    #[test]
    fn close_requires_zero_balance() {
        let s = setup();
        let mut ctx = funded(&s, 5);
        let result = ctx.close_token_account(&s.alice_holding, &s.payer, &s.alice);
        assert!(matches!(result, Err(LedgerError::NonZeroBalance { amount: 5, .. })));

        ctx.token_transfer(&s.alice_holding, &s.bob_holding, &s.alice, 5)
            .expect("drain");
        let before = ctx.existing(&s.payer).expect("payer").lamports;
        let refunded = ctx
            .close_token_account(&s.alice_holding, &s.payer, &s.alice)
            .expect("close");
        assert_eq!(refunded, Rent::default().minimum_balance(TOKEN_ACCOUNT_SPACE));
        assert_eq!(ctx.existing(&s.payer).expect("payer").lamports, before + refunded);
        assert!(!ctx.exists(&s.alice_holding).expect("declared"));
    }

    #[test]
    fn mint_to_tracks_supply_and_rejects_overflow() {
        let s = setup();
        let mut ctx = funded(&s, u64::MAX - 1);
        assert!(matches!(
            ctx.existing(&s.mint).expect("mint").data,
            AccountData::Mint { supply, .. } if supply == u64::MAX - 1
        ));
        let result = ctx.mint_to(&s.mint, &s.alice_holding, &s.authority, 2);
        assert!(matches!(result, Err(LedgerError::Overflow)));
    }

    #[test]
    fn mint_to_rejects_wrong_authority() {
        let s = setup();
        let mut ctx = funded(&s, 0);
        let result = ctx.mint_to(&s.mint, &s.alice_holding, &s.alice, 1);
        assert!(matches!(result, Err(LedgerError::OwnerMismatch { .. })));
    }

    #[test]
    fn instruction_json_is_tagged() {
        let packed = TokenInstruction::MintTo { amount: 3 }.pack().expect("pack");
        assert_eq!(packed, br#"{"instruction":"mint_to","amount":3}"#.to_vec());
        assert_eq!(
            TokenInstruction::unpack(&packed).expect("unpack"),
            TokenInstruction::MintTo { amount: 3 }
        );
    }
}
