//! The ledger: committed account state and atomic transaction execution.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use parking_lot::RwLock;
use puzi_core::{
    ASSOCIATED_TOKEN_PROGRAM_ID, Address, Keypair, TOKEN_PROGRAM_ID, associated_token_address,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::context::{Access, TxContext};
use crate::error::LedgerError;
use crate::locks::AccountLocks;
use crate::program::{Program, ProgramRegistry, TokenProgram};
use crate::rent::Rent;
use crate::token::{TokenAccount, TokenInstruction};
use crate::transaction::{AccountMeta, Message, Transaction};

/// Serializable copy of the whole ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Rent parameters.
    #[serde(default)]
    pub rent: Rent,
    /// Every live account.
    #[serde(default)]
    pub accounts: BTreeMap<Address, Account>,
}

/// An in-process account ledger.
///
/// Transactions lock their declared accounts, run against a working copy
/// and commit all-or-nothing. Transactions over disjoint account sets run
/// in parallel. Every transaction is executed by the program registered
/// for the id its message names.
#[derive(Debug)]
pub struct Ledger {
    rent: Rent,
    accounts: RwLock<HashMap<Address, Account>>,
    locks: AccountLocks,
    programs: ProgramRegistry,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(Rent::default())
    }
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new(rent: Rent) -> Self {
        Self {
            rent,
            accounts: RwLock::new(HashMap::new()),
            locks: AccountLocks::default(),
            programs: ProgramRegistry::with_builtins(),
        }
    }

    /// Restore a ledger from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        debug!(accounts = snapshot.accounts.len(), "restored ledger snapshot");
        Self {
            rent: snapshot.rent,
            accounts: RwLock::new(snapshot.accounts.into_iter().collect()),
            locks: AccountLocks::default(),
            programs: ProgramRegistry::with_builtins(),
        }
    }

    /// Copy the committed state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            rent: self.rent,
            accounts: self
                .accounts
                .read()
                .iter()
                .map(|(address, account)| (*address, account.clone()))
                .collect(),
        }
    }

    /// Rent parameters.
    #[must_use]
    pub const fn rent(&self) -> &Rent {
        &self.rent
    }

    /// Binds `program` to its id. The token programs are always registered.
    pub fn register_program<P: Program>(&self, program: &P) -> Result<(), LedgerError> {
        self.programs.register(program)
    }

    /// Executes `tx` with `program` as one atomic transaction.
    ///
    /// `program` must be the implementation registered for the message's
    /// program id. Signatures are verified first, then the declared accounts
    /// are locked and loaded into a [`TxContext`]. The working copy is
    /// committed only if the program succeeds and lamports are conserved;
    /// otherwise nothing changes.
    pub fn process<P: Program>(&self, tx: &Transaction, program: &P) -> Result<P::Output, P::Error> {
        if let Err(e) = self.programs.authorize(program, &tx.message.program_id) {
            warn!(program = %tx.message.program_id, error = %e, "rejected transaction");
            return Err(e.into());
        }
        self.run(tx, |ctx| program.process(ctx))
    }

    pub(crate) fn run<T, E, F>(&self, tx: &Transaction, handler: F) -> Result<T, E>
    where
        E: From<LedgerError> + fmt::Display,
        F: FnOnce(&mut TxContext<'_>) -> Result<T, E>,
    {
        let message = &tx.message;
        let program_id = message.program_id;

        if let Err(e) = tx.verify() {
            warn!(program = %program_id, error = %e, "rejected transaction");
            return Err(e.into());
        }

        let mut access: HashMap<Address, Access> = HashMap::new();
        for meta in &message.accounts {
            let entry = access.entry(meta.address).or_default();
            entry.is_signer |= meta.is_signer;
            entry.is_writable |= meta.is_writable;
        }
        let (writable, readonly): (Vec<_>, Vec<_>) =
            access.iter().partition(|(_, a)| a.is_writable);
        let writable: Vec<Address> = writable.into_iter().map(|(a, _)| *a).collect();
        let readonly: Vec<Address> = readonly.into_iter().map(|(a, _)| *a).collect();

        let _guard = self.locks.acquire(writable, readonly);

        let loaded: HashMap<Address, Option<Account>> = {
            let accounts = self.accounts.read();
            access
                .keys()
                .map(|address| (*address, accounts.get(address).cloned()))
                .collect()
        };
        let keys: Vec<Address> = message.accounts.iter().map(|m| m.address).collect();
        let mut ctx = TxContext::new(program_id, &self.rent, &keys, &message.data, access, loaded);
        let before = ctx.total_lamports();

        let value = match handler(&mut ctx) {
            Ok(value) => value,
            Err(e) => {
                warn!(program = %program_id, error = %e, "rejected transaction");
                return Err(e);
            }
        };

        let after = ctx.total_lamports();
        if before != after {
            let e = LedgerError::UnbalancedTransaction { before, after };
            warn!(program = %program_id, error = %e, "rejected transaction");
            return Err(e.into());
        }

        let writes = ctx.into_writes();
        let count = writes.len();
        {
            let mut accounts = self.accounts.write();
            for (address, slot) in writes {
                match slot {
                    Some(account) => {
                        accounts.insert(address, account);
                    }
                    None => {
                        accounts.remove(&address);
                    }
                }
            }
        }
        debug!(program = %program_id, writes = count, "committed transaction");
        Ok(value)
    }

    /// Credits `lamports` to `address` out of thin air. Development faucet.
    ///
    /// Returns the new balance.
    pub fn airdrop(&self, address: &Address, lamports: u64) -> Result<u64, LedgerError> {
        let _guard = self.locks.acquire(vec![*address], vec![]);
        let mut accounts = self.accounts.write();
        let account = accounts
            .entry(*address)
            .or_insert_with(|| Account::wallet(0));
        account.lamports = account
            .lamports
            .checked_add(lamports)
            .ok_or(LedgerError::Overflow)?;
        info!(%address, lamports, balance = account.lamports, "airdrop");
        Ok(account.lamports)
    }

    /// Creates a mint signed by `payer` and `mint`.
    pub fn create_mint(
        &self,
        payer: &Keypair,
        mint: &Keypair,
        mint_authority: &Address,
        decimals: u8,
    ) -> Result<(), LedgerError> {
        let data = TokenInstruction::CreateMint {
            decimals,
            mint_authority: *mint_authority,
        }
        .pack()?;
        let message = Message::new(
            TOKEN_PROGRAM_ID,
            vec![
                AccountMeta::new(payer.address(), true),
                AccountMeta::new(mint.address(), true),
            ],
            data,
        );
        let tx = Transaction::new(message, &[payer, mint])?;
        self.process(&tx, &TokenProgram::TOKEN)?;
        info!(mint = %mint.address(), decimals, "mint created");
        Ok(())
    }

    /// Creates `owner`'s associated holding account for `mint`, if missing.
    pub fn create_token_account(
        &self,
        payer: &Keypair,
        owner: &Address,
        mint: &Address,
    ) -> Result<Address, LedgerError> {
        let holding = associated_token_address(owner, mint)?;
        let message = Message::new(
            ASSOCIATED_TOKEN_PROGRAM_ID,
            vec![
                AccountMeta::new(payer.address(), true),
                AccountMeta::new(holding, false),
                AccountMeta::new_readonly(*owner, false),
                AccountMeta::new_readonly(*mint, false),
            ],
            TokenInstruction::CreateAssociatedAccount.pack()?,
        );
        let tx = Transaction::new(message, &[payer])?;
        self.process(&tx, &TokenProgram::ASSOCIATED)?;
        Ok(holding)
    }

    /// Mints `amount` to `owner`'s associated holding account, creating it
    /// (paid by `authority`) when missing.
    pub fn mint_to(
        &self,
        authority: &Keypair,
        mint: &Address,
        owner: &Address,
        amount: u64,
    ) -> Result<Address, LedgerError> {
        let holding = associated_token_address(owner, mint)?;
        let message = Message::new(
            TOKEN_PROGRAM_ID,
            vec![
                AccountMeta::new(authority.address(), true),
                AccountMeta::new(*mint, false),
                AccountMeta::new(holding, false),
                AccountMeta::new_readonly(*owner, false),
            ],
            TokenInstruction::MintTo { amount }.pack()?,
        );
        let tx = Transaction::new(message, &[authority])?;
        self.process(&tx, &TokenProgram::TOKEN)?;
        info!(%mint, %owner, amount, "minted");
        Ok(holding)
    }

    /// A committed account.
    #[must_use]
    pub fn account(&self, address: &Address) -> Option<Account> {
        self.accounts.read().get(address).cloned()
    }

    /// Lamport balance; zero for missing accounts.
    #[must_use]
    pub fn balance(&self, address: &Address) -> u64 {
        self.accounts.read().get(address).map_or(0, |a| a.lamports)
    }

    /// Balance of `owner`'s associated holding account for `mint`; zero if
    /// the account does not exist.
    pub fn token_balance(&self, owner: &Address, mint: &Address) -> Result<u64, LedgerError> {
        let holding = associated_token_address(owner, mint)?;
        self.account(&holding).map_or(Ok(0), |account| {
            TokenAccount::unpack(&holding, &account).map(|t| t.amount)
        })
    }

    /// Every account owned by `program_id`, ordered by address.
    #[must_use]
    pub fn program_accounts(&self, program_id: &Address) -> Vec<(Address, Account)> {
        let mut found: Vec<(Address, Account)> = self
            .accounts
            .read()
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .map(|(address, account)| (*address, account.clone()))
            .collect();
        found.sort_by_key(|(address, _)| *address);
        found
    }
}
