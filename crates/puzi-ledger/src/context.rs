//! The view of the ledger a transaction handler runs against.

use std::collections::{HashMap, HashSet};

use puzi_core::{Address, create_program_address};

use crate::account::{Account, AccountData};
use crate::error::LedgerError;
use crate::rent::Rent;

/// How a transaction declared an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Access {
    pub(crate) is_signer: bool,
    pub(crate) is_writable: bool,
}

/// Working copy of the declared accounts for one transaction.
///
/// Nothing written here is visible to other transactions until the handler
/// returns `Ok` and the ledger commits the copy.
#[derive(Debug)]
pub struct TxContext<'a> {
    program_id: Address,
    rent: &'a Rent,
    keys: &'a [Address],
    data: &'a [u8],
    access: HashMap<Address, Access>,
    accounts: HashMap<Address, Option<Account>>,
    derived: HashSet<Address>,
}

impl<'a> TxContext<'a> {
    pub(crate) fn new(
        program_id: Address,
        rent: &'a Rent,
        keys: &'a [Address],
        data: &'a [u8],
        access: HashMap<Address, Access>,
        accounts: HashMap<Address, Option<Account>>,
    ) -> Self {
        Self {
            program_id,
            rent,
            keys,
            data,
            access,
            accounts,
            derived: HashSet::new(),
        }
    }

    /// The executing program.
    #[must_use]
    pub const fn program_id(&self) -> &Address {
        &self.program_id
    }

    /// Ledger rent parameters.
    #[must_use]
    pub const fn rent(&self) -> &Rent {
        self.rent
    }

    /// Declared account addresses, in message order.
    #[must_use]
    pub const fn account_keys(&self) -> &[Address] {
        self.keys
    }

    /// The instruction payload.
    #[must_use]
    pub const fn instruction_data(&self) -> &[u8] {
        self.data
    }

    /// Whether `address` signed the transaction.
    #[must_use]
    pub fn is_signer(&self, address: &Address) -> bool {
        self.access.get(address).is_some_and(|a| a.is_signer)
    }

    /// Whether `address` signed, or was derived by the executing program
    /// through [`TxContext::sign_derived`].
    #[must_use]
    pub fn is_authority(&self, address: &Address) -> bool {
        self.is_signer(address) || self.derived.contains(address)
    }

    /// Fails with [`LedgerError::MissingSignature`] unless `address` signed.
    pub fn require_signer(&self, address: &Address) -> Result<(), LedgerError> {
        if self.is_signer(address) {
            Ok(())
        } else {
            Err(LedgerError::MissingSignature(*address))
        }
    }

    /// Fails with [`LedgerError::MissingSignature`] unless `address` may act.
    pub fn require_authority(&self, address: &Address) -> Result<(), LedgerError> {
        if self.is_authority(address) {
            Ok(())
        } else {
            Err(LedgerError::MissingSignature(*address))
        }
    }

    /// Lets the executing program act for one of its derived addresses.
    ///
    /// The address is recomputed from `seeds` and `bump` with this program's
    /// id, so a program can only ever authorize addresses it derived itself.
    pub fn sign_derived(&mut self, seeds: &[&[u8]], bump: u8) -> Result<Address, LedgerError> {
        let address = create_program_address(seeds, bump, &self.program_id)?;
        self.derived.insert(address);
        Ok(address)
    }

    /// Reads a declared account; `None` if it does not exist.
    pub fn account(&self, address: &Address) -> Result<Option<&Account>, LedgerError> {
        self.accounts
            .get(address)
            .map(Option::as_ref)
            .ok_or(LedgerError::UndeclaredAccount(*address))
    }

    /// Reads a declared account that must exist.
    pub fn existing(&self, address: &Address) -> Result<&Account, LedgerError> {
        self.account(address)?
            .ok_or(LedgerError::AccountNotFound(*address))
    }

    /// Whether a declared account exists.
    pub fn exists(&self, address: &Address) -> Result<bool, LedgerError> {
        Ok(self.account(address)?.is_some())
    }

    pub(crate) fn slot_mut(&mut self, address: &Address) -> Result<&mut Option<Account>, LedgerError> {
        let access = self
            .access
            .get(address)
            .ok_or(LedgerError::UndeclaredAccount(*address))?;
        if !access.is_writable {
            return Err(LedgerError::ReadonlyAccount(*address));
        }
        self.accounts
            .get_mut(address)
            .ok_or(LedgerError::UndeclaredAccount(*address))
    }

    pub(crate) fn existing_mut(&mut self, address: &Address) -> Result<&mut Account, LedgerError> {
        self.slot_mut(address)?
            .as_mut()
            .ok_or(LedgerError::AccountNotFound(*address))
    }

    pub(crate) fn debit_lamports(&mut self, address: &Address, amount: u64) -> Result<(), LedgerError> {
        let account = self.existing_mut(address)?;
        account.lamports = account
            .lamports
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientLamports {
                required: amount,
                available: account.lamports,
            })?;
        Ok(())
    }

    pub(crate) fn credit_lamports(&mut self, address: &Address, amount: u64) -> Result<(), LedgerError> {
        let slot = self.slot_mut(address)?;
        match slot {
            Some(account) => {
                account.lamports = account
                    .lamports
                    .checked_add(amount)
                    .ok_or(LedgerError::Overflow)?;
            }
            None => *slot = Some(Account::wallet(amount)),
        }
        Ok(())
    }

    /// Creates `account` at `address`, funded by `payer`.
    ///
    /// The payer must have signed and is debited the account's lamports.
    pub(crate) fn create_account(
        &mut self,
        payer: &Address,
        address: &Address,
        account: Account,
    ) -> Result<(), LedgerError> {
        self.require_signer(payer)?;
        if self.slot_mut(address)?.is_some() {
            return Err(LedgerError::AccountAlreadyExists(*address));
        }
        self.debit_lamports(payer, account.lamports)?;
        *self.slot_mut(address)? = Some(account);
        Ok(())
    }

    /// Creates an account owned by the executing program holding `bytes`.
    ///
    /// `payer` funds the storage deposit for `space` bytes. Returns the
    /// deposit charged.
    pub fn create_program_account(
        &mut self,
        payer: &Address,
        address: &Address,
        space: usize,
        bytes: Vec<u8>,
    ) -> Result<u64, LedgerError> {
        if bytes.len() > space {
            return Err(LedgerError::DataTooLarge {
                len: bytes.len(),
                space,
            });
        }
        let deposit = self.rent.minimum_balance(space);
        let account = Account {
            lamports: deposit,
            owner: self.program_id,
            data: AccountData::Program { space, bytes },
        };
        self.create_account(payer, address, account)?;
        Ok(deposit)
    }

    /// Replaces the data of an account owned by the executing program.
    pub fn write_program_data(&mut self, address: &Address, new_bytes: Vec<u8>) -> Result<(), LedgerError> {
        let program_id = self.program_id;
        let account = self.existing_mut(address)?;
        if account.owner != program_id {
            return Err(LedgerError::IllegalOwner(*address));
        }
        match &mut account.data {
            AccountData::Program { space, bytes } => {
                if new_bytes.len() > *space {
                    return Err(LedgerError::DataTooLarge {
                        len: new_bytes.len(),
                        space: *space,
                    });
                }
                *bytes = new_bytes;
                Ok(())
            }
            _ => Err(LedgerError::IllegalOwner(*address)),
        }
    }

    /// Deletes an account owned by the executing program, moving its
    /// lamports to `destination`. Returns the lamports moved.
    pub fn close_program_account(
        &mut self,
        address: &Address,
        destination: &Address,
    ) -> Result<u64, LedgerError> {
        let program_id = self.program_id;
        let account = self.existing_mut(address)?;
        if account.owner != program_id {
            return Err(LedgerError::IllegalOwner(*address));
        }
        let lamports = account.lamports;
        *self.slot_mut(address)? = None;
        self.credit_lamports(destination, lamports)?;
        Ok(lamports)
    }

    pub(crate) fn total_lamports(&self) -> u128 {
        self.accounts
            .values()
            .flatten()
            .map(|account| u128::from(account.lamports))
            .sum()
    }

    /// Writable accounts in their final state; `None` means deleted.
    pub(crate) fn into_writes(self) -> Vec<(Address, Option<Account>)> {
        let access = self.access;
        self.accounts
            .into_iter()
            .filter(|(address, _)| access.get(address).is_some_and(|a| a.is_writable))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a context over the given accounts for unit tests.
    pub(crate) struct Fixture {
        pub(crate) program_id: Address,
        pub(crate) rent: Rent,
        pub(crate) keys: Vec<Address>,
        pub(crate) access: HashMap<Address, Access>,
        pub(crate) accounts: HashMap<Address, Option<Account>>,
    }

    impl Fixture {
        pub(crate) fn new(program_id: Address) -> Self {
            Self {
                program_id,
                rent: Rent::default(),
                keys: Vec::new(),
                access: HashMap::new(),
                accounts: HashMap::new(),
            }
        }

        pub(crate) fn declare(
            &mut self,
            address: Address,
            is_signer: bool,
            is_writable: bool,
            account: Option<Account>,
        ) -> &mut Self {
            self.keys.push(address);
            self.access.insert(
                address,
                Access {
                    is_signer,
                    is_writable,
                },
            );
            self.accounts.insert(address, account);
            self
        }

        pub(crate) fn context(&self) -> TxContext<'_> {
            TxContext::new(
                self.program_id,
                &self.rent,
                &self.keys,
                &[],
                self.access.clone(),
                self.accounts.clone(),
            )
        }
    }

    #[test]
    fn undeclared_account_is_rejected() {
        let fixture = Fixture::new(Address::new_unique());
        let ctx = fixture.context();
        let stranger = Address::new_unique();
        assert!(matches!(ctx.account(&stranger), Err(LedgerError::UndeclaredAccount(a)) if a == stranger));
    }

    #[test]
    fn readonly_account_cannot_be_credited() {
        let mut fixture = Fixture::new(Address::new_unique());
        let wallet = Address::new_unique();
        fixture.declare(wallet, false, false, Some(Account::wallet(10)));
        let mut ctx = fixture.context();
        assert!(matches!(
            ctx.credit_lamports(&wallet, 1),
            Err(LedgerError::ReadonlyAccount(_))
        ));
    }

    #[test]
    fn program_account_lifecycle() {
        let program = Address::new_unique();
        let payer = Address::new_unique();
        let record = Address::new_unique();
        let mut fixture = Fixture::new(program);
        fixture
            .declare(payer, true, true, Some(Account::wallet(10_000_000)))
            .declare(record, false, true, None);
        let mut ctx = fixture.context();
        let before = ctx.total_lamports();

        let deposit = ctx
            .create_program_account(&payer, &record, 16, b"hello".to_vec())
            .expect("create");
        assert_eq!(deposit, Rent::default().minimum_balance(16));
        assert_eq!(ctx.existing(&record).expect("record").program_data(), Some(&b"hello"[..]));

        ctx.write_program_data(&record, b"world".to_vec()).expect("write");
        assert!(matches!(
            ctx.write_program_data(&record, vec![0; 17]),
            Err(LedgerError::DataTooLarge { len: 17, space: 16 })
        ));

        let refunded = ctx.close_program_account(&record, &payer).expect("close");
        assert_eq!(refunded, deposit);
        assert!(!ctx.exists(&record).expect("declared"));
        assert_eq!(ctx.total_lamports(), before);
    }

    #[test]
    fn create_requires_payer_signature() {
        let program = Address::new_unique();
        let payer = Address::new_unique();
        let record = Address::new_unique();
        let mut fixture = Fixture::new(program);
        fixture
            .declare(payer, false, true, Some(Account::wallet(10_000_000)))
            .declare(record, false, true, None);
        let mut ctx = fixture.context();
        assert!(matches!(
            ctx.create_program_account(&payer, &record, 8, vec![]),
            Err(LedgerError::MissingSignature(_))
        ));
    }

    #[test]
    fn create_reports_insufficient_lamports() {
        let program = Address::new_unique();
        let payer = Address::new_unique();
        let record = Address::new_unique();
        let mut fixture = Fixture::new(program);
        fixture
            .declare(payer, true, true, Some(Account::wallet(5)))
            .declare(record, false, true, None);
        let mut ctx = fixture.context();
        assert!(matches!(
            ctx.create_program_account(&payer, &record, 8, vec![]),
            Err(LedgerError::InsufficientLamports { available: 5, .. })
        ));
    }

    #[test]
    fn foreign_program_cannot_close_account() {
        let payer = Address::new_unique();
        let record = Address::new_unique();
        let mut fixture = Fixture::new(Address::new_unique());
        let foreign = Account {
            lamports: 100,
            owner: Address::new_unique(),
            data: AccountData::Program {
                space: 0,
                bytes: vec![],
            },
        };
        fixture
            .declare(payer, true, true, Some(Account::wallet(0)))
            .declare(record, false, true, Some(foreign));
        let mut ctx = fixture.context();
        assert!(matches!(
            ctx.close_program_account(&record, &payer),
            Err(LedgerError::IllegalOwner(_))
        ));
    }

    #[test]
    fn sign_derived_registers_authority() {
        let program = Address::new_unique();
        let fixture = Fixture::new(program);
        let mut ctx = fixture.context();
        let (expected, bump) =
            puzi_core::find_program_address(&[b"vault"], &program).expect("derive");
        assert!(!ctx.is_authority(&expected));
        let address = ctx.sign_derived(&[b"vault"], bump).expect("sign");
        assert_eq!(address, expected);
        assert!(ctx.is_authority(&expected));
        assert!(!ctx.is_signer(&expected));
    }
}
