//! Programs and the registry that binds each program id to one implementation.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use parking_lot::RwLock;
use puzi_core::{ASSOCIATED_TOKEN_PROGRAM_ID, Address, TOKEN_PROGRAM_ID};
use tracing::info;

use crate::context::TxContext;
use crate::error::LedgerError;
use crate::token::process_token_instruction;

/// Code that owns accounts and runs the transactions addressed to its id.
///
/// Only the implementation registered for an id through
/// [`crate::Ledger::register_program`] can execute under that id, so only it
/// can write the accounts the id owns or sign for addresses derived from it.
pub trait Program: Send + Sync + 'static {
    /// Value returned by a successful instruction.
    type Output;
    /// Error returned by a failed instruction.
    type Error: From<LedgerError> + fmt::Display;

    /// The id this program executes under.
    fn id(&self) -> Address;

    /// Runs the instruction carried in `ctx`.
    fn process(&self, ctx: &mut TxContext<'_>) -> Result<Self::Output, Self::Error>;
}

/// The built-in token program, also serving the associated-account id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenProgram {
    id: Address,
}

impl TokenProgram {
    /// The token program proper.
    pub const TOKEN: Self = Self {
        id: TOKEN_PROGRAM_ID,
    };

    /// The associated holding account program.
    pub const ASSOCIATED: Self = Self {
        id: ASSOCIATED_TOKEN_PROGRAM_ID,
    };
}

impl Program for TokenProgram {
    type Output = ();
    type Error = LedgerError;

    fn id(&self) -> Address {
        self.id
    }

    fn process(&self, ctx: &mut TxContext<'_>) -> Result<(), LedgerError> {
        process_token_instruction(ctx)
    }
}

/// Program id to implementing type.
#[derive(Debug, Default)]
pub(crate) struct ProgramRegistry {
    programs: RwLock<HashMap<Address, TypeId>>,
}

impl ProgramRegistry {
    /// A registry holding the built-in token programs.
    pub(crate) fn with_builtins() -> Self {
        let registry = Self::default();
        {
            let mut programs = registry.programs.write();
            programs.insert(TOKEN_PROGRAM_ID, TypeId::of::<TokenProgram>());
            programs.insert(ASSOCIATED_TOKEN_PROGRAM_ID, TypeId::of::<TokenProgram>());
        }
        registry
    }

    /// Binds `program`'s id to its type. Registering the same type again is
    /// a no-op; any other type is rejected.
    pub(crate) fn register<P: Program>(&self, program: &P) -> Result<(), LedgerError> {
        let id = program.id();
        let mut programs = self.programs.write();
        match programs.get(&id) {
            Some(existing) if *existing == TypeId::of::<P>() => Ok(()),
            Some(_) => Err(LedgerError::ProgramAlreadyRegistered(id)),
            None => {
                programs.insert(id, TypeId::of::<P>());
                info!(program = %id, "program registered");
                Ok(())
            }
        }
    }

    /// Fails unless `program` is the implementation registered for `target`.
    pub(crate) fn authorize<P: Program>(
        &self,
        program: &P,
        target: &Address,
    ) -> Result<(), LedgerError> {
        let id = program.id();
        if id != *target {
            return Err(LedgerError::IncorrectProgramId {
                expected: *target,
                found: id,
            });
        }
        match self.programs.read().get(target) {
            Some(registered) if *registered == TypeId::of::<P>() => Ok(()),
            _ => Err(LedgerError::UnknownProgram(*target)),
        }
    }
}
