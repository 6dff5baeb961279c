//! JSON persistence for the local ledger.

use std::path::{Path, PathBuf};

use puzi_ledger::{Ledger, LedgerSnapshot, Rent};
use tracing::debug;

use crate::error::CliError;

/// A ledger snapshot file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger, or starts an empty one with `rent` if the file
    /// does not exist yet.
    pub fn load(&self, rent: Rent) -> Result<Ledger, CliError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no state file, starting empty ledger");
            return Ok(Ledger::new(rent));
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let snapshot: LedgerSnapshot = serde_json::from_str(&contents).map_err(|e| {
            CliError::State(format!("cannot parse {}: {e}", self.path.display()))
        })?;
        debug!(
            path = %self.path.display(),
            accounts = snapshot.accounts.len(),
            "loaded ledger"
        );
        Ok(Ledger::from_snapshot(snapshot))
    }

    /// Writes the ledger, replacing the previous file in one rename.
    pub fn save(&self, ledger: &Ledger) -> Result<(), CliError> {
        let snapshot = ledger.snapshot();
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| CliError::State(format!("cannot encode ledger: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(
            path = %self.path.display(),
            accounts = snapshot.accounts.len(),
            "saved ledger"
        );
        Ok(())
    }
}
