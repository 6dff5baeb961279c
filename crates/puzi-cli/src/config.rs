//! CLI configuration.
//!
//! A JSON file whose fields all have defaults. Flags and `PUZI_*`
//! environment variables take precedence over it.

use std::path::{Path, PathBuf};

use puzi_core::Address;
use puzi_ledger::Rent;
use puzi_market::{MARKET_PROGRAM_ID, MarketConfig};
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Format};
use crate::error::CliError;

/// Default ledger state file name.
pub const DEFAULT_STATE_FILE: &str = "puzi-ledger.json";

/// Settings for the `puzi` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuziConfig {
    /// Ledger snapshot file.
    pub state_path: PathBuf,
    /// Market program id.
    pub program_id: Address,
    /// Rent parameters for a fresh ledger.
    pub rent: Rent,
    /// Default output format.
    pub format: Format,
}

impl Default for PuziConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_FILE),
            program_id: MARKET_PROGRAM_ID,
            rent: Rent::default(),
            format: Format::Table,
        }
    }
}

impl PuziConfig {
    /// Reads a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&contents)
            .map_err(|e| CliError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// Loads the config named on the command line (or the defaults) and
    /// applies flag overrides.
    pub fn resolve(cli: &Cli) -> Result<Self, CliError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(state) = &cli.state {
            config.state_path.clone_from(state);
        }
        if let Some(format) = cli.format {
            config.format = format;
        }
        Ok(config)
    }

    /// Client configuration for the market.
    #[must_use]
    pub fn market(&self) -> MarketConfig {
        MarketConfig {
            program_id: self.program_id,
        }
    }
}
