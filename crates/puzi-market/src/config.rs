//! Market configuration.

use puzi_core::Address;
use serde::{Deserialize, Serialize};

/// Id of the built-in market program.
pub const MARKET_PROGRAM_ID: Address = Address::from_tag(b"puzi/market-program");

/// Configuration for a [`crate::Market`] client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Program that owns listing records.
    pub program_id: Address,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            program_id: MARKET_PROGRAM_ID,
        }
    }
}
