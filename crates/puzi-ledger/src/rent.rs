//! Storage deposits.

use serde::{Deserialize, Serialize};

/// Parameters for the refundable storage deposit ("rent").
///
/// An account is kept alive by holding [`Rent::minimum_balance`] lamports
/// for its size. The whole balance is returned when the account is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rent {
    /// Lamports charged per byte per year.
    pub lamports_per_byte_year: u64,
    /// Years of rent that must be held up front.
    pub exemption_threshold_years: u64,
    /// Bytes charged for every account on top of its data.
    pub account_storage_overhead: u64,
}

impl Default for Rent {
    fn default() -> Self {
        Self {
            lamports_per_byte_year: 3480,
            exemption_threshold_years: 2,
            account_storage_overhead: 128,
        }
    }
}

impl Rent {
    /// Deposit required for an account with `space` data bytes.
    ///
    /// Saturates rather than wrapping on absurd parameters.
    #[must_use]
    pub fn minimum_balance(&self, space: usize) -> u64 {
        (self.account_storage_overhead.saturating_add(space as u64))
            .saturating_mul(self.lamports_per_byte_year)
            .saturating_mul(self.exemption_threshold_years)
    }
}
