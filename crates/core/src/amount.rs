//! Unsigned fixed-point amounts in base units.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{LedgerError, LedgerResult};

/// A non-negative quantity of base units.
///
/// The ledger never interprets the decimal scale itself; an amount is the raw
/// integer (e.g. `10^18` base units for one whole token at 18 decimals).
///
/// Serialized as a decimal string: JSON numbers cannot carry the full `u128`
/// range through `serde_json::Value`.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Amount(u128);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid amount '{input}': expected an unsigned decimal integer")]
pub struct ParseAmountError {
    input: String,
}

impl Amount {
    pub const ZERO: Amount = Amount(0);
    pub const MAX: Amount = Amount(u128::MAX);

    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `whole * 10^decimals`, or `None` when it does not fit.
    pub fn from_whole(whole: u128, decimals: u8) -> Option<Self> {
        10u128
            .checked_pow(u32::from(decimals))
            .and_then(|scale| whole.checked_mul(scale))
            .map(Self)
    }

    pub fn checked_add(self, rhs: Amount) -> LedgerResult<Amount> {
        self.0.checked_add(rhs.0).map(Self).ok_or(LedgerError::Overflow)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Self(self.0.saturating_add(rhs.0))
    }

    pub fn saturating_sub(self, rhs: Amount) -> Amount {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // u128::from_str accepts a leading '+'; amounts on the wire are digits only.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseAmountError { input: s.to_string() });
        }
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| ParseAmountError { input: s.to_string() })
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl From<Amount> for u128 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl From<Amount> for String {
    fn from(value: Amount) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for Amount {
    type Error = ParseAmountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Sum amounts, failing with [`LedgerError::Overflow`] instead of wrapping.
pub fn checked_sum(amounts: impl IntoIterator<Item = Amount>) -> LedgerResult<Amount> {
    amounts
        .into_iter()
        .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a))
}
