//! Token amounts.
//!
//! The malibu wire format carries every amount as a decimal string
//! (`"517458"`), never as a JSON number, so that 64-bit-float consumers
//! cannot silently lose precision. Internally amounts are `u128`:
//! sufficient for any practical supply without big-integer arithmetic.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// An unsigned token amount in base units.
///
/// Serialized as a canonical decimal string via
/// `serde_with::DisplayFromStr` at field sites. Canonical means no sign, no
/// leading zeros (except `"0"` itself), digits only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(raw: u128) -> Self {
        Amount(raw)
    }

    pub const fn raw(self) -> u128 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// The amount as a signed delta, for ledger balances that may go
    /// negative during genesis replay. `None` if it exceeds `i128::MAX`.
    pub fn as_signed(self) -> Option<i128> {
        i128::try_from(self.0).ok()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from parsing a wire-format amount string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount string is empty")]
    Empty,

    #[error("amount contains non-digit character {0:?}")]
    NonDigit(char),

    #[error("amount has a leading zero")]
    LeadingZero,

    #[error("amount exceeds u128 range")]
    Overflow,
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseAmountError::Empty);
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(ParseAmountError::NonDigit(c));
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(ParseAmountError::LeadingZero);
        }
        s.parse::<u128>()
            .map(Amount)
            .map_err(|_| ParseAmountError::Overflow)
    }
}
