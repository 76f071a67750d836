//! Account identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The human-readable prefix every malibu address starts with.
pub const ADDRESS_PREFIX: &str = "mlb1";

/// Bech32-style address length bounds, prefix included.
const MIN_LEN: usize = 8;
const MAX_LEN: usize = 90;

/// A bech32-like malibu account identifier (`mlb1...`).
///
/// Accounts are implicit on this chain: an `AccountId` appearing as sender
/// or recipient in a genesis transaction is created on first reference. The
/// wrapper keeps the wire string intact; structural validation happens in
/// the genesis loader via [`AccountId::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        AccountId(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Structural address check: `mlb1` prefix, lowercase alphanumeric
    /// payload, length within bech32 bounds. Checksum verification is the
    /// wallet's concern, not the bootstrap's.
    pub fn is_well_formed(&self) -> bool {
        let s = &self.0;
        if !(MIN_LEN..=MAX_LEN).contains(&s.len()) {
            return false;
        }
        let Some(payload) = s.strip_prefix(ADDRESS_PREFIX) else {
            return false;
        };
        !payload.is_empty()
            && payload
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_owned())
    }
}
