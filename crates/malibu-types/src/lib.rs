//! # Malibu Types Crate
//!
//! Wire-format entities for the malibu chain's genesis block document.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every structure that appears in the genesis
//!   JSON is defined here, once, with its serde shape.
//! - **String-encoded amounts**: the chain serializes token amounts as
//!   decimal strings; [`Amount`] carries them as `u128` and fields use
//!   `serde_with::DisplayFromStr` at the boundary.
//! - **Typed identifiers**: account identifiers are bech32-like strings with
//!   the `mlb1` prefix, wrapped in [`AccountId`].

pub mod account;
pub mod amount;
pub mod entities;
pub mod statistics;

pub use account::AccountId;
pub use amount::{Amount, ParseAmountError};
pub use entities::*;
pub use statistics::*;
