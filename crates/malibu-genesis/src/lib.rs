//! # malibu-genesis
//!
//! Genesis bootstrap subsystem for the malibu chain.
//!
//! ## Role in System
//!
//! - **Single Shot**: the genesis block is ingested exactly once at process
//!   start, before any other component reads the ledger.
//! - **Fail Fast**: a chain cannot proceed with an unverifiable genesis
//!   block; every failure here is fatal at startup.
//! - **Derived State**: the output is the initial ledger projection
//!   (balances, name registry, factory table); the block itself stays
//!   immutable.
//!
//! ## Bootstrap Phases
//!
//! ```text
//! Unloaded ──load──→ Parsed ──apply──→ Replaying ──→ Verified
//!                                          │
//!                                          └──────→ Rejected
//! ```
//!
//! `Verified` and `Rejected` are terminal. Replay and payload-hash
//! recomputation read the same immutable block and run on parallel branches.

pub mod adapters;
pub mod bootstrap;
pub mod domain;
pub mod ports;
pub mod test_utils;

pub use adapters::*;
pub use bootstrap::{BootstrapPhase, GenesisBootstrap};
pub use domain::*;
pub use ports::*;
