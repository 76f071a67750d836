//! Inbound boundary of the bootstrap: where the genesis document comes from.

pub mod source;

pub use source::{GenesisSource, SourceError};
