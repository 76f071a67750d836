//! Domain logic of the genesis bootstrap.
//!
//! Pure, deterministic, no I/O: the loader turns raw JSON into a validated
//! block, the replayer folds the transaction list into a ledger through the
//! state accumulator, and the verifier recomputes the payload checksum.

pub mod errors;
pub mod loader;
pub mod replay;
pub mod state;
pub mod verify;

pub use errors::{GenesisError, IntegrityError, ParseError, ReplayError};
pub use loader::GenesisLoader;
pub use replay::TransactionReplayer;
pub use state::{FactoryState, LedgerState, StateAccumulator};
pub use verify::IntegrityVerifier;
