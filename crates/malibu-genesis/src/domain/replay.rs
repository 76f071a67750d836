//! # Transaction Replayer
//!
//! Walks the genesis transaction list in `tIndex` order and folds each
//! transaction into a fresh [`StateAccumulator`]. Replay is a pure function
//! of the ordered input: same block, same ledger, every time. Applying the
//! same block twice is rejected at the block level by the bootstrap phase
//! machine, not here.

use malibu_types::GenesisBlock;

use super::errors::ReplayError;
use super::state::StateAccumulator;

/// Deterministic, ordered replay of a genesis block's transactions.
pub struct TransactionReplayer<'a> {
    block: &'a GenesisBlock,
}

impl<'a> TransactionReplayer<'a> {
    pub fn new(block: &'a GenesisBlock) -> Self {
        Self { block }
    }

    /// Apply every transaction in canonical order. Returns the loaded
    /// accumulator; the caller reconciles it against the declared
    /// statistics via [`StateAccumulator::finish`].
    pub fn replay(&self) -> Result<StateAccumulator, ReplayError> {
        let mut accumulator = StateAccumulator::new(&self.block.magic);
        for envelope in &self.block.transaction_in_blocks {
            accumulator.apply(envelope)?;
        }
        Ok(accumulator)
    }
}
