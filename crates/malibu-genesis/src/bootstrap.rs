//! # Bootstrap Phase Machine
//!
//! Orchestrates the one-shot genesis pipeline:
//!
//! ```text
//! Unloaded ──load──→ Parsed ──apply──→ Replaying ──→ Verified
//!                                          │
//!                                          └──────→ Rejected
//! ```
//!
//! `Verified` and `Rejected` are terminal; there are no transitions out.
//! A second `apply` after success is rejected as
//! [`GenesisError::AlreadyApplied`]: genesis applies exactly once per chain.
//!
//! Replay/accumulation and payload-hash recomputation both read the same
//! immutable block, so `apply` runs them on parallel rayon branches. That is
//! the only concurrency that is meaningful here: the load happens once at
//! process start, before anything else reads the ledger.

use tracing::{error, info};

use malibu_types::GenesisBlock;

use crate::domain::errors::GenesisError;
use crate::domain::loader::GenesisLoader;
use crate::domain::replay::TransactionReplayer;
use crate::domain::state::LedgerState;
use crate::domain::verify::IntegrityVerifier;
use crate::ports::source::GenesisSource;

/// Where the bootstrap currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapPhase {
    Unloaded,
    Parsed,
    Replaying,
    Verified,
    Rejected,
}

/// One-shot genesis bootstrap.
#[derive(Debug)]
pub struct GenesisBootstrap {
    phase: BootstrapPhase,
    block: Option<GenesisBlock>,
    ledger: Option<LedgerState>,
}

impl Default for GenesisBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

impl GenesisBootstrap {
    pub fn new() -> Self {
        Self {
            phase: BootstrapPhase::Unloaded,
            block: None,
            ledger: None,
        }
    }

    pub fn phase(&self) -> BootstrapPhase {
        self.phase
    }

    /// The parsed block, available from `Parsed` onwards.
    pub fn block(&self) -> Option<&GenesisBlock> {
        self.block.as_ref()
    }

    /// The derived ledger, available once `Verified`.
    pub fn ledger(&self) -> Option<&LedgerState> {
        self.ledger.as_ref()
    }

    /// Fetch the document from a source and parse it. `Unloaded → Parsed`,
    /// or `Rejected` on failure.
    pub fn load_from(&mut self, source: &dyn GenesisSource) -> Result<(), GenesisError> {
        if self.phase != BootstrapPhase::Unloaded {
            return Err(GenesisError::InvalidPhase { phase: self.phase });
        }
        let raw = match source.fetch() {
            Ok(raw) => raw,
            Err(err) => {
                self.phase = BootstrapPhase::Rejected;
                return Err(err.into());
            }
        };
        self.load(&raw)
    }

    /// Parse raw genesis JSON. `Unloaded → Parsed`, or `Rejected` on failure.
    pub fn load(&mut self, raw: &str) -> Result<(), GenesisError> {
        if self.phase != BootstrapPhase::Unloaded {
            return Err(GenesisError::InvalidPhase { phase: self.phase });
        }
        match GenesisLoader::load(raw) {
            Ok(block) => {
                info!(
                    "[genesis] Parsed genesis block: height={} magic={} transactions={}",
                    block.height,
                    block.magic,
                    block.transaction_in_blocks.len()
                );
                self.block = Some(block);
                self.phase = BootstrapPhase::Parsed;
                Ok(())
            }
            Err(err) => {
                error!("[genesis] Rejected genesis document: {err}");
                self.phase = BootstrapPhase::Rejected;
                Err(err.into())
            }
        }
    }

    /// Replay the transaction list into the initial ledger and verify the
    /// payload checksum. `Parsed → Replaying → Verified`, or `Rejected` on
    /// any failure.
    pub fn apply(&mut self) -> Result<&LedgerState, GenesisError> {
        match self.phase {
            BootstrapPhase::Parsed => {}
            BootstrapPhase::Verified => return Err(GenesisError::AlreadyApplied),
            phase => return Err(GenesisError::InvalidPhase { phase }),
        }
        let Some(block) = self.block.take() else {
            // Parsed without a block cannot happen through the public API.
            return Err(GenesisError::InvalidPhase { phase: self.phase });
        };
        self.phase = BootstrapPhase::Replaying;

        // Both branches read the same immutable block.
        let (replayed, verified) = rayon::join(
            || {
                TransactionReplayer::new(&block)
                    .replay()
                    .map_err(GenesisError::from)
                    .and_then(|accumulator| {
                        accumulator
                            .finish(
                                &block.statistic_info,
                                block.transaction_info.number_of_transactions,
                            )
                            .map_err(GenesisError::from)
                    })
            },
            || IntegrityVerifier::verify(&block).map_err(GenesisError::from),
        );
        self.block = Some(block);

        match verified.and(replayed) {
            Ok(ledger) => {
                info!(
                    "[genesis] Verified genesis block: accounts={} names={} factories={} totalFee={}",
                    ledger.account_count(),
                    ledger.names.len(),
                    ledger.factories.len(),
                    ledger.total_fee
                );
                self.phase = BootstrapPhase::Verified;
                Ok(self.ledger.insert(ledger))
            }
            Err(err) => {
                error!("[genesis] Rejected genesis block: {err}");
                self.phase = BootstrapPhase::Rejected;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::EmbeddedGenesisSource;
    use crate::domain::errors::{IntegrityError, ParseError};
    use crate::test_utils::{corrupt, small_block};

    fn raw(block: &GenesisBlock) -> String {
        serde_json::to_string(block).unwrap()
    }

    #[test]
    fn full_pipeline_reaches_verified() {
        let mut bootstrap = GenesisBootstrap::new();
        assert_eq!(bootstrap.phase(), BootstrapPhase::Unloaded);

        bootstrap.load(&raw(&small_block())).unwrap();
        assert_eq!(bootstrap.phase(), BootstrapPhase::Parsed);
        assert!(bootstrap.block().is_some());

        let ledger = bootstrap.apply().unwrap();
        assert!(ledger.account_count() > 0);
        assert_eq!(bootstrap.phase(), BootstrapPhase::Verified);
    }

    #[test]
    fn load_from_source_works() {
        let source = EmbeddedGenesisSource::new(raw(&small_block()));
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load_from(&source).unwrap();
        bootstrap.apply().unwrap();
        assert_eq!(bootstrap.phase(), BootstrapPhase::Verified);
    }

    #[test]
    fn second_apply_is_rejected() {
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&small_block())).unwrap();
        bootstrap.apply().unwrap();

        let err = bootstrap.apply().unwrap_err();
        assert!(matches!(err, GenesisError::AlreadyApplied));
        // Still terminal-Verified: the ledger remains readable.
        assert_eq!(bootstrap.phase(), BootstrapPhase::Verified);
        assert!(bootstrap.ledger().is_some());
    }

    #[test]
    fn second_load_is_an_invalid_phase() {
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&small_block())).unwrap();
        let err = bootstrap.load(&raw(&small_block())).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::InvalidPhase {
                phase: BootstrapPhase::Parsed
            }
        ));
    }

    #[test]
    fn apply_before_load_is_an_invalid_phase() {
        let mut bootstrap = GenesisBootstrap::new();
        let err = bootstrap.apply().unwrap_err();
        assert!(matches!(
            err,
            GenesisError::InvalidPhase {
                phase: BootstrapPhase::Unloaded
            }
        ));
    }

    #[test]
    fn parse_failure_is_terminal() {
        let mut bootstrap = GenesisBootstrap::new();
        let err = bootstrap.load("not json at all").unwrap_err();
        assert!(matches!(err, GenesisError::Parse(ParseError::Json(_))));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Rejected);

        // No transitions out of Rejected.
        assert!(matches!(
            bootstrap.load(&raw(&small_block())),
            Err(GenesisError::InvalidPhase {
                phase: BootstrapPhase::Rejected
            })
        ));
        assert!(matches!(
            bootstrap.apply(),
            Err(GenesisError::InvalidPhase {
                phase: BootstrapPhase::Rejected
            })
        ));
    }

    #[test]
    fn integrity_failure_rejects_the_block() {
        let block = corrupt(small_block(), |b| {
            b.transaction_info.payload_hash = "11".repeat(32);
        });
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&block)).unwrap();
        let err = bootstrap.apply().unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Integrity(IntegrityError::PayloadHashMismatch { .. })
        ));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Rejected);
        assert!(bootstrap.ledger().is_none());
    }

    #[test]
    fn statistic_failure_rejects_the_block() {
        let block = corrupt(small_block(), |b| {
            b.statistic_info.total_fee = malibu_types::Amount::new(999);
        });
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&block)).unwrap();
        let err = bootstrap.apply().unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Integrity(IntegrityError::StatisticMismatch { .. })
        ));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Rejected);
    }

    #[test]
    fn source_failure_rejects() {
        struct FailingSource;
        impl GenesisSource for FailingSource {
            fn fetch(&self) -> Result<String, crate::ports::SourceError> {
                Err(crate::ports::SourceError::Io {
                    path: "genesis.json".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                })
            }
        }
        let mut bootstrap = GenesisBootstrap::new();
        let err = bootstrap.load_from(&FailingSource).unwrap_err();
        assert!(matches!(err, GenesisError::Source(_)));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Rejected);
    }
}
