use malibu_types::{AccountId, Amount, TxType};
use thiserror::Error;

use crate::bootstrap::BootstrapPhase;
use crate::ports::source::SourceError;

/// Structural failures while parsing the genesis document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed genesis JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("genesis height must be {expected}, got {actual}")]
    WrongHeight { expected: u64, actual: u64 },

    #[error("genesis previous block signature must be empty, got {0:?}")]
    NonEmptyPreviousSignature(String),

    #[error("block magic is empty")]
    EmptyMagic,

    #[error("chain parameter {name} must be positive")]
    ZeroChainParameter { name: &'static str },

    #[error("block size {block_size} exceeds chain limit {limit}")]
    BlockSizeExceedsLimit { block_size: u64, limit: u64 },

    #[error("declared {declared} transactions, found {found}")]
    TransactionCountMismatch { declared: u32, found: usize },

    #[error("transaction index gap: expected tIndex {expected}, got {actual}")]
    NonContiguousIndex { expected: u32, actual: u32 },

    #[error("transaction {t_index} is at height {height}, expected genesis height")]
    WrongTransactionHeight { t_index: u32, height: u64 },

    #[error("transaction {t_index}: asset payload is {payload} but type tag is {declared}")]
    AssetVariantMismatch {
        t_index: u32,
        declared: TxType,
        payload: TxType,
    },

    #[error("transaction {t_index}: malformed account id {account}")]
    MalformedAccountId { t_index: u32, account: AccountId },

    #[error("transaction {t_index}: type {tx_type} requires a recipient")]
    MissingRecipient { t_index: u32, tx_type: TxType },

    #[error("transaction {t_index}: type {tx_type} must not carry a recipient")]
    UnexpectedRecipient { t_index: u32, tx_type: TxType },

    #[error("no fee schedule entry for transaction type {0}")]
    MissingFeeScheduleEntry(TxType),

    #[error(
        "transaction {t_index}: fee {fee} disagrees with scheduled fee {scheduled} for {tx_type}"
    )]
    FeeScheduleViolation {
        t_index: u32,
        tx_type: TxType,
        fee: Amount,
        scheduled: Amount,
    },

    #[error("transaction {t_index}: empty {field}")]
    EmptyField { t_index: u32, field: &'static str },
}

/// Semantic failures while replaying the transaction list.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("transaction {t_index}: name {name:?} is already registered")]
    NameAlreadyRegistered { t_index: u32, name: String },

    #[error("transaction {t_index}: factory {factory:?} is already registered")]
    FactoryAlreadyRegistered { t_index: u32, factory: String },

    #[error("transaction {t_index}: unknown factory {factory:?}")]
    UnknownFactory { t_index: u32, factory: String },

    #[error("transaction {t_index}: factory {factory:?} has no issuance left")]
    FactoryExhausted { t_index: u32, factory: String },

    #[error("transaction {t_index}: recipient missing at replay")]
    MissingRecipient { t_index: u32 },

    #[error("transaction {t_index}: amount overflow while accumulating")]
    AmountOverflow { t_index: u32 },
}

/// Checksum and reconciliation failures. The embedded data is corrupt or
/// the replay diverged; either way the block is unusable.
#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("{field} is not valid hex: {source}")]
    MalformedHex {
        field: String,
        source: hex::FromHexError,
    },

    #[error("{field} must decode to {expected} bytes, got {actual}")]
    WrongByteLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("payload length mismatch: declared {declared}, computed {computed}")]
    PayloadLengthMismatch { declared: u64, computed: u64 },

    #[error("payload hash mismatch: declared {declared}, computed {computed}")]
    PayloadHashMismatch { declared: String, computed: String },

    #[error("statistic mismatch in {quantity}: declared {declared}, computed {computed}")]
    StatisticMismatch {
        quantity: String,
        declared: String,
        computed: String,
    },

    #[error("ledger does not balance: residual {residual} after fees")]
    UnbalancedLedger { residual: i128 },
}

/// Umbrella error for the bootstrap pipeline.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Source(#[from] SourceError),

    /// Genesis applies once per chain; a second apply is rejected outright.
    #[error("genesis block already applied")]
    AlreadyApplied,

    #[error("operation not valid in bootstrap phase {phase:?}")]
    InvalidPhase { phase: BootstrapPhase },
}
