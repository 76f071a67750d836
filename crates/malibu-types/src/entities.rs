//! # Genesis Block Entities
//!
//! Typed mirror of the malibu genesis-block JSON document.
//!
//! ## Clusters
//!
//! - **Block**: [`GenesisBlock`], [`BlockAsset`], [`GenesisAsset`],
//!   [`TransactionInfo`]
//! - **Transactions**: [`TransactionEnvelope`], [`Transaction`], [`TxType`],
//!   [`TxAsset`] and its four payload variants
//!
//! ## Ownership
//!
//! The block exclusively owns its transaction list; insertion order is the
//! canonical replay order. Derived state (accounts, registries) lives in the
//! genesis crate and holds no back-reference into the block.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::account::AccountId;
use crate::amount::Amount;
use crate::statistics::StatisticInfo;

/// Genesis block height. The chain's terminal lower bound.
pub const GENESIS_HEIGHT: u64 = 1;

/// The complete genesis block record as shipped on the wire.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisBlock {
    /// Protocol version for this block.
    pub version: u32,
    /// Block height. Always 1 for genesis.
    pub height: u64,
    /// Declared block size in bytes.
    pub block_size: u64,
    /// Unix timestamp of chain genesis.
    pub timestamp: u64,
    /// Block signature, hex (64 bytes decoded).
    pub signature: String,
    /// Public key of the genesis generator, hex (32 bytes decoded).
    pub generator_public_key: String,
    /// Empty string for genesis: there is no previous block.
    pub previous_block_signature: String,
    /// Block reward. Genesis forges for free, but the field is on the wire.
    #[serde_as(as = "DisplayFromStr")]
    pub reward: Amount,
    /// Network magic, e.g. `"SSSHX"`.
    pub magic: String,
    /// Chain-level economic parameters.
    pub asset: BlockAsset,
    /// Declared transaction count and payload checksum.
    pub transaction_info: TransactionInfo,
    /// The pre-signed genesis transactions, in canonical replay order.
    pub transaction_in_blocks: Vec<TransactionEnvelope>,
    /// Declared aggregate totals the replay must reproduce exactly.
    pub statistic_info: StatisticInfo,
}

/// Wrapper the wire format uses around the genesis asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAsset {
    pub genesis_asset: GenesisAsset,
}

/// Chain-level economic parameters.
///
/// Immutable once the block is accepted: created once, never mutated.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisAsset {
    /// Total token supply cap, in base units.
    #[serde_as(as = "DisplayFromStr")]
    pub total_supply: Amount,
    /// Maximum block size in bytes.
    pub max_block_size: u64,
    /// Forging interval in seconds.
    pub forge_interval: u64,
    /// Number of forging slots per round.
    pub round_size: u64,
    /// Flat fee per transaction type.
    #[serde_as(as = "BTreeMap<_, DisplayFromStr>")]
    pub fee_schedule: BTreeMap<TxType, Amount>,
}

/// Declared transaction count and payload checksum for the block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub number_of_transactions: u32,
    /// Hex SHA-256 over the concatenated canonical transaction payloads.
    pub payload_hash: String,
    /// Byte length of that concatenation.
    pub payload_length: u64,
}

/// One slot in the block's transaction list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEnvelope {
    /// Ordinal position within the block. Contiguous from 0.
    pub t_index: u32,
    /// Height of the containing block. Always 1 in genesis.
    pub height: u64,
    /// Envelope signature, hex (64 bytes decoded).
    pub signature: String,
    pub transaction: Transaction,
}

/// A pre-signed genesis transaction.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Type tag selecting the asset variant.
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub sender_id: AccountId,
    /// Required for `ETY-02` and `AST-02`, absent otherwise.
    #[serde(default)]
    pub recipient_id: Option<AccountId>,
    /// Sender public key, hex (32 bytes decoded).
    pub sender_public_key: String,
    #[serde_as(as = "DisplayFromStr")]
    pub fee: Amount,
    pub timestamp: u64,
    /// Transaction signature, hex (64 bytes decoded).
    pub signature: String,
    pub asset: TxAsset,
}

/// Transaction type tags as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TxType {
    /// Name-service registration.
    #[serde(rename = "LNS-00")]
    NameService,
    /// Entity-factory issuance.
    #[serde(rename = "ETY-01")]
    FactoryIssuance,
    /// Entity issuance from a factory.
    #[serde(rename = "ETY-02")]
    EntityIssuance,
    /// Asset transfer.
    #[serde(rename = "AST-02")]
    AssetMove,
}

impl TxType {
    /// The wire tag, also used as the canonical payload-byte encoding.
    pub fn tag(self) -> &'static str {
        match self {
            TxType::NameService => "LNS-00",
            TxType::FactoryIssuance => "ETY-01",
            TxType::EntityIssuance => "ETY-02",
            TxType::AssetMove => "AST-02",
        }
    }

    /// Whether this type carries value to a recipient.
    pub fn requires_recipient(self) -> bool {
        matches!(self, TxType::EntityIssuance | TxType::AssetMove)
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Type-specific transaction payload, externally tagged on the wire:
/// `"asset": { "move": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxAsset {
    /// `LNS-00` payload.
    Lns(NameBinding),
    /// `ETY-01` payload.
    Factory(FactoryIssuance),
    /// `ETY-02` payload.
    Entity(EntityIssuance),
    /// `AST-02` payload.
    Move(AssetMove),
}

impl TxAsset {
    /// The type tag this payload variant belongs to.
    pub fn kind(&self) -> TxType {
        match self {
            TxAsset::Lns(_) => TxType::NameService,
            TxAsset::Factory(_) => TxType::FactoryIssuance,
            TxAsset::Entity(_) => TxType::EntityIssuance,
            TxAsset::Move(_) => TxType::AssetMove,
        }
    }
}

/// A name-service binding: `name` resolves to the `link` address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameBinding {
    pub name: String,
    pub link: AccountId,
}

/// An entity-factory template with a bounded remaining-issuance counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryIssuance {
    pub factory_name: String,
    /// Asset type the factory's entities are denominated in, e.g. `"MLB"`.
    pub entity_type: String,
    /// Remaining-issuance counter. Each `ETY-02` consumes one.
    pub prealnum: u64,
}

/// Instantiation of one entity from a registered factory.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityIssuance {
    pub factory_name: String,
    pub entity_name: String,
    /// Amount credited to the recipient on issuance.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}

/// A plain asset transfer.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMove {
    /// Network magic the moved asset belongs to.
    pub magic: String,
    /// Asset type within that magic, e.g. `"MLB"`.
    pub asset_type: String,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: Amount,
}
