//! Declared aggregate statistics.
//!
//! `statisticInfo` is a self-describing checksum: the block declares the
//! totals its own transaction list must produce, and the replay reproduces
//! them independently. Keys of the nested maps are network magic and asset
//! type; `BTreeMap` keeps iteration deterministic for comparison and logs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::amount::Amount;
use crate::entities::TxType;

/// Declared aggregate totals for the whole block.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticInfo {
    /// Sum of every transaction's `fee`.
    #[serde_as(as = "DisplayFromStr")]
    pub total_fee: Amount,
    /// Sum of every moved or credited amount across all asset types.
    #[serde_as(as = "DisplayFromStr")]
    pub total_asset: Amount,
    /// Per-magic, per-asset-type movement totals.
    pub magic_asset_type_type_statistic_hash_map: BTreeMap<String, MagicStatistic>,
    /// Per-type transaction counts.
    pub number_of_transactions_hash_map: BTreeMap<TxType, u32>,
}

/// Movement totals for one network magic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicStatistic {
    pub asset_type_type_statistic_hash_map: BTreeMap<String, AssetTypeStatistic>,
}

/// Movement totals for one asset type within a magic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTypeStatistic {
    pub total: MoveTotals,
}

/// Amount moved and number of movements.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveTotals {
    #[serde_as(as = "DisplayFromStr")]
    pub move_amount: Amount,
    pub move_count: u32,
}
