//! # State Accumulator
//!
//! Running ledger projection built while replaying the genesis transaction
//! list, and the reconciliation of its final totals against the block's
//! declared `statisticInfo`.
//!
//! ## Balance model
//!
//! Balances are signed (`i128`) during genesis replay. There is no prior
//! state, so the treasury accounts that disburse the initial distribution
//! legitimately end negative by exactly what they sent. Entity issuance
//! (`ETY-02`) mints: it credits the recipient without debiting anyone, and
//! the factory's prealnum counter is the supply control. The compensating
//! invariant is global: the sum of all final balances plus the accumulated
//! fee total must equal the minted total. Transfers move value; only
//! factories create it, and only within their issuance bounds.

use std::collections::BTreeMap;

use malibu_types::{AccountId, Amount, StatisticInfo, TransactionEnvelope, TxAsset, TxType};

use super::errors::{IntegrityError, ReplayError};

/// An entity factory registered by an `ETY-01` transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryState {
    /// Account that issued the factory.
    pub owner: AccountId,
    /// Asset type the factory's entities are denominated in.
    pub entity_type: String,
    /// Remaining issuance counter. Each `ETY-02` consumes one.
    pub prealnum_remaining: u64,
    /// Entities issued so far.
    pub issued: u64,
}

/// The initial ledger state derived from a verified genesis block.
///
/// This is a derived, shared projection: it holds no back-reference into
/// the block, and nothing mutates it after bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerState {
    /// Signed per-account balances after replay.
    pub balances: BTreeMap<AccountId, i128>,
    /// Name-service registry: name to linked address.
    pub names: BTreeMap<String, AccountId>,
    /// Entity-factory table keyed by factory name.
    pub factories: BTreeMap<String, FactoryState>,
    /// Total fees collected across all transactions.
    pub total_fee: Amount,
    /// Total value moved or credited across all asset types.
    pub total_moved: Amount,
    /// Total value minted by entity issuances.
    pub total_minted: Amount,
}

impl LedgerState {
    pub fn balance_of(&self, account: &AccountId) -> i128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn resolve_name(&self, name: &str) -> Option<&AccountId> {
        self.names.get(name)
    }

    /// Number of accounts referenced at least once during replay.
    pub fn account_count(&self) -> usize {
        self.balances.len()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningTotals {
    amount: u128,
    count: u32,
}

/// Accumulates ledger state and statistics while the replayer walks the
/// transaction list, then reconciles against the declared totals.
#[derive(Debug)]
pub struct StateAccumulator {
    /// Block-level network magic, used to attribute `ETY-02` credits.
    block_magic: String,
    balances: BTreeMap<AccountId, i128>,
    names: BTreeMap<String, AccountId>,
    factories: BTreeMap<String, FactoryState>,
    /// Movement totals keyed by (magic, asset type).
    move_totals: BTreeMap<(String, String), RunningTotals>,
    type_counts: BTreeMap<TxType, u32>,
    total_fee: u128,
    total_moved: u128,
    total_minted: u128,
}

impl StateAccumulator {
    pub fn new(block_magic: &str) -> Self {
        Self {
            block_magic: block_magic.to_owned(),
            balances: BTreeMap::new(),
            names: BTreeMap::new(),
            factories: BTreeMap::new(),
            move_totals: BTreeMap::new(),
            type_counts: BTreeMap::new(),
            total_fee: 0,
            total_moved: 0,
            total_minted: 0,
        }
    }

    /// Apply one transaction. Dispatches on the type tag; the loader has
    /// already guaranteed tag/payload agreement and recipient presence, but
    /// the accumulator re-checks what it relies on rather than panicking.
    pub fn apply(&mut self, envelope: &TransactionEnvelope) -> Result<(), ReplayError> {
        let t_index = envelope.t_index;
        let tx = &envelope.transaction;

        *self.type_counts.entry(tx.tx_type).or_insert(0) += 1;

        // Fee comes out of the sender for every type.
        let fee = signed(tx.fee, t_index)?;
        self.adjust(&tx.sender_id, -fee, t_index)?;
        self.total_fee = self
            .total_fee
            .checked_add(tx.fee.raw())
            .ok_or(ReplayError::AmountOverflow { t_index })?;

        match &tx.asset {
            TxAsset::Lns(binding) => {
                if self.names.contains_key(&binding.name) {
                    return Err(ReplayError::NameAlreadyRegistered {
                        t_index,
                        name: binding.name.clone(),
                    });
                }
                self.names.insert(binding.name.clone(), binding.link.clone());
            }
            TxAsset::Factory(factory) => {
                if self.factories.contains_key(&factory.factory_name) {
                    return Err(ReplayError::FactoryAlreadyRegistered {
                        t_index,
                        factory: factory.factory_name.clone(),
                    });
                }
                self.factories.insert(
                    factory.factory_name.clone(),
                    FactoryState {
                        owner: tx.sender_id.clone(),
                        entity_type: factory.entity_type.clone(),
                        prealnum_remaining: factory.prealnum,
                        issued: 0,
                    },
                );
            }
            TxAsset::Entity(entity) => {
                let recipient = tx
                    .recipient_id
                    .clone()
                    .ok_or(ReplayError::MissingRecipient { t_index })?;
                let entity_type = {
                    let factory = self.factories.get_mut(&entity.factory_name).ok_or_else(
                        || ReplayError::UnknownFactory {
                            t_index,
                            factory: entity.factory_name.clone(),
                        },
                    )?;
                    if factory.prealnum_remaining == 0 {
                        return Err(ReplayError::FactoryExhausted {
                            t_index,
                            factory: entity.factory_name.clone(),
                        });
                    }
                    factory.prealnum_remaining -= 1;
                    factory.issued += 1;
                    factory.entity_type.clone()
                };
                let amount = signed(entity.amount, t_index)?;
                self.adjust(&recipient, amount, t_index)?;
                self.total_minted = self
                    .total_minted
                    .checked_add(entity.amount.raw())
                    .ok_or(ReplayError::AmountOverflow { t_index })?;
                // Issuance credits are attributed to the block's own magic.
                let magic = self.block_magic.clone();
                self.record_move(magic, entity_type, entity.amount, t_index)?;
            }
            TxAsset::Move(mv) => {
                let recipient = tx
                    .recipient_id
                    .clone()
                    .ok_or(ReplayError::MissingRecipient { t_index })?;
                let amount = signed(mv.amount, t_index)?;
                self.adjust(&tx.sender_id, -amount, t_index)?;
                self.adjust(&recipient, amount, t_index)?;
                self.record_move(mv.magic.clone(), mv.asset_type.clone(), mv.amount, t_index)?;
            }
        }

        Ok(())
    }

    /// Compare the accumulated totals against the block's declared
    /// statistics and seal the ledger. Any mismatch is fatal: either the
    /// embedded data is corrupt or the replay diverged.
    pub fn finish(
        self,
        declared: &StatisticInfo,
        number_of_transactions: u32,
    ) -> Result<LedgerState, IntegrityError> {
        let mismatch = |quantity: String, declared: String, computed: String| {
            Err(IntegrityError::StatisticMismatch {
                quantity,
                declared,
                computed,
            })
        };

        if declared.total_fee.raw() != self.total_fee {
            return mismatch(
                "totalFee".into(),
                declared.total_fee.to_string(),
                self.total_fee.to_string(),
            );
        }
        if declared.total_asset.raw() != self.total_moved {
            return mismatch(
                "totalAsset".into(),
                declared.total_asset.to_string(),
                self.total_moved.to_string(),
            );
        }

        // Movement totals must match exactly in both directions: no missing
        // and no extra (magic, assetType) entries.
        let mut declared_moves: BTreeMap<(String, String), (Amount, u32)> = BTreeMap::new();
        for (magic, per_magic) in &declared.magic_asset_type_type_statistic_hash_map {
            for (asset_type, stat) in &per_magic.asset_type_type_statistic_hash_map {
                declared_moves.insert(
                    (magic.clone(), asset_type.clone()),
                    (stat.total.move_amount, stat.total.move_count),
                );
            }
        }
        let keys: Vec<_> = declared_moves
            .keys()
            .chain(self.move_totals.keys())
            .cloned()
            .collect();
        for key in keys {
            let quantity = format!("moveTotals[{}/{}]", key.0, key.1);
            match (declared_moves.get(&key), self.move_totals.get(&key)) {
                (Some(d), Some(c)) => {
                    if d.0.raw() != c.amount {
                        return mismatch(
                            format!("{quantity}.moveAmount"),
                            d.0.to_string(),
                            c.amount.to_string(),
                        );
                    }
                    if d.1 != c.count {
                        return mismatch(
                            format!("{quantity}.moveCount"),
                            d.1.to_string(),
                            c.count.to_string(),
                        );
                    }
                }
                (Some(d), None) => {
                    return mismatch(quantity, d.0.to_string(), "absent".into());
                }
                (None, Some(c)) => {
                    return mismatch(quantity, "absent".into(), c.amount.to_string());
                }
                (None, None) => {}
            }
        }

        // Per-type counts, again in both directions, and their declared sum
        // must cover the whole block.
        let all_types = [
            TxType::NameService,
            TxType::FactoryIssuance,
            TxType::EntityIssuance,
            TxType::AssetMove,
        ];
        for ty in all_types {
            let d = declared
                .number_of_transactions_hash_map
                .get(&ty)
                .copied()
                .unwrap_or(0);
            let c = self.type_counts.get(&ty).copied().unwrap_or(0);
            if d != c {
                return mismatch(
                    format!("numberOfTransactions[{ty}]"),
                    d.to_string(),
                    c.to_string(),
                );
            }
        }
        let declared_sum: u32 = declared.number_of_transactions_hash_map.values().sum();
        if declared_sum != number_of_transactions {
            return mismatch(
                "numberOfTransactionsHashMap total".into(),
                declared_sum.to_string(),
                number_of_transactions.to_string(),
            );
        }

        // Global conservation: everything credited was either debited from
        // another account or minted by a factory; fees only leave.
        let residual = self
            .balances
            .values()
            .try_fold(0i128, |acc, b| acc.checked_add(*b))
            .and_then(|sum| sum.checked_add(i128::try_from(self.total_fee).ok()?))
            .and_then(|sum| sum.checked_sub(i128::try_from(self.total_minted).ok()?))
            .ok_or(IntegrityError::UnbalancedLedger { residual: i128::MAX })?;
        if residual != 0 {
            return Err(IntegrityError::UnbalancedLedger { residual });
        }

        Ok(LedgerState {
            balances: self.balances,
            names: self.names,
            factories: self.factories,
            total_fee: Amount::new(self.total_fee),
            total_moved: Amount::new(self.total_moved),
            total_minted: Amount::new(self.total_minted),
        })
    }

    fn adjust(&mut self, account: &AccountId, delta: i128, t_index: u32) -> Result<(), ReplayError> {
        let balance = self.balances.entry(account.clone()).or_insert(0);
        *balance = balance
            .checked_add(delta)
            .ok_or(ReplayError::AmountOverflow { t_index })?;
        Ok(())
    }

    fn record_move(
        &mut self,
        magic: String,
        asset_type: String,
        amount: Amount,
        t_index: u32,
    ) -> Result<(), ReplayError> {
        let totals = self.move_totals.entry((magic, asset_type)).or_default();
        totals.amount = totals
            .amount
            .checked_add(amount.raw())
            .ok_or(ReplayError::AmountOverflow { t_index })?;
        totals.count += 1;
        self.total_moved = self
            .total_moved
            .checked_add(amount.raw())
            .ok_or(ReplayError::AmountOverflow { t_index })?;
        Ok(())
    }
}

fn signed(amount: Amount, t_index: u32) -> Result<i128, ReplayError> {
    amount
        .as_signed()
        .ok_or(ReplayError::AmountOverflow { t_index })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::replay::TransactionReplayer;
    use crate::test_utils::{corrupt, small_block};

    fn replayed(block: &malibu_types::GenesisBlock) -> StateAccumulator {
        TransactionReplayer::new(block).replay().unwrap()
    }

    #[test]
    fn reconciles_consistent_block() {
        let block = small_block();
        let ledger = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap();
        assert_eq!(ledger.total_fee, block.statistic_info.total_fee);
        assert_eq!(ledger.total_moved, block.statistic_info.total_asset);
    }

    #[test]
    fn balances_plus_fees_equal_minted_value() {
        let block = small_block();
        let ledger = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap();
        let sum: i128 = ledger.balances.values().sum();
        assert_eq!(
            sum + ledger.total_fee.raw() as i128,
            ledger.total_minted.raw() as i128
        );
        // Three issuances of 10_000 each in the fixture.
        assert_eq!(ledger.total_minted, Amount::new(30_000));
    }

    #[test]
    fn rejects_total_fee_mismatch() {
        let block = corrupt(small_block(), |b| {
            b.statistic_info.total_fee = Amount::new(1);
        });
        let err = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap_err();
        assert!(
            matches!(&err, IntegrityError::StatisticMismatch { quantity, .. } if quantity == "totalFee"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_move_amount_mismatch() {
        let block = corrupt(small_block(), |b| {
            let per_magic = b
                .statistic_info
                .magic_asset_type_type_statistic_hash_map
                .get_mut("SSSHX")
                .unwrap();
            let stat = per_magic
                .asset_type_type_statistic_hash_map
                .get_mut("MLB")
                .unwrap();
            stat.total.move_amount = Amount::new(42);
            // Keep totalAsset untouched so the failure localizes to the map.
        });
        let err = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::StatisticMismatch { ref quantity, .. }
                if quantity == "moveTotals[SSSHX/MLB].moveAmount"
        ));
    }

    #[test]
    fn rejects_extra_declared_move_bucket() {
        let block = corrupt(small_block(), |b| {
            let per_magic = b
                .statistic_info
                .magic_asset_type_type_statistic_hash_map
                .get_mut("SSSHX")
                .unwrap();
            per_magic.asset_type_type_statistic_hash_map.insert(
                "GHOST".into(),
                malibu_types::AssetTypeStatistic {
                    total: malibu_types::MoveTotals {
                        move_amount: Amount::new(5),
                        move_count: 1,
                    },
                },
            );
        });
        let err = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::StatisticMismatch { ref computed, .. } if computed == "absent"
        ));
    }

    #[test]
    fn rejects_type_count_mismatch() {
        let block = corrupt(small_block(), |b| {
            *b.statistic_info
                .number_of_transactions_hash_map
                .get_mut(&TxType::AssetMove)
                .unwrap() += 1;
        });
        let err = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            IntegrityError::StatisticMismatch { ref quantity, .. }
                if quantity == "numberOfTransactions[AST-02]"
        ));
    }

    #[test]
    fn ledger_lookups() {
        let block = small_block();
        let ledger = replayed(&block)
            .finish(
                &block.statistic_info,
                block.transaction_info.number_of_transactions,
            )
            .unwrap();
        assert!(ledger.resolve_name("genesis").is_some());
        assert!(ledger.resolve_name("nonexistent").is_none());
        assert!(ledger.account_count() > 0);
        let forge = &ledger.factories["forge"];
        assert_eq!(forge.issued + forge.prealnum_remaining, 10);
    }
}
