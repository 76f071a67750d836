//! Fixture builders for genesis blocks.
//!
//! `assemble` derives `transactionInfo` and `statisticInfo` from the
//! transaction list itself with an independent fold (not the accumulator
//! under test), so a freshly built fixture satisfies every self-consistency
//! property and each corruption test can flip exactly one of them.

use std::collections::BTreeMap;

use malibu_types::{
    AccountId, Amount, AssetMove, AssetTypeStatistic, BlockAsset, EntityIssuance, FactoryIssuance,
    GenesisAsset, GenesisBlock, MagicStatistic, MoveTotals, NameBinding, StatisticInfo,
    Transaction, TransactionEnvelope, TransactionInfo, TxAsset, TxType, GENESIS_HEIGHT,
};

use crate::domain::verify::IntegrityVerifier;

/// Treasury account funding the fixture distributions.
pub const TREASURY: &str = "mlb1treasury000";

/// Network magic used by all fixtures.
pub const MAGIC: &str = "SSSHX";

/// Primary asset type used by all fixtures.
pub const ASSET_TYPE: &str = "MLB";

pub const FEE_LNS: u128 = 458;
pub const FEE_FACTORY: u128 = 7_000;
pub const FEE_ENTITY: u128 = 2_000;
pub const FEE_MOVE: u128 = 1_000;

/// Apply a mutation to a fixture without recomputing its checksums.
pub fn corrupt(mut block: GenesisBlock, f: impl FnOnce(&mut GenesisBlock)) -> GenesisBlock {
    f(&mut block);
    block
}

/// A compact, fully consistent block: one name registration, two factories,
/// three entity issuances, six transfers. Twelve transactions total.
pub fn small_block() -> GenesisBlock {
    let treasury = TREASURY;
    let mut envelopes = vec![
        lns_envelope(0, treasury, "genesis", treasury),
        factory_envelope(1, treasury, "forge", 10),
        factory_envelope(2, treasury, "share", 5),
        entity_envelope(3, treasury, "mlb1acct000", "forge", "forge-0001", 10_000),
        entity_envelope(4, treasury, "mlb1acct001", "forge", "forge-0002", 10_000),
        entity_envelope(5, treasury, "mlb1acct002", "share", "share-0001", 10_000),
    ];
    for i in 0..6u32 {
        envelopes.push(transfer_envelope(
            6 + i,
            treasury,
            &format!("mlb1acct{i:03}"),
            50_000 + u64::from(i) * 1_000,
        ));
    }
    assemble(envelopes)
}

/// The reference fixture: 503 transactions reproducing the shipped genesis
/// block's aggregate totals: 517458 in fees, 110951738 moved under
/// SSSHX/MLB.
pub fn reference_block() -> GenesisBlock {
    let treasury = TREASURY;
    let mut envelopes = vec![
        lns_envelope(0, treasury, "genesis", treasury),
        factory_envelope(1, treasury, "forge", 10),
        factory_envelope(2, treasury, "share", 5),
        entity_envelope(3, treasury, "mlb1acct000", "forge", "forge-0001", 10_000),
        entity_envelope(4, treasury, "mlb1acct001", "forge", "forge-0002", 10_000),
        entity_envelope(5, treasury, "mlb1acct002", "share", "share-0001", 10_000),
    ];
    // 497 transfers summing to 110_921_738: the first absorbs the remainder.
    let base = 110_921_738u64 / 497;
    let remainder = 110_921_738u64 - base * 497;
    for i in 0..497u32 {
        let amount = if i == 0 { base + remainder } else { base };
        envelopes.push(transfer_envelope(
            6 + i,
            treasury,
            &format!("mlb1acct{i:03}"),
            amount,
        ));
    }
    assemble(envelopes)
}

/// A block containing only transfers of the given amounts, treasury to
/// distinct recipients.
pub fn block_with_transfers(amounts: &[u64]) -> GenesisBlock {
    let envelopes = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| {
            transfer_envelope(i as u32, TREASURY, &format!("mlb1acct{i:03}"), *amount)
        })
        .collect();
    assemble(envelopes)
}

/// Build an `AST-02` transfer slot.
pub fn transfer_envelope(
    t_index: u32,
    sender: &str,
    recipient: &str,
    amount: u64,
) -> TransactionEnvelope {
    envelope(
        t_index,
        Transaction {
            tx_type: TxType::AssetMove,
            sender_id: AccountId::from(sender),
            recipient_id: Some(AccountId::from(recipient)),
            sender_public_key: fake_public_key(t_index),
            fee: Amount::new(FEE_MOVE),
            timestamp: 0,
            signature: fake_signature(t_index, 1),
            asset: TxAsset::Move(AssetMove {
                magic: MAGIC.to_owned(),
                asset_type: ASSET_TYPE.to_owned(),
                amount: Amount::new(amount.into()),
            }),
        },
    )
}

fn lns_envelope(t_index: u32, sender: &str, name: &str, link: &str) -> TransactionEnvelope {
    envelope(
        t_index,
        Transaction {
            tx_type: TxType::NameService,
            sender_id: AccountId::from(sender),
            recipient_id: None,
            sender_public_key: fake_public_key(t_index),
            fee: Amount::new(FEE_LNS),
            timestamp: 0,
            signature: fake_signature(t_index, 1),
            asset: TxAsset::Lns(NameBinding {
                name: name.to_owned(),
                link: AccountId::from(link),
            }),
        },
    )
}

fn factory_envelope(
    t_index: u32,
    sender: &str,
    factory_name: &str,
    prealnum: u64,
) -> TransactionEnvelope {
    envelope(
        t_index,
        Transaction {
            tx_type: TxType::FactoryIssuance,
            sender_id: AccountId::from(sender),
            recipient_id: None,
            sender_public_key: fake_public_key(t_index),
            fee: Amount::new(FEE_FACTORY),
            timestamp: 0,
            signature: fake_signature(t_index, 1),
            asset: TxAsset::Factory(FactoryIssuance {
                factory_name: factory_name.to_owned(),
                entity_type: ASSET_TYPE.to_owned(),
                prealnum,
            }),
        },
    )
}

fn entity_envelope(
    t_index: u32,
    sender: &str,
    recipient: &str,
    factory_name: &str,
    entity_name: &str,
    amount: u64,
) -> TransactionEnvelope {
    envelope(
        t_index,
        Transaction {
            tx_type: TxType::EntityIssuance,
            sender_id: AccountId::from(sender),
            recipient_id: Some(AccountId::from(recipient)),
            sender_public_key: fake_public_key(t_index),
            fee: Amount::new(FEE_ENTITY),
            timestamp: 0,
            signature: fake_signature(t_index, 1),
            asset: TxAsset::Entity(EntityIssuance {
                factory_name: factory_name.to_owned(),
                entity_name: entity_name.to_owned(),
                amount: Amount::new(amount.into()),
            }),
        },
    )
}

fn envelope(t_index: u32, transaction: Transaction) -> TransactionEnvelope {
    TransactionEnvelope {
        t_index,
        height: GENESIS_HEIGHT,
        signature: fake_signature(t_index, 2),
        transaction,
    }
}

/// Assemble a block around the given envelopes, deriving `statisticInfo`
/// and `transactionInfo` from the list itself.
pub fn assemble(envelopes: Vec<TransactionEnvelope>) -> GenesisBlock {
    let statistic_info = fold_statistics(&envelopes);
    let number_of_transactions = envelopes.len() as u32;

    let mut block = GenesisBlock {
        version: 1,
        height: GENESIS_HEIGHT,
        block_size: 0,
        timestamp: 1_700_000_000,
        signature: "ab".repeat(64),
        generator_public_key: "cd".repeat(32),
        previous_block_signature: String::new(),
        reward: Amount::ZERO,
        magic: MAGIC.to_owned(),
        asset: BlockAsset {
            genesis_asset: GenesisAsset {
                total_supply: Amount::new(1_000_000_000),
                max_block_size: 8_388_608,
                forge_interval: 10,
                round_size: 57,
                fee_schedule: BTreeMap::from([
                    (TxType::NameService, Amount::new(FEE_LNS)),
                    (TxType::FactoryIssuance, Amount::new(FEE_FACTORY)),
                    (TxType::EntityIssuance, Amount::new(FEE_ENTITY)),
                    (TxType::AssetMove, Amount::new(FEE_MOVE)),
                ]),
            },
        },
        transaction_info: TransactionInfo {
            number_of_transactions,
            payload_hash: String::new(),
            payload_length: 0,
        },
        transaction_in_blocks: envelopes,
        statistic_info,
    };

    let digest = IntegrityVerifier::compute_payload(&block)
        .expect("fixture envelopes carry well-formed signatures");
    block.transaction_info.payload_hash = digest.hash_hex;
    block.transaction_info.payload_length = digest.length;
    block.block_size = digest.length + 512;
    block
}

/// Independent statistics fold over the envelope list.
fn fold_statistics(envelopes: &[TransactionEnvelope]) -> StatisticInfo {
    let mut total_fee = 0u128;
    let mut total_asset = 0u128;
    let mut counts: BTreeMap<TxType, u32> = BTreeMap::new();
    let mut moves: BTreeMap<(String, String), (u128, u32)> = BTreeMap::new();
    let mut factory_types: BTreeMap<String, String> = BTreeMap::new();

    for env in envelopes {
        let tx = &env.transaction;
        total_fee += tx.fee.raw();
        *counts.entry(tx.tx_type).or_insert(0) += 1;
        match &tx.asset {
            TxAsset::Lns(_) => {}
            TxAsset::Factory(factory) => {
                factory_types.insert(factory.factory_name.clone(), factory.entity_type.clone());
            }
            TxAsset::Entity(entity) => {
                let asset_type = factory_types
                    .get(&entity.factory_name)
                    .cloned()
                    .unwrap_or_else(|| ASSET_TYPE.to_owned());
                let slot = moves.entry((MAGIC.to_owned(), asset_type)).or_insert((0, 0));
                slot.0 += entity.amount.raw();
                slot.1 += 1;
                total_asset += entity.amount.raw();
            }
            TxAsset::Move(mv) => {
                let slot = moves
                    .entry((mv.magic.clone(), mv.asset_type.clone()))
                    .or_insert((0, 0));
                slot.0 += mv.amount.raw();
                slot.1 += 1;
                total_asset += mv.amount.raw();
            }
        }
    }

    let mut magic_map: BTreeMap<String, MagicStatistic> = BTreeMap::new();
    for ((magic, asset_type), (amount, count)) in moves {
        magic_map
            .entry(magic)
            .or_insert_with(|| MagicStatistic {
                asset_type_type_statistic_hash_map: BTreeMap::new(),
            })
            .asset_type_type_statistic_hash_map
            .insert(
                asset_type,
                AssetTypeStatistic {
                    total: MoveTotals {
                        move_amount: Amount::new(amount),
                        move_count: count,
                    },
                },
            );
    }

    StatisticInfo {
        total_fee: Amount::new(total_fee),
        total_asset: Amount::new(total_asset),
        magic_asset_type_type_statistic_hash_map: magic_map,
        number_of_transactions_hash_map: counts,
    }
}

fn fake_signature(t_index: u32, lane: u8) -> String {
    let mut bytes = [0u8; 64];
    for (j, b) in bytes.iter_mut().enumerate() {
        *b = (t_index as u8)
            .wrapping_mul(31)
            .wrapping_add(lane)
            .wrapping_add(j as u8);
    }
    hex::encode(bytes)
}

fn fake_public_key(t_index: u32) -> String {
    let mut bytes = [0u8; 32];
    for (j, b) in bytes.iter_mut().enumerate() {
        *b = (t_index as u8).wrapping_mul(17).wrapping_add(j as u8);
    }
    hex::encode(bytes)
}
