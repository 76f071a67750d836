//! # Genesis Loader
//!
//! Parses the raw genesis JSON into a typed [`GenesisBlock`] and fails fast
//! on every structural invariant the wire format promises:
//!
//! - height is 1 and the previous-block signature is empty (terminal lower
//!   bound of the chain)
//! - declared transaction count matches the list length
//! - `tIndex` is the contiguous sequence `0..n`, every envelope at height 1
//! - each asset payload variant agrees with its `type` tag
//! - account ids are well-formed, recipients present exactly where the type
//!   requires one
//! - chain parameters are positive and every fee matches the genesis fee
//!   schedule

use malibu_types::{GenesisAsset, GenesisBlock, Transaction, GENESIS_HEIGHT};

use super::errors::ParseError;

/// Parses and structurally validates genesis documents.
pub struct GenesisLoader;

impl GenesisLoader {
    /// Parse raw JSON text into a validated [`GenesisBlock`].
    pub fn load(raw: &str) -> Result<GenesisBlock, ParseError> {
        let block: GenesisBlock = serde_json::from_str(raw)?;
        Self::validate(&block)?;
        Ok(block)
    }

    /// Structural validation of an already-parsed block.
    pub fn validate(block: &GenesisBlock) -> Result<(), ParseError> {
        if block.height != GENESIS_HEIGHT {
            return Err(ParseError::WrongHeight {
                expected: GENESIS_HEIGHT,
                actual: block.height,
            });
        }
        if !block.previous_block_signature.is_empty() {
            return Err(ParseError::NonEmptyPreviousSignature(
                block.previous_block_signature.clone(),
            ));
        }
        if block.magic.is_empty() {
            return Err(ParseError::EmptyMagic);
        }

        let params = &block.asset.genesis_asset;
        validate_chain_parameters(params)?;
        if block.block_size > params.max_block_size {
            return Err(ParseError::BlockSizeExceedsLimit {
                block_size: block.block_size,
                limit: params.max_block_size,
            });
        }

        let declared = block.transaction_info.number_of_transactions;
        let found = block.transaction_in_blocks.len();
        if declared as usize != found {
            return Err(ParseError::TransactionCountMismatch { declared, found });
        }

        for (position, envelope) in block.transaction_in_blocks.iter().enumerate() {
            let expected = position as u32;
            if envelope.t_index != expected {
                return Err(ParseError::NonContiguousIndex {
                    expected,
                    actual: envelope.t_index,
                });
            }
            if envelope.height != GENESIS_HEIGHT {
                return Err(ParseError::WrongTransactionHeight {
                    t_index: envelope.t_index,
                    height: envelope.height,
                });
            }
            validate_transaction(envelope.t_index, &envelope.transaction, params)?;
        }

        Ok(())
    }
}

fn validate_chain_parameters(params: &GenesisAsset) -> Result<(), ParseError> {
    let positive = [
        ("totalSupply", !params.total_supply.is_zero()),
        ("maxBlockSize", params.max_block_size > 0),
        ("forgeInterval", params.forge_interval > 0),
        ("roundSize", params.round_size > 0),
    ];
    for (name, ok) in positive {
        if !ok {
            return Err(ParseError::ZeroChainParameter { name });
        }
    }
    Ok(())
}

fn validate_transaction(
    t_index: u32,
    tx: &Transaction,
    params: &GenesisAsset,
) -> Result<(), ParseError> {
    let tx_type = tx.tx_type;

    let payload = tx.asset.kind();
    if payload != tx_type {
        return Err(ParseError::AssetVariantMismatch {
            t_index,
            declared: tx_type,
            payload,
        });
    }

    if !tx.sender_id.is_well_formed() {
        return Err(ParseError::MalformedAccountId {
            t_index,
            account: tx.sender_id.clone(),
        });
    }
    match (&tx.recipient_id, tx_type.requires_recipient()) {
        (None, true) => return Err(ParseError::MissingRecipient { t_index, tx_type }),
        (Some(_), false) => return Err(ParseError::UnexpectedRecipient { t_index, tx_type }),
        (Some(recipient), true) if !recipient.is_well_formed() => {
            return Err(ParseError::MalformedAccountId {
                t_index,
                account: recipient.clone(),
            });
        }
        _ => {}
    }

    let scheduled = *params
        .fee_schedule
        .get(&tx_type)
        .ok_or(ParseError::MissingFeeScheduleEntry(tx_type))?;
    if tx.fee != scheduled {
        return Err(ParseError::FeeScheduleViolation {
            t_index,
            tx_type,
            fee: tx.fee,
            scheduled,
        });
    }

    validate_asset_fields(t_index, tx)
}

fn validate_asset_fields(t_index: u32, tx: &Transaction) -> Result<(), ParseError> {
    use malibu_types::TxAsset;

    let empty = |field| ParseError::EmptyField { t_index, field };
    match &tx.asset {
        TxAsset::Lns(binding) => {
            if binding.name.is_empty() {
                return Err(empty("lns.name"));
            }
            if !binding.link.is_well_formed() {
                return Err(ParseError::MalformedAccountId {
                    t_index,
                    account: binding.link.clone(),
                });
            }
        }
        TxAsset::Factory(factory) => {
            if factory.factory_name.is_empty() {
                return Err(empty("factory.factoryName"));
            }
            if factory.entity_type.is_empty() {
                return Err(empty("factory.entityType"));
            }
        }
        TxAsset::Entity(entity) => {
            if entity.factory_name.is_empty() {
                return Err(empty("entity.factoryName"));
            }
            if entity.entity_name.is_empty() {
                return Err(empty("entity.entityName"));
            }
        }
        TxAsset::Move(mv) => {
            if mv.magic.is_empty() {
                return Err(empty("move.magic"));
            }
            if mv.asset_type.is_empty() {
                return Err(empty("move.assetType"));
            }
        }
    }
    Ok(())
}
