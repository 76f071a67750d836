//! # Genesis Bootstrap Flow
//!
//! Drives the full pipeline (source, loader, replayer, accumulator,
//! verifier) over the 503-transaction reference fixture, the same shape
//! and aggregate totals as the shipped malibu genesis block.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use malibu_genesis::test_utils::{corrupt, reference_block, ASSET_TYPE, MAGIC, TREASURY};
    use malibu_genesis::{
        BootstrapPhase, FileGenesisSource, GenesisBootstrap, GenesisError, IntegrityError,
        ParseError,
    };
    use malibu_types::{AccountId, Amount, GenesisBlock, TxAsset};

    fn raw(block: &GenesisBlock) -> String {
        serde_json::to_string(block).unwrap()
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[test]
    fn reference_block_bootstraps_end_to_end() {
        let block = reference_block();
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&block)).unwrap();
        let ledger = bootstrap.apply().unwrap();

        // The shipped block's aggregate totals.
        assert_eq!(ledger.total_fee, Amount::new(517_458));
        assert_eq!(ledger.total_moved, Amount::new(110_951_738));

        // One name, two factories, 497 transfer recipients + treasury.
        assert_eq!(ledger.names.len(), 1);
        assert_eq!(ledger.factories.len(), 2);
        assert_eq!(ledger.account_count(), 498);

        // The treasury disbursed everything it moved plus every fee.
        let treasury = AccountId::from(TREASURY);
        let transfers_out: i128 = 110_951_738 - 30_000; // entity credits mint, transfers move
        assert_eq!(
            ledger.balance_of(&treasury),
            -(transfers_out + 517_458_i128)
        );
    }

    #[test]
    fn reference_block_satisfies_declared_invariants() {
        let block = reference_block();

        assert_eq!(block.height, 1);
        assert_eq!(block.previous_block_signature, "");
        assert_eq!(block.transaction_info.number_of_transactions, 503);
        assert_eq!(block.transaction_in_blocks.len(), 503);
        for (i, env) in block.transaction_in_blocks.iter().enumerate() {
            assert_eq!(env.t_index, i as u32);
        }

        let totals = &block.statistic_info.magic_asset_type_type_statistic_hash_map[MAGIC]
            .asset_type_type_statistic_hash_map[ASSET_TYPE]
            .total;
        assert_eq!(totals.move_amount, Amount::new(110_951_738));
        assert_eq!(block.statistic_info.total_fee, Amount::new(517_458));
    }

    #[test]
    fn bootstraps_from_a_file_source() {
        let block = reference_block();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw(&block).as_bytes()).unwrap();

        let source = FileGenesisSource::new(file.path());
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load_from(&source).unwrap();
        bootstrap.apply().unwrap();
        assert_eq!(bootstrap.phase(), BootstrapPhase::Verified);
    }

    // =========================================================================
    // REJECTION PATHS
    // =========================================================================

    #[test]
    fn truncated_document_is_rejected_at_parse() {
        let mut text = raw(&reference_block());
        text.truncate(text.len() / 2);

        let mut bootstrap = GenesisBootstrap::new();
        let err = bootstrap.load(&text).unwrap_err();
        assert!(matches!(err, GenesisError::Parse(ParseError::Json(_))));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Rejected);
    }

    #[test]
    fn tampered_transfer_amount_fails_reconciliation() {
        // The payload hash does not cover amounts; the statistics do. A
        // tampered amount must still be caught, by reconciliation.
        let block = corrupt(reference_block(), |b| {
            let env = b
                .transaction_in_blocks
                .iter_mut()
                .rev()
                .find(|e| matches!(e.transaction.asset, TxAsset::Move(_)))
                .unwrap();
            if let TxAsset::Move(mv) = &mut env.transaction.asset {
                mv.amount = Amount::new(mv.amount.raw() + 1);
            }
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
    fn tampered_sender_fails_payload_hash() {
        // Impostor id has the same byte length as the treasury sender it
        // replaces, so the declared payload length still matches and only
        // the recomputed hash exposes the rewrite.
        let block = corrupt(reference_block(), |b| {
            b.transaction_in_blocks[10].transaction.sender_id = AccountId::from("mlb1impostor000");
        });

        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&block)).unwrap();
        let err = bootstrap.apply().unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Integrity(IntegrityError::PayloadHashMismatch { .. })
        ));
    }

    #[test]
    fn reordered_transactions_are_rejected_at_parse() {
        let block = corrupt(reference_block(), |b| {
            b.transaction_in_blocks.swap(100, 200);
        });

        let mut bootstrap = GenesisBootstrap::new();
        let err = bootstrap.load(&raw(&block)).unwrap_err();
        assert!(matches!(
            err,
            GenesisError::Parse(ParseError::NonContiguousIndex { .. })
        ));
    }

    #[test]
    fn genesis_applies_exactly_once() {
        let mut bootstrap = GenesisBootstrap::new();
        bootstrap.load(&raw(&reference_block())).unwrap();
        bootstrap.apply().unwrap();

        assert!(matches!(
            bootstrap.apply(),
            Err(GenesisError::AlreadyApplied)
        ));
        // The first result is still readable.
        assert_eq!(
            bootstrap.ledger().unwrap().total_fee,
            Amount::new(517_458)
        );
    }

    #[test]
    fn missing_genesis_file_is_a_source_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileGenesisSource::new(dir.path().join("absent.json"));
        let mut bootstrap = GenesisBootstrap::new();
        let err = bootstrap.load_from(&source).unwrap_err();
        assert!(matches!(err, GenesisError::Source(_)));
        assert_eq!(bootstrap.phase(), BootstrapPhase::Rejected);
    }
}
