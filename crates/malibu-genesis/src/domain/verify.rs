//! # Integrity Verifier
//!
//! Recomputes the block's payload checksum and checks the shape of every
//! signature-adjacent field. Cryptographic signature verification needs key
//! material that is out of scope here; what the bootstrap can and does
//! verify is that the loaded block matches its own declared
//! `payloadHash`/`payloadLength` and that every signature and public key is
//! present with the right byte width.
//!
//! ## Canonical payload bytes
//!
//! For each envelope, in `tIndex` order:
//!
//! ```text
//! tIndex (u32 BE) || type tag || senderId || recipientId (empty if null)
//!                 || fee (decimal) || transaction signature (64 raw bytes)
//! ```
//!
//! `payloadLength` is the byte length of the whole concatenation and
//! `payloadHash` its hex SHA-256.

use sha2::{Digest, Sha256};

use malibu_types::{GenesisBlock, TransactionEnvelope};

use super::errors::IntegrityError;

/// Byte width of a decoded signature.
pub const SIGNATURE_LEN: usize = 64;
/// Byte width of a decoded public key.
pub const PUBLIC_KEY_LEN: usize = 32;
/// Byte width of the decoded payload hash.
pub const PAYLOAD_HASH_LEN: usize = 32;

/// Recomputed payload checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadDigest {
    /// Hex SHA-256 of the concatenated canonical payloads.
    pub hash_hex: String,
    /// Total byte length of the concatenation.
    pub length: u64,
}

/// Recomputes payload hash/length and signature-shape checks.
pub struct IntegrityVerifier;

impl IntegrityVerifier {
    /// Full integrity pass over a parsed block.
    pub fn verify(block: &GenesisBlock) -> Result<(), IntegrityError> {
        Self::verify_signature_shapes(block)?;

        let declared_hash = decode_field(
            "transactionInfo.payloadHash",
            &block.transaction_info.payload_hash,
            PAYLOAD_HASH_LEN,
        )?;

        let digest = Self::compute_payload(block)?;

        if block.transaction_info.payload_length != digest.length {
            return Err(IntegrityError::PayloadLengthMismatch {
                declared: block.transaction_info.payload_length,
                computed: digest.length,
            });
        }
        if hex::encode(declared_hash) != digest.hash_hex {
            return Err(IntegrityError::PayloadHashMismatch {
                declared: block.transaction_info.payload_hash.to_lowercase(),
                computed: digest.hash_hex,
            });
        }

        Ok(())
    }

    /// Recompute the payload checksum over all envelopes in order.
    pub fn compute_payload(block: &GenesisBlock) -> Result<PayloadDigest, IntegrityError> {
        let mut hasher = Sha256::new();
        let mut length = 0u64;
        for envelope in &block.transaction_in_blocks {
            let bytes = Self::payload_bytes(envelope)?;
            length += bytes.len() as u64;
            hasher.update(&bytes);
        }
        Ok(PayloadDigest {
            hash_hex: hex::encode(hasher.finalize()),
            length,
        })
    }

    /// Canonical payload bytes for one envelope.
    pub fn payload_bytes(envelope: &TransactionEnvelope) -> Result<Vec<u8>, IntegrityError> {
        let tx = &envelope.transaction;
        let signature = decode_field(
            &format!("transaction[{}].signature", envelope.t_index),
            &tx.signature,
            SIGNATURE_LEN,
        )?;

        let mut bytes = Vec::with_capacity(160);
        bytes.extend_from_slice(&envelope.t_index.to_be_bytes());
        bytes.extend_from_slice(tx.tx_type.tag().as_bytes());
        bytes.extend_from_slice(tx.sender_id.as_str().as_bytes());
        if let Some(recipient) = &tx.recipient_id {
            bytes.extend_from_slice(recipient.as_str().as_bytes());
        }
        bytes.extend_from_slice(tx.fee.to_string().as_bytes());
        bytes.extend_from_slice(&signature);
        Ok(bytes)
    }

    /// Shape checks on every signature and public key in the block.
    fn verify_signature_shapes(block: &GenesisBlock) -> Result<(), IntegrityError> {
        decode_field("block.signature", &block.signature, SIGNATURE_LEN)?;
        decode_field(
            "block.generatorPublicKey",
            &block.generator_public_key,
            PUBLIC_KEY_LEN,
        )?;
        for envelope in &block.transaction_in_blocks {
            let i = envelope.t_index;
            decode_field(
                &format!("envelope[{i}].signature"),
                &envelope.signature,
                SIGNATURE_LEN,
            )?;
            decode_field(
                &format!("transaction[{i}].signature"),
                &envelope.transaction.signature,
                SIGNATURE_LEN,
            )?;
            decode_field(
                &format!("transaction[{i}].senderPublicKey"),
                &envelope.transaction.sender_public_key,
                PUBLIC_KEY_LEN,
            )?;
        }
        Ok(())
    }
}

fn decode_field(field: &str, value: &str, expected: usize) -> Result<Vec<u8>, IntegrityError> {
    let bytes = hex::decode(value).map_err(|source| IntegrityError::MalformedHex {
        field: field.to_owned(),
        source,
    })?;
    if bytes.len() != expected {
        return Err(IntegrityError::WrongByteLength {
            field: field.to_owned(),
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
