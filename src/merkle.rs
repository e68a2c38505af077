// src/merkle.rs
use anyhow::{Context, Result};
use base64::Engine;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::ct_log::types::MerkleAuditProof;

/// Prefix for interior nodes in an RFC 6962 Merkle tree.
/// Distinct from the 0x00 leaf prefix so a leaf can never be
/// reinterpreted as an interior node.
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Outcome of replaying an audit path against an expected root hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofVerification {
    pub success: bool,
    pub calculated_root_hex: String,
    pub expected_root_hex: String,
}

/// Verify a Merkle inclusion proof returned by a CT log server.
///
/// Replays `proof.audit_path` over `leaf_hash` and compares the recomputed
/// root against `expected_root` byte-for-byte. Never fails: an undecodable
/// audit-path element yields `success = false` with both hex fields empty,
/// so a caller iterating multiple SCTs is never aborted mid-run.
pub fn verify_inclusion(
    proof: &MerkleAuditProof,
    leaf_hash: &[u8; 32],
    expected_root: &[u8],
) -> ProofVerification {
    match calculate_root_hash(leaf_hash, proof.leaf_index, &proof.audit_path) {
        Ok(calculated) => ProofVerification {
            success: calculated.as_slice() == expected_root,
            calculated_root_hex: hex::encode(calculated),
            expected_root_hex: hex::encode(expected_root),
        },
        Err(e) => {
            warn!("Failed to replay Merkle audit path: {:#}", e);
            ProofVerification {
                success: false,
                calculated_root_hex: String::new(),
                expected_root_hex: String::new(),
            }
        }
    }
}

/// Recompute the candidate root hash from a leaf hash and its audit path.
///
/// At each level: odd node index means the sibling is the left child, even
/// means it is the right child; the index then halves for the parent level.
fn calculate_root_hash(
    leaf_hash: &[u8; 32],
    leaf_index: u64,
    audit_path: &[String],
) -> Result<[u8; 32]> {
    let mut current_hash = *leaf_hash;
    let mut node_index = leaf_index;

    for path_element in audit_path {
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(path_element)
            .context("Failed to decode base64 audit path element")?;
        let sibling: [u8; 32] = decoded
            .try_into()
            .map_err(|v: Vec<u8>| anyhow::anyhow!("Audit path element is {} bytes, expected 32", v.len()))?;

        if node_index % 2 == 1 {
            current_hash = hash_children(&sibling, &current_hash);
        } else {
            current_hash = hash_children(&current_hash, &sibling);
        }

        node_index /= 2;
    }

    Ok(current_hash)
}

/// SHA256(0x01 || left || right)
pub fn hash_children(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([NODE_HASH_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}
