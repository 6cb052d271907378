//! Merkle anchoring for ledger blocks
//!
//! Builds a Merkle tree over block hashes so a single root can be
//! published, and produces inclusion proofs for individual blocks.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{GuardError, Result};
use crate::ledger::block::Block;

fn hash_pair(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

/// Hash each level pair-wise; an odd trailing node is paired with itself
fn next_level(level: &[String]) -> Vec<String> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => hash_pair(left, right),
            [single] => hash_pair(single, single),
            _ => unreachable!("chunks(2) yields one or two items"),
        })
        .collect()
}

fn leaves(blocks: &[Block]) -> Result<Vec<String>> {
    if blocks.is_empty() {
        return Err(GuardError::MerkleError(
            "Cannot build Merkle tree from empty block list".to_string(),
        ));
    }
    Ok(blocks.iter().map(|block| block.hash.clone()).collect())
}

/// Merkle root over the hashes of `blocks` in chain order
pub fn merkle_root(blocks: &[Block]) -> Result<String> {
    let mut level = leaves(blocks)?;
    while level.len() > 1 {
        level = next_level(&level);
    }

    let root = level.swap_remove(0);
    debug!("Merkle root over {} blocks: {}", blocks.len(), root);
    Ok(root)
}

/// Verify a claimed root against blocks
pub fn verify_merkle_root(blocks: &[Block], claimed_root: &str) -> Result<bool> {
    Ok(merkle_root(blocks)? == claimed_root)
}

/// Which side a sibling sits on when recombining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub hash: String,
    pub side: Side,
}

/// Inclusion proof for one block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    pub index: usize,
    pub leaf_hash: String,
    pub steps: Vec<ProofStep>,
    pub root_hash: String,
}

impl MerkleProof {
    /// Recompute the root from the leaf and compare
    pub fn verify(&self) -> bool {
        let computed = self
            .steps
            .iter()
            .fold(self.leaf_hash.clone(), |current, step| match step.side {
                Side::Left => hash_pair(&step.hash, &current),
                Side::Right => hash_pair(&current, &step.hash),
            });
        computed == self.root_hash
    }

    pub fn size(&self) -> usize {
        self.steps.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Merkle proof for block {}: {} hashes, root: {}",
            self.index,
            self.steps.len(),
            self.root_hash
        )
    }
}

/// Generate an inclusion proof for the block at chain index `index`
pub fn merkle_proof(blocks: &[Block], index: usize) -> Result<MerkleProof> {
    if index >= blocks.len() {
        return Err(GuardError::MerkleError(format!(
            "Block index {} out of range ({} blocks)",
            index,
            blocks.len()
        )));
    }

    let mut level = leaves(blocks)?;
    let leaf_hash = level[index].clone();
    let mut position = index;
    let mut steps = Vec::new();

    while level.len() > 1 {
        let step = if position % 2 == 0 {
            // Missing right sibling means the node was paired with itself
            let sibling = level.get(position + 1).unwrap_or(&level[position]);
            ProofStep {
                hash: sibling.clone(),
                side: Side::Right,
            }
        } else {
            ProofStep {
                hash: level[position - 1].clone(),
                side: Side::Left,
            }
        };
        steps.push(step);

        level = next_level(&level);
        position /= 2;
    }

    Ok(MerkleProof {
        index,
        leaf_hash,
        steps,
        root_hash: level.swap_remove(0),
    })
}
