//! Chain Verification
//!
//! Walks a chain-ordered block sequence from genesis forward and
//! reports the first block that breaks the hash chain.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ledger::block::{Block, GENESIS_PREVIOUS_HASH};

/// Why verification stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakReason {
    /// The sequence holds no blocks at all
    EmptyChain,
    /// First block is not a genesis block with the sentinel previous hash
    InvalidGenesis,
    /// `previous_hash` differs from the predecessor's stored hash
    LinkMismatch,
    /// Stored hash differs from the hash of the block's content
    HashMismatch,
    /// Block id is not predecessor id + 1
    SequenceGap,
    /// Timestamp earlier than the predecessor's
    NonMonotonicTimestamp,
}

/// Result of walking the chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerification {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broken_at_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<BreakReason>,
    pub block_count: usize,
}

impl ChainVerification {
    fn ok(block_count: usize) -> Self {
        Self {
            valid: true,
            broken_at_index: None,
            reason: None,
            block_count,
        }
    }

    fn broken(index: usize, reason: BreakReason, block_count: usize) -> Self {
        Self {
            valid: false,
            broken_at_index: Some(index),
            reason: Some(reason),
            block_count,
        }
    }
}

/// Verify a chain-ordered slice, genesis at index 0
pub fn verify_blocks(blocks: &[Block]) -> ChainVerification {
    let Some(first) = blocks.first() else {
        return ChainVerification::broken(0, BreakReason::EmptyChain, 0);
    };

    if first.id != 0 || first.previous_hash != GENESIS_PREVIOUS_HASH {
        return ChainVerification::broken(0, BreakReason::InvalidGenesis, blocks.len());
    }
    if !first.verify_hash() {
        return ChainVerification::broken(0, BreakReason::HashMismatch, blocks.len());
    }

    for i in 1..blocks.len() {
        let prev = &blocks[i - 1];
        let curr = &blocks[i];

        let reason = if curr.previous_hash != prev.hash {
            Some(BreakReason::LinkMismatch)
        } else if !curr.verify_hash() {
            Some(BreakReason::HashMismatch)
        } else if curr.id != prev.id + 1 {
            Some(BreakReason::SequenceGap)
        } else if curr.timestamp < prev.timestamp {
            Some(BreakReason::NonMonotonicTimestamp)
        } else {
            None
        };

        if let Some(reason) = reason {
            warn!("Ledger chain broken at index {}: {:?}", i, reason);
            return ChainVerification::broken(i, reason, blocks.len());
        }
    }

    debug!("Ledger chain verified: {} blocks", blocks.len());
    ChainVerification::ok(blocks.len())
}

/// Indices of every block whose stored hash no longer matches its content
pub fn find_tampered_blocks(blocks: &[Block]) -> Vec<usize> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| !block.verify_hash())
        .map(|(i, _)| i)
        .collect()
}

/// Verification result with detailed information
#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub verification: ChainVerification,
    pub tampered: Vec<usize>,
    pub head_hash: Option<String>,
}

impl VerificationReport {
    pub fn new(blocks: &[Block]) -> Self {
        let verification = verify_blocks(blocks);
        let tampered = find_tampered_blocks(blocks);
        let head_hash = blocks.last().map(|block| block.hash.clone());

        info!(
            "Verification report: valid={} blocks={} tampered={}",
            verification.valid,
            verification.block_count,
            tampered.len()
        );

        Self {
            verification,
            tampered,
            head_hash,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verification.valid
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        match (self.verification.broken_at_index, self.verification.reason) {
            (Some(index), Some(reason)) => format!(
                "Ledger is invalid ({} blocks): broken at index {} ({:?})",
                self.verification.block_count, index, reason
            ),
            _ => format!(
                "Ledger is valid ({} blocks)",
                self.verification.block_count
            ),
        }
    }

    /// Get detailed status
    pub fn detailed_status(&self) -> String {
        let tampered = if self.tampered.is_empty() {
            "None".to_string()
        } else {
            self.tampered
                .iter()
                .map(|i| i.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "Blocks: {}\nChain: {}\nTampered blocks: {}\nHead: {}",
            self.verification.block_count,
            if self.verification.valid { "valid" } else { "broken" },
            tampered,
            self.head_hash.as_deref().unwrap_or("None")
        )
    }
}
