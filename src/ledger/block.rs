//! Ledger Block
//!
//! Defines the immutable record appended to the risk ledger
//! and the SHA-256 hash chain linking blocks together.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Sentinel `previous_hash` carried by the genesis block
pub const GENESIS_PREVIOUS_HASH: &str =
    "sha256:0000000000000000000000000000000000000000000000000000000000000000";

/// Action label recorded on the genesis block
pub const GENESIS_ACTION: &str = "genesis";

/// One recorded risk decision event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: u64,
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: DateTime<Utc>,
    pub subject_id: String,
    pub subject_name: String,
    pub action: String,
    pub risk_score: f64,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub snapshot: serde_json::Value,
}

impl Block {
    /// Build a block linked to `previous_hash` and seal it with its hash
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: u64,
        previous_hash: String,
        timestamp: DateTime<Utc>,
        subject_id: String,
        subject_name: String,
        action: String,
        risk_score: f64,
        signatures: Vec<String>,
        snapshot: serde_json::Value,
    ) -> Self {
        let mut block = Self {
            id,
            hash: String::new(),
            previous_hash,
            timestamp,
            subject_id,
            subject_name,
            action,
            risk_score,
            signatures,
            snapshot,
        };

        block.hash = block.calculate_hash();
        block
    }

    /// Create the first block of a chain
    pub fn genesis(node_id: &str) -> Self {
        Self::new(
            0,
            GENESIS_PREVIOUS_HASH.to_string(),
            Utc::now(),
            node_id.to_string(),
            node_id.to_string(),
            GENESIS_ACTION.to_string(),
            0.0,
            Vec::new(),
            serde_json::json!({ "description": "Genesis block", "version": "1.0" }),
        )
    }

    /// Canonical string representation for hashing
    pub fn canonical_string(&self) -> String {
        format!(
            "id:{}|timestamp:{}|subject_id:{}|subject_name:{}|action:{}|risk_score:{}|signatures:{}|snapshot:{}|previous_hash:{}",
            self.id,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
            self.subject_id,
            self.subject_name,
            self.action,
            self.risk_score,
            self.signatures.join(","),
            self.snapshot,
            self.previous_hash
        )
    }

    /// SHA-256 of the canonical content, `sha256:`-prefixed
    pub fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_string().as_bytes());
        format!("sha256:{}", hex::encode(hasher.finalize()))
    }

    /// Whether the stored hash still matches the content
    pub fn verify_hash(&self) -> bool {
        self.hash == self.calculate_hash()
    }

    pub fn is_genesis(&self) -> bool {
        self.id == 0 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "#{} {}: {} ({}) score {:.1}",
            self.id, self.action, self.subject_name, self.subject_id, self.risk_score
        )
    }
}
