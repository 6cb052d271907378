//! Risk Ledger
//!
//! Append-only record of vendor risk decisions, linked by a SHA-256
//! hash chain and anchorable through a Merkle root.

pub mod block;
pub mod chain;
pub mod export;
pub mod merkle;
pub mod subscription;
pub mod verify;

pub use block::{Block, GENESIS_PREVIOUS_HASH};
pub use chain::Ledger;
pub use export::{read_jsonl, to_jsonl, write_jsonl};
pub use merkle::{merkle_proof, merkle_root, verify_merkle_root, MerkleProof};
pub use subscription::Subscription;
pub use verify::{find_tampered_blocks, verify_blocks, BreakReason, ChainVerification, VerificationReport};
