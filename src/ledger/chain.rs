//! Risk Ledger
//!
//! In-memory, append-only sequence of risk decision blocks. The genesis
//! block is written on construction; every later block links to the head
//! that was current when it was appended.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::assessment::MAX_RISK_SCORE;
use crate::ledger::block::Block;
use crate::ledger::subscription::{Subscribers, Subscription};
use crate::ledger::verify::{verify_blocks, ChainVerification};

/// Append-only hash-chained ledger
pub struct Ledger {
    blocks: Vec<Block>,
    subscribers: Subscribers,
}

impl Ledger {
    /// Create a ledger holding only its genesis block
    pub fn new(node_id: &str) -> Self {
        let genesis = Block::genesis(node_id);
        info!("Ledger initialised with genesis {}", genesis.hash);

        Self {
            blocks: vec![genesis],
            subscribers: Subscribers::default(),
        }
    }

    /// Append a new block at the head and notify subscribers
    ///
    /// Timestamps never precede the head's, even if the wall clock steps
    /// back. A non-finite score is recorded as the maximum score.
    pub fn append(
        &mut self,
        subject_id: impl Into<String>,
        subject_name: impl Into<String>,
        action: impl Into<String>,
        risk_score: f64,
        signatures: Vec<String>,
        snapshot: serde_json::Value,
    ) -> Block {
        let head = self.head();
        let timestamp = Utc::now().max(head.timestamp);
        let risk_score = if risk_score.is_finite() {
            risk_score
        } else {
            warn!("Non-finite risk score {} recorded as {}", risk_score, MAX_RISK_SCORE);
            MAX_RISK_SCORE
        };

        let block = Block::new(
            head.id + 1,
            head.hash.clone(),
            timestamp,
            subject_id.into(),
            subject_name.into(),
            action.into(),
            risk_score,
            signatures,
            snapshot,
        );

        self.blocks.push(block.clone());
        debug!("Appended ledger block: {}", block.summary());

        let snapshot = self.snapshot();
        self.subscribers.notify(&snapshot);

        block
    }

    /// Register a callback; it receives the current sequence immediately
    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut(&[Block]) + Send + 'static,
    {
        let (subscription, position) = self.subscribers.register(Box::new(callback));
        debug!("Subscriber {} registered", subscription.id());

        let snapshot = self.snapshot();
        self.subscribers.deliver_to(position, &snapshot);
        self.subscribers.prune();

        subscription
    }

    /// Walk the chain from genesis and report the first broken block
    pub fn verify_chain(&self) -> ChainVerification {
        verify_blocks(&self.blocks)
    }

    /// Blocks in chain order, genesis first
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Blocks most-recent-first
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.iter().rev().cloned().collect()
    }

    pub fn head(&self) -> &Block {
        // The genesis block is never removed
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn head_hash(&self) -> &str {
        &self.head().hash
    }

    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn get(&self, id: u64) -> Option<&Block> {
        self.blocks.get(usize::try_from(id).ok()?)
    }

    pub fn blocks_for_subject(&self, subject_id: &str) -> Vec<&Block> {
        self.blocks
            .iter()
            .filter(|block| !block.is_genesis() && block.subject_id == subject_id)
            .collect()
    }

    /// Number of blocks including genesis
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false; a ledger holds at least its genesis block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn append_score(ledger: &mut Ledger, score: f64) -> Block {
        ledger.append(
            "V1",
            "Helix Diagnostics",
            "risk assessment completed",
            score,
            vec!["Compliance Agent".to_string()],
            serde_json::json!({ "score": score }),
        )
    }

    #[test]
    fn test_new_ledger_has_genesis() {
        let ledger = Ledger::new("guard-01");
        assert_eq!(ledger.len(), 1);
        assert!(!ledger.is_empty());
        assert!(ledger.genesis().is_genesis());
        assert_eq!(ledger.head_hash(), ledger.genesis().hash);
    }

    #[test]
    fn test_append_links_to_head() {
        let mut ledger = Ledger::new("guard-01");
        let genesis_hash = ledger.head_hash().to_string();

        let first = append_score(&mut ledger, 3.0);
        assert_eq!(first.id, 1);
        assert_eq!(first.previous_hash, genesis_hash);

        let second = append_score(&mut ledger, 8.0);
        assert_eq!(second.id, 2);
        assert_eq!(second.previous_hash, first.hash);
        assert_eq!(ledger.head_hash(), second.hash);
    }

    #[test]
    fn test_append_with_empty_signatures() {
        let mut ledger = Ledger::new("guard-01");
        let block = ledger.append("V2", "Vendor", "flagged", 1.0, vec![], serde_json::Value::Null);
        assert!(block.signatures.is_empty());
        assert!(ledger.verify_chain().valid);
    }

    #[test]
    fn test_snapshot_is_most_recent_first() {
        let mut ledger = Ledger::new("guard-01");
        append_score(&mut ledger, 3.0);
        append_score(&mut ledger, 8.0);

        let snapshot = ledger.snapshot();
        let ids: Vec<u64> = snapshot.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1, 0]);
    }

    #[test]
    fn test_subscriber_receives_initial_state_and_appends() {
        let mut ledger = Ledger::new("guard-01");
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let _subscription = ledger.subscribe(move |blocks| {
            sink.lock().unwrap().push(blocks[0].id);
        });

        append_score(&mut ledger, 3.0);
        append_score(&mut ledger, 8.0);

        assert_eq!(*received.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_callback_can_unsubscribe_itself() {
        let mut ledger = Ledger::new("guard-01");
        let handle: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0));

        let inner_handle = handle.clone();
        let counter = calls.clone();
        let subscription = ledger.subscribe(move |_| {
            *counter.lock().unwrap() += 1;
            if let Some(subscription) = inner_handle.lock().unwrap().as_ref() {
                subscription.unsubscribe();
            }
        });
        *handle.lock().unwrap() = Some(subscription);

        append_score(&mut ledger, 3.0);
        append_score(&mut ledger, 8.0);

        // Initial delivery plus the first append
        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(ledger.subscriber_count(), 0);
    }

    #[test]
    fn test_append_after_clock_step_back_stays_monotonic() {
        let mut ledger = Ledger::new("guard-01");

        // Head stamped an hour ahead, as if the clock has since stepped back
        let ahead = Utc::now() + chrono::Duration::hours(1);
        ledger.blocks[0].timestamp = ahead;
        ledger.blocks[0].hash = ledger.blocks[0].calculate_hash();

        let block = append_score(&mut ledger, 3.0);
        assert_eq!(block.timestamp, ahead);
        assert!(ledger.verify_chain().valid);
    }

    #[test]
    fn test_non_finite_score_recorded_as_maximum() {
        let mut ledger = Ledger::new("guard-01");
        let nan = ledger.append("V1", "Helix", "flagged", f64::NAN, vec![], serde_json::Value::Null);
        let inf = ledger.append("V1", "Helix", "flagged", f64::INFINITY, vec![], serde_json::Value::Null);

        assert_eq!(nan.risk_score, MAX_RISK_SCORE);
        assert_eq!(inf.risk_score, MAX_RISK_SCORE);

        let exported = crate::ledger::to_jsonl(ledger.blocks()).unwrap();
        let reloaded: Vec<Block> = exported
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(crate::ledger::verify_blocks(&reloaded).valid);
    }

    #[test]
    fn test_get_and_subject_filter() {
        let mut ledger = Ledger::new("guard-01");
        append_score(&mut ledger, 3.0);
        ledger.append("V2", "Other", "risk assessment completed", 4.0, vec![], serde_json::Value::Null);

        assert_eq!(ledger.get(2).unwrap().subject_id, "V2");
        assert!(ledger.get(3).is_none());
        assert_eq!(ledger.blocks_for_subject("V1").len(), 1);
        assert!(ledger.blocks_for_subject("guard-01").is_empty());
    }
}
