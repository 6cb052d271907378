//! Risk alerts
//!
//! Watches ledger appends and raises an alert for each newly recorded
//! block whose risk score reaches the configured threshold.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ledger::{Block, Ledger, Subscription};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub block_id: u64,
    pub block_hash: String,
    pub subject_id: String,
    pub subject_name: String,
    pub risk_score: f64,
    pub threshold: f64,
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    fn from_block(block: &Block, threshold: f64) -> Self {
        Self {
            block_id: block.id,
            block_hash: block.hash.clone(),
            subject_id: block.subject_id.clone(),
            subject_name: block.subject_name.clone(),
            risk_score: block.risk_score,
            threshold,
            raised_at: Utc::now(),
        }
    }

    pub fn message(&self) -> String {
        format!(
            "{} ({}) scored {:.1}, at or above threshold {:.1}",
            self.subject_name, self.subject_id, self.risk_score, self.threshold
        )
    }
}

/// Subscribed alert consumer
pub struct AlertMonitor {
    threshold: f64,
    alerts: Arc<Mutex<Vec<Alert>>>,
    subscription: Subscription,
}

impl AlertMonitor {
    /// Subscribe to `ledger`; blocks already present are evaluated once
    pub fn attach(ledger: &mut Ledger, threshold: f64) -> Self {
        let alerts = Arc::new(Mutex::new(Vec::new()));
        let sink = alerts.clone();
        let mut last_seen: Option<u64> = None;

        let subscription = ledger.subscribe(move |blocks: &[Block]| {
            // Most-recent-first; stop at the first block already evaluated
            let fresh: Vec<&Block> = blocks
                .iter()
                .take_while(|block| last_seen.map_or(true, |seen| block.id > seen))
                .collect();

            if let Some(newest) = blocks.first() {
                last_seen = Some(newest.id);
            }

            // A panicked reader must not cost us alerts
            let mut alerts = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            for block in fresh.into_iter().rev() {
                if block.is_genesis() || block.risk_score < threshold {
                    continue;
                }
                let alert = Alert::from_block(block, threshold);
                warn!("Risk alert: {}", alert.message());
                alerts.push(alert);
            }
        });

        Self {
            threshold,
            alerts,
            subscription,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Alerts raised so far, oldest first
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn detach(&self) {
        self.subscription.unsubscribe();
    }
}
