//! Risk Service
//!
//! Composition of the ledger with its collaborators: runs an assessment
//! for a vendor and records the decision as a new ledger block.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::alerts::{Alert, AlertMonitor};
use crate::assessment::RiskAssessor;
use crate::error::Result;
use crate::ledger::{self, Block, ChainVerification, Ledger};
use crate::vendors::{Vendor, VendorRegistry};

/// Action label written for each completed assessment
pub const ASSESSMENT_ACTION: &str = "risk assessment completed";

#[derive(Clone)]
pub struct RiskService {
    ledger: Arc<Mutex<Ledger>>,
    vendors: Arc<Mutex<VendorRegistry>>,
    assessor: Arc<dyn RiskAssessor>,
    signatories: Vec<String>,
    alerts: Arc<AlertMonitor>,
}

impl RiskService {
    pub fn new(
        mut ledger: Ledger,
        vendors: VendorRegistry,
        assessor: Arc<dyn RiskAssessor>,
        signatories: Vec<String>,
        alert_threshold: f64,
    ) -> Self {
        let alerts = AlertMonitor::attach(&mut ledger, alert_threshold);

        Self {
            ledger: Arc::new(Mutex::new(ledger)),
            vendors: Arc::new(Mutex::new(vendors)),
            assessor,
            signatories,
            alerts: Arc::new(alerts),
        }
    }

    /// Assess a vendor and append the decision to the ledger
    pub async fn assess_vendor(&self, vendor_id: &str) -> Result<Block> {
        let vendor = self.vendors.lock().await.get(vendor_id)?.clone();

        let assessment = self.assessor.assess(&vendor).await?;
        assessment.validate(&vendor)?;
        let snapshot = serde_json::to_value(&assessment)?;

        // Ledger lock held across the registry update: last_score tracks
        // the vendor's newest block
        let mut ledger = self.ledger.lock().await;
        let block = ledger.append(
            vendor.id.clone(),
            vendor.name.clone(),
            ASSESSMENT_ACTION,
            assessment.risk_score,
            self.signatories.clone(),
            snapshot,
        );
        self.vendors
            .lock()
            .await
            .record_score(&vendor.id, block.risk_score, block.timestamp)?;
        drop(ledger);

        info!(
            "Recorded assessment for {} as block #{} ({})",
            vendor.id, block.id, block.hash
        );
        Ok(block)
    }

    pub async fn vendors(&self) -> Vec<Vendor> {
        self.vendors.lock().await.list()
    }

    /// Ledger blocks, most-recent-first
    pub async fn ledger_snapshot(&self) -> Vec<Block> {
        self.ledger.lock().await.snapshot()
    }

    pub async fn verify_chain(&self) -> ChainVerification {
        self.ledger.lock().await.verify_chain()
    }

    pub async fn merkle_root(&self) -> Result<String> {
        ledger::merkle_root(self.ledger.lock().await.blocks())
    }

    pub async fn export_jsonl(&self) -> Result<String> {
        ledger::to_jsonl(self.ledger.lock().await.blocks())
    }

    pub async fn export_to_file(&self, path: &Path) -> Result<()> {
        let blocks = self.ledger.lock().await.blocks().to_vec();
        ledger::write_jsonl(path, &blocks)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.alerts()
    }
}
