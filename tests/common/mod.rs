#![allow(dead_code)]

use std::sync::Arc;

use biorisk_guard::assessment::MockAssessor;
use biorisk_guard::ledger::{Block, Ledger};
use biorisk_guard::service::RiskService;
use biorisk_guard::vendors::VendorRegistry;

/// Ledger holding genesis plus one block per score for subject `V1`
pub fn ledger_with_scores(scores: &[f64]) -> Ledger {
    let mut ledger = Ledger::new("test-node");
    for score in scores {
        append_assessment(&mut ledger, "V1", *score);
    }
    ledger
}

pub fn append_assessment(ledger: &mut Ledger, subject_id: &str, score: f64) -> Block {
    ledger.append(
        subject_id,
        format!("Vendor {}", subject_id),
        "risk assessment completed",
        score,
        vec!["Risk Analyst Agent".to_string(), "Compliance Agent".to_string()],
        serde_json::json!({ "vendorId": subject_id, "riskScore": score }),
    )
}

/// Service over the demo catalog with a seeded mock assessor
pub fn create_test_service(threshold: f64) -> RiskService {
    RiskService::new(
        Ledger::new("test-node"),
        VendorRegistry::new(VendorRegistry::demo_catalog()),
        Arc::new(MockAssessor::seeded(11)),
        vec!["Compliance Agent".to_string()],
        threshold,
    )
}
