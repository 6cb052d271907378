//! Pseudo-random assessor used for demos and as the remote fallback.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

use crate::assessment::{RiskAssessment, RiskAssessor, Severity, MAX_RISK_SCORE};
use crate::error::{GuardError, Result};
use crate::vendors::Vendor;

const FINDINGS: &[&str] = &[
    "Cold-chain temperature excursions in last audit window",
    "HIPAA business associate agreement pending renewal",
    "Single-source dependency for critical reagent",
    "Outdated SOC 2 Type II report",
    "Open FDA Form 483 observation",
    "Incomplete GDPR data processing inventory",
    "Sub-processor list not disclosed",
    "Penetration test findings unresolved beyond 90 days",
];

pub struct MockAssessor {
    rng: Mutex<StdRng>,
}

impl MockAssessor {
    /// Deterministic assessor for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }
}

#[async_trait]
impl RiskAssessor for MockAssessor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn assess(&self, vendor: &Vendor) -> Result<RiskAssessment> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GuardError::AssessmentError("Mock generator poisoned".to_string()))?;

        // One decimal place, 0.0..=10.0
        let risk_score = (rng.gen_range(0.0..=MAX_RISK_SCORE) * 10.0_f64).round() / 10.0;
        let count = rng.gen_range(1..=3);
        let findings: Vec<String> = FINDINGS
            .choose_multiple(&mut *rng, count)
            .map(|finding| finding.to_string())
            .collect();
        let severity = Severity::from_score(risk_score);

        debug!("Mock assessment for {}: {:.1}", vendor.id, risk_score);

        Ok(RiskAssessment {
            id: Uuid::new_v4(),
            vendor_id: vendor.id.clone(),
            risk_score,
            severity,
            summary: format!(
                "{} ({}) assessed at {:?} risk with {} finding(s)",
                vendor.name,
                vendor.category,
                severity,
                findings.len()
            ),
            findings,
            source: self.name().to_string(),
            assessed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_scores_in_range() {
        let assessor = MockAssessor::seeded(7);
        let vendor = Vendor::new("V1", "Helix Diagnostics", "Clinical Laboratory", "US");

        for _ in 0..50 {
            let assessment = assessor.assess(&vendor).await.unwrap();
            assert!(assessment.validate(&vendor).is_ok());
            assert!(!assessment.findings.is_empty());
            assert_eq!(assessment.severity, Severity::from_score(assessment.risk_score));
            assert_eq!(assessment.source, "mock");
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_scores() {
        let vendor = Vendor::new("V1", "Helix Diagnostics", "Clinical Laboratory", "US");
        let a = MockAssessor::seeded(42);
        let b = MockAssessor::seeded(42);

        for _ in 0..5 {
            let left = a.assess(&vendor).await.unwrap();
            let right = b.assess(&vendor).await.unwrap();
            assert_eq!(left.risk_score, right.risk_score);
            assert_eq!(left.findings, right.findings);
        }
    }
}
