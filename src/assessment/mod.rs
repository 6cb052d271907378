//! Risk assessment producers
//!
//! An assessor turns a vendor profile into a scored assessment. The
//! ledger records whatever an assessor returns; it does not care which
//! implementation produced it.

pub mod fallback;
pub mod mock;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::AssessorConfig;
use crate::error::{GuardError, Result};
use crate::vendors::Vendor;

pub use fallback::FallbackAssessor;
pub use mock::MockAssessor;
pub use remote::RemoteAssessor;

pub const MAX_RISK_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.5 {
            Severity::Critical
        } else if score >= 7.0 {
            Severity::High
        } else if score >= 4.0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

/// One completed assessment, recorded verbatim as the block snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub id: Uuid,
    pub vendor_id: String,
    pub risk_score: f64,
    pub severity: Severity,
    pub summary: String,
    #[serde(default)]
    pub findings: Vec<String>,
    pub source: String,
    pub assessed_at: DateTime<Utc>,
}

impl RiskAssessment {
    /// Reject scores outside 0–10 or assessments for another vendor
    pub fn validate(&self, vendor: &Vendor) -> Result<()> {
        if !self.risk_score.is_finite() || !(0.0..=MAX_RISK_SCORE).contains(&self.risk_score) {
            return Err(GuardError::score_out_of_range(self.risk_score));
        }
        if self.vendor_id != vendor.id {
            return Err(GuardError::vendor_mismatch(&vendor.id, &self.vendor_id));
        }
        Ok(())
    }
}

#[async_trait]
pub trait RiskAssessor: Send + Sync {
    /// Short label recorded as the assessment source
    fn name(&self) -> &str;

    async fn assess(&self, vendor: &Vendor) -> Result<RiskAssessment>;
}

/// Mock alone, or the remote service backed by the mock
pub fn build_assessor(config: &AssessorConfig) -> Result<Arc<dyn RiskAssessor>> {
    let mock: Arc<dyn RiskAssessor> = match config.mock_seed {
        Some(seed) => Arc::new(MockAssessor::seeded(seed)),
        None => Arc::new(MockAssessor::from_entropy()),
    };

    let Some(url) = &config.remote_url else {
        info!("Using mock risk assessor");
        return Ok(mock);
    };

    info!("Using remote risk assessor at {} with mock fallback", url);
    let remote = RemoteAssessor::new(url.clone(), config.api_key.clone(), config.timeout())?;
    Ok(Arc::new(FallbackAssessor::new(Arc::new(remote), mock)))
}
