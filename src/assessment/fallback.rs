//! Assessor chaining: a primary source with a secondary used on failure.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::assessment::{RiskAssessment, RiskAssessor};
use crate::error::Result;
use crate::vendors::Vendor;

/// Try `primary`; on any error, log it and use `secondary`
pub struct FallbackAssessor {
    primary: Arc<dyn RiskAssessor>,
    secondary: Arc<dyn RiskAssessor>,
}

impl FallbackAssessor {
    pub fn new(primary: Arc<dyn RiskAssessor>, secondary: Arc<dyn RiskAssessor>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl RiskAssessor for FallbackAssessor {
    fn name(&self) -> &str {
        self.primary.name()
    }

    async fn assess(&self, vendor: &Vendor) -> Result<RiskAssessment> {
        match self.primary.assess(vendor).await {
            Ok(assessment) => Ok(assessment),
            Err(e) => {
                warn!(
                    "{} assessor failed for vendor {}: {}; falling back to {}",
                    self.primary.name(),
                    vendor.id,
                    e,
                    self.secondary.name()
                );
                self.secondary.assess(vendor).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::MockAssessor;
    use crate::error::GuardError;

    struct Failing;

    #[async_trait]
    impl RiskAssessor for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        async fn assess(&self, _vendor: &Vendor) -> Result<RiskAssessment> {
            Err(GuardError::AssessmentError("unreachable".to_string()))
        }
    }

    #[tokio::test]
    async fn test_falls_back_on_error() {
        let assessor = FallbackAssessor::new(Arc::new(Failing), Arc::new(MockAssessor::seeded(1)));
        let vendor = Vendor::new("V1", "Helix", "Lab", "US");

        let assessment = assessor.assess(&vendor).await.unwrap();
        assert_eq!(assessment.source, "mock");
        assert_eq!(assessment.vendor_id, "V1");
    }

    #[tokio::test]
    async fn test_primary_used_when_healthy() {
        let assessor = FallbackAssessor::new(
            Arc::new(MockAssessor::seeded(1)),
            Arc::new(Failing),
        );
        let vendor = Vendor::new("V1", "Helix", "Lab", "US");
        assert!(assessor.assess(&vendor).await.is_ok());
    }
}
