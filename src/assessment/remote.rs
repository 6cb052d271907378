//! Remote Assessor
//!
//! Posts the vendor profile to an external assessment service and
//! accepts only schema-valid JSON back.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::assessment::{RiskAssessment, RiskAssessor, Severity};
use crate::error::{GuardError, Result};
use crate::vendors::Vendor;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentRequest<'a> {
    vendor_id: &'a str,
    vendor_name: &'a str,
    category: &'a str,
    country: &'a str,
}

/// Response schema expected from the service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentResponse {
    vendor_id: String,
    risk_score: f64,
    summary: String,
    #[serde(default)]
    findings: Vec<String>,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(default)]
    assessed_at: Option<DateTime<Utc>>,
}

pub struct RemoteAssessor {
    endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

impl RemoteAssessor {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GuardError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            api_key,
            http_client,
        })
    }
}

#[async_trait]
impl RiskAssessor for RemoteAssessor {
    fn name(&self) -> &str {
        "remote"
    }

    async fn assess(&self, vendor: &Vendor) -> Result<RiskAssessment> {
        info!("Requesting remote assessment for vendor {}", vendor.id);

        let body = AssessmentRequest {
            vendor_id: &vendor.id,
            vendor_name: &vendor.name,
            category: &vendor.category,
            country: &vendor.country,
        };

        let mut request = self.http_client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GuardError::AssessmentError(format!(
                "Assessment service returned {}",
                status
            )));
        }

        let parsed: AssessmentResponse = response.json().await.map_err(|e| {
            GuardError::InvalidAssessment(format!("Malformed assessment response: {}", e))
        })?;
        debug!("Remote assessment for {}: {:.1}", parsed.vendor_id, parsed.risk_score);

        let assessment = RiskAssessment {
            id: Uuid::new_v4(),
            vendor_id: parsed.vendor_id,
            risk_score: parsed.risk_score,
            severity: parsed
                .severity
                .unwrap_or_else(|| Severity::from_score(parsed.risk_score)),
            summary: parsed.summary,
            findings: parsed.findings,
            source: self.name().to_string(),
            assessed_at: parsed.assessed_at.unwrap_or_else(Utc::now),
        };
        assessment.validate(vendor)?;

        Ok(assessment)
    }
}
